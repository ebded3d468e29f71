use ace_core::models::HttpMethod;
use anyhow::Result;
use rustpython_parser::ast;

/// Parses a decorator attribute (`get`, `post`, ...) into an HTTP method
///
/// # Errors
/// Returns an error if the name is not a recognized HTTP method
pub(crate) fn parse_http_method(method_str: &str) -> Result<HttpMethod> {
    method_str
        .parse::<HttpMethod>()
        .map_err(|_| anyhow::anyhow!("Unrecognized HTTP method: {}", method_str))
}

/// `a.b.c` for name and attribute chains
pub(crate) fn dotted_name(expr: &ast::Expr) -> Option<String> {
    match expr {
        ast::Expr::Name(name) => Some(name.id.to_string()),
        ast::Expr::Attribute(attr) => {
            dotted_name(&attr.value).map(|base| format!("{}.{}", base, attr.attr))
        }
        _ => None,
    }
}

/// Last segment of a dotted name, e.g. `BaseModel` for `pydantic.BaseModel`
pub(crate) fn last_segment(expr: &ast::Expr) -> Option<String> {
    dotted_name(expr).map(|name| name.rsplit('.').next().unwrap_or(&name).to_string())
}

pub(crate) fn string_constant(expr: &ast::Expr) -> Option<&str> {
    match expr {
        ast::Expr::Constant(constant) => match &constant.value {
            ast::Constant::Str(s) => Some(s.as_str()),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn int_constant(expr: &ast::Expr) -> Option<i64> {
    match expr {
        ast::Expr::Constant(constant) => match &constant.value {
            ast::Constant::Int(i) => i.to_string().parse().ok(),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn is_ellipsis(expr: &ast::Expr) -> bool {
    matches!(
        expr,
        ast::Expr::Constant(constant) if matches!(constant.value, ast::Constant::Ellipsis)
    )
}

pub(crate) fn is_none(expr: &ast::Expr) -> bool {
    matches!(
        expr,
        ast::Expr::Constant(constant) if matches!(constant.value, ast::Constant::None)
    )
}

/// JSON form of a literal default; `None` for anything that is not a literal
pub(crate) fn constant_to_json(expr: &ast::Expr) -> Option<serde_json::Value> {
    let ast::Expr::Constant(constant) = expr else {
        return None;
    };
    match &constant.value {
        ast::Constant::Str(s) => Some(serde_json::Value::String(s.clone())),
        ast::Constant::Bool(b) => Some(serde_json::Value::Bool(*b)),
        ast::Constant::None => Some(serde_json::Value::Null),
        ast::Constant::Int(i) => i
            .to_string()
            .parse::<i64>()
            .ok()
            .map(serde_json::Value::from),
        ast::Constant::Float(f) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number),
        _ => None,
    }
}

/// Leading docstring of `body`
pub(crate) fn docstring(body: &[ast::Stmt]) -> Option<&str> {
    match body.first()? {
        ast::Stmt::Expr(stmt) => string_constant(&stmt.value),
        _ => None,
    }
}

/// Keyword argument by name
pub(crate) fn keyword<'a>(call: &'a ast::ExprCall, name: &str) -> Option<&'a ast::Expr> {
    call.keywords
        .iter()
        .find(|kw| kw.arg.as_ref().map(|arg| arg.as_str()) == Some(name))
        .map(|kw| &kw.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustpython_parser::{parse, Mode};

    fn first_expr(source: &str) -> ast::Expr {
        let module = parse(source, Mode::Module, "<test>").unwrap();
        let ast::Mod::Module(module) = module else {
            panic!("expected module");
        };
        match module.body.into_iter().next() {
            Some(ast::Stmt::Expr(stmt)) => *stmt.value,
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_parse_http_method_invalid() {
        assert!(parse_http_method("route").is_err());
    }

    #[test]
    fn test_parse_http_method_valid() {
        assert_eq!(parse_http_method("get").unwrap(), HttpMethod::Get);
        assert_eq!(parse_http_method("post").unwrap(), HttpMethod::Post);
        assert_eq!(parse_http_method("put").unwrap(), HttpMethod::Put);
        assert_eq!(parse_http_method("patch").unwrap(), HttpMethod::Patch);
        assert_eq!(parse_http_method("delete").unwrap(), HttpMethod::Delete);
        assert_eq!(parse_http_method("head").unwrap(), HttpMethod::Head);
        assert_eq!(parse_http_method("options").unwrap(), HttpMethod::Options);
    }

    #[test]
    fn test_dotted_name_and_last_segment() {
        let expr = first_expr("pydantic.main.BaseModel");
        assert_eq!(dotted_name(&expr).as_deref(), Some("pydantic.main.BaseModel"));
        assert_eq!(last_segment(&expr).as_deref(), Some("BaseModel"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(int_constant(&first_expr("201")), Some(201));
        assert!(is_ellipsis(&first_expr("...")));
        assert!(is_none(&first_expr("None")));
        assert_eq!(
            constant_to_json(&first_expr("'anon'")),
            Some(serde_json::json!("anon"))
        );
        assert_eq!(constant_to_json(&first_expr("True")), Some(serde_json::json!(true)));
        assert_eq!(constant_to_json(&first_expr("foo()")), None);
    }
}
