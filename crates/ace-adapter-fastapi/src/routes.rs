use crate::pydantic::annotation_type;
use crate::utils::{
    constant_to_json, docstring, int_constant, is_ellipsis, keyword, last_segment,
    parse_http_method, string_constant,
};
use ace_core::models::{ApiDefinition, Endpoint, FieldType, HttpMethod, Parameter, ParameterLocation};
use rustpython_parser::ast::{self, Operator};
use std::path::Path;
use tracing::debug;

/// Objects whose method decorators declare routes
const ROUTER_NAMES: [&str; 2] = ["app", "router"];

/// Handler arguments injected by the framework or the service itself
const IGNORED_ARGUMENTS: [&str; 4] = ["self", "request", "db", "session"];

/// Handler function, sync or async
struct Handler<'a> {
    name: &'a str,
    args: &'a ast::Arguments,
    body: &'a [ast::Stmt],
    decorators: &'a [ast::Expr],
    returns: Option<&'a ast::Expr>,
}

/// Extracts endpoints from `@app.<method>` / `@router.<method>` handlers
pub struct RouteExtractor;

impl RouteExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Endpoints declared in `body`, in source order
    ///
    /// `models` holds the Pydantic models discovered so far; only those can
    /// become request or response schemas.
    pub fn extract(&self, body: &[ast::Stmt], file: &Path, models: &ApiDefinition) -> Vec<Endpoint> {
        let mut endpoints = Vec::new();
        self.walk(body, file, models, &mut endpoints);
        endpoints
    }

    fn walk(&self, body: &[ast::Stmt], file: &Path, models: &ApiDefinition, out: &mut Vec<Endpoint>) {
        for stmt in body {
            let handler = match stmt {
                ast::Stmt::FunctionDef(def) => Handler {
                    name: def.name.as_str(),
                    args: &def.args,
                    body: &def.body,
                    decorators: &def.decorator_list,
                    returns: def.returns.as_deref(),
                },
                ast::Stmt::AsyncFunctionDef(def) => Handler {
                    name: def.name.as_str(),
                    args: &def.args,
                    body: &def.body,
                    decorators: &def.decorator_list,
                    returns: def.returns.as_deref(),
                },
                ast::Stmt::ClassDef(class_def) => {
                    self.walk(&class_def.body, file, models, out);
                    continue;
                }
                _ => continue,
            };

            for decorator in handler.decorators {
                if let Some(endpoint) = self.build_endpoint(decorator, &handler, models) {
                    debug!(
                        endpoint = %endpoint.endpoint_key(),
                        handler = handler.name,
                        file = %file.display(),
                        "Discovered route"
                    );
                    out.push(endpoint);
                }
            }
            self.walk(handler.body, file, models, out);
        }
    }

    fn build_endpoint(
        &self,
        decorator: &ast::Expr,
        handler: &Handler<'_>,
        models: &ApiDefinition,
    ) -> Option<Endpoint> {
        let (method, path, call) = route_decorator(decorator)?;

        let doc = docstring(handler.body).unwrap_or_default().trim();
        let (summary, description) = match doc.split_once('\n') {
            Some((first, rest)) => (first.trim(), rest.trim()),
            None => (doc, ""),
        };

        let mut endpoint = Endpoint::new(method, path.clone())
            .with_operation_id(handler.name)
            .with_summary(summary)
            .with_description(description)
            .with_status_codes(status_codes(call))
            .with_tags(tags(call));

        let arguments = handler
            .args
            .posonlyargs
            .iter()
            .chain(&handler.args.args)
            .chain(&handler.args.kwonlyargs);
        for argument in arguments {
            let name = argument.def.arg.as_str();
            if IGNORED_ARGUMENTS.contains(&name) {
                continue;
            }

            let annotation = argument.def.annotation.as_deref();
            if let Some(model) = annotation.and_then(|a| model_reference(a, models)) {
                if endpoint.request_schema.is_none() {
                    endpoint = endpoint.with_request_schema(model);
                }
                continue;
            }

            if let Some(parameter) = build_parameter(name, annotation, argument.default.as_deref(), &path) {
                endpoint = endpoint.with_parameter(parameter);
            }
        }

        let response_model = keyword(call, "response_model").or(handler.returns);
        if let Some(model) = response_model.and_then(|expr| model_reference(expr, models)) {
            endpoint = endpoint.with_response_schema(model);
        }

        Some(endpoint)
    }
}

impl Default for RouteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Method, path and call of a route decorator such as `@router.get("/users")`
fn route_decorator(decorator: &ast::Expr) -> Option<(HttpMethod, String, &ast::ExprCall)> {
    let ast::Expr::Call(call) = decorator else {
        return None;
    };
    let ast::Expr::Attribute(attr) = call.func.as_ref() else {
        return None;
    };
    let ast::Expr::Name(owner) = attr.value.as_ref() else {
        return None;
    };
    if !ROUTER_NAMES.contains(&owner.id.as_str()) {
        return None;
    }

    let method = parse_http_method(attr.attr.as_str()).ok()?;
    let path = call
        .args
        .first()
        .and_then(string_constant)
        .or_else(|| keyword(call, "path").and_then(string_constant))
        .filter(|path| !path.is_empty())?;

    Some((method, path.to_string(), call))
}

/// `status_code=` as a literal or `status.HTTP_201_CREATED`; 200 otherwise
fn status_codes(call: &ast::ExprCall) -> Vec<u16> {
    let code = keyword(call, "status_code").and_then(|expr| match expr {
        ast::Expr::Attribute(attr) => attr
            .attr
            .as_str()
            .strip_prefix("HTTP_")
            .and_then(|rest| rest.split('_').next())
            .and_then(|digits| digits.parse::<u16>().ok()),
        other => int_constant(other).and_then(|code| u16::try_from(code).ok()),
    });
    vec![code.unwrap_or(200)]
}

fn tags(call: &ast::ExprCall) -> Vec<String> {
    match keyword(call, "tags") {
        Some(ast::Expr::List(list)) => list
            .elts
            .iter()
            .filter_map(string_constant)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Parameter for a plain handler argument; `None` for injected dependencies
fn build_parameter(
    name: &str,
    annotation: Option<&ast::Expr>,
    default: Option<&ast::Expr>,
    path: &str,
) -> Option<Parameter> {
    let in_path = path.contains(&format!("{{{}}}", name)) || path.contains(&format!("{{{}:", name));
    let mut location = if in_path {
        ParameterLocation::Path
    } else {
        ParameterLocation::Query
    };

    // `Query(...)`, `Header(...)` and friends carry the real default
    let mut default_value = default;
    if let Some(ast::Expr::Call(call)) = default {
        match last_segment(&call.func).as_deref() {
            Some("Depends" | "Body" | "Security") => return None,
            Some(marker @ ("Query" | "Path" | "Header" | "Cookie")) => {
                if marker == "Header" {
                    location = ParameterLocation::Header;
                }
                default_value = call.args.first().or_else(|| keyword(call, "default"));
            }
            _ => {}
        }
    }
    let default_value = default_value.filter(|value| !is_ellipsis(value));

    let param_type = annotation
        .map(|a| annotation_type(a).0)
        .unwrap_or(FieldType::Any);
    let mut parameter = Parameter::new(name, location, param_type)
        .required(location == ParameterLocation::Path || default_value.is_none());
    parameter.default = default_value.and_then(constant_to_json);
    Some(parameter)
}

/// Name of a discovered model referenced by an annotation or `response_model`
///
/// Looks through generic wrappers such as `list[User]`, `Optional[User]` or
/// `Page[User]`, preferring the last type argument.
fn model_reference(expr: &ast::Expr, models: &ApiDefinition) -> Option<String> {
    match expr {
        ast::Expr::Subscript(sub) => match sub.slice.as_ref() {
            ast::Expr::Tuple(tuple) => tuple
                .elts
                .iter()
                .rev()
                .find_map(|elt| model_reference(elt, models)),
            single => model_reference(single, models),
        },
        ast::Expr::BinOp(bin_op) if matches!(bin_op.op, Operator::BitOr) => {
            model_reference(&bin_op.left, models).or_else(|| model_reference(&bin_op.right, models))
        }
        ast::Expr::Constant(_) => string_constant(expr)
            .map(str::trim)
            .filter(|name| models.contains_schema(name))
            .map(str::to_string),
        _ => last_segment(expr).filter(|name| models.contains_schema(name)),
    }
}
