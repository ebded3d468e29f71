use crate::utils::{
    constant_to_json, docstring, int_constant, is_ellipsis, is_none, keyword, last_segment,
    string_constant,
};
use ace_core::models::{ApiDefinition, Field, FieldType, Schema};
use rustpython_parser::ast::{self, Operator};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Extractor for Pydantic models
///
/// A class is a model when one of its bases is `BaseModel` (any module
/// prefix) or another extracted model, whose fields it inherits.
pub struct PydanticExtractor;

impl PydanticExtractor {
    /// Creates a new extractor
    pub fn new() -> Self {
        Self
    }

    /// Adds every model declared at module level to `definition`
    pub fn extract_into(&self, body: &[ast::Stmt], file: &Path, definition: &mut ApiDefinition) {
        self.extract_modules([(file, body)], definition);
    }

    /// Adds the models of several modules, resolving bases across files
    ///
    /// A class is extracted once all of its bases that are themselves
    /// candidate classes have been decided, so a subclass may live in a file
    /// visited before its parent. Names already present are kept and later
    /// declarations are skipped.
    pub fn extract_modules<'a>(
        &self,
        modules: impl IntoIterator<Item = (&'a Path, &'a [ast::Stmt])>,
        definition: &mut ApiDefinition,
    ) {
        let mut pending: Vec<(&'a Path, &'a ast::StmtClassDef)> = modules
            .into_iter()
            .flat_map(|(file, body)| {
                body.iter().filter_map(move |stmt| match stmt {
                    ast::Stmt::ClassDef(class_def) => Some((file, class_def)),
                    _ => None,
                })
            })
            .collect();

        loop {
            let waiting: HashSet<String> = pending.iter().map(|(_, c)| c.name.to_string()).collect();
            let (ready, blocked): (Vec<_>, Vec<_>) = pending.into_iter().partition(|(_, class_def)| {
                !class_def.bases.iter().any(|base| {
                    last_segment(base).is_some_and(|name| {
                        name != class_def.name.as_str() && waiting.contains(name.as_str())
                    })
                })
            });
            pending = blocked;
            // Only cycles remain
            if ready.is_empty() {
                break;
            }

            for (file, class_def) in ready {
                if self.is_model(class_def, definition) {
                    self.register(class_def, file, definition);
                }
            }
        }

        for (file, class_def) in pending {
            debug!(
                class = class_def.name.as_str(),
                file = %file.display(),
                "Skipping class with cyclic bases"
            );
        }
    }

    fn register(&self, class_def: &ast::StmtClassDef, file: &Path, definition: &mut ApiDefinition) {
        let name = class_def.name.as_str();
        if definition.contains_schema(name) {
            warn!(
                schema = name,
                file = %file.display(),
                "Duplicate Pydantic model name, keeping the first definition"
            );
            return;
        }

        let schema = self.build_schema(class_def, definition);
        debug!(
            schema = name,
            fields = schema.fields().len(),
            file = %file.display(),
            "Extracted Pydantic model"
        );
        if let Err(err) = definition.add_schema(schema) {
            warn!(error = %err, "Failed to register Pydantic model");
        }
    }

    fn is_model(&self, class_def: &ast::StmtClassDef, known: &ApiDefinition) -> bool {
        class_def.bases.iter().any(|base| match last_segment(base) {
            Some(name) => name == "BaseModel" || known.contains_schema(&name),
            None => false,
        })
    }

    fn build_schema(&self, class_def: &ast::StmtClassDef, known: &ApiDefinition) -> Schema {
        let mut fields: Vec<Field> = Vec::new();

        for base in &class_def.bases {
            let inherited = last_segment(base).and_then(|name| known.schema(&name));
            if let Some(parent) = inherited {
                fields.extend(parent.fields().iter().cloned());
            }
        }

        for stmt in &class_def.body {
            let ast::Stmt::AnnAssign(ann_assign) = stmt else {
                continue;
            };
            if let Some(field) = self.extract_field(ann_assign) {
                // Redeclared fields override the inherited ones in place
                match fields.iter_mut().find(|f| f.name == field.name) {
                    Some(existing) => *existing = field,
                    None => fields.push(field),
                }
            }
        }

        Schema::new(
            class_def.name.as_str(),
            docstring(&class_def.body).unwrap_or_default().trim(),
            fields,
        )
    }

    /// Field for an annotated class attribute; `None` for non-fields
    pub(crate) fn extract_field(&self, ann_assign: &ast::StmtAnnAssign) -> Option<Field> {
        let ast::Expr::Name(target) = ann_assign.target.as_ref() else {
            return None;
        };
        let name = target.id.as_str();
        if name.starts_with('_') || is_class_var(&ann_assign.annotation) {
            return None;
        }

        let (field_type, format) = annotation_type(&ann_assign.annotation);
        let mut required = true;
        let mut default = None;
        let mut description = "";
        let mut min_length = None;
        let mut max_length = None;

        match ann_assign.value.as_deref() {
            None => {}
            Some(ast::Expr::Call(call)) if last_segment(&call.func).as_deref() == Some("Field") => {
                let explicit_default = call.args.first().or_else(|| keyword(call, "default"));
                if let Some(value) = explicit_default.filter(|value| !is_ellipsis(value)) {
                    required = false;
                    default = constant_to_json(value);
                }
                if keyword(call, "default_factory").is_some() {
                    required = false;
                }
                description = keyword(call, "description")
                    .and_then(string_constant)
                    .unwrap_or_default();
                min_length = length_constraint(call, "min_length");
                max_length = length_constraint(call, "max_length");
            }
            Some(value) => {
                required = false;
                default = constant_to_json(value);
            }
        }

        let mut field = Field::new(name, field_type)
            .required(required)
            .with_description(description)
            .with_length(min_length, max_length);
        if let Some(format) = format {
            field = field.with_format(format);
        }
        if let Some(default) = default {
            field = field.with_default(default);
        }
        Some(field)
    }
}

impl Default for PydanticExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn length_constraint(call: &ast::ExprCall, name: &str) -> Option<u64> {
    keyword(call, name)
        .and_then(int_constant)
        .and_then(|value| u64::try_from(value).ok())
}

fn is_class_var(annotation: &ast::Expr) -> bool {
    let base = match annotation {
        ast::Expr::Subscript(sub) => last_segment(&sub.value),
        other => last_segment(other),
    };
    base.as_deref() == Some("ClassVar")
}

/// Semantic type and format hint of a Python annotation
///
/// `Optional[T]` and `T | None` are typed as `T`. Unions with two or more
/// non-None members are `union`. Unrecognized generics are `unknown`.
pub(crate) fn annotation_type(annotation: &ast::Expr) -> (FieldType, Option<&'static str>) {
    match annotation {
        ast::Expr::Name(_) | ast::Expr::Attribute(_) => match last_segment(annotation) {
            Some(name) => scalar_type(&name),
            None => (FieldType::Unknown, None),
        },
        // Forward reference, e.g. "User"
        ast::Expr::Constant(_) => match string_constant(annotation) {
            Some(name) => scalar_type(name.trim()),
            None => (FieldType::Unknown, None),
        },
        ast::Expr::BinOp(bin_op) if matches!(bin_op.op, Operator::BitOr) => {
            let mut members = Vec::new();
            collect_union_members(annotation, &mut members);
            union_type(members)
        }
        ast::Expr::Subscript(sub) => {
            let base = last_segment(&sub.value).unwrap_or_default();
            let arguments: Vec<&ast::Expr> = match sub.slice.as_ref() {
                ast::Expr::Tuple(tuple) => tuple.elts.iter().collect(),
                single => vec![single],
            };

            match base.as_str() {
                "Optional" => arguments
                    .first()
                    .map(|inner| annotation_type(inner))
                    .unwrap_or((FieldType::Unknown, None)),
                "Union" => union_type(arguments),
                "Annotated" => arguments
                    .first()
                    .map(|inner| annotation_type(inner))
                    .unwrap_or((FieldType::Unknown, None)),
                "list" | "List" | "Sequence" | "set" | "Set" | "frozenset" | "FrozenSet"
                | "tuple" | "Tuple" => {
                    let item = arguments
                        .first()
                        .map(|inner| annotation_type(inner).0)
                        .unwrap_or(FieldType::Any);
                    (FieldType::Array(Box::new(item)), None)
                }
                "dict" | "Dict" | "Mapping" => (FieldType::Object, None),
                _ => (FieldType::Unknown, None),
            }
        }
        _ => (FieldType::Unknown, None),
    }
}

fn scalar_type(name: &str) -> (FieldType, Option<&'static str>) {
    match name {
        "str" => (FieldType::String, None),
        "int" => (FieldType::Integer, None),
        "float" | "Decimal" => (FieldType::Number, None),
        "bool" => (FieldType::Boolean, None),
        "dict" | "Dict" => (FieldType::Object, None),
        "list" | "List" => (FieldType::Array(Box::new(FieldType::Any)), None),
        "Any" => (FieldType::Any, None),
        "EmailStr" => (FieldType::String, Some("email")),
        "datetime" => (FieldType::String, Some("date-time")),
        "date" => (FieldType::String, Some("date")),
        "UUID" => (FieldType::String, Some("uuid")),
        "" => (FieldType::Unknown, None),
        other => (FieldType::Named(other.to_string()), None),
    }
}

fn collect_union_members<'a>(expr: &'a ast::Expr, members: &mut Vec<&'a ast::Expr>) {
    match expr {
        ast::Expr::BinOp(bin_op) if matches!(bin_op.op, Operator::BitOr) => {
            collect_union_members(&bin_op.left, members);
            collect_union_members(&bin_op.right, members);
        }
        other => members.push(other),
    }
}

fn union_type(members: Vec<&ast::Expr>) -> (FieldType, Option<&'static str>) {
    let concrete: Vec<&ast::Expr> = members.into_iter().filter(|m| !is_none(m)).collect();
    match concrete.as_slice() {
        [] => (FieldType::Unknown, None),
        [single] => annotation_type(single),
        _ => (FieldType::Union, None),
    }
}
