use crate::models::{ApiDefinition, Endpoint, Issue, IssueType, Schema, Severity};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// How a spec-side schema name is looked up among implementation schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMatchStrategy {
    /// Names must be identical
    #[default]
    Exact,
    /// Exact name first, then the first name equal ignoring ASCII case
    CaseInsensitive,
}

impl SchemaMatchStrategy {
    pub fn lookup<'a>(&self, schemas: &'a ApiDefinition, name: &str) -> Option<&'a Schema> {
        if let Some(schema) = schemas.schema(name) {
            return Some(schema);
        }
        match self {
            SchemaMatchStrategy::Exact => None,
            SchemaMatchStrategy::CaseInsensitive => schemas
                .schemas()
                .values()
                .find(|schema| schema.name().eq_ignore_ascii_case(name)),
        }
    }
}

/// Schema lookup options for a compliance check
///
/// Defaults keep request names exact and let response names fall back to a
/// case-insensitive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    pub request_schema_match: SchemaMatchStrategy,
    pub response_schema_match: SchemaMatchStrategy,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            request_schema_match: SchemaMatchStrategy::Exact,
            response_schema_match: SchemaMatchStrategy::CaseInsensitive,
        }
    }
}

/// Which side of an operation a schema describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaRole {
    Request,
    Response,
}

impl SchemaRole {
    fn label(&self) -> &'static str {
        match self {
            SchemaRole::Request => "Request",
            SchemaRole::Response => "Response",
        }
    }
}

/// Compares one spec schema against the implementation's schemas
pub struct SchemaComparator<'a> {
    implementation: &'a ApiDefinition,
    options: CheckOptions,
}

impl<'a> SchemaComparator<'a> {
    pub fn new(implementation: &'a ApiDefinition, options: CheckOptions) -> Self {
        Self {
            implementation,
            options,
        }
    }

    fn strategy(&self, role: SchemaRole) -> SchemaMatchStrategy {
        match role {
            SchemaRole::Request => self.options.request_schema_match,
            SchemaRole::Response => self.options.response_schema_match,
        }
    }

    /// Issues for `expected`, declared by `endpoint` in the given role
    ///
    /// A schema missing by name yields one `schema_mismatch` warning. Otherwise
    /// each required spec field absent from the implementation schema yields a
    /// `missing_field` error. Extra or optional fields are never reported.
    pub fn compare(&self, endpoint: &Endpoint, role: SchemaRole, expected: &Schema) -> Vec<Issue> {
        let Some(actual) = self.strategy(role).lookup(self.implementation, expected.name()) else {
            return vec![Issue::new(
                IssueType::SchemaMismatch,
                Severity::Warning,
                format!(
                    "{} schema '{}' not found in implementation",
                    role.label(),
                    expected.name()
                ),
            )
            .at(endpoint.method, endpoint.path.clone())
            .with_expected(json!({ "schema": expected.name() }))
            .with_suggestion(format!(
                "Define model '{}' matching the API contract",
                expected.name()
            ))];
        };

        compare_fields(endpoint, expected, actual)
    }
}

/// `missing_field` errors for required fields of `expected` absent from `actual`
pub fn compare_fields(endpoint: &Endpoint, expected: &Schema, actual: &Schema) -> Vec<Issue> {
    expected
        .fields()
        .iter()
        .filter(|field| field.required && !actual.has_field(&field.name))
        .map(|field| {
            Issue::new(
                IssueType::MissingField,
                Severity::Error,
                format!(
                    "Required field '{}' missing from schema '{}'",
                    field.name,
                    actual.name()
                ),
            )
            .at(endpoint.method, endpoint.path.clone())
            .with_expected(json!({
                "schema": expected.name(),
                "field": field.name,
                "type": field.field_type,
            }))
            .with_suggestion(format!(
                "Add field '{}' to {}",
                field.declaration(),
                actual.name()
            ))
        })
        .collect()
}
