use crate::error::ContractError;
use crate::models::{FieldType, Schema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// All methods in the order operations are read from a path item
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Convenient method to get Option
    pub fn from_str_opt(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|method| s.eq_ignore_ascii_case(method.as_str()))
            .ok_or(())
    }
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

impl ParameterLocation {
    /// Maps an OpenAPI `in` value; cookies and unknown values are treated as query
    pub fn from_openapi(location: &str) -> Self {
        match location {
            "path" => ParameterLocation::Path,
            "header" => ParameterLocation::Header,
            _ => ParameterLocation::Query,
        }
    }
}

/// Endpoint input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    #[serde(rename = "type")]
    pub param_type: FieldType,
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, location: ParameterLocation, param_type: FieldType) -> Self {
        Self {
            name: name.into(),
            location,
            param_type,
            required: false,
            description: String::new(),
            default: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// One API operation
///
/// Request and response schemas are referenced by name and resolved against
/// the [`ApiDefinition`] that owns the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Path, may contain `{name}` or `<name>` placeholders
    pub path: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub operation_id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub request_schema: Option<String>,
    /// Primary success-response schema
    #[serde(default)]
    pub response_schema: Option<String>,
    /// Ascending, without duplicates
    #[serde(default)]
    pub response_status_codes: Vec<u16>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            operation_id: String::new(),
            summary: String::new(),
            description: String::new(),
            parameters: Vec::new(),
            request_schema: None,
            response_schema: None,
            response_status_codes: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = operation_id.into();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_request_schema(mut self, name: impl Into<String>) -> Self {
        self.request_schema = Some(name.into());
        self
    }

    pub fn with_response_schema(mut self, name: impl Into<String>) -> Self {
        self.response_schema = Some(name.into());
        self
    }

    /// Sets status codes, keeping them sorted and unique
    pub fn with_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        let mut codes: Vec<u16> = codes.into_iter().collect();
        codes.sort_unstable();
        codes.dedup();
        self.response_status_codes = codes;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Display key, e.g. `GET /users/{user_id}`
    pub fn endpoint_key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Full description of the endpoint, attached to endpoint-level issues
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "path": self.path,
            "method": self.method,
            "operation_id": self.operation_id,
            "summary": self.summary,
            "description": self.description,
            "parameters": self.parameters,
            "request_schema": self.request_schema,
            "response_schema": self.response_schema,
            "response_status_codes": self.response_status_codes,
            "tags": self.tags,
        })
    }
}

/// One side of a comparison: endpoints plus the schemas they reference
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiDefinition {
    pub title: String,
    pub version: String,
    pub description: String,
    endpoints: Vec<Endpoint>,
    schemas: IndexMap<String, Schema>,
}

impl ApiDefinition {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn add_endpoint(&mut self, endpoint: Endpoint) {
        self.endpoints.push(endpoint);
    }

    /// Registers a schema; names are unique within a definition
    pub fn add_schema(&mut self, schema: Schema) -> Result<(), ContractError> {
        if self.schemas.contains_key(schema.name()) {
            return Err(ContractError::DuplicateSchema {
                name: schema.name().to_string(),
            });
        }
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    /// Endpoints in ingestion order
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Schemas in ingestion order, keyed by name
    pub fn schemas(&self) -> &IndexMap<String, Schema> {
        &self.schemas
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn contains_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Exact lookup by method and literal path
    pub fn find_endpoint(&self, method: &str, path: &str) -> Option<&Endpoint> {
        let method = HttpMethod::from_str_opt(method)?;
        self.endpoints
            .iter()
            .find(|e| e.method == method && e.path == path)
    }

    /// Resolves an endpoint's request schema, failing if the name is dangling
    pub fn request_schema_of(&self, endpoint: &Endpoint) -> Result<Option<&Schema>, ContractError> {
        self.resolve(endpoint, endpoint.request_schema.as_deref())
    }

    /// Resolves an endpoint's response schema, failing if the name is dangling
    pub fn response_schema_of(&self, endpoint: &Endpoint) -> Result<Option<&Schema>, ContractError> {
        self.resolve(endpoint, endpoint.response_schema.as_deref())
    }

    fn resolve(
        &self,
        endpoint: &Endpoint,
        name: Option<&str>,
    ) -> Result<Option<&Schema>, ContractError> {
        match name {
            None => Ok(None),
            Some(name) => self
                .schemas
                .get(name)
                .map(Some)
                .ok_or_else(|| ContractError::UnresolvedSchema {
                    endpoint: endpoint.endpoint_key(),
                    schema: name.to_string(),
                }),
        }
    }
}
