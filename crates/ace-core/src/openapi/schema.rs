use crate::models::HttpMethod;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// OpenAPI 3.x document, limited to what the canonical model needs
///
/// Maps are order-preserving so endpoints and schemas come out in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default)]
    pub openapi: Option<String>,
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub patch: Option<Operation>,
    pub delete: Option<Operation>,
    pub head: Option<Operation>,
    pub options: Option<Operation>,
}

impl PathItem {
    /// Declared operations in canonical method order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |method| self.operation(method).map(|op| (method, op)))
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterObject>,
    pub request_body: Option<RequestBody>,
    /// Keyed by status code or `default`
    #[serde(default)]
    pub responses: IndexMap<String, ResponseObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterObject {
    #[serde(default)]
    pub name: String,
    /// "query", "path", "header", "cookie"
    #[serde(rename = "in")]
    pub location: Option<String>,
    pub required: Option<bool>,
    pub description: Option<String>,
    pub schema: Option<SchemaObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    pub required: Option<bool>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseObject {
    pub description: Option<String>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaObject>,
}

/// Schema object or `$ref`, kept flat so partial documents still load
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    pub format: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub properties: IndexMap<String, SchemaObject>,
    #[serde(default)]
    pub required: Vec<String>,
    pub items: Option<Box<SchemaObject>>,
    #[serde(default)]
    pub all_of: Vec<SchemaObject>,
    #[serde(default)]
    pub one_of: Vec<SchemaObject>,
    #[serde(default)]
    pub any_of: Vec<SchemaObject>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
}

impl SchemaObject {
    /// The only non-null type, e.g. `string` for `["string", "null"]`
    pub fn type_tag(&self) -> Option<&str> {
        match self.schema_type.as_ref()?.non_null().as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// More than one non-null type is allowed
    pub fn has_multiple_types(&self) -> bool {
        self.schema_type
            .as_ref()
            .is_some_and(|schema_type| schema_type.non_null().len() > 1)
    }

    /// Last segment of `$ref`, e.g. `User` for `#/components/schemas/User`
    pub fn reference_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .map(|reference| reference.rsplit('/').next().unwrap_or(reference))
    }
}

/// `type` as a single name (3.0) or a list of names (3.1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl SchemaType {
    /// Declared types without `null`
    pub fn non_null(&self) -> Vec<&str> {
        match self {
            SchemaType::Single(name) => vec![name.as_str()],
            SchemaType::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
        .into_iter()
        .filter(|name| *name != "null")
        .collect()
    }
}
