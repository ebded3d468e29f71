use crate::error::ContractError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Semantic type tag of a schema field or parameter
///
/// Closed set so comparison logic can match exhaustively. Serialized as the
/// textual tag (`"string"`, `"array[User]"`, `"User"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    /// Homogeneous array, e.g. `array[User]`
    Array(Box<FieldType>),
    Object,
    /// Reference to another named schema (e.g., "User")
    Named(String),
    Any,
    Union,
    Unknown,
}

impl FieldType {
    /// Parses a textual type tag. Anything that is not a known primitive or
    /// `array[...]` form is treated as a reference to a named schema.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        match tag {
            "" | "unknown" => FieldType::Unknown,
            "string" => FieldType::String,
            "integer" => FieldType::Integer,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "object" => FieldType::Object,
            "any" => FieldType::Any,
            "union" => FieldType::Union,
            "array" => FieldType::Array(Box::new(FieldType::Any)),
            _ => {
                if let Some(inner) = tag
                    .strip_prefix("array[")
                    .and_then(|rest| rest.strip_suffix(']'))
                {
                    FieldType::Array(Box::new(FieldType::from_tag(inner)))
                } else {
                    FieldType::Named(tag.to_string())
                }
            }
        }
    }

    /// Name of the referenced schema, looking through arrays
    pub fn referenced_schema(&self) -> Option<&str> {
        match self {
            FieldType::Named(name) => Some(name),
            FieldType::Array(item) => item.referenced_schema(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Integer => f.write_str("integer"),
            FieldType::Number => f.write_str("number"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Array(item) => write!(f, "array[{}]", item),
            FieldType::Object => f.write_str("object"),
            FieldType::Named(name) => f.write_str(name),
            FieldType::Any => f.write_str("any"),
            FieldType::Union => f.write_str("union"),
            FieldType::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(FieldType::from_tag(&tag))
    }
}

/// Single schema attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(default)]
    pub description: String,
    /// Format hint (e.g., "email", "date-time")
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub min_length: Option<u64>,
    #[serde(default)]
    pub max_length: Option<u64>,
}

impl Field {
    /// Creates an optional field with no constraints
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            description: String::new(),
            format: None,
            default: None,
            min_length: None,
            max_length: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_length(mut self, min_length: Option<u64>, max_length: Option<u64>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Declaration used in suggestions, e.g. `email: string`
    pub fn declaration(&self) -> String {
        format!("{}: {}", self.name, self.field_type)
    }
}

/// Named record type
///
/// `required_fields` is derived from the fields at construction time and
/// always names exactly the fields with `required = true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaRecord")]
pub struct Schema {
    name: String,
    description: String,
    fields: Vec<Field>,
    required_fields: Vec<String>,
}

/// Wire form of [`Schema`], validated on the way in
#[derive(Deserialize)]
struct SchemaRecord {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    required_fields: Option<Vec<String>>,
}

impl TryFrom<SchemaRecord> for Schema {
    type Error = ContractError;

    fn try_from(record: SchemaRecord) -> Result<Self, Self::Error> {
        match record.required_fields {
            Some(required) => Schema::with_required_fields(
                record.name,
                record.description,
                record.fields,
                required,
            ),
            None => Ok(Schema::new(record.name, record.description, record.fields)),
        }
    }
}

impl Schema {
    /// Creates a schema, deriving `required_fields` from the fields
    pub fn new(name: impl Into<String>, description: impl Into<String>, fields: Vec<Field>) -> Self {
        let required_fields = fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.clone())
            .collect();

        Self {
            name: name.into(),
            description: description.into(),
            fields,
            required_fields,
        }
    }

    /// Creates a schema from fields plus an explicit required list, rejecting
    /// lists that disagree with the fields' own `required` flags.
    pub fn with_required_fields(
        name: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<Field>,
        required_fields: Vec<String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();

        for field in &fields {
            if field.required != required_fields.contains(&field.name) {
                return Err(ContractError::InconsistentRequiredFields {
                    schema: name,
                    field: field.name.clone(),
                });
            }
        }
        if let Some(orphan) = required_fields
            .iter()
            .find(|req| !fields.iter().any(|f| &f.name == *req))
        {
            return Err(ContractError::InconsistentRequiredFields {
                schema: name,
                field: orphan.clone(),
            });
        }

        Ok(Self::new(name, description, fields))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}
