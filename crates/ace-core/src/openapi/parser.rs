use crate::error::ParseError;
use crate::models::{
    ApiDefinition, Endpoint, Field, FieldType, HttpMethod, Parameter, ParameterLocation, Schema,
};
use crate::openapi::schema::*;
use std::path::Path;
use tracing::debug;

const JSON_CONTENT: &str = "application/json";

/// Parser for OpenAPI contract files
pub struct OpenApiParser;

impl OpenApiParser {
    /// Reads a contract file and builds the spec-side definition
    pub fn load(path: &Path) -> Result<ApiDefinition, ParseError> {
        let document = Self::parse_file(path)?;
        Self::into_definition(&document)
    }

    /// Parses an OpenAPI file (JSON or YAML)
    pub fn parse_file(path: &Path) -> Result<OpenApiDocument, ParseError> {
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yaml" | "yml" => Self::parse_yaml_str(&content),
            "json" => Self::parse_json_str(&content),
            _ => Self::parse_str(&content),
        }
    }

    /// Parses an OpenAPI string, detecting the format by content
    pub fn parse_str(content: &str) -> Result<OpenApiDocument, ParseError> {
        let trimmed = content.trim_start();

        if trimmed.starts_with('{') {
            Self::parse_json_str(content)
        } else if trimmed.starts_with("---")
            || trimmed.starts_with("openapi:")
            || trimmed.starts_with("swagger:")
        {
            Self::parse_yaml_str(content)
        } else {
            Self::parse_json_str(content).or_else(|json_err| {
                Self::parse_yaml_str(content).map_err(|yaml_err| ParseError::UnsupportedFormat {
                    json: json_err.to_string(),
                    yaml: yaml_err.to_string(),
                })
            })
        }
    }

    fn parse_json_str(content: &str) -> Result<OpenApiDocument, ParseError> {
        Ok(serde_json::from_str(content)?)
    }

    fn parse_yaml_str(content: &str) -> Result<OpenApiDocument, ParseError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Builds the canonical model from a parsed document
    pub fn into_definition(document: &OpenApiDocument) -> Result<ApiDefinition, ParseError> {
        let info = &document.info;
        let mut definition = ApiDefinition::new(
            info.title.as_deref().unwrap_or("Unknown API"),
            info.version.as_deref().unwrap_or("0.0.0"),
        )
        .with_description(info.description.as_deref().unwrap_or_default());

        for (name, schema) in &document.components.schemas {
            definition.add_schema(Self::build_schema(document, name, schema)?)?;
        }

        for (path, item) in &document.paths {
            for (method, operation) in item.operations() {
                let endpoint = Self::build_endpoint(document, path, method, operation)?;
                debug!(endpoint = %endpoint.endpoint_key(), "Parsed spec endpoint");
                definition.add_endpoint(endpoint);
            }
        }

        Ok(definition)
    }

    fn build_schema(
        document: &OpenApiDocument,
        name: &str,
        schema: &SchemaObject,
    ) -> Result<Schema, ParseError> {
        let fields = schema
            .properties
            .iter()
            .map(|(field_name, property)| {
                Self::build_field(document, field_name, property, schema.required.contains(field_name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Schema::new(
            name,
            schema.description.clone().unwrap_or_default(),
            fields,
        ))
    }

    fn build_field(
        document: &OpenApiDocument,
        name: &str,
        property: &SchemaObject,
        required: bool,
    ) -> Result<Field, ParseError> {
        if property.reference.is_some() {
            let target = Self::resolve_reference(document, property)?;
            return Ok(Field::new(name, FieldType::Named(target.to_string()))
                .required(required)
                .with_description(format!("Reference to {}", target)));
        }

        let mut field = Field::new(name, Self::field_type(document, property)?)
            .required(required)
            .with_description(property.description.clone().unwrap_or_default())
            .with_length(property.min_length, property.max_length);
        if let Some(format) = &property.format {
            field = field.with_format(format.clone());
        }
        if let Some(default) = &property.default {
            field = field.with_default(default.clone());
        }
        Ok(field)
    }

    fn field_type(document: &OpenApiDocument, property: &SchemaObject) -> Result<FieldType, ParseError> {
        if property.type_tag() == Some("array") {
            let item = match property.items.as_deref() {
                Some(items) if items.reference.is_some() => {
                    FieldType::Named(Self::resolve_reference(document, items)?.to_string())
                }
                Some(items) => Self::declared_type(items, "any"),
                None => FieldType::Any,
            };
            return Ok(FieldType::Array(Box::new(item)));
        }

        if !property.one_of.is_empty()
            || !property.any_of.is_empty()
            || property.has_multiple_types()
        {
            return Ok(FieldType::Union);
        }
        if !property.all_of.is_empty() {
            return Ok(FieldType::Object);
        }

        Ok(Self::declared_type(property, "any"))
    }

    /// Type from the `type` keyword alone; `fallback` when it is absent
    fn declared_type(schema: &SchemaObject, fallback: &str) -> FieldType {
        if schema.has_multiple_types() {
            return FieldType::Union;
        }
        FieldType::from_tag(schema.type_tag().unwrap_or(fallback))
    }

    fn build_endpoint(
        document: &OpenApiDocument,
        path: &str,
        method: HttpMethod,
        operation: &Operation,
    ) -> Result<Endpoint, ParseError> {
        let mut endpoint = Endpoint::new(method, path)
            .with_operation_id(operation.operation_id.clone().unwrap_or_default())
            .with_summary(operation.summary.clone().unwrap_or_default())
            .with_description(operation.description.clone().unwrap_or_default())
            .with_tags(operation.tags.clone());

        for parameter in &operation.parameters {
            endpoint = endpoint.with_parameter(Self::build_parameter(parameter));
        }

        let request_schema = operation
            .request_body
            .as_ref()
            .and_then(|body| body.content.get(JSON_CONTENT))
            .and_then(|media| media.schema.as_ref())
            .filter(|schema| schema.reference.is_some());
        if let Some(schema) = request_schema {
            endpoint = endpoint.with_request_schema(Self::resolve_reference(document, schema)?);
        }

        let mut status_codes = Vec::new();
        let mut response_schema = None;
        for (code, response) in &operation.responses {
            let Ok(status) = code.parse::<u16>() else {
                continue;
            };
            status_codes.push(status);

            if response_schema.is_none() && code.starts_with('2') {
                let schema = response
                    .content
                    .get(JSON_CONTENT)
                    .and_then(|media| media.schema.as_ref())
                    .filter(|schema| schema.reference.is_some());
                if let Some(schema) = schema {
                    response_schema = Some(Self::resolve_reference(document, schema)?);
                }
            }
        }
        if let Some(name) = response_schema {
            endpoint = endpoint.with_response_schema(name);
        }

        Ok(endpoint.with_status_codes(status_codes))
    }

    fn build_parameter(parameter: &ParameterObject) -> Parameter {
        let schema = parameter.schema.as_ref();
        let mut built = Parameter::new(
            parameter.name.clone(),
            ParameterLocation::from_openapi(parameter.location.as_deref().unwrap_or("query")),
            schema
                .map(|s| Self::declared_type(s, "string"))
                .unwrap_or(FieldType::String),
        )
        .required(parameter.required.unwrap_or(false));
        built.description = parameter.description.clone().unwrap_or_default();
        built.default = schema.and_then(|s| s.default.clone());
        built
    }

    /// Name of the component a `$ref` points at, which must exist
    fn resolve_reference<'a>(
        document: &OpenApiDocument,
        schema: &'a SchemaObject,
    ) -> Result<&'a str, ParseError> {
        let reference = schema.reference.as_deref().unwrap_or_default();
        match schema.reference_name() {
            Some(name) if document.components.schemas.contains_key(name) => Ok(name),
            _ => Err(ParseError::UnresolvedReference {
                reference: reference.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS_YAML: &str = r##"openapi: 3.0.3
info:
  title: User Management API
  version: 1.0.0
  description: Manage users
paths:
  /users/{user_id}:
    delete:
      operationId: delete_user
      responses:
        "204":
          description: Deleted
    get:
      operationId: get_user
      summary: Get user
      parameters:
        - name: user_id
          in: path
          required: true
          schema:
            type: integer
      responses:
        "404":
          description: Not found
        "200":
          description: OK
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/User"
        default:
          description: Error
  /users:
    post:
      operationId: create_user
      requestBody:
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/UserCreate"
      responses:
        "201":
          description: Created
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/User"
components:
  schemas:
    User:
      type: object
      description: A user
      required: [id, email]
      properties:
        id:
          type: integer
        email:
          type: string
          format: email
        tags:
          type: array
          items:
            type: string
        manager:
          $ref: "#/components/schemas/User"
        role:
          oneOf:
            - type: string
            - type: integer
    UserCreate:
      type: object
      required: [email]
      properties:
        email:
          type: string
          minLength: 3
          maxLength: 255
        nickname:
          type: string
          default: anon
"##;

    #[test]
    fn test_detects_yaml_by_content() {
        let document = OpenApiParser::parse_str(USERS_YAML).unwrap();
        assert_eq!(document.openapi.as_deref(), Some("3.0.3"));
    }

    #[test]
    fn test_endpoints_in_document_and_canonical_method_order() {
        let document = OpenApiParser::parse_str(USERS_YAML).unwrap();
        let definition = OpenApiParser::into_definition(&document).unwrap();

        let keys: Vec<String> = definition
            .endpoints()
            .iter()
            .map(|e| e.endpoint_key())
            .collect();
        assert_eq!(
            keys,
            vec![
                "GET /users/{user_id}",
                "DELETE /users/{user_id}",
                "POST /users"
            ]
        );
    }

    #[test]
    fn test_operation_details() {
        let document = OpenApiParser::parse_str(USERS_YAML).unwrap();
        let definition = OpenApiParser::into_definition(&document).unwrap();

        let get = definition.find_endpoint("GET", "/users/{user_id}").unwrap();
        assert_eq!(get.operation_id, "get_user");
        assert_eq!(get.response_status_codes, vec![200, 404]);
        assert_eq!(get.response_schema.as_deref(), Some("User"));
        assert_eq!(get.parameters[0].location, ParameterLocation::Path);
        assert_eq!(get.parameters[0].param_type, FieldType::Integer);
        assert!(get.parameters[0].required);

        let post = definition.find_endpoint("post", "/users").unwrap();
        assert_eq!(post.request_schema.as_deref(), Some("UserCreate"));
        assert_eq!(post.response_schema.as_deref(), Some("User"));
    }

    #[test]
    fn test_schema_fields() {
        let document = OpenApiParser::parse_str(USERS_YAML).unwrap();
        let definition = OpenApiParser::into_definition(&document).unwrap();

        let user = definition.schema("User").unwrap();
        assert_eq!(user.description(), "A user");
        assert_eq!(user.required_fields(), &["id".to_string(), "email".to_string()]);
        assert_eq!(user.field("email").unwrap().format.as_deref(), Some("email"));
        assert_eq!(user.field("tags").unwrap().field_type.to_string(), "array[string]");
        assert_eq!(
            user.field("manager").unwrap().field_type,
            FieldType::Named("User".into())
        );
        assert_eq!(user.field("manager").unwrap().description, "Reference to User");
        assert_eq!(user.field("role").unwrap().field_type, FieldType::Union);

        let create = definition.schema("UserCreate").unwrap();
        let email = create.field("email").unwrap();
        assert_eq!((email.min_length, email.max_length), (Some(3), Some(255)));
        assert_eq!(
            create.field("nickname").unwrap().default,
            Some(serde_json::json!("anon"))
        );
    }

    #[test]
    fn test_info_defaults() {
        let document = OpenApiParser::parse_str(r#"{"paths": {}}"#).unwrap();
        let definition = OpenApiParser::into_definition(&document).unwrap();
        assert_eq!(definition.title, "Unknown API");
        assert_eq!(definition.version, "0.0.0");
        assert!(definition.endpoints().is_empty());
    }

    #[test]
    fn test_dangling_reference_is_rejected() {
        let json = r##"{
            "info": {"title": "Broken", "version": "1"},
            "paths": {
                "/items": {
                    "post": {
                        "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Item"}}}},
                        "responses": {"201": {"description": "ok"}}
                    }
                }
            }
        }"##;
        let document = OpenApiParser::parse_str(json).unwrap();
        let err = OpenApiParser::into_definition(&document).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnresolvedReference { ref reference } if reference == "#/components/schemas/Item"
        ));
    }

    #[test]
    fn test_type_lists_from_openapi_31() {
        let json = r#"{
            "openapi": "3.1.0",
            "info": {"title": "Profiles", "version": "1"},
            "paths": {
                "/profiles": {
                    "get": {
                        "parameters": [{"name": "q", "in": "query", "schema": {"type": ["string", "null"]}}],
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            },
            "components": {"schemas": {"Profile": {
                "type": "object",
                "properties": {
                    "nick": {"type": ["string", "null"]},
                    "score": {"type": ["integer", "string"]},
                    "aliases": {"type": ["array", "null"], "items": {"type": ["string", "null"]}},
                    "nothing": {"type": ["null"]}
                }
            }}}
        }"#;
        let document = OpenApiParser::parse_str(json).unwrap();
        let definition = OpenApiParser::into_definition(&document).unwrap();

        let profile = definition.schema("Profile").unwrap();
        assert_eq!(profile.field("nick").unwrap().field_type, FieldType::String);
        assert_eq!(profile.field("score").unwrap().field_type, FieldType::Union);
        assert_eq!(
            profile.field("aliases").unwrap().field_type.to_string(),
            "array[string]"
        );
        assert_eq!(profile.field("nothing").unwrap().field_type, FieldType::Any);

        let list = definition.find_endpoint("GET", "/profiles").unwrap();
        assert_eq!(list.parameters[0].param_type, FieldType::String);
    }

    #[test]
    fn test_garbage_is_unsupported_format() {
        let err = OpenApiParser::parse_str("\t- [unclosed").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat { .. }));
    }
}
