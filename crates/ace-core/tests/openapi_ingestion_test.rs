use std::fs;
use std::path::Path;

use ace_core::models::{ApiDefinition, Endpoint, HttpMethod};
use ace_core::{ComplianceChecker, OpenApiParser, ParseError};

const USER_API_JSON: &str = r##"{
  "openapi": "3.0.3",
  "info": {"title": "User Management API", "version": "1.0.0"},
  "paths": {
    "/users": {
      "get": {"operationId": "list_users", "responses": {"200": {"description": "OK"}}},
      "post": {
        "operationId": "create_user",
        "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/UserCreate"}}}},
        "responses": {"201": {"description": "Created", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/User"}}}}}
      }
    },
    "/users/{user_id}": {
      "get": {"responses": {"200": {"description": "OK", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/User"}}}}}},
      "put": {"responses": {"200": {"description": "OK"}}},
      "delete": {"responses": {"204": {"description": "Deleted"}}}
    }
  },
  "components": {
    "schemas": {
      "User": {
        "type": "object",
        "required": ["id", "email"],
        "properties": {"id": {"type": "integer"}, "email": {"type": "string", "format": "email"}}
      },
      "UserCreate": {
        "type": "object",
        "required": ["email"],
        "properties": {"email": {"type": "string"}}
      }
    }
  }
}"##;

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write spec");
    path
}

#[test]
fn loads_json_contract_from_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "openapi.json", USER_API_JSON);

    let spec = OpenApiParser::load(&path)?;

    assert_eq!(spec.title, "User Management API");
    assert_eq!(spec.endpoints().len(), 5);
    assert_eq!(spec.schemas().len(), 2);
    Ok(())
}

#[test]
fn unknown_extension_falls_back_to_content_detection() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(
        dir.path(),
        "contract.spec",
        "openapi: 3.0.0\ninfo:\n  title: Tiny\n  version: '2'\npaths:\n  /ping:\n    get:\n      responses:\n        '200':\n          description: pong\n",
    );

    let spec = OpenApiParser::load(&path)?;
    assert_eq!(spec.title, "Tiny");
    assert_eq!(spec.version, "2");
    assert!(spec.find_endpoint("GET", "/ping").is_some());
    Ok(())
}

#[test]
fn missing_file_is_io_error() {
    let err = OpenApiParser::load(Path::new("/definitely/not/here/openapi.yaml")).unwrap_err();
    assert!(matches!(err, ParseError::Io { .. }));
}

#[test]
fn loaded_contract_drives_a_check() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "openapi.json", USER_API_JSON);
    let spec = OpenApiParser::load(&path)?;

    let mut implementation = ApiDefinition::new("user_service", "0.0.0");
    implementation.add_endpoint(Endpoint::new(HttpMethod::Get, "/users"));
    implementation.add_endpoint(Endpoint::new(HttpMethod::Get, "/users/{id}"));

    let report = ComplianceChecker::new(&spec, &implementation).check()?;
    assert_eq!(report.compliance_percentage(), 40.0);
    assert_eq!(report.error_count(), 3);
    // GET /users/{user_id} matched but the implementation defines no User model
    assert_eq!(report.warning_count(), 1);
    Ok(())
}
