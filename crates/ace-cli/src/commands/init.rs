use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"project_name = "MyService"

# OpenAPI contract, JSON or YAML
spec_path = "openapi.yaml"

# Root directory of the FastAPI service
service_path = "app"

# Schema name lookup: "exact" or "case_insensitive"
# [matching]
# request_schema = "exact"
# response_schema = "case_insensitive"

[output]
# "text", "json" or "markdown"
format = "text"
# Omit to print the report to stdout
# path = "compliance_report.txt"
"#;

/// Creates the configuration file
pub fn execute_init(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Config file already exists: {}", path.display());
    }

    fs::write(path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    println!("Created config file: {}", path.display());

    Ok(())
}
