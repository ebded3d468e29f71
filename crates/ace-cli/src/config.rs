use crate::ReportFormat;
use ace_core::{CheckOptions, ConfigError, SchemaMatchStrategy};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const MATCH_STRATEGIES: &str = "exact, case_insensitive";

/// Project configuration (`ace.toml`)
#[derive(Debug, Deserialize)]
pub struct Config {
    pub project_name: String,
    /// OpenAPI contract, JSON or YAML
    pub spec_path: String,
    /// Root directory of the FastAPI service
    pub service_path: String,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Schema name lookup, `"exact"` or `"case_insensitive"` per side
#[derive(Debug, Default, Deserialize)]
pub struct MatchingConfig {
    pub request_schema: Option<String>,
    pub response_schema: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
    /// Report file; stdout when absent
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "text".to_string()
}

impl Config {
    /// Loads configuration from a file
    ///
    /// Relative paths are resolved against `base_path`, or the config file's
    /// directory when `None`.
    pub fn load(path: &Path, base_path: Option<&Path>) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        let base = base_path.unwrap_or_else(|| path.parent().unwrap_or_else(|| Path::new(".")));
        config.resolve_relative_paths(base);

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_name.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "project_name",
            });
        }

        if self.spec_path.is_empty() {
            return Err(ConfigError::Empty { field: "spec_path" });
        }
        if !Path::new(&self.spec_path).is_file() {
            return Err(ConfigError::MissingPath {
                field: "spec_path",
                path: self.spec_path.clone(),
            });
        }

        if self.service_path.is_empty() {
            return Err(ConfigError::Empty {
                field: "service_path",
            });
        }
        if !Path::new(&self.service_path).is_dir() {
            return Err(ConfigError::MissingPath {
                field: "service_path",
                path: self.service_path.clone(),
            });
        }

        self.report_format()?;
        self.check_options()?;

        if matches!(self.output.path.as_deref(), Some("")) {
            return Err(ConfigError::Empty {
                field: "output.path",
            });
        }

        Ok(())
    }

    pub fn report_format(&self) -> Result<ReportFormat, ConfigError> {
        ReportFormat::from_config(&self.output.format).ok_or_else(|| ConfigError::UnknownValue {
            field: "output.format",
            value: self.output.format.clone(),
            expected: ReportFormat::VARIANTS,
        })
    }

    /// Engine options; unset sides keep the engine defaults
    pub fn check_options(&self) -> Result<CheckOptions, ConfigError> {
        let mut options = CheckOptions::default();
        if let Some(value) = &self.matching.request_schema {
            options.request_schema_match = parse_strategy("matching.request_schema", value)?;
        }
        if let Some(value) = &self.matching.response_schema {
            options.response_schema_match = parse_strategy("matching.response_schema", value)?;
        }
        Ok(options)
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.path.as_ref().map(PathBuf::from)
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        self.spec_path = resolve(base, &self.spec_path);
        self.service_path = resolve(base, &self.service_path);
        if let Some(path) = &self.output.path {
            if !path.is_empty() {
                self.output.path = Some(resolve(base, path));
            }
        }
    }
}

fn resolve(base: &Path, path: &str) -> String {
    if path.is_empty() || Path::new(path).is_absolute() {
        return path.to_string();
    }
    base.join(path).to_string_lossy().to_string()
}

fn parse_strategy(field: &'static str, value: &str) -> Result<SchemaMatchStrategy, ConfigError> {
    match value {
        "exact" => Ok(SchemaMatchStrategy::Exact),
        "case_insensitive" => Ok(SchemaMatchStrategy::CaseInsensitive),
        _ => Err(ConfigError::UnknownValue {
            field,
            value: value.to_string(),
            expected: MATCH_STRATEGIES,
        }),
    }
}
