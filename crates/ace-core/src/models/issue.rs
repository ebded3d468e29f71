use crate::models::HttpMethod;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of discrepancy between contract and implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingEndpoint,
    ExtraEndpoint,
    MethodMismatch,
    SchemaMismatch,
    StatusCodeMismatch,
    MissingField,
    FieldTypeMismatch,
    MissingParameter,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::MissingEndpoint => "missing_endpoint",
            IssueType::ExtraEndpoint => "extra_endpoint",
            IssueType::MethodMismatch => "method_mismatch",
            IssueType::SchemaMismatch => "schema_mismatch",
            IssueType::StatusCodeMismatch => "status_code_mismatch",
            IssueType::MissingField => "missing_field",
            IssueType::FieldTypeMismatch => "field_type_mismatch",
            IssueType::MissingParameter => "missing_parameter",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Problem severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, never affects compliance
    Info,
    /// Tolerated divergence
    Warning,
    /// Breaks compliance
    Error,
}

impl Severity {
    /// Fixed-width tag used in the text report
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Error => "[ERROR]",
            Severity::Warning => "[WARN] ",
            Severity::Info => "[INFO] ",
        }
    }
}

/// One discrepancy found by a check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub method: Option<HttpMethod>,
    /// Opaque payload describing what the contract expects
    #[serde(default)]
    pub expected: Option<serde_json::Value>,
    /// Opaque payload describing what the implementation has
    #[serde(default)]
    pub actual: Option<serde_json::Value>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn new(issue_type: IssueType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
            path: None,
            method: None,
            expected: None,
            actual: None,
            suggestion: None,
        }
    }

    /// Attaches endpoint context
    pub fn at(mut self, method: HttpMethod, path: impl Into<String>) -> Self {
        self.method = Some(method);
        self.path = Some(path.into());
        self
    }

    pub fn with_expected(mut self, expected: serde_json::Value) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn with_actual(mut self, actual: serde_json::Value) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// `METHOD /path` when the issue carries endpoint context
    pub fn endpoint_key(&self) -> Option<String> {
        match (&self.method, &self.path) {
            (Some(method), Some(path)) => Some(format!("{} {}", method, path)),
            (None, Some(path)) => Some(path.clone()),
            _ => None,
        }
    }
}
