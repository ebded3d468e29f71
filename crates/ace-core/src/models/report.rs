use crate::models::{Issue, IssueType, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

const RULE_WIDTH: usize = 60;

/// Aggregate result of one compliance check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub spec_title: String,
    pub spec_version: String,
    pub total_spec_endpoints: usize,
    pub total_impl_endpoints: usize,
    /// Spec endpoints with at least one implementation counterpart
    pub compliant_endpoints: usize,
    /// Missing endpoints, then extra endpoints, then schema findings
    pub issues: Vec<Issue>,
}

impl ComplianceReport {
    /// No error-severity issues
    pub fn is_compliant(&self) -> bool {
        self.error_count() == 0
    }

    /// Share of spec endpoints that are implemented; 100 for an empty spec
    pub fn compliance_percentage(&self) -> f64 {
        if self.total_spec_endpoints == 0 {
            return 100.0;
        }
        (self.compliant_endpoints as f64 / self.total_spec_endpoints as f64) * 100.0
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count_severity(Severity::Info)
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn issues_of_type(&self, issue_type: IssueType) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.issue_type == issue_type)
            .collect()
    }

    /// `missing_endpoint` issues only, for fix generation
    pub fn missing_endpoints(&self) -> Vec<&Issue> {
        self.issues_of_type(IssueType::MissingEndpoint)
    }

    /// Machine-readable form with the derived metrics included
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "spec_title": self.spec_title,
            "spec_version": self.spec_version,
            "total_spec_endpoints": self.total_spec_endpoints,
            "total_impl_endpoints": self.total_impl_endpoints,
            "compliant_endpoints": self.compliant_endpoints,
            "compliance_percentage": self.compliance_percentage(),
            "is_compliant": self.is_compliant(),
            "error_count": self.error_count(),
            "warning_count": self.warning_count(),
            "issues": self.issues,
        })
    }

    /// Deterministic human-readable report
    pub fn format_report(&self) -> String {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        let mut lines = vec![
            heavy.clone(),
            "API COMPLIANCE REPORT".to_string(),
            heavy.clone(),
            format!("Spec: {} v{}", self.spec_title, self.spec_version),
            light.clone(),
            format!("Endpoints in spec:        {}", self.total_spec_endpoints),
            format!("Endpoints implemented:    {}", self.total_impl_endpoints),
            format!("Compliant endpoints:      {}", self.compliant_endpoints),
            format!("Compliance:               {:.1}%", self.compliance_percentage()),
            light.clone(),
            format!("Errors:   {}", self.error_count()),
            format!("Warnings: {}", self.warning_count()),
            light,
        ];

        if self.issues.is_empty() {
            lines.push("No issues found. Implementation is fully compliant!".to_string());
        } else {
            lines.push("ISSUES:".to_string());
            for issue in &self.issues {
                lines.push(format!("  {} {}", issue.severity.tag(), issue.message));
                if let Some(endpoint) = issue.endpoint_key() {
                    lines.push(format!("           Endpoint: {}", endpoint));
                }
                if let Some(suggestion) = issue.suggestion.as_deref().filter(|s| !s.is_empty()) {
                    lines.push(format!("           Suggestion: {}", suggestion));
                }
            }
        }

        lines.push(heavy);
        lines.join("\n")
    }
}

impl fmt::Display for ComplianceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_report())
    }
}
