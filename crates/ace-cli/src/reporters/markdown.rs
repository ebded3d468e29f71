use ace_core::models::{Issue, Severity};
use ace_core::ComplianceReport;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn render(&self, report: &ComplianceReport) -> String {
        let mut out = String::new();

        // Header
        out.push_str(&format!(
            "# API Compliance Report: {} v{}\n\n",
            report.spec_title, report.spec_version
        ));
        out.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        let status = if report.is_compliant() {
            "✅ COMPLIANT"
        } else {
            "❌ NON-COMPLIANT"
        };
        out.push_str(&format!("**Status**: {}\n\n", status));

        out.push_str("## Summary\n\n");
        out.push_str("| Metric | Value |\n");
        out.push_str("|--------|-------|\n");
        out.push_str(&format!(
            "| Compliance | {:.1}% |\n",
            report.compliance_percentage()
        ));
        out.push_str(&format!("| Spec Endpoints | {} |\n", report.total_spec_endpoints));
        out.push_str(&format!(
            "| Implemented Endpoints | {} |\n",
            report.total_impl_endpoints
        ));
        out.push_str(&format!(
            "| Compliant Endpoints | {} |\n",
            report.compliant_endpoints
        ));
        out.push_str(&format!("| Errors | {} |\n", report.error_count()));
        out.push_str(&format!("| Warnings | {} |\n", report.warning_count()));
        out.push_str(&format!("| Info | {} |\n\n", report.info_count()));

        for (severity, title) in [
            (Severity::Error, "Errors"),
            (Severity::Warning, "Warnings"),
            (Severity::Info, "Info"),
        ] {
            let issues: Vec<&Issue> = report
                .issues
                .iter()
                .filter(|issue| issue.severity == severity)
                .collect();
            if issues.is_empty() {
                continue;
            }

            out.push_str(&format!("## {} ({})\n\n", title, issues.len()));
            for issue in issues {
                Self::push_issue(&mut out, issue);
            }
            out.push('\n');
        }

        let missing = report.missing_endpoints();
        if !missing.is_empty() {
            out.push_str("## Missing Endpoints\n\n");
            for issue in missing {
                if let Some(key) = issue.endpoint_key() {
                    out.push_str(&format!("- [ ] `{}`\n", key));
                }
            }
            out.push('\n');
        }

        out
    }

    pub fn generate(&self, report: &ComplianceReport, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.render(report))
            .with_context(|| format!("Failed to write report: {}", output_path.display()))
    }

    fn push_issue(out: &mut String, issue: &Issue) {
        out.push_str(&format!("- **{}**", issue.issue_type));
        if let Some(key) = issue.endpoint_key() {
            out.push_str(&format!(" `{}`", key));
        }
        out.push_str(&format!(": {}\n", issue.message));
        if let Some(suggestion) = &issue.suggestion {
            out.push_str(&format!("  - Suggestion: {}\n", suggestion));
        }
    }
}
