use std::fs;

use ace_cli::reporters::{JsonReporter, MarkdownReporter, TextReporter};
use ace_core::models::{HttpMethod, Issue, IssueType, Severity};
use ace_core::ComplianceReport;
use anyhow::Result;

fn sample_report() -> ComplianceReport {
    ComplianceReport {
        spec_title: "User Management API".to_string(),
        spec_version: "1.0.0".to_string(),
        total_spec_endpoints: 5,
        total_impl_endpoints: 3,
        compliant_endpoints: 4,
        issues: vec![
            Issue::new(
                IssueType::MissingEndpoint,
                Severity::Error,
                "Missing endpoint: DELETE /users/{user_id}",
            )
            .at(HttpMethod::Delete, "/users/{user_id}")
            .with_suggestion("Implement DELETE handler for /users/{user_id}"),
            Issue::new(
                IssueType::ExtraEndpoint,
                Severity::Warning,
                "Extra endpoint not in spec: GET /debug",
            )
            .at(HttpMethod::Get, "/debug"),
        ],
    }
}

#[test]
fn text_reporter_matches_report_layout() -> Result<()> {
    let tmp_dir = tempfile::tempdir()?;
    let output_path = tmp_dir.path().join("report.txt");
    let report = sample_report();

    TextReporter.generate(&report, &output_path)?;

    assert_eq!(fs::read_to_string(&output_path)?, report.format_report());
    Ok(())
}

#[test]
fn json_reporter_includes_derived_metrics() -> Result<()> {
    let tmp_dir = tempfile::tempdir()?;
    let output_path = tmp_dir.path().join("report.json");

    JsonReporter.generate(&sample_report(), &output_path)?;

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output_path)?)?;
    assert_eq!(json["spec_title"], "User Management API");
    assert_eq!(json["compliance_percentage"], 80.0);
    assert_eq!(json["is_compliant"], false);
    assert_eq!(json["error_count"], 1);
    assert_eq!(json["warning_count"], 1);
    assert_eq!(json["issues"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["issues"][0]["issue_type"], "missing_endpoint");
    assert_eq!(json["issues"][0]["severity"], "error");
    Ok(())
}

#[test]
fn markdown_reporter_lists_issues_and_missing_checklist() -> Result<()> {
    let content = MarkdownReporter.render(&sample_report());

    assert!(content.starts_with("# API Compliance Report: User Management API v1.0.0"));
    assert!(content.contains("**Status**: ❌ NON-COMPLIANT"));
    assert!(content.contains("| Compliance | 80.0% |"));
    assert!(content.contains("## Errors (1)"));
    assert!(content.contains("## Warnings (1)"));
    assert!(!content.contains("## Info"));
    assert!(content.contains("- **missing_endpoint** `DELETE /users/{user_id}`"));
    assert!(content.contains("  - Suggestion: Implement DELETE handler for /users/{user_id}"));
    assert!(content.contains("## Missing Endpoints\n\n- [ ] `DELETE /users/{user_id}`"));
    Ok(())
}

#[test]
fn markdown_reporter_for_compliant_report() -> Result<()> {
    let mut report = sample_report();
    report.issues.retain(|issue| issue.severity != Severity::Error);

    let content = MarkdownReporter.render(&report);

    assert!(content.contains("**Status**: ✅ COMPLIANT"));
    assert!(!content.contains("## Missing Endpoints"));
    Ok(())
}
