pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use text::TextReporter;

use crate::ReportFormat;
use ace_core::ComplianceReport;
use anyhow::Result;

/// Renders `report` with the reporter for `format`
pub fn render(format: ReportFormat, report: &ComplianceReport) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(TextReporter.render(report)),
        ReportFormat::Json => JsonReporter.render(report),
        ReportFormat::Markdown => Ok(MarkdownReporter.render(report)),
    }
}
