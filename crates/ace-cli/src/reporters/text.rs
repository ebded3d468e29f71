use ace_core::ComplianceReport;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Plain-text report, the layout of [`ComplianceReport::format_report`]
pub struct TextReporter;

impl TextReporter {
    pub fn render(&self, report: &ComplianceReport) -> String {
        report.format_report()
    }

    pub fn generate(&self, report: &ComplianceReport, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.render(report))
            .with_context(|| format!("Failed to write report: {}", output_path.display()))
    }
}
