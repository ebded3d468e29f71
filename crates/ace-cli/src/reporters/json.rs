use ace_core::ComplianceReport;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Pretty-printed [`ComplianceReport::to_json`]
    pub fn render(&self, report: &ComplianceReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(&report.to_json())?)
    }

    pub fn generate(&self, report: &ComplianceReport, output_path: &Path) -> Result<()> {
        let json_string = self.render(report)?;
        fs::write(output_path, json_string)
            .with_context(|| format!("Failed to write report: {}", output_path.display()))
    }
}
