use crate::config::Config;
use crate::reporters;
use crate::ReportFormat;
use ace_adapter_fastapi::FastApiInspector;
use ace_core::{ComplianceChecker, ComplianceReport, OpenApiParser, RouteDiscovery};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Runs a compliance check for the project described by `config_path`
///
/// The report goes to `output.path` or stdout, a one-line summary to
/// stderr. `format` overrides `output.format`.
pub fn execute_check(config_path: &Path, format: Option<ReportFormat>) -> Result<ComplianceReport> {
    let config = Config::load(config_path, None)?;
    let format = match format {
        Some(format) => format,
        None => config.report_format()?,
    };
    let options = config.check_options()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Loading API contract...");
    let spec = OpenApiParser::load(Path::new(&config.spec_path))
        .with_context(|| format!("Failed to load API contract: {}", config.spec_path))?;

    pb.set_message("Discovering routes...");
    let inspector = FastApiInspector::new();
    let implementation = inspector
        .discover(Path::new(&config.service_path))
        .with_context(|| format!("Failed to inspect service: {}", config.service_path))?;

    pb.set_message("Checking compliance...");
    let report = ComplianceChecker::new(&spec, &implementation)
        .with_options(options)
        .check()?;

    pb.set_message("Generating report...");
    let rendered = reporters::render(format, &report)?;
    pb.finish_and_clear();

    match config.output_path() {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", rendered),
    }

    eprintln!("{}", summary_line(&config.project_name, &report));
    Ok(report)
}

fn summary_line(project: &str, report: &ComplianceReport) -> String {
    let counts = format!(
        "{}: {:.1}% compliant ({}/{} endpoints), {} errors, {} warnings",
        project,
        report.compliance_percentage(),
        report.compliant_endpoints,
        report.total_spec_endpoints,
        report.error_count(),
        report.warning_count()
    );
    if report.is_compliant() {
        format!("{} {}", "✓".green().bold(), counts)
    } else {
        format!("{} {}", "✗".red().bold(), counts.red())
    }
}
