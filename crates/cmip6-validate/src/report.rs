//! JSON check-report output.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use cmip6_model::{CheckLevel, CheckMessage, CheckResult};

const REPORT_SCHEMA: &str = "cmip6-checker.check-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct CheckReportPayload {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub dataset: String,
    pub checks: Vec<CheckSummary>,
}

#[derive(Debug, Serialize)]
pub struct CheckSummary {
    pub name: String,
    pub level: CheckLevel,
    pub passed: bool,
    pub score: u32,
    pub max_score: u32,
    pub messages: Vec<CheckMessage>,
}

pub fn has_check_failures(results: &[CheckResult]) -> bool {
    results.iter().any(|result| !result.passed())
}

/// Write the results of the check passes over one dataset as a JSON report
/// under `output_dir`, returning the report path.
pub fn write_check_report_json(
    output_dir: &Path,
    dataset: &str,
    results: &[CheckResult],
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("cmip6_check_report.json");
    let payload = CheckReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        dataset: dataset.to_string(),
        checks: results
            .iter()
            .map(|result| CheckSummary {
                name: result.name.clone(),
                level: result.level,
                passed: result.passed(),
                score: result.score,
                max_score: result.max_score,
                messages: result.messages.clone(),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(&output_path, format!("{json}\n"))?;
    Ok(output_path)
}
