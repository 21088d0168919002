use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::models::RunSummary;

#[derive(Serialize)]
struct FailureReport {
    path: String,
    error: String,
}

#[derive(Serialize)]
struct Report {
    run_id: String,
    completed_at: String,
    source: String,
    uploader_version: String,
    discovered: u64,
    attempted: u64,
    uploaded: u64,
    skipped: u64,
    failed: usize,
    elapsed_seconds: f64,
    failures: Vec<FailureReport>,
}

/// Render a JSON report of one run, suitable for archiving next to the
/// uploaded tree or feeding into whatever consumes the results.
pub fn render_report(summary: &RunSummary, source: &Path) -> Result<String> {
    let failures = summary
        .failures
        .iter()
        .map(|failure| FailureReport {
            path: failure.path.display().to_string(),
            error: format!("{:#}", failure.error),
        })
        .collect();

    let report = Report {
        run_id: Uuid::new_v4().to_string(),
        completed_at: chrono::Utc::now().to_rfc3339(),
        source: source.display().to_string(),
        uploader_version: env!("CARGO_PKG_VERSION").to_string(),
        discovered: summary.discovered,
        attempted: summary.attempted,
        uploaded: summary.uploaded,
        skipped: summary.skipped,
        failed: summary.failed(),
        elapsed_seconds: summary.elapsed.as_secs_f64(),
        failures,
    };

    serde_json::to_string_pretty(&report).context("failed to serialize run report")
}
