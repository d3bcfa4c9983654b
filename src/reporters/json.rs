//! JSON reporters
//!
//! `render` emits the full report as pretty-printed JSON; `render_legacy`
//! emits the flat document described in [`crate::legacy`].

use anyhow::Result;

use crate::legacy::flatten;
use crate::models::AnalysisReport;

/// Render report as JSON
pub fn render(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render report as compact JSON (single line)
pub fn render_compact(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}

/// Render the legacy flat document
pub fn render_legacy(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&flatten(report))?)
}
