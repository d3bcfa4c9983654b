//! Text (terminal) reporter with colors and formatting

use anyhow::Result;

use crate::models::{AnalysisReport, Finding, RiskTier, LINE_UNRESOLVED};

/// Tier colors (ANSI escape codes)
fn tier_color(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "\x1b[32m",      // Green
        RiskTier::Medium => "\x1b[33m",   // Yellow
        RiskTier::High => "\x1b[91m",     // Light red
        RiskTier::VeryHigh => "\x1b[31m", // Red
        RiskTier::Critical => "\x1b[35m", // Magenta
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Render report as formatted terminal output
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();

    // Header
    let tier_c = tier_color(report.risk_tier);
    out.push_str(&format!("\n{BOLD}Honeyscan Analysis{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Contract: {BOLD}{}{RESET}  {DIM}sha256:{}{RESET}\n",
        report.contract_name,
        &report.code_hash[..report.code_hash.len().min(12)]
    ));
    out.push_str(&format!(
        "Score: {BOLD}{:.2}/100{RESET}  Tier: {tier_c}{BOLD}{}{RESET}  Verdict: {tier_c}{}{RESET}\n\n",
        report.overall_score, report.risk_tier, report.verdict
    ));

    // Per-detector scores
    out.push_str(&format!("{BOLD}DETECTORS{RESET}\n"));
    for detector in &report.detectors {
        let line = match &detector.error {
            Some(err) => format!(
                "  {:<10} {:<42} {DIM}failed: {err}{RESET}\n",
                detector.id, detector.name
            ),
            None => format!(
                "  {:<10} {:<42} {:>6.2}  ({} hits)\n",
                detector.id,
                detector.name,
                detector.score,
                detector.hits.len()
            ),
        };
        out.push_str(&line);
    }
    out.push('\n');

    // Findings table
    out.push_str(&format!(
        "{BOLD}FINDINGS{RESET} ({} total)\n",
        report.findings.len()
    ));
    if !report.findings.is_empty() {
        out.push_str(&format!(
            "{DIM}  PATTERN                              FUNCTION              LINES{RESET}\n"
        ));
        for finding in &report.findings {
            out.push_str(&format_finding(finding));
        }
    }
    out.push('\n');

    // Recommendations
    out.push_str(&format!("{BOLD}RECOMMENDATIONS{RESET}\n"));
    for rec in &report.recommendations {
        out.push_str(&format!("  - {rec}\n"));
    }

    out.push_str(&format!(
        "\n{DIM}Analyzed in {}ms{RESET}\n",
        report.duration_ms
    ));
    Ok(out)
}

fn format_finding(finding: &Finding) -> String {
    // chars() to stay on UTF-8 boundaries when truncating
    let label: String = finding.label.chars().take(35).collect();
    let function = finding.function_name.as_deref().unwrap_or("<top level>");
    let function: String = function.chars().take(20).collect();
    let lines = finding
        .occurrences
        .iter()
        .map(|o| {
            if o.line == LINE_UNRESOLVED {
                "?".to_string()
            } else {
                o.line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let mut row = format!("  {label:<36} {function:<21} {lines}\n");
    if let Some(first) = finding.occurrences.first() {
        let snippet: String = first.snippet.chars().take(60).collect();
        let snippet = snippet.replace(['\n', '\r'], " ");
        if !snippet.trim().is_empty() {
            row.push_str(&format!("{DIM}      {snippet}{RESET}\n"));
        }
    }
    row
}
