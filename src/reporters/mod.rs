//! Output reporters for analysis results
//!
//! Supported formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON of the full report
//! - `legacy-json` - The flat document older pipelines ingest

mod json;
mod text;

pub use json::render_compact;

use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::models::AnalysisReport;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    LegacyJson,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "legacy-json" | "legacy" => Ok(OutputFormat::LegacyJson),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, legacy-json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::LegacyJson => write!(f, "legacy-json"),
        }
    }
}

/// Render an analysis report in the specified format
pub fn report(report: &AnalysisReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt)
}

/// Render an analysis report using an OutputFormat enum
pub fn report_with_format(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::LegacyJson => json::render_legacy(report),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::Analyzer;

    /// Run the real pipeline over a small honeypot so reporter tests
    /// see representative findings
    pub(crate) fn test_report() -> AnalysisReport {
        let source = "\
contract Honey {
    address pair;
    mapping(address => bool) blacklist;
    function transfer(address to, uint amt) public {
        require(!blacklist[msg.sender]);
        if (to == pair) { revert(); }
    }
    function blacklistAddress(address bad) public onlyOwner {
        blacklist[bad] = true;
    }
}
";
        Analyzer::new().analyze("Honey", source)
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("legacy-json").unwrap(),
            OutputFormat::LegacyJson
        );
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_compact_render_reexported() {
        let r = test_report();
        let out = render_compact(&r).expect("render compact JSON");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_report_dispatch() {
        let r = test_report();
        assert!(report(&r, "text").is_ok());
        assert!(report(&r, "json").is_ok());
        assert!(report(&r, "legacy").is_ok());
        assert!(report(&r, "yaml").is_err());
    }
}
