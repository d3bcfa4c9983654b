//! CLI definition and the end-to-end run path

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;

use crate::engine::Analyzer;
use crate::reporters;

/// Honeyscan - token contract scam scanner
///
/// Scans Solidity source text for honeypot and rug-pull patterns and
/// grades the contract on a 0-100 risk scale.
#[derive(Parser, Debug)]
#[command(name = "honeyscan")]
#[command(
    version,
    about = "Scan token contract source for honeypot and rug-pull patterns",
    after_help = "\
Examples:
  honeyscan Token.sol                        Scan a Solidity file
  honeyscan contract.json                    Scan a JSON contract document
  honeyscan Token.sol --format json          Full report as JSON
  honeyscan Token.sol -f legacy-json -o out.json   Flat document for older pipelines

Input may be raw Solidity source or a JSON document carrying
\"contractName\" and \"sourceCode\" fields."
)]
pub struct Cli {
    /// Contract source file (.sol) or JSON contract document
    pub input: PathBuf,

    /// Contract name used in the report (default: derived from input)
    #[arg(long)]
    pub name: Option<String>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "legacy-json", "legacy"])]
    pub format: String,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "HONEYSCAN_LOG", default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,
}

pub fn run(cli: Cli) -> Result<()> {
    let raw = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let (name, source) = extract_contract(&cli, &raw)?;

    let report = Analyzer::new().analyze(&name, &source);
    let rendered = reporters::report(&report, &cli.format)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Pull (name, source) out of the input: either a JSON contract
/// document or raw Solidity text
fn extract_contract(cli: &Cli, raw: &str) -> Result<(String, String)> {
    let looks_json = cli
        .input
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        || raw.trim_start().starts_with('{');

    if looks_json {
        if let Ok(doc) = serde_json::from_str::<Value>(raw) {
            let source = field(&doc, &["sourceCode", "SourceCode", "source_code"]);
            let Some(source) = source else {
                bail!(
                    "{}: JSON document has no sourceCode field",
                    cli.input.display()
                );
            };
            let name = cli
                .name
                .clone()
                .or_else(|| {
                    field(&doc, &["contractName", "ContractName", "contract_name"])
                })
                .unwrap_or_else(|| default_name(cli));
            return Ok((name, source));
        }
        // not valid JSON; treat as raw source
    }

    let name = cli.name.clone().unwrap_or_else(|| default_name(cli));
    Ok((name, raw.to_string()))
}

fn field(doc: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| doc.get(k))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn default_name(cli: &Cli) -> String {
    cli.input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(path: &str) -> Cli {
        Cli {
            input: PathBuf::from(path),
            name: None,
            format: "text".to_string(),
            output: None,
            log_level: "warn".to_string(),
        }
    }

    #[test]
    fn test_extract_raw_solidity() {
        let cli = cli_for("Token.sol");
        let (name, source) = extract_contract(&cli, "contract Token {}").unwrap();
        assert_eq!(name, "Token");
        assert_eq!(source, "contract Token {}");
    }

    #[test]
    fn test_extract_json_document() {
        let cli = cli_for("doc.json");
        let raw = r#"{"contractName": "Moon", "sourceCode": "contract Moon {}"}"#;
        let (name, source) = extract_contract(&cli, raw).unwrap();
        assert_eq!(name, "Moon");
        assert_eq!(source, "contract Moon {}");
    }

    #[test]
    fn test_extract_json_pascal_case_keys() {
        let cli = cli_for("doc.json");
        let raw = r#"{"ContractName": "Moon", "SourceCode": "contract Moon {}"}"#;
        let (name, _) = extract_contract(&cli, raw).unwrap();
        assert_eq!(name, "Moon");
    }

    #[test]
    fn test_name_flag_wins() {
        let mut cli = cli_for("doc.json");
        cli.name = Some("Override".to_string());
        let raw = r#"{"contractName": "Moon", "sourceCode": "x"}"#;
        let (name, _) = extract_contract(&cli, raw).unwrap();
        assert_eq!(name, "Override");
    }

    #[test]
    fn test_json_without_source_errors() {
        let cli = cli_for("doc.json");
        let raw = r#"{"contractName": "Moon"}"#;
        assert!(extract_contract(&cli, raw).is_err());
    }
}
