//! Honeyscan - pattern-based Solidity scam and honeypot scanner
//!
//! Scans Solidity source text for textual patterns correlated with
//! scam/honeypot token behavior (sell-path blocking, fee bombs,
//! blacklist gates, proxy-upgrade rugs, unlimited minting, deposit
//! traps) and reduces pattern hits into a graded 0-100 risk score.
//!
//! The analysis is purely textual: no compiler, no AST, no network.
//! Rule tables are configuration data; the pipeline is
//! normalize -> match -> resolve positions -> score -> deduplicate ->
//! aggregate.

pub mod cli;
pub mod dedupe;
pub mod detectors;
pub mod engine;
pub mod legacy;
pub mod models;
pub mod normalize;
pub mod reporters;
pub mod resolve;
pub mod scoring;

pub use engine::Analyzer;
pub use models::{AnalysisReport, DetectorReport, Finding, ResolvedHit, RiskTier};
