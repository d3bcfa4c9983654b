//! Core data models for Honeyscan
//!
//! These models are used throughout the codebase for representing
//! pattern hits, findings, and analysis results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel line number for a hit whose original-source position could
/// not be recovered. Such hits are still reported, never dropped.
pub const LINE_UNRESOLVED: i64 = -1;

/// Risk tiers derived from the overall 0-100 score
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    #[default]
    Low,
    Medium,
    High,
    VeryHigh,
    Critical,
}

impl RiskTier {
    /// Map a clamped score onto its tier. Bands are closed and
    /// boundary-inclusive: [0,20] [21,40] [41,60] [61,80] [81,100].
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s <= 20.0 => RiskTier::Low,
            s if s <= 40.0 => RiskTier::Medium,
            s if s <= 60.0 => RiskTier::High,
            s if s <= 80.0 => RiskTier::VeryHigh,
            _ => RiskTier::Critical,
        }
    }

    /// One-line investment verdict for this tier
    pub fn verdict(&self) -> &'static str {
        match self {
            RiskTier::Critical => "SCAM - DO NOT INVEST",
            RiskTier::VeryHigh => "HIGHLY SUSPICIOUS - AVOID",
            RiskTier::High => "RISKY - PROCEED WITH CAUTION",
            RiskTier::Medium => "SOME CONCERNS - INVESTIGATE FURTHER",
            RiskTier::Low => "APPEARS SAFE - STANDARD PATTERNS",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "LOW_RISK"),
            RiskTier::Medium => write!(f, "MEDIUM_RISK"),
            RiskTier::High => write!(f, "HIGH_RISK"),
            RiskTier::VeryHigh => write!(f, "VERY_HIGH_RISK"),
            RiskTier::Critical => write!(f, "CRITICAL_RISK"),
        }
    }
}

/// One matched occurrence of a rule in the comment-stripped text.
/// Ephemeral: created per scan, replaced by [`ResolvedHit`] before
/// anything is reported.
#[derive(Debug, Clone)]
pub struct Hit {
    pub rule_id: String,
    pub label: String,
    pub description: String,
    pub weight: u32,
    /// Byte span of the match in the normalized text
    pub start: usize,
    pub end: usize,
    /// Matched text, truncated to the rule's span cap
    pub text: String,
}

/// A hit annotated with its original-source position. `line` is 1-based
/// or [`LINE_UNRESOLVED`]; the snippet comes from the original source
/// (comments intact) except when unresolved, where it falls back to the
/// normalized match text. Never recomputed after creation.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedHit {
    pub rule_id: String,
    pub label: String,
    pub description: String,
    pub weight: u32,
    pub line: i64,
    pub snippet: String,
}

/// One occurrence within a deduplicated finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub line: i64,
    pub snippet: String,
}

/// A deduplicated presentation unit: all hits of one pattern label
/// inside one function (or one line, when no function is attributable).
/// The occurrence list is never empty.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub label: String,
    pub description: String,
    pub function_name: Option<String>,
    pub occurrences: Vec<Occurrence>,
}

impl Finding {
    pub fn occurrence_count(&self) -> usize {
        self.occurrences.len()
    }
}

/// Result of running a single detector family
#[derive(Debug, Clone, Serialize)]
pub struct DetectorReport {
    pub id: String,
    pub name: String,
    /// Label of the aggregation strategy that produced `score`
    pub strategy: String,
    /// Final detector score, clamped to [0,100]
    pub score: f64,
    pub hits: Vec<ResolvedHit>,
    /// Present when the detector failed; the score is then 0
    pub error: Option<String>,
}

/// Complete analysis report for one source input
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub contract_name: String,
    /// SHA-256 hex digest of the raw input, for caller-side dedup
    pub code_hash: String,
    pub analyzed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub overall_score: f64,
    pub risk_tier: RiskTier,
    pub verdict: String,
    pub max_score: f64,
    pub average_score: f64,
    pub detectors: Vec<DetectorReport>,
    pub findings: Vec<Finding>,
    /// Occurrence totals per pattern label across all findings
    pub pattern_counts: BTreeMap<String, usize>,
    pub recommendations: Vec<String>,
}

/// Round to 2 decimals, the precision reports carry
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
