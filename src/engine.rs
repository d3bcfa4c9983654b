//! Runs every detector family over one contract and assembles the report

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::dedupe::{merge_findings, pattern_counts};
use crate::detectors::{default_detectors, Detector};
use crate::models::{
    round2, AnalysisReport, DetectorReport, Finding, Occurrence, ResolvedHit, RiskTier,
    LINE_UNRESOLVED,
};
use crate::normalize::strip_comments;
use crate::resolve::resolve_hits;

const NO_FINDINGS_ADVICE: [&str; 2] = [
    "No critical scam patterns detected",
    "Always do your own research before investing",
];

/// Runs a fixed set of detectors over contract source text
pub struct Analyzer {
    detectors: Vec<Detector>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Analyzer with the six built-in detector families
    pub fn new() -> Self {
        Self {
            detectors: default_detectors(),
        }
    }

    /// Analyzer with a caller-chosen detector set (used by tests)
    pub fn with_detectors(detectors: Vec<Detector>) -> Self {
        Self { detectors }
    }

    /// Analyze one contract and produce the full graded report
    pub fn analyze(&self, contract_name: &str, source: &str) -> AnalysisReport {
        let start = Instant::now();
        let code_hash = format!("{:x}", Sha256::digest(source.as_bytes()));

        if source.trim().is_empty() {
            warn!(contract = contract_name, "empty contract source");
            return empty_input_report(contract_name, code_hash, start);
        }

        info!(
            contract = contract_name,
            bytes = source.len(),
            detectors = self.detectors.len(),
            "starting analysis"
        );
        let normalized = strip_comments(source);

        let mut detectors: Vec<DetectorReport> = self
            .detectors
            .par_iter()
            .map(|detector| run_detector(detector, source, &normalized))
            .collect();
        // deterministic merge order regardless of scheduling
        detectors.sort_by(|a, b| a.id.cmp(&b.id));

        let scores: Vec<f64> = detectors.iter().map(|d| d.score).collect();
        let max_score = scores.iter().cloned().fold(0.0_f64, f64::max);
        let average_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        let overall_score = round2(max_score * 0.6 + average_score * 0.4);
        let risk_tier = RiskTier::from_score(overall_score);

        let all_hits: Vec<ResolvedHit> = detectors
            .iter()
            .flat_map(|d| d.hits.iter().cloned())
            .collect();
        let findings = merge_findings(&all_hits, source);
        let pattern_counts = pattern_counts(&findings);
        let recommendations = recommendations(&detectors);

        let report = AnalysisReport {
            contract_name: contract_name.to_string(),
            code_hash,
            analyzed_at: Utc::now(),
            duration_ms: start.elapsed().as_millis() as u64,
            overall_score,
            risk_tier,
            verdict: risk_tier.verdict().to_string(),
            max_score: round2(max_score),
            average_score: round2(average_score),
            detectors,
            findings,
            pattern_counts,
            recommendations,
        };
        info!(
            contract = contract_name,
            score = report.overall_score,
            tier = %report.risk_tier,
            findings = report.findings.len(),
            elapsed_ms = report.duration_ms,
            "analysis complete"
        );
        report
    }
}

fn run_detector(detector: &Detector, original: &str, normalized: &str) -> DetectorReport {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let hits = detector.scan(normalized);
        let resolved = resolve_hits(&hits, original, normalized);
        let score = round2(detector.strategy.score(&hits));
        (score, resolved)
    }));
    match outcome {
        Ok((score, hits)) => {
            debug!(detector = detector.id, score, hits = hits.len(), "scanned");
            DetectorReport {
                id: detector.id.to_string(),
                name: detector.name.to_string(),
                strategy: detector.strategy.label().to_string(),
                score,
                hits,
                error: None,
            }
        }
        Err(_) => {
            warn!(detector = detector.id, "detector panicked; scored as zero");
            DetectorReport {
                id: detector.id.to_string(),
                name: detector.name.to_string(),
                strategy: detector.strategy.label().to_string(),
                score: 0.0,
                hits: Vec::new(),
                error: Some("detector panicked during scan".to_string()),
            }
        }
    }
}

/// Advisory threshold: a family speaks up only when its own score is
/// in the very-high band
const ADVISORY_SCORE: f64 = 80.0;

/// One advisory per detector family scoring at or above the threshold,
/// deduplicated so the three exit-restriction detectors contribute a
/// single entry
fn recommendations(detectors: &[DetectorReport]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for report in detectors {
        if report.error.is_some() || report.score < ADVISORY_SCORE {
            continue;
        }
        let family = report.id.split('_').next().unwrap_or(&report.id);
        let advice = match family {
            "STE0101" => "Exit restrictions detected - verify you can sell before buying any amount",
            "STE0103" => "Contract is upgradeable - the owner can change its logic after you invest",
            "STE0104" => "Minting controls detected - the token supply can be inflated at will",
            "STE0105" => "Deposit trap indicators - funds sent in may only be withdrawable by the owner",
            _ => continue,
        };
        if !out.iter().any(|r| r == advice) {
            out.push(advice.to_string());
        }
    }
    if out.is_empty() {
        out.extend(NO_FINDINGS_ADVICE.iter().map(|s| s.to_string()));
    }
    out
}

fn empty_input_report(contract_name: &str, code_hash: String, start: Instant) -> AnalysisReport {
    let sentinel = DetectorReport {
        id: "input".to_string(),
        name: "Input Validation".to_string(),
        strategy: "none".to_string(),
        score: 0.0,
        hits: Vec::new(),
        error: Some("empty contract source".to_string()),
    };
    let finding = Finding {
        label: "Empty Input".to_string(),
        description: "No source code was provided for analysis".to_string(),
        function_name: None,
        occurrences: vec![Occurrence {
            line: LINE_UNRESOLVED,
            snippet: String::new(),
        }],
    };
    AnalysisReport {
        contract_name: contract_name.to_string(),
        code_hash,
        analyzed_at: Utc::now(),
        duration_ms: start.elapsed().as_millis() as u64,
        overall_score: 0.0,
        risk_tier: RiskTier::Low,
        verdict: RiskTier::Low.verdict().to_string(),
        max_score: 0.0,
        average_score: 0.0,
        detectors: vec![sentinel],
        findings: vec![finding],
        pattern_counts: Default::default(),
        recommendations: vec![
            "Unable to generate recommendations - analysis incomplete".to_string(),
        ],
    }
}
