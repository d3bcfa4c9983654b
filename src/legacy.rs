//! Legacy flattened report format
//!
//! Older consumers ingest a flat document with a 100-down health score
//! instead of the 0-100 risk score: 100 means clean and deductions are
//! taken per distinct pattern label present, using a fixed coefficient
//! table. The table keys are pattern labels, which is why several rule
//! labels in [`crate::detectors::rules`] reuse these exact strings.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{AnalysisReport, LINE_UNRESOLVED};

/// Coefficient per pattern label; applied once per label present,
/// regardless of occurrence count
const WEIGHTS_V1: &[(&str, f64)] = &[
    ("Direct Balance Assignment", 20.0),
    ("Balance Manipulation", 18.0),
    ("Asymmetric Fee Structure", 15.0),
    ("Reentrancy Vulnerability", 10.0),
    ("Self Destruct", 8.0),
    ("Delegate Call", 6.0),
    ("Metamorphic Contract", 5.0),
    ("Approve Function Manipulation", 3.0),
    ("Hidden Minting", 2.0),
    ("Unlimited Token Issuance", 2.0),
    ("Unlimited Minting", 2.0),
    ("Sell-Path Block", 1.5),
    ("Transfer Restriction", 1.5),
    ("Fee Manipulation", 1.5),
    ("Contract Pause Abuse", 1.0),
    ("Pause Abuse", 1.0),
    ("Pausable Exit Block", 0.8),
    ("Admin Abuse", 0.5),
    ("Total Supply Manipulation", 0.5),
    ("Owner Pause Bypass", 0.3),
    ("Permanent Owner Control", 0.2),
    ("Execution Order Dependency", 0.1),
    ("Missing Event", 0.1),
];

const SEVERITIES: [&str; 5] = ["critical", "high", "medium", "low", "info"];

#[derive(Debug, Serialize)]
pub struct LegacyReport {
    pub category: &'static str,
    pub analysis_score: u32,
    pub analysis_type: &'static str,
    pub source_hash: String,
    pub contract_name: String,
    pub summary: LegacySummary,
    pub findings: Vec<LegacyFinding>,
    pub metadata: Value,
}

#[derive(Debug, Serialize)]
pub struct LegacySummary {
    pub total_issues: usize,
    pub pattern_counts: BTreeMap<String, usize>,
    pub severity_distribution: BTreeMap<String, usize>,
    pub execution_time: f64,
}

#[derive(Debug, Serialize)]
pub struct LegacyFinding {
    pub pattern_name: String,
    pub description: String,
    pub severity: &'static str,
    pub recommendation: String,
    pub location: LegacyLocation,
    pub metadata: Value,
}

#[derive(Debug, Serialize)]
pub struct LegacyLocation {
    pub line_number: Option<i64>,
    pub function_name: Option<String>,
    pub code_snippet: Option<String>,
    pub selector: Option<String>,
}

/// Health score: 100 minus a piecewise deduction over the summed
/// coefficients of the labels present, floored at 0 and capped so the
/// score never drops below 20 from deductions alone
pub fn health_score(pattern_counts: &BTreeMap<String, usize>) -> u32 {
    let weighted: f64 = WEIGHTS_V1
        .iter()
        .filter(|(label, _)| pattern_counts.get(*label).is_some_and(|&c| c > 0))
        .map(|(_, w)| w)
        .sum();
    if weighted <= 0.0 {
        return 100;
    }
    let deduction = if weighted <= 5.0 {
        weighted * 3.0
    } else if weighted <= 15.0 {
        15.0 + (weighted - 5.0) * 2.0
    } else {
        35.0 + (weighted - 15.0) * 3.0
    };
    (100.0 - deduction.min(80.0)).max(0.0) as u32
}

fn severity_for(weight: u32) -> &'static str {
    match weight {
        90.. => "critical",
        70..=89 => "high",
        40..=69 => "medium",
        _ => "low",
    }
}

/// Flatten a modern report into the legacy document
pub fn flatten(report: &AnalysisReport) -> LegacyReport {
    // severity per label follows the heaviest rule that produced it
    let mut label_weight: BTreeMap<&str, u32> = BTreeMap::new();
    for detector in &report.detectors {
        for hit in &detector.hits {
            let entry = label_weight.entry(hit.label.as_str()).or_insert(0);
            *entry = (*entry).max(hit.weight);
        }
    }

    let mut findings = Vec::new();
    let mut severity_distribution: BTreeMap<String, usize> =
        SEVERITIES.iter().map(|s| (s.to_string(), 0)).collect();
    for finding in &report.findings {
        let severity = label_weight
            .get(finding.label.as_str())
            .map(|&w| severity_for(w))
            .unwrap_or("medium");
        for occurrence in &finding.occurrences {
            if let Some(slot) = severity_distribution.get_mut(severity) {
                *slot += 1;
            }
            findings.push(LegacyFinding {
                pattern_name: finding.label.clone(),
                description: finding.description.clone(),
                severity,
                recommendation: String::new(),
                location: LegacyLocation {
                    line_number: (occurrence.line != LINE_UNRESOLVED).then_some(occurrence.line),
                    function_name: finding.function_name.clone(),
                    code_snippet: (!occurrence.snippet.is_empty())
                        .then(|| occurrence.snippet.clone()),
                    selector: None,
                },
                metadata: json!({}),
            });
        }
    }

    LegacyReport {
        category: "STE",
        analysis_score: health_score(&report.pattern_counts),
        analysis_type: "source_code",
        source_hash: report.code_hash.clone(),
        contract_name: report.contract_name.clone(),
        summary: LegacySummary {
            total_issues: findings.len(),
            pattern_counts: report.pattern_counts.clone(),
            severity_distribution,
            execution_time: report.duration_ms as f64 / 1000.0,
        },
        findings,
        metadata: json!({
            "overall_score": report.overall_score,
            "risk_tier": report.risk_tier,
            "verdict": report.verdict,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Analyzer;

    fn counts(entries: &[(&str, usize)]) -> BTreeMap<String, usize> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_health_score_clean_is_100() {
        assert_eq!(health_score(&BTreeMap::new()), 100);
    }

    #[test]
    fn test_health_score_small_deduction() {
        // Self Destruct alone: weighted 8 -> 15 + 3 * 2 = 21
        let c = counts(&[("Self Destruct", 1)]);
        assert_eq!(health_score(&c), 79);
    }

    #[test]
    fn test_health_score_low_tier() {
        // Pause Abuse alone: weighted 1 -> 1 * 3 = 3
        let c = counts(&[("Pause Abuse", 3)]);
        assert_eq!(health_score(&c), 97);
    }

    #[test]
    fn test_health_score_heavy_tier_and_cap() {
        // 20 + 18 + 15 = 53 -> 35 + 38 * 3 = 149 -> capped at 80
        let c = counts(&[
            ("Direct Balance Assignment", 1),
            ("Balance Manipulation", 2),
            ("Asymmetric Fee Structure", 1),
        ]);
        assert_eq!(health_score(&c), 20);
    }

    #[test]
    fn test_unknown_labels_ignored() {
        let c = counts(&[("Totally Novel Pattern", 4)]);
        assert_eq!(health_score(&c), 100);
    }

    #[test]
    fn test_counts_do_not_multiply_weights() {
        let one = counts(&[("Delegate Call", 1)]);
        let many = counts(&[("Delegate Call", 9)]);
        assert_eq!(health_score(&one), health_score(&many));
    }

    #[test]
    fn test_legacy_document_shape() {
        let source = "contract T {\n  function transfer(address to, uint a) public {\n    if (to == pair) { revert(); }\n  }\n}\n";
        let report = Analyzer::new().analyze("T", source);
        let legacy = flatten(&report);
        assert_eq!(legacy.category, "STE");
        assert_eq!(legacy.analysis_type, "source_code");
        assert_eq!(legacy.summary.total_issues, legacy.findings.len());
        assert!(legacy.analysis_score < 100);

        let value = serde_json::to_value(&legacy).unwrap();
        assert!(value["summary"]["severity_distribution"]["critical"].is_u64());
        let first = &value["findings"][0];
        assert!(first["location"]["line_number"].is_i64());
        assert_eq!(first["location"]["selector"], Value::Null);
    }
}
