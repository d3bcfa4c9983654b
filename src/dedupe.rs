//! Collapses per-rule hits into per-function findings
//!
//! Several rules in a family often fire on the same stretch of code.
//! Hits are grouped by (label, enclosing function) so the report shows
//! one finding per issue with an occurrence list, instead of a wall of
//! near-identical entries. Hits that resolve outside any function
//! declaration fall back to a per-line bucket so unrelated top-level
//! matches never merge.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Finding, Occurrence, ResolvedHit};

fn fn_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"function\s+([A-Za-z_]\w*)").expect("valid regex"))
}

fn special_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(constructor|fallback|receive)\s*\(").expect("valid regex"))
}

/// Name of the function whose declaration most closely precedes `line`
/// (1-based), scanning backward through the original source
pub fn enclosing_function(original: &str, line: i64) -> Option<String> {
    if line < 1 {
        return None;
    }
    let line = line as usize;
    for text in original.lines().take(line).collect::<Vec<_>>().iter().rev() {
        if let Some(caps) = fn_decl_re().captures(text) {
            return Some(caps[1].to_string());
        }
        if let Some(caps) = special_decl_re().captures(text) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Merge resolved hits into findings, preserving first-seen order
pub fn merge_findings(hits: &[ResolvedHit], original: &str) -> Vec<Finding> {
    let mut findings: Vec<Finding> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for hit in hits {
        let function_name = enclosing_function(original, hit.line);
        let bucket = match &function_name {
            Some(name) => name.clone(),
            None => format!("line_{}", hit.line),
        };
        let key = (hit.label.clone(), bucket);

        let occurrence = Occurrence {
            line: hit.line,
            snippet: hit.snippet.clone(),
        };
        match index.get(&key) {
            Some(&at) => findings[at].occurrences.push(occurrence),
            None => {
                index.insert(key, findings.len());
                findings.push(Finding {
                    label: hit.label.clone(),
                    description: hit.description.clone(),
                    function_name,
                    occurrences: vec![occurrence],
                });
            }
        }
    }
    findings
}

/// Occurrence totals per label, in label order
pub fn pattern_counts(findings: &[Finding]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for finding in findings {
        *counts.entry(finding.label.clone()).or_insert(0) += finding.occurrence_count();
    }
    counts
}
