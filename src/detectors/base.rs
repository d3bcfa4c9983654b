//! Generic detector machinery
//!
//! One `Detector` struct covers every pattern family: the rule table
//! and the scoring strategy are data, not subtypes. Rules compile once
//! at construction; a rule that fails to compile is logged and skipped
//! without taking its siblings down.

use crate::models::Hit;
use crate::scoring::Strategy;
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{debug, warn};

/// Compiled regex size cap. Bounds construction cost for pathological
/// patterns; matching itself is linear-time.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("rule {id} failed to compile: {source}")]
    RuleCompile {
        id: String,
        #[source]
        source: Box<regex::Error>,
    },
}

/// Uncompiled rule, as it appears in the rule tables
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub id: &'static str,
    pub pattern: &'static str,
    /// 0-100, feeds the detector's scoring strategy
    pub weight: u32,
    pub label: &'static str,
    pub rationale: &'static str,
    /// Maximum characters a single match may span
    pub max_span: usize,
}

/// Compiled rule. Immutable after detector construction.
#[derive(Debug)]
pub struct Rule {
    pub id: &'static str,
    pub pattern: Regex,
    pub weight: u32,
    pub label: &'static str,
    pub rationale: &'static str,
    pub max_span: usize,
}

impl Rule {
    /// Compile a spec with the match semantics every rule table relies
    /// on: case-insensitive, `^`/`$` per line, `.` crossing newlines.
    pub fn compile(spec: &RuleSpec) -> Result<Self, ScanError> {
        let pattern = RegexBuilder::new(spec.pattern)
            .case_insensitive(true)
            .multi_line(true)
            .dot_matches_new_line(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| ScanError::RuleCompile {
                id: spec.id.to_string(),
                source: Box::new(e),
            })?;
        Ok(Self {
            id: spec.id,
            pattern,
            weight: spec.weight.min(100),
            label: spec.label,
            rationale: spec.rationale,
            max_span: spec.max_span,
        })
    }
}

/// An independently scored rule set targeting one scam-pattern family
pub struct Detector {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub strategy: Strategy,
    rules: Vec<Rule>,
}

impl Detector {
    /// Build a detector from a rule table. Rules that fail to compile
    /// are dropped individually; the detector itself always constructs.
    pub fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        strategy: Strategy,
        specs: &[RuleSpec],
    ) -> Self {
        let mut rules = Vec::with_capacity(specs.len());
        for spec in specs {
            match Rule::compile(spec) {
                Ok(rule) => rules.push(rule),
                Err(e) => warn!(detector = id, rule = spec.id, "skipping rule: {e}"),
            }
        }
        Self {
            id,
            name,
            description,
            strategy,
            rules,
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Run every rule against the normalized text and collect all
    /// non-overlapping matches. Matches longer than a rule's span cap
    /// are truncated to the cap, so no hit carries unbounded text.
    pub fn scan(&self, normalized: &str) -> Vec<Hit> {
        let mut hits = Vec::new();
        for rule in &self.rules {
            for m in rule.pattern.find_iter(normalized) {
                let text = truncate_chars(m.as_str(), rule.max_span);
                hits.push(Hit {
                    rule_id: rule.id.to_string(),
                    label: rule.label.to_string(),
                    description: rule.rationale.to_string(),
                    weight: rule.weight,
                    start: m.start(),
                    end: m.start() + text.len(),
                    text: text.to_string(),
                });
            }
        }
        if !hits.is_empty() {
            debug!(detector = self.id, hits = hits.len(), "scan complete");
        }
        hits
    }
}

/// Truncate to at most `max` characters on a char boundary
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &'static str, pattern: &'static str, weight: u32) -> RuleSpec {
        RuleSpec {
            id,
            pattern,
            weight,
            label: id,
            rationale: "",
            max_span: 200,
        }
    }

    #[test]
    fn test_bad_rule_is_isolated() {
        let detector = Detector::new(
            "T1",
            "test",
            "",
            Strategy::AdditiveCapped,
            &[
                spec("good", r"revert", 50),
                spec("bad", r"(unclosed", 90),
            ],
        );
        assert_eq!(detector.rule_count(), 1);
        let hits = detector.scan("always revert here");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].rule_id, "good");
    }

    #[test]
    fn test_all_nonoverlapping_matches_found() {
        let detector = Detector::new(
            "T2",
            "test",
            "",
            Strategy::AdditiveCapped,
            &[spec("req", r"require", 10)],
        );
        let hits = detector.scan("require(a); require(b); require(c);");
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_case_insensitive_and_dotall() {
        let detector = Detector::new(
            "T3",
            "test",
            "",
            Strategy::AdditiveCapped,
            &[spec("gap", r"FUNCTION.{0,40}?revert", 10)],
        );
        let hits = detector.scan("function f() {\n  revert();\n}");
        assert_eq!(hits.len(), 1, "dot must cross the newline");
    }

    #[test]
    fn test_span_cap_truncates_match_text() {
        let mut s = spec("long", r"begin[\s\S]{0,500}?end", 10);
        s.max_span = 12;
        let detector = Detector::new("T4", "test", "", Strategy::AdditiveCapped, &[s]);
        let filler = "x".repeat(100);
        let hits = detector.scan(&format!("begin {filler} end"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text.chars().count(), 12);
        assert_eq!(hits[0].end - hits[0].start, hits[0].text.len());
    }

    #[test]
    fn test_multiline_anchor_active() {
        let detector = Detector::new(
            "T5",
            "test",
            "",
            Strategy::AdditiveCapped,
            &[spec("line", r"^pragma", 10)],
        );
        let hits = detector.scan("// header\npragma solidity ^0.8.0;\n");
        assert_eq!(hits.len(), 1);
    }
}
