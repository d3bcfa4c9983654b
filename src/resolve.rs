//! Maps match offsets in the comment-stripped text back to the original source
//!
//! Matching runs against the normalized text, so a hit's offsets mean
//! nothing to a user looking at the file they submitted. Resolution
//! tries three passes, strictest first:
//!
//! 1. strict: the matched text plus up to [`CONTEXT`] bytes of
//!    surrounding normalized text is searched for verbatim in the
//!    original,
//! 2. loose: the matched text alone is searched for,
//! 3. unresolved: the hit keeps its normalized snippet and reports
//!    line [`crate::models::LINE_UNRESOLVED`].
//!
//! Because comment stripping preserves every newline, strict hits land
//! on the exact original line; the context window exists to
//! disambiguate text that appears both in code and inside a comment.

use memchr::{memchr_iter, memmem};

use crate::models::{Hit, ResolvedHit, LINE_UNRESOLVED};

/// Bytes of surrounding normalized text carried into the strict search
const CONTEXT: usize = 30;

/// Upper bound on snippet length, in characters
const SNIPPET_MAX: usize = 200;

/// Resolve a batch of hits against the original source text
pub fn resolve_hits(hits: &[Hit], original: &str, normalized: &str) -> Vec<ResolvedHit> {
    hits.iter()
        .map(|hit| resolve_hit(hit, original, normalized))
        .collect()
}

fn resolve_hit(hit: &Hit, original: &str, normalized: &str) -> ResolvedHit {
    if let Some(offset) = locate(hit, original, normalized) {
        let end = ceil_char(original, (offset + hit.text.len()).min(original.len()));
        ResolvedHit {
            rule_id: hit.rule_id.clone(),
            label: hit.label.clone(),
            description: hit.description.clone(),
            weight: hit.weight,
            line: line_of(original, offset),
            snippet: clip(physical_lines(original, offset, end)),
        }
    } else {
        ResolvedHit {
            rule_id: hit.rule_id.clone(),
            label: hit.label.clone(),
            description: hit.description.clone(),
            weight: hit.weight,
            line: LINE_UNRESOLVED,
            snippet: clip(&hit.text),
        }
    }
}

/// Byte offset of the hit's text in the original, or None if neither
/// the strict nor the loose pass finds it
fn locate(hit: &Hit, original: &str, normalized: &str) -> Option<usize> {
    let wstart = floor_char(normalized, hit.start.saturating_sub(CONTEXT));
    let wend = ceil_char(normalized, (hit.end + CONTEXT).min(normalized.len()));
    let window = &normalized[wstart..wend];

    if let Some(at) = memmem::find(original.as_bytes(), window.as_bytes()) {
        return Some(at + (hit.start - wstart));
    }
    memmem::find(original.as_bytes(), hit.text.as_bytes())
}

/// 1-based line number of a byte offset
fn line_of(text: &str, offset: usize) -> i64 {
    memchr_iter(b'\n', &text.as_bytes()[..offset]).count() as i64 + 1
}

/// The full physical line(s) of `text` covering `[start, end)`,
/// without the trailing terminator
fn physical_lines(text: &str, start: usize, end: usize) -> &str {
    let bytes = text.as_bytes();
    let from = memchr::memrchr(b'\n', &bytes[..start]).map_or(0, |i| i + 1);
    let to = memchr::memchr(b'\n', &bytes[end..]).map_or(text.len(), |i| end + i);
    text[from..to].trim_end_matches('\r')
}

fn clip(s: &str) -> String {
    match s.char_indices().nth(SNIPPET_MAX) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

fn floor_char(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char(s: &str, mut i: usize) -> usize {
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::strip_comments;

    fn hit_at(normalized: &str, needle: &str) -> Hit {
        let start = normalized.find(needle).unwrap();
        Hit {
            rule_id: "r1".to_string(),
            label: "Test".to_string(),
            description: "test rule".to_string(),
            weight: 50,
            start,
            end: start + needle.len(),
            text: needle.to_string(),
        }
    }

    #[test]
    fn test_strict_resolution_exact_line() {
        let original = "line one\n/* gone */\nselfdestruct(owner);\n";
        let normalized = strip_comments(original);
        let hit = hit_at(&normalized, "selfdestruct");
        let resolved = resolve_hit(&hit, original, &normalized);
        assert_eq!(resolved.line, 3);
        assert_eq!(resolved.snippet, "selfdestruct(owner);");
    }

    #[test]
    fn test_context_disambiguates_commented_copy() {
        // the same text appears inside a comment first; the strict pass
        // must land on the code occurrence
        let original = "// selfdestruct(owner);\nuint x = 1;\nselfdestruct(owner);\n";
        let normalized = strip_comments(original);
        let hit = hit_at(&normalized, "selfdestruct(owner);");
        let resolved = resolve_hit(&hit, original, &normalized);
        assert_eq!(resolved.line, 3);
    }

    #[test]
    fn test_loose_fallback_when_context_mangled() {
        // a hit whose surrounding context never occurs in the original
        // still resolves through the loose pass
        let original = "abc mintable def\n";
        let normalized = "XXXXX mintable YYYYY\n".to_string();
        let hit = hit_at(&normalized, "mintable");
        let resolved = resolve_hit(&hit, original, &normalized);
        assert_eq!(resolved.line, 1);
        assert_eq!(resolved.snippet, "abc mintable def");
    }

    #[test]
    fn test_unresolved_sentinel() {
        let original = "nothing relevant here\n";
        let normalized = "function mint() { }\n".to_string();
        let hit = hit_at(&normalized, "mint()");
        let resolved = resolve_hit(&hit, original, &normalized);
        assert_eq!(resolved.line, LINE_UNRESOLVED);
        assert_eq!(resolved.snippet, "mint()");
    }

    #[test]
    fn test_snippet_capped_at_200_chars() {
        let long = "a".repeat(400);
        let original = format!("{long}\n");
        let normalized = original.clone();
        let hit = hit_at(&normalized, &long);
        let resolved = resolve_hit(&hit, original.as_str(), &normalized);
        assert_eq!(resolved.snippet.chars().count(), 200);
    }

    #[test]
    fn test_multibyte_context_boundaries() {
        let original = "계약 코드 selfdestruct(목적지) 끝\n";
        let normalized = strip_comments(original);
        let hit = hit_at(&normalized, "selfdestruct");
        let resolved = resolve_hit(&hit, original, &normalized);
        assert_eq!(resolved.line, 1);
    }
}
