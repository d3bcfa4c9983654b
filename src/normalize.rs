//! Comment stripping with exact line accounting
//!
//! All downstream line numbers are computed against this output, so the
//! transform must never merge or split lines: every `\n` of the input
//! survives, including those inside block comments. Whitespace is left
//! alone. The output is only ever used for matching; snippets shown to
//! users are re-extracted from the original source.

/// Remove `//` line comments and `/* ... */` block comments from
/// Solidity source, preserving line boundaries exactly.
///
/// An unterminated block comment extends to end of input. String
/// literals are not special-cased: a `//` inside a string is treated as
/// a comment, matching the behavior downstream rule tables are tuned
/// for.
pub fn strip_comments(source: &str) -> String {
    let b = source.as_bytes();
    let n = b.len();
    let mut out = String::with_capacity(n);
    let mut i = 0usize;

    while i < n {
        if b[i] == b'/' && i + 1 < n && b[i + 1] == b'/' {
            // Line comment: drop up to (not including) the newline
            let mut j = i + 2;
            while j < n && b[j] != b'\n' {
                j += 1;
            }
            i = j;
            continue;
        }
        if b[i] == b'/' && i + 1 < n && b[i + 1] == b'*' {
            // Block comment: drop everything but the newlines
            let mut j = i + 2;
            while j < n {
                if b[j] == b'*' && j + 1 < n && b[j + 1] == b'/' {
                    j += 2;
                    break;
                }
                if b[j] == b'\n' {
                    out.push('\n');
                }
                j += 1;
            }
            i = j;
            continue;
        }
        if b[i] == b'/' {
            out.push('/');
            i += 1;
            continue;
        }
        // Copy the contiguous run of non-'/' bytes. '/' is ASCII, so it
        // never occurs inside a multi-byte UTF-8 sequence and the slice
        // boundaries are always char boundaries.
        let start = i;
        while i < n && b[i] != b'/' {
            i += 1;
        }
        out.push_str(&source[start..i]);
    }

    out
}
