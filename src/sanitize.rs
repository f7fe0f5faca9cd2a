//! Patch text cleanup.
//!
//! Commit patches arrive as arbitrary text: binary-ish blobs, stray NUL
//! bytes, mixed line endings. [`clean_patch`] folds all of it into a single
//! printable line so the diff can live in one CSV cell.

use unicode_normalization::UnicodeNormalization;

/// Normalize a patch to a single printable line.
///
/// 1. NFKC normalization.
/// 2. Every char that is not tab, LF, CR, printable ASCII, or at/above
///    U+0080 becomes a space.
/// 3. Whitespace runs collapse to one ASCII space; ends are trimmed.
pub fn clean_patch(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let normalized: String = text
        .nfkc()
        .map(|c| if is_kept(c) { c } else { ' ' })
        .collect();

    let mut out = String::with_capacity(normalized.len());
    for word in normalized.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

fn is_kept(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | ' '..='~') || c >= '\u{80}'
}
