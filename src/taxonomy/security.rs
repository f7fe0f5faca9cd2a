use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Security vocabulary matched anywhere in PR text.
pub const SECURITY_KEYWORDS: &[&str] = &[
    "race",
    "racy",
    "buffer",
    "overflow",
    "stack",
    "integer",
    "signedness",
    "underflow",
    "improper",
    "unauthenticated",
    "gain access",
    "permission",
    "cross site",
    "css",
    "xss",
    "denial service",
    "dos",
    "crash",
    "deadlock",
    "injection",
    "request forgery",
    "csrf",
    "xsrf",
    "forged",
    "security",
    "vulnerability",
    "vulnerable",
    "exploit",
    "attack",
    "bypass",
    "backdoor",
    "threat",
    "expose",
    "breach",
    "violate",
    "fatal",
    "blacklist",
    "overrun",
    "insecure",
];

static SECURITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = SECURITY_KEYWORDS
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()
        .expect("escaped keyword alternation is a valid regex")
});

/// Whether `title + " " + body` mentions any security keyword.
///
/// Matches are plain substrings, not whole words: "embrace" trips on "race"
/// and "dose" trips on "dos".
pub fn is_security_related(title: &str, body: &str) -> bool {
    let combined = format!("{} {}", title, body).to_lowercase();
    SECURITY_PATTERN.is_match(&combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_titles() {
        assert!(is_security_related("SQL Injection found", ""));
        assert!(!is_security_related("Fix typo", ""));
        assert!(is_security_related("Dos attack risk", ""));
    }

    #[test]
    fn test_substring_false_positives_are_kept() {
        assert!(is_security_related("Adopt a dose of caching", ""));
        assert!(is_security_related("Embrace the new API", ""));
        assert!(is_security_related("Tune the tracer", ""));
        // "adoption" spells a-d-o-p, so no keyword hides inside it
        assert!(!is_security_related("Adoption rate", ""));
    }

    #[test]
    fn test_near_miss_words_stay_clean() {
        // a-c-c-e-s-s never spells c-s-s
        assert!(!is_security_related("Grant access to docs", ""));
        assert!(!is_security_related("Grant access", "to the docs folder"));
    }

    #[test]
    fn test_body_and_case() {
        assert!(is_security_related("Refactor", "Prevents a BUFFER OVERFLOW"));
        assert!(is_security_related("", "possible XSS via title"));
        assert!(!is_security_related("Update README", "Adds install steps"));
    }

    #[test]
    fn test_phrase_spans_title_and_body() {
        // the joining space lets a two-word phrase straddle the fields
        assert!(is_security_related("Prevent cross", "site scripting"));
        assert!(!is_security_related("Prevent cross", ""));
        assert!(!is_security_related("", "site scripting"));
    }

    #[test]
    fn test_keyword_set_is_stable() {
        assert_eq!(SECURITY_KEYWORDS.len(), 39);
        for keyword in SECURITY_KEYWORDS {
            assert!(is_security_related(keyword, ""), "{} should match itself", keyword);
        }
    }
}
