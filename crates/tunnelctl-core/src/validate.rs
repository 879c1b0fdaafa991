// ── Name and hostname validation ──
//
// Hostnames are IDNA-normalized (UTS-46 ToASCII, hyphen checks and DNS
// length verification on) before the syntactic check, so Unicode names are
// judged by their punycode form.

use std::sync::LazyLock;

use idna::uts46::{AsciiDenyList, DnsLength, Hyphens, Uts46};
use regex::Regex;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[_a-zA-Z0-9][-_.a-zA-Z0-9]*$").expect("static regex is valid")
});

static WILDCARD_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[*_a-zA-Z0-9][-_.a-zA-Z0-9]*$").expect("static regex is valid")
});

/// Check `s` against the name grammar. With `allow_wildcard` the first
/// character may also be `*`.
pub fn validate_name(s: &str, allow_wildcard: bool) -> bool {
    if allow_wildcard {
        WILDCARD_NAME_RE.is_match(s)
    } else {
        NAME_RE.is_match(s)
    }
}

/// Normalize `s` to ASCII and check the result with [`validate_name`].
pub fn validate_hostname(s: &str, allow_wildcard: bool) -> bool {
    to_ascii(s).is_some_and(|puny| validate_name(&puny, allow_wildcard))
}

/// IDNA ToASCII with label validation and DNS length limits. A trailing
/// root dot is allowed and not counted.
pub fn to_ascii(s: &str) -> Option<String> {
    Uts46::new()
        .to_ascii(
            s.as_bytes(),
            AsciiDenyList::EMPTY,
            Hyphens::Check,
            DnsLength::VerifyAllowRootDot,
        )
        .ok()
        .map(std::borrow::Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(validate_name("my_tunnel-1", false));
        assert!(validate_name("_underscore", false));
        assert!(validate_name("a.b.c", false));
        assert!(!validate_name("-leading-dash", false));
        assert!(!validate_name("", false));
        assert!(!validate_name("has space", false));
        assert!(!validate_name("*.wild", false));
        assert!(validate_name("*.wild", true));
    }

    #[test]
    fn wildcard_hostnames() {
        assert!(validate_hostname("*.example.com", true));
        assert!(!validate_hostname("*.example.com", false));
    }

    #[test]
    fn rejects_invalid_punycode_and_control_chars() {
        assert!(!validate_hostname("xn--something-invalid\x00", true));
        assert!(!validate_hostname("bad host.example.com", true));
    }

    #[test]
    fn unicode_hostnames_are_normalized() {
        assert!(validate_hostname("bücher.example", false));
        assert_eq!(to_ascii("bücher.example").as_deref(), Some("xn--bcher-kva.example"));
    }

    #[test]
    fn dns_length_is_enforced() {
        let long_label = "a".repeat(64);
        assert!(!validate_hostname(&format!("{long_label}.example.com"), false));
        assert!(validate_hostname(&format!("{}.example.com", "a".repeat(63)), false));
    }

    #[test]
    fn trailing_root_dot_is_accepted() {
        assert!(validate_hostname("app.example.com.", true));
        assert!(!validate_hostname("app..example.com", true));
    }

    #[test]
    fn hyphen_rules_apply_to_labels() {
        assert!(!validate_hostname("-web.example.com", false));
        assert!(!validate_hostname("web-.example.com", false));
    }
}
