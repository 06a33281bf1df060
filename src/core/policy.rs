//! Static, read-only policy data driving the rule engines.
//!
//! Keeping the canonical lists in one place makes the scanner's intelligence
//! easy to audit and update without touching evaluation logic. List order is
//! significant: findings are emitted in the order entries appear here.

use once_cell::sync::Lazy;
use regex::Regex;

/// Security headers whose absence is always flagged, in canonical order.
pub const ESSENTIAL_HEADERS: &[&str] = &[
    "content-security-policy",
    "x-content-type-options",
    "x-frame-options",
    "strict-transport-security",
    "x-xss-protection",
    "referrer-policy",
    "permissions-policy",
    "cross-origin-opener-policy",
    "cross-origin-embedder-policy",
    "cross-origin-resource-policy",
];

/// Obsolete or information-leaking headers whose presence is flagged.
pub const DEPRECATED_HEADERS: &[&str] = &[
    "public-key-pins",
    "x-aspnet-version",
    "x-powered-by",
    "server",
    "x-webkit-csp",
    "x-content-security-policy",
];

/// The four-header subset used for the pass/fail checklist.
pub const CHECKLIST_HEADERS: &[&str] = &[
    "content-security-policy",
    "x-content-type-options",
    "x-frame-options",
    "strict-transport-security",
];

/// CSP keywords that weaken script execution restrictions.
pub const CSP_UNSAFE_DIRECTIVES: &[&str] = &["unsafe-inline", "unsafe-eval", "unsafe-hashes"];

/// CSP directives a sound policy is expected to define.
pub const CSP_IMPORTANT_DIRECTIVES: &[&str] =
    &["default-src", "script-src", "object-src", "base-uri"];

/// Source tokens that make a CSP effectively toothless.
pub const CSP_PERMISSIVE_SOURCES: &[&str] = &["*", "'unsafe-inline'", "data:", "http:", "ftp:"];

/// A cipher suite is weak when its lower-cased name contains any of these.
pub const WEAK_CIPHER_SUBSTRINGS: &[&str] = &["rc4", "des", "3des", "md5"];

/// Minimum acceptable HSTS max-age: one year in seconds.
pub const HSTS_MIN_MAX_AGE: u64 = 31_536_000;

/// WordPress-specific headers that leak operational details when exposed.
pub const WORDPRESS_EXPOSED_HEADERS: &[&str] = &["x-wp-cron", "x-redirect-by", "x-pingback"];

// Version-leak patterns, checked in order against the HTML body; the first
// match wins. Group 1 carries the version where the pattern captures one,
// otherwise the whole match is reported.
pub static WP_VERSION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)wordpress [0-9.]+").unwrap(),
        Regex::new(r"(?i)wp-includes/js/wp-embed\.js\?ver=([0-9.]+)").unwrap(),
        Regex::new(r"(?i)wp-includes/css/dist/block-library/style\.min\.css\?ver=([0-9.]+)")
            .unwrap(),
    ]
});

/// Extracts `max-age=<seconds>` from an HSTS header value.
pub static HSTS_MAX_AGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"max-age=(\d+)").unwrap());
