// src/core/analyzer/wordpress.rs

use tracing::debug;

use crate::core::models::HeaderSet;
use crate::core::policy::{WORDPRESS_EXPOSED_HEADERS, WP_VERSION_PATTERNS};

/// Heuristically decides whether the response came from a WordPress site.
///
/// Any one of five independent signals is enough: an x-powered-by mention, a
/// wp-json REST discovery link, the CMS name in any header value, or
/// wp-content / wp-includes asset paths in the body.
pub fn detect_wordpress(headers: &HeaderSet, body: &str) -> bool {
    let body_lower = body.to_lowercase();

    let detected = headers
        .get("x-powered-by")
        .is_some_and(|v| v.to_lowercase().contains("wordpress"))
        || headers
            .get("link")
            .is_some_and(|v| v.to_lowercase().contains("wp-json"))
        || headers.values().any(|v| v.to_lowercase().contains("wordpress"))
        || body_lower.contains("wp-content")
        || body_lower.contains("wp-includes");

    if detected {
        debug!("WordPress fingerprint detected.");
    }
    detected
}

/// Emits WordPress-specific exposure findings. Only meaningful after
/// [`detect_wordpress`] returned true.
pub fn analyze_wordpress(headers: &HeaderSet, body: &str) -> Vec<String> {
    let mut issues = Vec::new();

    for header in WORDPRESS_EXPOSED_HEADERS {
        if headers.contains_key(*header) {
            issues.push(format!("WordPress header exposed: {header}"));
        }
    }

    if headers.contains_key("x-pingback") {
        issues.push(
            "XML-RPC pingback endpoint exposed (consider disabling if not needed)".to_string(),
        );
    }

    if headers.get("link").is_some_and(|v| v.contains("wp-json")) {
        issues.push(
            "WordPress REST API endpoint exposed (consider restricting access if not needed)"
                .to_string(),
        );
    }

    if headers.values().any(|v| v.contains("admin-ajax.php")) {
        issues.push("WordPress admin-ajax.php endpoint exposed (consider rate limiting)".to_string());
    }

    // Best-effort version leak scan: first pattern match wins.
    for pattern in WP_VERSION_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(body) {
            let version = caps
                .get(1)
                .map(|m| m.as_str())
                .unwrap_or_else(|| caps.get(0).map(|m| m.as_str()).unwrap_or_default());
            issues.push(format!("WordPress version {version} exposed in HTML"));
            break;
        }
    }

    debug!(issues = issues.len(), "WordPress analysis finished.");
    issues
}
