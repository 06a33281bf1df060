// src/core/analyzer/headers.rs

use tracing::debug;

use crate::core::models::{AdditionalHeaders, HeaderAnalysis, HeaderSet, OwaspCompliance};
use crate::core::policy::{
    CSP_IMPORTANT_DIRECTIVES, CSP_PERMISSIVE_SOURCES, CSP_UNSAFE_DIRECTIVES, DEPRECATED_HEADERS,
    ESSENTIAL_HEADERS, HSTS_MAX_AGE_RE, HSTS_MIN_MAX_AGE,
};

/// Evaluates the fixed header policy rule set against one response's headers.
///
/// Pure and total: absence of an expected header is a finding, never an
/// error. Findings are appended in policy-list order so the output is
/// deterministic for a given input.
pub fn analyze_headers(headers: &HeaderSet) -> HeaderAnalysis {
    debug!(count = headers.len(), "Analyzing response headers.");

    let mut analysis = HeaderAnalysis {
        additional_headers: check_additional_headers(headers),
        owasp_compliance: check_owasp_compliance(headers),
        ..HeaderAnalysis::default()
    };

    analysis.missing_essential = ESSENTIAL_HEADERS
        .iter()
        .filter(|h| !headers.contains_key(**h))
        .map(|h| h.to_string())
        .collect();

    analysis.deprecated = DEPRECATED_HEADERS
        .iter()
        .filter(|h| headers.contains_key(**h))
        .map(|h| h.to_string())
        .collect();

    if let Some(csp) = headers.get("content-security-policy") {
        analysis.csp_issues = analyze_csp(csp);
    }

    if let Some(cookie) = headers.get("set-cookie") {
        analysis.cookie_issues = analyze_cookies(cookie);
    }

    if let Some(acao) = headers.get("access-control-allow-origin") {
        analysis.cors_issues = analyze_cors(acao);
    }

    if let Some(hsts) = headers.get("strict-transport-security") {
        analysis.hsts_issues = analyze_hsts(hsts);
    }

    debug!(
        missing = analysis.missing_essential.len(),
        deprecated = analysis.deprecated.len(),
        "Header analysis finished."
    );
    analysis
}

/// Flags unsafe directives, missing important directives and overly
/// permissive sources, in that order. All three sub-checks run independently.
fn analyze_csp(csp_header: &str) -> Vec<String> {
    let mut issues = Vec::new();

    for directive in CSP_UNSAFE_DIRECTIVES {
        if csp_header.contains(directive) {
            issues.push(format!("CSP contains unsafe directive: {directive}"));
        }
    }

    for directive in CSP_IMPORTANT_DIRECTIVES {
        if !csp_header.contains(directive) {
            issues.push(format!("CSP missing important directive: {directive}"));
        }
    }

    for source in CSP_PERMISSIVE_SOURCES {
        if csp_header.contains(source) {
            issues.push(format!("CSP contains overly permissive source: {source}"));
        }
    }

    issues
}

/// Checks one Set-Cookie value for the Secure/HttpOnly/SameSite attributes
/// and an overly broad Domain setting.
fn analyze_cookies(cookie_header: &str) -> Vec<String> {
    let mut issues = Vec::new();
    let segments: Vec<String> = cookie_header
        .split(';')
        .map(|c| c.trim().to_lowercase())
        .collect();

    let has_secure = segments.iter().any(|c| c.contains("secure"));

    if !has_secure {
        issues.push("Missing Secure flag".to_string());
    }

    if !segments.iter().any(|c| c.contains("httponly")) {
        issues.push("Missing HttpOnly flag".to_string());
    }

    match segments.iter().find(|c| c.contains("samesite")) {
        None => issues.push("Missing SameSite attribute".to_string()),
        Some(samesite) => {
            if samesite.contains("samesite=none") && !has_secure {
                issues.push("SameSite=None without Secure flag".to_string());
            }
        }
    }

    if segments.iter().any(|c| c.contains("domain=")) {
        issues.push("Overly broad domain setting".to_string());
    }

    issues
}

fn analyze_cors(acao_header: &str) -> Vec<String> {
    let mut issues = Vec::new();
    if acao_header == "*" {
        issues.push("Overly permissive CORS policy: Access-Control-Allow-Origin: *".to_string());
    }
    issues
}

/// Validates the HSTS value: max-age present, at least one year, and
/// includeSubDomains set.
fn analyze_hsts(hsts_header: &str) -> Vec<String> {
    let mut issues = Vec::new();

    if !hsts_header.contains("max-age") {
        issues.push("HSTS missing max-age directive".to_string());
    } else if let Some(caps) = HSTS_MAX_AGE_RE.captures(hsts_header) {
        if let Ok(max_age) = caps[1].parse::<u64>() {
            if max_age < HSTS_MIN_MAX_AGE {
                issues.push(format!(
                    "HSTS max-age too short: {max_age} (should be at least {HSTS_MIN_MAX_AGE})"
                ));
            }
        }
    }

    if !hsts_header.to_lowercase().contains("includesubdomains") {
        issues.push("HSTS missing includeSubDomains directive".to_string());
    }

    issues
}

fn check_additional_headers(headers: &HeaderSet) -> AdditionalHeaders {
    AdditionalHeaders {
        clear_site_data: headers.contains_key("clear-site-data"),
        report_to: headers.contains_key("report-to"),
        feature_policy: headers.contains_key("feature-policy"),
        expect_ct: headers.contains_key("expect-ct"),
    }
}

fn check_owasp_compliance(headers: &HeaderSet) -> OwaspCompliance {
    OwaspCompliance {
        content_security_policy: headers.contains_key("content-security-policy"),
        // Presence alone is not enough here: the value must actually be "nosniff".
        x_content_type_options: headers
            .get("x-content-type-options")
            .map(|v| v.to_lowercase() == "nosniff")
            .unwrap_or(false),
        x_frame_options: headers.contains_key("x-frame-options"),
        strict_transport_security: headers.contains_key("strict-transport-security"),
        x_xss_protection: headers.contains_key("x-xss-protection"),
        referrer_policy: headers.contains_key("referrer-policy"),
        permissions_policy: headers.contains_key("permissions-policy"),
        cross_origin_opener_policy: headers.contains_key("cross-origin-opener-policy"),
        cross_origin_embedder_policy: headers.contains_key("cross-origin-embedder-policy"),
        cross_origin_resource_policy: headers.contains_key("cross-origin-resource-policy"),
    }
}
