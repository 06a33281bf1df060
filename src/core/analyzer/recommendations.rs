// src/core/analyzer/recommendations.rs

use crate::core::models::{HeaderAnalysis, TlsAnalysis};
use crate::core::policy::CHECKLIST_HEADERS;

/// Flattens all findings into one ordered remediation list.
///
/// Section order is fixed: missing headers, deprecated headers, CSP, cookies,
/// CORS, HSTS, WordPress, weak ciphers, compression, and finally a TLS probe
/// error if the handshake itself failed.
pub fn build_recommendations(
    header_analysis: &HeaderAnalysis,
    tls_analysis: &TlsAnalysis,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    for header in &header_analysis.missing_essential {
        recommendations.push(format!("Add missing security header: {header}"));
    }

    for header in &header_analysis.deprecated {
        recommendations.push(format!("Remove deprecated header: {header}"));
    }

    for issue in &header_analysis.csp_issues {
        recommendations.push(format!("CSP issue: {issue}"));
    }

    for issue in &header_analysis.cookie_issues {
        recommendations.push(format!("Cookie security issue: {issue}"));
    }

    for issue in &header_analysis.cors_issues {
        recommendations.push(format!("CORS issue: {issue}"));
    }

    for issue in &header_analysis.hsts_issues {
        recommendations.push(format!("HSTS issue: {issue}"));
    }

    if let Some(wp_issues) = &header_analysis.wordpress_issues {
        for issue in wp_issues {
            recommendations.push(format!("WordPress issue: {issue}"));
        }
    }

    if !tls_analysis.weak_ciphers.is_empty() {
        recommendations.push(format!(
            "Disable weak cipher suites: {}",
            tls_analysis.weak_ciphers.join(", ")
        ));
    }

    if tls_analysis.compression_enabled {
        recommendations.push("Disable TLS compression (CRIME vulnerability risk)".to_string());
    }

    if let Some(error) = &tls_analysis.error {
        recommendations.push(format!("Fix SSL error: {error}"));
    }

    recommendations
}

/// Builds the pass/fail checklist: a fixed four-header subset plus the two
/// TLS checks. Each check emits exactly one line, with no partial credit.
pub fn categorize_checks(
    header_analysis: &HeaderAnalysis,
    tls_analysis: &TlsAnalysis,
) -> (Vec<String>, Vec<String>) {
    let mut passed = Vec::new();
    let mut failed = Vec::new();

    for header in CHECKLIST_HEADERS {
        if header_analysis
            .missing_essential
            .iter()
            .any(|m| m == header)
        {
            failed.push(format!("Header missing: {header}"));
        } else {
            passed.push(format!("Header present: {header}"));
        }
    }

    if tls_analysis.weak_ciphers.is_empty() {
        passed.push("No weak cipher suites".to_string());
    } else {
        failed.push(format!(
            "Weak ciphers found: {}",
            tls_analysis.weak_ciphers.join(", ")
        ));
    }

    if !tls_analysis.compression_enabled {
        passed.push("TLS compression disabled".to_string());
    } else {
        failed.push("TLS compression enabled (CRIME vulnerability risk)".to_string());
    }

    (passed, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendations_follow_the_fixed_section_order() {
        let analysis = HeaderAnalysis {
            missing_essential: vec!["content-security-policy".into()],
            deprecated: vec!["server".into()],
            csp_issues: vec![],
            cookie_issues: vec!["Missing Secure flag".into()],
            hsts_issues: vec!["HSTS missing max-age directive".into()],
            wordpress_issues: Some(vec!["WordPress header exposed: x-pingback".into()]),
            ..HeaderAnalysis::default()
        };
        let tls = TlsAnalysis {
            weak_ciphers: vec!["RC4-SHA".into(), "DES-CBC3-SHA".into()],
            compression_enabled: true,
            error: None,
            ..TlsAnalysis::default()
        };

        let recs = build_recommendations(&analysis, &tls);
        assert_eq!(
            recs,
            vec![
                "Add missing security header: content-security-policy",
                "Remove deprecated header: server",
                "Cookie security issue: Missing Secure flag",
                "HSTS issue: HSTS missing max-age directive",
                "WordPress issue: WordPress header exposed: x-pingback",
                "Disable weak cipher suites: RC4-SHA, DES-CBC3-SHA",
                "Disable TLS compression (CRIME vulnerability risk)",
            ]
        );
    }

    #[test]
    fn tls_probe_error_lands_last() {
        let tls = TlsAnalysis {
            error: Some("TCP Connection Error: refused".into()),
            ..TlsAnalysis::default()
        };
        let recs = build_recommendations(&HeaderAnalysis::default(), &tls);
        assert_eq!(recs, vec!["Fix SSL error: TCP Connection Error: refused"]);
    }

    #[test]
    fn clean_inputs_produce_no_recommendations() {
        let recs = build_recommendations(&HeaderAnalysis::default(), &TlsAnalysis::default());
        assert!(recs.is_empty());
    }

    #[test]
    fn checklist_emits_one_line_per_check() {
        let analysis = HeaderAnalysis {
            missing_essential: vec![
                "content-security-policy".into(),
                "strict-transport-security".into(),
                "referrer-policy".into(),
            ],
            ..HeaderAnalysis::default()
        };
        let (passed, failed) = categorize_checks(&analysis, &TlsAnalysis::default());
        assert_eq!(
            failed,
            vec![
                "Header missing: content-security-policy",
                "Header missing: strict-transport-security",
            ]
        );
        assert_eq!(
            passed,
            vec![
                "Header present: x-content-type-options",
                "Header present: x-frame-options",
                "No weak cipher suites",
                "TLS compression disabled",
            ]
        );
    }

    #[test]
    fn weak_ciphers_and_compression_fail_their_checks() {
        let tls = TlsAnalysis {
            weak_ciphers: vec!["RC4-SHA".into()],
            compression_enabled: true,
            ..TlsAnalysis::default()
        };
        let (passed, failed) = categorize_checks(&HeaderAnalysis::default(), &tls);
        assert_eq!(passed.len(), 4); // the four header checks
        assert!(failed.contains(&"Weak ciphers found: RC4-SHA".to_string()));
        assert!(failed.contains(&"TLS compression enabled (CRIME vulnerability risk)".to_string()));
    }
}
