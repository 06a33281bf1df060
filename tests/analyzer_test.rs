//! Integration tests for the analysis pipeline: rule engines, scoring and
//! categorization wired together over synthetic inputs, no network.

use aegis_rs_scanner::core::analyzer::{headers, recommendations, scoring, tls, wordpress};
use aegis_rs_scanner::core::models::{
    HeaderAnalysis, HeaderSet, RiskLevel, TlsAnalysis, TlsFacts,
};
use aegis_rs_scanner::core::policy::ESSENTIAL_HEADERS;

fn headers_from(pairs: &[(&str, &str)]) -> HeaderSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn csp_only_site_reports_nine_missing_and_three_csp_issues() {
    let headers = headers_from(&[("content-security-policy", "default-src 'self'")]);
    let analysis = headers::analyze_headers(&headers);

    let expected_missing: Vec<String> = ESSENTIAL_HEADERS
        .iter()
        .filter(|h| **h != "content-security-policy")
        .map(|h| h.to_string())
        .collect();
    assert_eq!(analysis.missing_essential, expected_missing);

    assert_eq!(
        analysis.csp_issues,
        vec![
            "CSP missing important directive: script-src",
            "CSP missing important directive: object-src",
            "CSP missing important directive: base-uri",
        ]
    );
    assert!(analysis
        .csp_issues
        .iter()
        .all(|i| !i.contains("unsafe") && !i.contains("permissive")));
}

#[test]
fn tls_probe_failure_scores_headers_only_and_recommends_fixing_ssl() {
    let headers = headers_from(&[("content-security-policy", "default-src 'self'")]);
    let header_analysis = headers::analyze_headers(&headers);
    let tls_analysis = tls::analyze_tls(Err("TLS Handshake Error: timed out".to_string()));

    assert!(tls_analysis.error.is_some());

    let (score, breakdown) = scoring::calculate_security_score(&header_analysis, &tls_analysis);
    // 9 missing headers (27) + 3 CSP issues (6); TLS contributes nothing.
    assert_eq!(score, 100 - 27 - 6);
    assert_eq!(breakdown.ssl, 30);
    assert_eq!(breakdown.headers, 40 - 27);

    let recs = recommendations::build_recommendations(&header_analysis, &tls_analysis);
    assert_eq!(
        recs.last().map(String::as_str),
        Some("Fix SSL error: TLS Handshake Error: timed out")
    );
}

#[test]
fn hardened_site_scores_low_risk() {
    let headers = headers_from(&[
        ("content-security-policy", "default-src 'self'; script-src 'self'; object-src 'none'; base-uri 'self'"),
        ("x-content-type-options", "nosniff"),
        ("x-frame-options", "DENY"),
        ("strict-transport-security", "max-age=63072000; includeSubDomains; preload"),
        ("x-xss-protection", "0"),
        ("referrer-policy", "no-referrer"),
        ("permissions-policy", "geolocation=()"),
        ("cross-origin-opener-policy", "same-origin"),
        ("cross-origin-embedder-policy", "require-corp"),
        ("cross-origin-resource-policy", "same-origin"),
    ]);
    let header_analysis = headers::analyze_headers(&headers);
    let facts = TlsFacts {
        shared_ciphers: vec!["TLS_AES_256_GCM_SHA384".to_string()],
        ..TlsFacts::default()
    };
    let tls_analysis = tls::analyze_tls(Ok(facts));

    let (score, breakdown) = scoring::calculate_security_score(&header_analysis, &tls_analysis);
    assert_eq!(score, 100);
    assert_eq!(breakdown.headers, 40);
    assert_eq!(RiskLevel::from_score(score), RiskLevel::Low);

    let (passed, failed) = recommendations::categorize_checks(&header_analysis, &tls_analysis);
    assert_eq!(passed.len(), 6);
    assert!(failed.is_empty());
}

#[test]
fn wordpress_site_folds_cms_issues_into_score_and_recommendations() {
    let headers = headers_from(&[
        ("x-powered-by", "WordPress/6.4"),
        ("x-pingback", "https://blog.example/xmlrpc.php"),
    ]);
    let body = "<script src='/wp-includes/js/wp-embed.js?ver=6.4.2'></script>";

    assert!(wordpress::detect_wordpress(&headers, body));

    let mut header_analysis = headers::analyze_headers(&headers);
    header_analysis.wordpress_issues = Some(wordpress::analyze_wordpress(&headers, body));

    let wp_issues = header_analysis.wordpress_issues.as_ref().unwrap();
    assert_eq!(
        wp_issues.as_slice(),
        [
            "WordPress header exposed: x-pingback",
            "XML-RPC pingback endpoint exposed (consider disabling if not needed)",
            "WordPress version 6.4.2 exposed in HTML",
        ]
    );

    let tls_analysis = TlsAnalysis::default();
    let (score, breakdown) = scoring::calculate_security_score(&header_analysis, &tls_analysis);
    // 10 missing (30) + x-powered-by deprecated (2) + 3 WordPress issues (6).
    assert_eq!(score, 100 - 30 - 2 - 6);
    assert_eq!(breakdown.wordpress, 0); // 5 - 6, floored

    let recs = recommendations::build_recommendations(&header_analysis, &tls_analysis);
    assert!(recs.contains(&"WordPress issue: WordPress version 6.4.2 exposed in HTML".to_string()));
}

#[test]
fn score_and_breakdown_stay_within_bounds_under_worst_case_input() {
    let header_analysis = HeaderAnalysis {
        missing_essential: (0..10).map(|i| format!("m{i}")).collect(),
        deprecated: (0..6).map(|i| format!("d{i}")).collect(),
        csp_issues: (0..12).map(|i| format!("c{i}")).collect(),
        cookie_issues: (0..5).map(|i| format!("k{i}")).collect(),
        cors_issues: vec!["cors".to_string()],
        hsts_issues: (0..3).map(|i| format!("h{i}")).collect(),
        wordpress_issues: Some((0..5).map(|i| format!("w{i}")).collect()),
        ..HeaderAnalysis::default()
    };
    let tls_analysis = tls::analyze_tls(Ok(TlsFacts {
        shared_ciphers: vec![
            "TLS_RSA_WITH_RC4_128_MD5".to_string(),
            "TLS_RSA_WITH_3DES_EDE_CBC_SHA".to_string(),
            "TLS_RSA_WITH_DES_CBC_SHA".to_string(),
        ],
        compression_enabled: true,
        ..TlsFacts::default()
    }));

    let (score, breakdown) = scoring::calculate_security_score(&header_analysis, &tls_analysis);
    assert_eq!(score, 0);
    assert!(breakdown.headers <= 40);
    assert!(breakdown.ssl <= 30);
    assert!(breakdown.cookies <= 15);
    assert!(breakdown.cors <= 10);
    assert!(breakdown.wordpress <= 5);
}

#[test]
fn risk_level_serializes_as_plain_tier_name() {
    assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"High\"");
    assert_eq!(serde_json::to_string(&RiskLevel::Low).unwrap(), "\"Low\"");
    assert_eq!(format!("{}", RiskLevel::Medium), "Medium");
}

#[test]
fn timestamps_serialize_as_utc_with_trailing_z() {
    let ts = chrono::DateTime::parse_from_rfc3339("2026-08-27T12:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let rendered = serde_json::to_string(&ts).unwrap();
    assert!(rendered.ends_with("Z\""), "got {rendered}");
}
