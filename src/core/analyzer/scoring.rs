// src/core/analyzer/scoring.rs

use tracing::debug;

use crate::core::models::{HeaderAnalysis, ScoreBreakdown, TlsAnalysis};

const MISSING_HEADER_PENALTY: i64 = 3;
const DEPRECATED_HEADER_PENALTY: i64 = 2;
const HEADER_ISSUE_PENALTY: i64 = 2;
const WEAK_CIPHER_PENALTY: i64 = 3;
const COMPRESSION_PENALTY: i64 = 10;
const WORDPRESS_ISSUE_PENALTY: i64 = 2;

/// Derives the composite security score and the per-category breakdown.
///
/// The composite starts at 100 and absorbs every penalty; the breakdown
/// categories track their own sub-budgets and are floored at zero
/// independently. The composite is deliberately NOT the sum of the
/// categories: CSP/cookie/CORS/HSTS issue penalties reduce the composite
/// only, not the already-charged headers category.
///
/// A TLS analysis in the error state carries empty cipher data and a false
/// compression flag, so a failed probe contributes zero TLS penalty by
/// construction.
pub fn calculate_security_score(
    header_analysis: &HeaderAnalysis,
    tls_analysis: &TlsAnalysis,
) -> (u8, ScoreBreakdown) {
    let mut score: i64 = 100;
    let mut headers: i64 = 40;
    let mut ssl: i64 = 30;
    let cookies: i64 = 15;
    let cors: i64 = 10;
    let mut wordpress: i64 = 5;

    let missing_penalty = header_analysis.missing_essential.len() as i64 * MISSING_HEADER_PENALTY;
    score -= missing_penalty;
    headers -= missing_penalty;

    let deprecated_penalty = header_analysis.deprecated.len() as i64 * DEPRECATED_HEADER_PENALTY;
    score -= deprecated_penalty;
    headers -= deprecated_penalty;

    // Category-untracked deductions: these hit the composite only.
    score -= header_analysis.csp_issues.len() as i64 * HEADER_ISSUE_PENALTY;
    score -= header_analysis.cookie_issues.len() as i64 * HEADER_ISSUE_PENALTY;
    score -= header_analysis.cors_issues.len() as i64 * HEADER_ISSUE_PENALTY;
    score -= header_analysis.hsts_issues.len() as i64 * HEADER_ISSUE_PENALTY;

    if !tls_analysis.weak_ciphers.is_empty() {
        let ssl_penalty = tls_analysis.weak_ciphers.len() as i64 * WEAK_CIPHER_PENALTY;
        score -= ssl_penalty;
        ssl -= ssl_penalty;
    }

    if tls_analysis.compression_enabled {
        score -= COMPRESSION_PENALTY;
        ssl -= COMPRESSION_PENALTY;
    }

    if let Some(wp_issues) = &header_analysis.wordpress_issues {
        let wp_penalty = wp_issues.len() as i64 * WORDPRESS_ISSUE_PENALTY;
        score -= wp_penalty;
        wordpress -= wp_penalty;
    }

    let breakdown = ScoreBreakdown {
        headers: headers.max(0) as u8,
        ssl: ssl.max(0) as u8,
        cookies: cookies.max(0) as u8,
        cors: cors.max(0) as u8,
        wordpress: wordpress.max(0) as u8,
    };
    let total = score.max(0) as u8;

    debug!(score = total, "Security score computed.");
    (total, breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::RiskLevel;

    fn analysis_missing(n: usize) -> HeaderAnalysis {
        HeaderAnalysis {
            missing_essential: (0..n).map(|i| format!("header-{i}")).collect(),
            ..HeaderAnalysis::default()
        }
    }

    #[test]
    fn clean_inputs_score_a_perfect_hundred() {
        let (score, breakdown) =
            calculate_security_score(&HeaderAnalysis::default(), &TlsAnalysis::default());
        assert_eq!(score, 100);
        assert_eq!(breakdown, ScoreBreakdown::default());
    }

    #[test]
    fn all_essential_missing_charges_headers_category() {
        let (score, breakdown) =
            calculate_security_score(&analysis_missing(10), &TlsAnalysis::default());
        assert_eq!(score, 70);
        assert_eq!(breakdown.headers, 10); // 40 - 3*10
        assert_eq!(breakdown.ssl, 30);
    }

    #[test]
    fn issue_penalties_hit_composite_but_not_headers_category() {
        let analysis = HeaderAnalysis {
            csp_issues: vec!["a".into(), "b".into()],
            cookie_issues: vec!["c".into()],
            hsts_issues: vec!["d".into()],
            ..HeaderAnalysis::default()
        };
        let (score, breakdown) = calculate_security_score(&analysis, &TlsAnalysis::default());
        assert_eq!(score, 100 - 2 * 4);
        assert_eq!(breakdown.headers, 40);
    }

    #[test]
    fn headers_category_floors_at_zero_while_composite_keeps_falling() {
        // 10 missing (30) + all 6 deprecated (12) overruns the 40-point budget.
        let analysis = HeaderAnalysis {
            missing_essential: (0..10).map(|i| format!("m{i}")).collect(),
            deprecated: (0..6).map(|i| format!("d{i}")).collect(),
            ..HeaderAnalysis::default()
        };
        let (score, breakdown) = calculate_security_score(&analysis, &TlsAnalysis::default());
        assert_eq!(breakdown.headers, 0);
        assert_eq!(score, 100 - 30 - 12);
    }

    #[test]
    fn composite_floors_at_zero() {
        let analysis = HeaderAnalysis {
            missing_essential: (0..10).map(|i| format!("m{i}")).collect(),
            deprecated: (0..6).map(|i| format!("d{i}")).collect(),
            csp_issues: (0..20).map(|i| format!("c{i}")).collect(),
            cookie_issues: (0..10).map(|i| format!("k{i}")).collect(),
            ..HeaderAnalysis::default()
        };
        let tls = TlsAnalysis {
            weak_ciphers: vec!["RC4-MD5".into()],
            compression_enabled: true,
            ..TlsAnalysis::default()
        };
        let (score, breakdown) = calculate_security_score(&analysis, &tls);
        assert_eq!(score, 0);
        assert_eq!(breakdown.headers, 0);
        assert_eq!(breakdown.ssl, 30 - 3 - 10);
    }

    #[test]
    fn tls_penalties_charge_the_ssl_category() {
        let tls = TlsAnalysis {
            weak_ciphers: vec!["DES-CBC3-SHA".into(), "RC4-SHA".into()],
            compression_enabled: true,
            ..TlsAnalysis::default()
        };
        let (score, breakdown) = calculate_security_score(&HeaderAnalysis::default(), &tls);
        assert_eq!(score, 100 - 6 - 10);
        assert_eq!(breakdown.ssl, 30 - 6 - 10);
    }

    #[test]
    fn failed_tls_probe_contributes_zero_penalty() {
        let tls = TlsAnalysis {
            error: Some("TLS Handshake Error: timed out".to_string()),
            ..TlsAnalysis::default()
        };
        let (score, breakdown) = calculate_security_score(&analysis_missing(2), &tls);
        assert_eq!(score, 94);
        assert_eq!(breakdown.ssl, 30);
    }

    #[test]
    fn wordpress_issues_charge_their_own_category() {
        let analysis = HeaderAnalysis {
            wordpress_issues: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            ..HeaderAnalysis::default()
        };
        let (score, breakdown) = calculate_security_score(&analysis, &TlsAnalysis::default());
        assert_eq!(score, 92);
        assert_eq!(breakdown.wordpress, 0); // 5 - 8, floored
    }

    #[test]
    fn risk_level_boundaries_are_closed_on_the_higher_tier() {
        assert_eq!(RiskLevel::from_score(39), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Low);
    }
}
