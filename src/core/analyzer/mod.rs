// src/core/analyzer/mod.rs

// Rule engines and the orchestrator that sequences them. Everything except
// the orchestrator itself is a pure function over probed facts.
pub mod headers;
pub mod recommendations;
pub mod scoring;
pub mod tls;
pub mod wordpress;

use chrono::Utc;
use tracing::{debug, info};
use url::Url;

use crate::core::models::{AnalysisResult, RiskLevel, ScanConfig};
use crate::core::probe::{dns_probe, http_probe, tls_probe};
use crate::error::{Result, ScanError};
use crate::narrative::Narrator;

/// Per-scan switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Ask the narrative service for a prose summary of the findings.
    pub include_narrative: bool,
    /// Additionally run the DNS checks (DNSSEC, SPF, DKIM, DMARC, MX).
    pub deep_scan: bool,
}

/// Sequences probes and rule engines for one scan and assembles the result.
///
/// Holds no mutable state: a single `Analyzer` can serve any number of
/// concurrent scans.
pub struct Analyzer {
    config: ScanConfig,
    narrator: Narrator,
}

impl Analyzer {
    pub fn new(config: ScanConfig, narrator: Narrator) -> Self {
        Self { config, narrator }
    }

    /// Runs a full scan of `raw_url`.
    ///
    /// The HTTP fetch is mandatory and aborts the scan on failure. The TLS
    /// and DNS probes degrade into the result data instead: a failed TLS
    /// handshake becomes an error-only analysis, a failed DNS sub-check
    /// becomes an unknown-state entry. Narrative failures degrade to an
    /// inline placeholder string.
    pub async fn analyze(&self, raw_url: &str, options: ScanOptions) -> Result<AnalysisResult> {
        let (url, host) = normalize_target(raw_url)?;
        info!(url = %url, deep_scan = options.deep_scan, "Starting scan.");

        // The three probes are independent; issue them together and join
        // before any scoring happens.
        let (fetch_result, tls_result, dns_facts) = tokio::join!(
            http_probe::fetch_headers_and_body(&url, &self.config),
            tls_probe::probe_tls(&host),
            async {
                if options.deep_scan {
                    Some(dns_probe::probe_dns(&host).await)
                } else {
                    None
                }
            },
        );

        let fetched = fetch_result?;

        let mut header_analysis = headers::analyze_headers(&fetched.headers);
        if wordpress::detect_wordpress(&fetched.headers, &fetched.body) {
            header_analysis.wordpress_issues =
                Some(wordpress::analyze_wordpress(&fetched.headers, &fetched.body));
        }

        let tls_analysis = tls::analyze_tls(tls_result);

        let (security_score, score_breakdown) =
            scoring::calculate_security_score(&header_analysis, &tls_analysis);
        let risk_level = RiskLevel::from_score(security_score);
        let recs = recommendations::build_recommendations(&header_analysis, &tls_analysis);
        let (passed_checks, failed_checks) =
            recommendations::categorize_checks(&header_analysis, &tls_analysis);

        let mut result = AnalysisResult {
            url,
            status_code: fetched.status_code,
            security_score,
            score_breakdown,
            headers: fetched.headers,
            analysis: header_analysis,
            ssl: tls_analysis,
            dns: dns_facts,
            recommendations: recs,
            passed_checks,
            failed_checks,
            risk_level,
            timestamp: Utc::now(),
            narrative: None,
        };

        if options.include_narrative {
            result.narrative = Some(match self.narrator.generate(&result).await {
                Ok(text) => text,
                Err(reason) => {
                    debug!(%reason, "Narrative generation degraded to placeholder.");
                    format!("narrative unavailable: {reason}")
                }
            });
        }

        info!(
            score = result.security_score,
            risk = %result.risk_level,
            "Scan finished."
        );
        Ok(result)
    }
}

/// Defaults the scheme to https and extracts the host used by the TLS and
/// DNS probes.
fn normalize_target(raw: &str) -> Result<(String, String)> {
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let parsed =
        Url::parse(&with_scheme).map_err(|e| ScanError::InvalidUrl(format!("{raw}: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ScanError::InvalidUrl(format!("{raw}: no host")))?
        .to_string();

    Ok((with_scheme, host))
}
