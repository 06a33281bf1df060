// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// --- Reusable Result Types ---
// A sub-check outcome that distinguishes "found" (Ok(Some)), "not found"
// (Ok(None)) and "could not determine" (Err with the reason). Used by the DNS
// probe so silent lookup failures never masquerade as true negatives.
pub type ScanResult<T> = Result<Option<T>, String>;

/// HTTP response headers as observed on one response: lower-cased name to
/// value, last write wins on duplicates. Immutable once captured.
pub type HeaderSet = BTreeMap<String, String>;

// --- Scan Configuration ---

/// Tunables shared by every probe issued for one scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Timeout for the mandatory HTTP fetch.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: "AegisRS/0.1".to_string(),
        }
    }
}

// --- Header Analysis Models ---

/// Informational presence checks for less common hardening headers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdditionalHeaders {
    pub clear_site_data: bool,
    pub report_to: bool,
    pub feature_policy: bool,
    pub expect_ct: bool,
}

/// Per-header booleans against the OWASP secure headers baseline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwaspCompliance {
    pub content_security_policy: bool,
    pub x_content_type_options: bool,
    pub x_frame_options: bool,
    pub strict_transport_security: bool,
    pub x_xss_protection: bool,
    pub referrer_policy: bool,
    pub permissions_policy: bool,
    pub cross_origin_opener_policy: bool,
    pub cross_origin_embedder_policy: bool,
    pub cross_origin_resource_policy: bool,
}

/// Result of evaluating the header policy rule set over one [`HeaderSet`].
///
/// Every list preserves rule-evaluation order; callers rely on that order for
/// display priority and must never re-sort these fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderAnalysis {
    pub missing_essential: Vec<String>,
    pub deprecated: Vec<String>,
    pub csp_issues: Vec<String>,
    pub cookie_issues: Vec<String>,
    pub cors_issues: Vec<String>,
    pub hsts_issues: Vec<String>,
    /// Present only when WordPress fingerprint detection fired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordpress_issues: Option<Vec<String>>,
    pub additional_headers: AdditionalHeaders,
    pub owasp_compliance: OwaspCompliance,
}

// --- TLS Models ---

/// Summary of the server certificate presented during the TLS handshake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificateInfo {
    pub subject: String,
    pub issuer: String,
    pub serial_number: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub days_until_expiry: i64,
    pub signature_algorithm: String,
    pub is_valid: bool,
}

/// Which protocol versions the server negotiated. Legacy protocols are
/// reported `false` rather than probed for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtocolSupport {
    pub sslv2: bool,
    pub sslv3: bool,
    pub tlsv1_0: bool,
    pub tlsv1_1: bool,
    pub tlsv1_2: bool,
    pub tlsv1_3: bool,
}

/// Raw facts extracted from one TLS session, before any policy evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TlsFacts {
    pub certificate: Option<CertificateInfo>,
    pub protocols: ProtocolSupport,
    pub shared_ciphers: Vec<String>,
    pub compression_enabled: bool,
    pub ocsp_stapling: bool,
}

/// Outcome of evaluating [`TlsFacts`] against the cipher/compression policy.
///
/// When `error` is set the probe itself failed: every other field is left at
/// its default and must be treated as unknown, not as a clean bill of health.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TlsAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateInfo>,
    pub protocols: ProtocolSupport,
    pub supported_ciphers: Vec<String>,
    pub weak_ciphers: Vec<String>,
    pub compression_enabled: bool,
    pub ocsp_stapling: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// --- DNS Models ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnssecData {
    pub key_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpfData {
    pub record: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DmarcData {
    pub record: String,
    pub policy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DkimRecord {
    pub selector: String,
    pub record: String,
}

/// Deep-scan DNS facts. Each sub-check carries its own found / not-found /
/// unknown state so a resolver failure on one record type never hides behind
/// the others.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnsFacts {
    pub dnssec: ScanResult<DnssecData>,
    pub spf: ScanResult<SpfData>,
    pub dmarc: ScanResult<DmarcData>,
    pub dkim: ScanResult<Vec<DkimRecord>>,
    pub mx: ScanResult<Vec<String>>,
}

impl Default for DnsFacts {
    fn default() -> Self {
        Self {
            dnssec: Ok(None),
            spf: Ok(None),
            dmarc: Ok(None),
            dkim: Ok(None),
            mx: Ok(None),
        }
    }
}

// --- Scoring Models ---

/// Informational per-category sub-budgets. Each category is floored at zero
/// independently of the composite score and never exceeds its starting
/// budget (40/30/15/10/5).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub headers: u8,
    pub ssl: u8,
    pub cookies: u8,
    pub cors: u8,
    pub wordpress: u8,
}

impl Default for ScoreBreakdown {
    fn default() -> Self {
        Self {
            headers: 40,
            ssl: 30,
            cookies: 15,
            cors: 10,
            wordpress: 5,
        }
    }
}

/// Coarse risk tier, a pure function of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Closed boundaries: exactly 40 is Medium, exactly 70 is Low.
    pub fn from_score(score: u8) -> Self {
        if score < 40 {
            RiskLevel::High
        } else if score < 70 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

// --- Root Aggregate ---

/// The complete outcome of one scan. Built once per invocation, immutable
/// afterwards; concurrent scans share nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub url: String,
    pub status_code: u16,
    pub security_score: u8,
    pub score_breakdown: ScoreBreakdown,
    pub headers: HeaderSet,
    pub analysis: HeaderAnalysis,
    pub ssl: TlsAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsFacts>,
    pub recommendations: Vec<String>,
    pub passed_checks: Vec<String>,
    pub failed_checks: Vec<String>,
    pub risk_level: RiskLevel,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}
