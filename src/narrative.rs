//! Narrative report generation through an external text-generation service.
//!
//! The capability is injected into the orchestrator as an explicit value:
//! [`Narrator::Disabled`] is a first-class state, not a nullable client, so
//! callers can always tell "never configured" from "call failed".

use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::core::models::AnalysisResult;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const NARRATIVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Narrative-generation capability handed to the orchestrator.
#[derive(Debug, Clone)]
pub enum Narrator {
    /// No narrative service configured.
    Disabled,
    Gemini(GeminiNarrator),
}

impl Narrator {
    /// Builds a narrator from an optional API key.
    pub fn from_api_key(api_key: Option<String>) -> Self {
        match api_key {
            Some(key) if !key.is_empty() => {
                info!("Narrative generation enabled.");
                Narrator::Gemini(GeminiNarrator::new(key))
            }
            _ => Narrator::Disabled,
        }
    }

    /// Produces a narrative for a finished scan. Callers are expected to
    /// degrade an `Err` into an inline placeholder rather than failing the
    /// scan.
    pub async fn generate(&self, result: &AnalysisResult) -> Result<String, String> {
        match self {
            Narrator::Disabled => Err("narrative client disabled".to_string()),
            Narrator::Gemini(narrator) => narrator.generate(result).await,
        }
    }
}

/// Client for Google's Gemini generateContent endpoint.
#[derive(Debug, Clone)]
pub struct GeminiNarrator {
    api_key: String,
    model: String,
}

impl GeminiNarrator {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    async fn generate(&self, result: &AnalysisResult) -> Result<String, String> {
        let prompt = build_prompt(result);
        debug!(model = %self.model, "Requesting narrative generation.");

        let client = reqwest::Client::builder()
            .timeout(NARRATIVE_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        let url = format!(
            "{GEMINI_ENDPOINT}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = client.post(&url).json(&body).send().await.map_err(|e| {
            error!(error = %e, "Narrative request failed.");
            format!("narrative request failed: {e}")
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Narrative service returned an error status.");
            return Err(format!("narrative service returned status {status}"));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("narrative response was not valid JSON: {e}"))?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| "narrative response contained no text".to_string())
    }
}

/// Assembles the findings summary the model is asked to narrate.
fn build_prompt(result: &AnalysisResult) -> String {
    let join_or_none = |items: &[String]| -> String {
        if items.is_empty() {
            "None".to_string()
        } else {
            items.join(", ")
        }
    };

    let wordpress_issues = result
        .analysis
        .wordpress_issues
        .as_deref()
        .unwrap_or_default();
    let ssl_issues = result.ssl.error.as_deref().unwrap_or("None");

    format!(
        "Analyze these website security scan results and provide a comprehensive security assessment:\n\
         \n\
         URL: {url}\n\
         Security Score: {score}/100\n\
         Risk Level: {risk}\n\
         \n\
         Key Findings:\n\
         - Missing Headers: {missing}\n\
         - Deprecated Headers: {deprecated}\n\
         - CSP Issues: {csp}\n\
         - WordPress Issues: {wordpress}\n\
         - SSL Issues: {ssl}\n\
         \n\
         Passed Checks:\n{passed}\n\
         \n\
         Failed Checks:\n{failed}\n\
         \n\
         Recommendations:\n{recommendations}\n\
         \n\
         Provide your analysis in this format:\n\
         1. Executive Summary\n\
         2. Critical Vulnerabilities\n\
         3. Security Header Analysis\n\
         4. WordPress-Specific Risks (if applicable)\n\
         5. SSL/TLS Configuration Review\n\
         6. Actionable Recommendations\n\
         7. Overall Risk Assessment",
        url = result.url,
        score = result.security_score,
        risk = result.risk_level,
        missing = join_or_none(&result.analysis.missing_essential),
        deprecated = join_or_none(&result.analysis.deprecated),
        csp = join_or_none(&result.analysis.csp_issues),
        wordpress = join_or_none(wordpress_issues),
        ssl = ssl_issues,
        passed = result.passed_checks.join("\n"),
        failed = result.failed_checks.join("\n"),
        recommendations = result.recommendations.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{
        HeaderAnalysis, HeaderSet, RiskLevel, ScoreBreakdown, TlsAnalysis,
    };
    use chrono::Utc;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            url: "https://example.com".to_string(),
            status_code: 200,
            security_score: 55,
            score_breakdown: ScoreBreakdown::default(),
            headers: HeaderSet::new(),
            analysis: HeaderAnalysis {
                missing_essential: vec!["content-security-policy".to_string()],
                ..HeaderAnalysis::default()
            },
            ssl: TlsAnalysis::default(),
            dns: None,
            recommendations: vec!["Add missing security header: content-security-policy".into()],
            passed_checks: vec!["No weak cipher suites".into()],
            failed_checks: vec!["Header missing: content-security-policy".into()],
            risk_level: RiskLevel::Medium,
            timestamp: Utc::now(),
            narrative: None,
        }
    }

    #[test]
    fn prompt_carries_score_risk_and_findings() {
        let prompt = build_prompt(&sample_result());
        assert!(prompt.contains("URL: https://example.com"));
        assert!(prompt.contains("Security Score: 55/100"));
        assert!(prompt.contains("Risk Level: Medium"));
        assert!(prompt.contains("- Missing Headers: content-security-policy"));
        assert!(prompt.contains("- Deprecated Headers: None"));
        assert!(prompt.contains("Header missing: content-security-policy"));
    }

    #[tokio::test]
    async fn disabled_narrator_reports_explicitly() {
        let err = Narrator::Disabled
            .generate(&sample_result())
            .await
            .unwrap_err();
        assert_eq!(err, "narrative client disabled");
    }
}
