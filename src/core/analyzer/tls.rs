// src/core/analyzer/tls.rs

use tracing::{debug, warn};

use crate::core::models::{TlsAnalysis, TlsFacts};
use crate::core::policy::WEAK_CIPHER_SUBSTRINGS;

/// Evaluates probed TLS session facts against the cipher/compression policy.
///
/// A failed probe produces an analysis whose only populated field is `error`;
/// weak-cipher and compression state are left at their defaults because no
/// trustworthy data exists for them. The scoring engine relies on those
/// defaults: TLS contributes zero penalty under probe failure.
pub fn analyze_tls(probe: Result<TlsFacts, String>) -> TlsAnalysis {
    match probe {
        Ok(facts) => {
            let weak_ciphers = find_weak_ciphers(&facts.shared_ciphers);
            debug!(
                ciphers = facts.shared_ciphers.len(),
                weak = weak_ciphers.len(),
                "TLS facts evaluated."
            );
            TlsAnalysis {
                certificate: facts.certificate,
                protocols: facts.protocols,
                supported_ciphers: facts.shared_ciphers,
                weak_ciphers,
                compression_enabled: facts.compression_enabled,
                ocsp_stapling: facts.ocsp_stapling,
                error: None,
            }
        }
        Err(reason) => {
            warn!(error = %reason, "TLS probe failed, reporting error-only analysis.");
            TlsAnalysis {
                error: Some(reason),
                ..TlsAnalysis::default()
            }
        }
    }
}

/// A cipher is weak when its lower-cased name contains any banned substring.
fn find_weak_ciphers(ciphers: &[String]) -> Vec<String> {
    ciphers
        .iter()
        .filter(|c| {
            let lowered = c.to_lowercase();
            WEAK_CIPHER_SUBSTRINGS.iter().any(|w| lowered.contains(w))
        })
        .cloned()
        .collect()
}
