//! Error types for the scanner.
//!
//! Only two kinds are fatal to a scan: the mandatory HTTP fetch failing and
//! an unexpected analysis failure. TLS and DNS probe failures degrade into
//! the result data instead (see the `error` field on `TlsAnalysis` and the
//! per-check results on `DnsFacts`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The HTTP fetch of the target could not complete: DNS failure,
    /// connection refused, timeout, or a non-success status.
    #[error("Request to target website failed: {0}")]
    RequestFailed(String),

    /// Rule evaluation or scoring failed after a successful fetch.
    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("Invalid target URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, ScanError>;
