// src/core/mod.rs

// Root of the `core` module, exposing its sub-modules to the crate.

/// Data structures shared across the crate: header/TLS/DNS facts, analysis
/// outputs, the score breakdown and the root `AnalysisResult` aggregate.
pub mod models;

/// Static policy data the rule engines evaluate against: canonical header
/// lists, CSP directive lists, weak-cipher substrings, CMS fingerprints.
pub mod policy;

/// Network probes: the HTTP fetch, the TLS handshake and the DNS lookups.
pub mod probe;

/// Rule engines, scoring and the scan orchestrator.
pub mod analyzer;
