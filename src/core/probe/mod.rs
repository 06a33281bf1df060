// src/core/probe/mod.rs

// Network-facing collaborators. Everything in here does I/O; the rule
// engines under `analyzer` never touch these modules directly and only see
// the facts they return.
pub mod dns_probe;
pub mod http_probe;
pub mod tls_probe;
