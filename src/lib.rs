//! Website security posture scanner.
//!
//! Fetches a target's HTTP response, TLS session and (optionally) DNS
//! records, evaluates them against a fixed header/cipher policy, and derives
//! a 0-100 security score, a risk tier, and an ordered set of findings and
//! remediation recommendations.

pub mod core;
pub mod error;
pub mod logging;
pub mod narrative;
