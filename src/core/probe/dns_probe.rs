// src/core/probe/dns_probe.rs

use tracing::{debug, info, warn};

use crate::core::models::{DkimRecord, DmarcData, DnsFacts, DnssecData, ScanResult, SpfData};
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::RecordType;

/// DKIM selectors to try when the real one is not known.
const COMMON_DKIM_SELECTORS: &[&str] = &["google", "selector1", "selector2", "default", "dkim"];

/// Runs the deep-scan DNS checks: DNSSEC, SPF, DMARC, DKIM and MX.
///
/// All lookups run concurrently. Each sub-check reports found / not-found /
/// unknown on its own, so one failing lookup never contaminates the rest.
pub async fn probe_dns(domain: &str) -> DnsFacts {
    // Query the root domain; these record types live there, not on "www.".
    let root_domain = domain.strip_prefix("www.").unwrap_or(domain);

    info!(domain = %root_domain, "Starting DNS probe.");

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    let (dnssec, spf, dmarc, dkim, mx) = tokio::join!(
        lookup_dnssec(&resolver, root_domain),
        lookup_spf(&resolver, root_domain),
        lookup_dmarc(&resolver, root_domain),
        lookup_dkim(&resolver, root_domain),
        lookup_mx(&resolver, root_domain),
    );

    info!(domain = %root_domain, "DNS probe finished.");
    DnsFacts {
        dnssec,
        spf,
        dmarc,
        dkim,
        mx,
    }
}

/// Maps a resolver error to either a clean "not found" or an unknown state
/// carrying the reason. The two must stay distinguishable downstream.
fn absent_or_unknown<T>(domain: &str, e: ResolveError) -> ScanResult<T> {
    match e.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => Ok(None),
        _ => {
            warn!(domain, error = %e, "DNS lookup failed.");
            Err(format!("DNS Error: {e}"))
        }
    }
}

/// DNSSEC presence via DNSKEY records at the zone apex.
async fn lookup_dnssec(resolver: &TokioAsyncResolver, domain: &str) -> ScanResult<DnssecData> {
    debug!(domain, "Looking up DNSKEY records.");
    match resolver.lookup(domain, RecordType::DNSKEY).await {
        Ok(lookup) => {
            let key_count = lookup.iter().count();
            if key_count == 0 {
                return Ok(None);
            }
            debug!(domain, key_count, "DNSKEY records found.");
            Ok(Some(DnssecData { key_count }))
        }
        Err(e) => absent_or_unknown(domain, e),
    }
}

/// SPF lives in a TXT record starting with "v=spf1".
async fn lookup_spf(resolver: &TokioAsyncResolver, domain: &str) -> ScanResult<SpfData> {
    debug!(domain, "Looking up SPF record.");
    match resolver.txt_lookup(domain).await {
        Ok(txt_records) => {
            for record in txt_records.iter() {
                let record_str = record.to_string();
                if record_str.starts_with("v=spf1") {
                    debug!(record = %record_str, "SPF record found.");
                    return Ok(Some(SpfData { record: record_str }));
                }
            }
            debug!(domain, "No SPF record found among TXT records.");
            Ok(None)
        }
        Err(e) => absent_or_unknown(domain, e),
    }
}

/// DMARC lives in a TXT record at the `_dmarc` subdomain; the `p=` tag is
/// parsed out as the policy.
async fn lookup_dmarc(resolver: &TokioAsyncResolver, domain: &str) -> ScanResult<DmarcData> {
    let dmarc_domain = format!("_dmarc.{domain}");
    debug!(domain = %dmarc_domain, "Looking up DMARC record.");
    match resolver.txt_lookup(&dmarc_domain).await {
        Ok(txt_records) => {
            if let Some(record) = txt_records.iter().next() {
                let record_str = record.to_string();
                debug!(record = %record_str, "DMARC record found.");
                let policy = record_str
                    .split(';')
                    .find(|s| s.trim().starts_with("p="))
                    .and_then(|s| s.trim().split('=').nth(1))
                    .map(|s| s.to_string());
                return Ok(Some(DmarcData {
                    record: record_str,
                    policy,
                }));
            }
            Ok(None)
        }
        Err(e) => absent_or_unknown(&dmarc_domain, e),
    }
}

/// Tries the common DKIM selectors at `<selector>._domainkey.<domain>`.
/// Selectors that simply do not exist are expected and not an error.
async fn lookup_dkim(resolver: &TokioAsyncResolver, domain: &str) -> ScanResult<Vec<DkimRecord>> {
    debug!(domain, "Looking up DKIM records for common selectors.");
    let mut found_records = Vec::new();
    let mut last_failure: Option<String> = None;

    for selector in COMMON_DKIM_SELECTORS {
        let dkim_domain = format!("{selector}._domainkey.{domain}");
        match resolver.txt_lookup(&dkim_domain).await {
            Ok(txt_records) => {
                for record in txt_records.iter() {
                    let record_str = record.to_string();
                    if record_str.starts_with("v=DKIM1") {
                        debug!(selector, "Found valid DKIM record.");
                        found_records.push(DkimRecord {
                            selector: selector.to_string(),
                            record: record_str,
                        });
                    }
                }
            }
            Err(e) => {
                if !matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) {
                    warn!(selector, domain = %dkim_domain, error = %e, "DKIM lookup failed.");
                    last_failure = Some(format!("DNS Error: {e}"));
                }
            }
        }
    }

    if !found_records.is_empty() {
        info!(count = found_records.len(), "Found DKIM records.");
        Ok(Some(found_records))
    } else if let Some(reason) = last_failure {
        // Nothing found and at least one lookup genuinely failed: unknown.
        Err(reason)
    } else {
        debug!(domain, "No DKIM records found for any common selector.");
        Ok(None)
    }
}

/// Mail exchanger hosts for the domain.
async fn lookup_mx(resolver: &TokioAsyncResolver, domain: &str) -> ScanResult<Vec<String>> {
    debug!(domain, "Looking up MX records.");
    match resolver.mx_lookup(domain).await {
        Ok(mx_lookup) => {
            let records: Vec<String> = mx_lookup.iter().map(|mx| mx.exchange().to_string()).collect();
            if records.is_empty() {
                return Ok(None);
            }
            info!(count = records.len(), "Found MX records.");
            Ok(Some(records))
        }
        Err(e) => absent_or_unknown(domain, e),
    }
}
