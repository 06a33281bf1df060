// src/core/probe/tls_probe.rs

use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use native_tls::TlsConnector;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, warn};
use x509_parser::prelude::*;

use crate::core::models::{CertificateInfo, ProtocolSupport, TlsFacts};

const TLS_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probes the target's TLS endpoint on port 443 and extracts session facts.
///
/// Certificate problems are data, not failures: the certificate handshake
/// accepts invalid certificates and reports validity through
/// [`CertificateInfo::is_valid`]. Only transport-level failures surface as
/// `Err`, which the evaluator turns into an error-only analysis.
pub async fn probe_tls(host: &str) -> Result<TlsFacts, String> {
    info!(host, "Starting TLS probe.");

    let host_owned = host.to_string();
    debug!("Spawning blocking task for certificate handshake.");
    let cert_task = spawn_blocking(move || probe_certificate(&host_owned));

    // Certificate extraction and session negotiation run as two independent
    // handshakes; the second supplies the negotiated protocol and cipher.
    let (cert_result, session_result) = tokio::join!(cert_task, probe_session(host));

    let certificate = cert_result.unwrap_or_else(|e| {
        error!(panic = %e, "Blocking TLS probe task panicked!");
        Err(format!("Task panicked: {e}"))
    })?;

    let (protocols, negotiated_cipher) = match session_result {
        Ok(session) => session,
        Err(e) => {
            // Transport already proved reachable above; treat a refused
            // trust negotiation as missing session facts, not a probe failure.
            warn!(host, error = %e, "Session negotiation failed, protocol facts unavailable.");
            (ProtocolSupport::default(), None)
        }
    };

    info!(host, "TLS probe finished.");
    Ok(TlsFacts {
        certificate,
        protocols,
        shared_ciphers: negotiated_cipher.into_iter().collect(),
        // Neither backend ever negotiates TLS-level compression.
        compression_enabled: false,
        ocsp_stapling: false,
    })
}

/// Blocking handshake that retrieves and parses the peer certificate.
fn probe_certificate(host: &str) -> Result<Option<CertificateInfo>, String> {
    debug!(host, "Performing TLS connection and certificate handshake.");

    let connector = TlsConnector::builder()
        // Invalid certificates must still be observable as facts.
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to create TlsConnector");
            format!("TlsConnector Error: {e}")
        })?;

    let addr = (host, 443)
        .to_socket_addrs()
        .map_err(|e| format!("DNS resolution failed: {e}"))?
        .next()
        .ok_or_else(|| format!("No address found for {host}"))?;

    debug!(host, "Connecting TCP stream to port 443.");
    let stream = TcpStream::connect_timeout(&addr, TLS_CONNECT_TIMEOUT).map_err(|e| {
        error!(error = %e, "TCP connection failed");
        format!("TCP Connection Error: {e}")
    })?;
    stream
        .set_read_timeout(Some(TLS_HANDSHAKE_TIMEOUT))
        .and_then(|_| stream.set_write_timeout(Some(TLS_HANDSHAKE_TIMEOUT)))
        .map_err(|e| format!("Socket configuration error: {e}"))?;

    debug!(host, "Performing TLS handshake.");
    let stream = connector.connect(host, stream).map_err(|e| {
        error!(error = %e, "TLS handshake failed");
        format!("TLS Handshake Error: {e}")
    })?;

    let cert = match stream.peer_certificate() {
        Ok(Some(c)) => c,
        Ok(None) => {
            debug!("TLS connection successful, but no peer certificate provided.");
            return Ok(None);
        }
        Err(e) => {
            error!(error = %e, "Failed to retrieve peer certificate from stream");
            return Err(format!("Could not get peer certificate: {e}"));
        }
    };

    let cert_der = cert
        .to_der()
        .map_err(|e| format!("Could not convert certificate to DER: {e}"))?;

    let (_, x509) = parse_x509_certificate(&cert_der).map_err(|e| {
        error!(error = %e, "Failed to parse X.509 certificate");
        format!("X.509 Parse Error: {e}")
    })?;

    info!(subject = %x509.subject(), issuer = %x509.issuer(), "Successfully parsed certificate.");

    let validity = x509.validity();
    let not_before = asn1_time_to_chrono_utc(&validity.not_before);
    let not_after = asn1_time_to_chrono_utc(&validity.not_after);
    let now = Utc::now();

    Ok(Some(CertificateInfo {
        subject: x509.subject().to_string(),
        issuer: x509.issuer().to_string(),
        serial_number: x509.raw_serial_as_string(),
        not_before,
        not_after,
        days_until_expiry: not_after.signed_duration_since(now).num_days(),
        signature_algorithm: x509.signature_algorithm.algorithm.to_id_string(),
        is_valid: now > not_before && now < not_after,
    }))
}

/// Verified handshake that reports the negotiated protocol and cipher suite.
async fn probe_session(host: &str) -> Result<(ProtocolSupport, Option<String>), String> {
    let _ = rustls::crypto::ring::default_provider().install_default();

    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let connector = tokio_rustls::TlsConnector::from(Arc::new(config));

    let server_name = rustls::pki_types::ServerName::try_from(host.to_string())
        .map_err(|e| format!("Invalid server name: {e}"))?;

    let stream = tokio::time::timeout(
        TLS_CONNECT_TIMEOUT,
        tokio::net::TcpStream::connect((host, 443)),
    )
    .await
    .map_err(|_| "TCP connection timed out".to_string())?
    .map_err(|e| format!("TCP Connection Error: {e}"))?;

    let tls_stream = tokio::time::timeout(TLS_HANDSHAKE_TIMEOUT, connector.connect(server_name, stream))
        .await
        .map_err(|_| "TLS handshake timed out".to_string())?
        .map_err(|e| format!("TLS Handshake Error: {e}"))?;

    let (_, connection) = tls_stream.into_inner();

    let protocols = ProtocolSupport {
        tlsv1_2: matches!(
            connection.protocol_version(),
            Some(rustls::ProtocolVersion::TLSv1_2)
        ),
        tlsv1_3: matches!(
            connection.protocol_version(),
            Some(rustls::ProtocolVersion::TLSv1_3)
        ),
        ..ProtocolSupport::default()
    };
    let cipher = connection
        .negotiated_cipher_suite()
        .map(|suite| format!("{:?}", suite.suite()));

    debug!(host, ?cipher, "Session negotiation completed.");
    Ok((protocols, cipher))
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}
