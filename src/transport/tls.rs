//! Outbound TLS with optional certificate pinning.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tracing::info;

use crate::error::TransportError;

/// Accepts any server certificate. Only used when `verify_cert = false`.
#[derive(Debug)]
pub struct DangerousNoVerifier;

impl ServerCertVerifier for DangerousNoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, tokio_rustls::rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
        ]
    }
}

/// Colon-separated uppercase SHA-256 of a DER certificate.
pub fn fingerprint(cert: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(cert);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Rewrites a pin into the form [`fingerprint`] produces.
///
/// Separators (`:`, `-`, spaces) are optional, so `abcdef`, `ab-cd ef` and
/// `AB:CD:EF` all name the same pin.
pub fn normalize_fingerprint(pin: &str) -> String {
    let hex: Vec<char> = pin
        .chars()
        .filter(|c| !matches!(c, ':' | '-') && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    hex.chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
}

fn client_config(verify_cert: bool) -> ClientConfig {
    if verify_cert {
        let mut roots = RootCertStore::empty();
        let certs = rustls_native_certs::load_native_certs();
        for cert in certs.certs {
            if let Err(e) = roots.add(cert) {
                tracing::warn!(error = %e, "Failed to add root cert");
            }
        }
        for e in &certs.errors {
            tracing::warn!(error = %e, "Error loading native certs");
        }
        ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth()
    } else {
        ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(DangerousNoVerifier))
            .with_no_client_auth()
    }
}

/// Upgrades a TCP stream to TLS.
///
/// Handshake and pin failures are reported as [`TransportErrorKind::Other`]
/// so they never disable the server.
///
/// [`TransportErrorKind::Other`]: crate::error::TransportErrorKind::Other
pub async fn upgrade_to_tls(
    tcp_stream: TcpStream,
    hostname: &str,
    verify_cert: bool,
    cert_fingerprint: Option<&str>,
) -> Result<TlsStream<TcpStream>, TransportError> {
    let connector = TlsConnector::from(Arc::new(client_config(verify_cert)));
    let server_name =
        ServerName::try_from(hostname.to_string()).map_err(TransportError::other)?;

    let tls_stream = connector
        .connect(server_name, tcp_stream)
        .await
        .map_err(TransportError::other)?;

    if let Some(expected) = cert_fingerprint {
        let expected = normalize_fingerprint(expected);
        let (_, conn) = tls_stream.get_ref();
        let actual = conn
            .peer_certificates()
            .and_then(|certs| certs.first())
            .map(|cert| fingerprint(cert.as_ref()))
            .ok_or_else(|| TransportError::other("server presented no certificate"))?;

        if actual != expected {
            tracing::error!(
                hostname = %hostname,
                expected = %expected,
                actual = %actual,
                "Certificate fingerprint mismatch!"
            );
            return Err(TransportError::other("certificate fingerprint mismatch"));
        }
        info!(hostname = %hostname, fingerprint = %actual, "Certificate fingerprint verified");
    }

    info!(hostname = %hostname, verify = verify_cert, "TLS handshake completed");
    Ok(tls_stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_format() {
        let fp = fingerprint(b"certificate");
        assert_eq!(fp.len(), 32 * 3 - 1);
        assert!(fp.split(':').all(|b| b.len() == 2));
        assert_eq!(fp, fp.to_uppercase());
    }

    #[test]
    fn test_normalize_fingerprint_spellings() {
        assert_eq!(normalize_fingerprint("ab-cd ef"), "AB:CD:EF");
        assert_eq!(normalize_fingerprint(" AB:CD "), "AB:CD");
    }

    #[test]
    fn test_bare_hex_pin_matches_fingerprint() {
        let fp = fingerprint(b"certificate");
        let bare = fp.replace(':', "").to_lowercase();
        assert_eq!(normalize_fingerprint(&bare), fp);
        assert_eq!(normalize_fingerprint(&fp), fp);
    }
}
