use std::sync::Arc;

use rustls::ServerConfig;
use rustls::pki_types::{
    CertificateDer, PrivateKeyDer, PrivatePkcs1KeyDer, PrivatePkcs8KeyDer, PrivateSec1KeyDer,
};

use crate::cert::Certificate;
use crate::error::{FixtureError, Result};
use crate::generate::{generate_ec_pair, generate_rsa_pair};
use crate::key::KeyPair;
use crate::pem_utils::{self, PemLabel};

/// A certificate chain paired with its private key, ready for a TLS stack.
#[derive(Debug)]
pub struct TlsCredential {
    cert_chain: Vec<CertificateDer<'static>>,
    private_key: PrivateKeyDer<'static>,
    leaf: Certificate,
}

impl TlsCredential {
    /// Pairs PEM certificate text with PEM key text.
    ///
    /// Every `CERTIFICATE` block in `cert_pem` joins the chain, leaf first.
    /// The first private key block in `key_pem` is used; other blocks, such
    /// as a leading `EC PARAMETERS`, are skipped.
    pub fn from_pem(cert_pem: &str, key_pem: &str) -> Result<Self> {
        let cert_chain: Vec<CertificateDer<'static>> = pem_utils::parse_blocks(cert_pem)?
            .into_iter()
            .filter(|b| b.tag() == PemLabel::Certificate.as_str())
            .map(|b| CertificateDer::from(b.into_contents()))
            .collect();
        let Some(leaf_der) = cert_chain.first() else {
            return Err(FixtureError::MalformedPem(
                "no CERTIFICATE block in certificate input".to_string(),
            ));
        };
        let leaf = Certificate::from_der(leaf_der)?;

        let (private_key, key_pair) = parse_private_key(key_pem)?;

        let cert_spki = leaf.public_key_der()?;
        let key_spki = der::Encode::to_der(&key_pair.as_spki()?)?;
        if cert_spki != key_spki {
            return Err(FixtureError::KeyCertificateMismatch);
        }

        log::debug!(
            "assembled TLS credential for {:?} ({} certificate(s))",
            leaf.common_name(),
            cert_chain.len()
        );
        Ok(Self {
            cert_chain,
            private_key,
            leaf,
        })
    }

    pub fn cert_chain(&self) -> &[CertificateDer<'static>] {
        &self.cert_chain
    }

    pub fn private_key(&self) -> &PrivateKeyDer<'static> {
        &self.private_key
    }

    /// The parsed leaf certificate.
    pub fn leaf(&self) -> &Certificate {
        &self.leaf
    }

    /// A rustls server configuration presenting this credential, without
    /// client authentication.
    pub fn server_config(&self) -> Result<ServerConfig> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_no_client_auth()
            .with_single_cert(self.cert_chain.clone(), self.private_key.clone_key())?;
        Ok(config)
    }
}

fn parse_private_key(key_pem: &str) -> Result<(PrivateKeyDer<'static>, KeyPair)> {
    for block in pem_utils::parse_blocks(key_pem)? {
        let contents = block.contents();
        let parsed = match block.tag() {
            "RSA PRIVATE KEY" => (
                PrivateKeyDer::Pkcs1(PrivatePkcs1KeyDer::from(contents.to_vec())),
                KeyPair::import_pkcs1_der(contents)?,
            ),
            "EC PRIVATE KEY" => (
                PrivateKeyDer::Sec1(PrivateSec1KeyDer::from(contents.to_vec())),
                KeyPair::import_sec1_der(contents)?,
            ),
            "PRIVATE KEY" => (
                PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(contents.to_vec())),
                KeyPair::import_pkcs8_der(contents)?,
            ),
            other => {
                log::trace!("skipping {other} block in key input");
                continue;
            }
        };
        return Ok(parsed);
    }
    Err(FixtureError::MalformedPem(
        "no private key block in key input".to_string(),
    ))
}

/// Generate an RSA pair for `common_name` and load it as a TLS credential.
pub fn build_tls_credential(common_name: &str) -> Result<TlsCredential> {
    let (key_pem, cert_pem) = generate_rsa_pair(common_name)?;
    TlsCredential::from_pem(&cert_pem, &key_pem)
}

/// Generate an EC pair for `common_name` and load it as a TLS credential.
pub fn build_ec_tls_credential(common_name: &str) -> Result<TlsCredential> {
    let (key_pem, cert_pem) = generate_ec_pair(common_name)?;
    TlsCredential::from_pem(&cert_pem, &key_pem)
}
