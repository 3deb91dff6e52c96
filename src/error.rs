//! use router_test_util::error::FixtureError;

use thiserror::Error;

/// Errors raised while building certificate fixtures.
///
/// Every variant is fatal to the fixture that produced it: nothing in this
/// crate retries or substitutes a fallback certificate.
#[derive(Debug, Error, Clone)]
pub enum FixtureError {
    /// The OS entropy source could not supply bytes.
    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    /// Key generation could not complete.
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Signing the certificate template failed.
    #[error("Certificate signing failed: {0}")]
    CertificateSigningFailed(String),

    /// The EC parameters block could not be serialized.
    #[error("Failed to encode EC parameters: {0}")]
    ParameterEncodingFailed(String),

    /// The certificate's public key does not belong to the private key.
    #[error("Private key does not match the certificate public key")]
    KeyCertificateMismatch,

    /// Input could not be parsed as PEM or the DER inside it.
    #[error("Malformed PEM: {0}")]
    MalformedPem(String),

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// The TLS stack rejected the credential.
    #[error("TLS error: {0}")]
    Tls(String),
}

pub type Result<T> = std::result::Result<T, FixtureError>;

impl From<der::Error> for FixtureError {
    fn from(err: der::Error) -> Self {
        FixtureError::EncodingError(err.to_string())
    }
}

impl From<x509_cert::spki::Error> for FixtureError {
    fn from(err: x509_cert::spki::Error) -> Self {
        FixtureError::EncodingError(err.to_string())
    }
}

impl From<pem::PemError> for FixtureError {
    fn from(err: pem::PemError) -> Self {
        FixtureError::MalformedPem(err.to_string())
    }
}

impl From<rustls::Error> for FixtureError {
    fn from(err: rustls::Error) -> Self {
        FixtureError::Tls(err.to_string())
    }
}
