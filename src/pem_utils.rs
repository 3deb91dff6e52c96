use std::fmt;

use crate::error::{FixtureError, Result};

/// PEM labels emitted by the fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PemLabel {
    Certificate,
    RsaPrivateKey,
    EcPrivateKey,
    EcParameters,
}

impl PemLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PemLabel::Certificate => "CERTIFICATE",
            PemLabel::RsaPrivateKey => "RSA PRIVATE KEY",
            PemLabel::EcPrivateKey => "EC PRIVATE KEY",
            PemLabel::EcParameters => "EC PARAMETERS",
        }
    }
}

impl fmt::Display for PemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
///
/// Lines are LF terminated and the body wraps at 64 columns.
pub fn der_to_pem(der: &[u8], label: PemLabel) -> String {
    let pem = pem::Pem::new(label.as_str(), der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Split concatenated PEM text into its blocks, in order.
pub fn parse_blocks(text: &str) -> Result<Vec<pem::Pem>> {
    let blocks = pem::parse_many(text)?;
    if blocks.is_empty() {
        return Err(FixtureError::MalformedPem("no PEM blocks found".to_string()));
    }
    Ok(blocks)
}
