pub mod extensions;
pub mod params;

use der::{Decode, Encode};
use extensions::{BasicConstraints, ToAndFromX509Extension};
use params::{CertificateTemplate, DistinguishedName, ExtensionParam, Validity};
use x509_cert::certificate::CertificateInner;

use crate::error::{FixtureError, Result};
use crate::issuer::{Issuer, SelfSigned};
use crate::key::KeyPair;
use crate::pem_utils::{self, PemLabel};

/// Represents the supported signature algorithms for certificates.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption.
    Sha256WithRSA,
    /// SHA-256 with ECDSA.
    Sha256WithECDSA,
}

impl SignatureAlgorithm {
    pub fn oid(&self) -> const_oid::ObjectIdentifier {
        match self {
            SignatureAlgorithm::Sha256WithRSA => const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
            SignatureAlgorithm::Sha256WithECDSA => const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
        }
    }

    pub fn from_oid(oid: const_oid::ObjectIdentifier) -> Option<Self> {
        match oid {
            const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION => Some(Self::Sha256WithRSA),
            const_oid::db::rfc5912::ECDSA_WITH_SHA_256 => Some(Self::Sha256WithECDSA),
            _ => None,
        }
    }
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// RSA identifiers carry an explicit NULL parameter (RFC 4055); ECDSA ones
    /// carry none (RFC 5758).
    fn from(value: SignatureAlgorithm) -> Self {
        let parameters = match value {
            SignatureAlgorithm::Sha256WithRSA => Some(der::asn1::Any::null()),
            SignatureAlgorithm::Sha256WithECDSA => None,
        };
        x509_cert::spki::AlgorithmIdentifierOwned {
            oid: value.oid(),
            parameters,
        }
    }
}

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM
/// formats, and the accessors fixtures are checked against.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Signs `template` with `key`, using the template subject as issuer.
    pub fn new_self_signed(template: &CertificateTemplate, key: &KeyPair) -> Result<Self> {
        let issuer = SelfSigned::new(template.subject.clone(), key);
        issuer.issue(template, key.as_spki()?)
    }

    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| FixtureError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate as a single `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(&self.to_der()?, PemLabel::Certificate))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)
            .map_err(|e| FixtureError::MalformedPem(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parses the first `CERTIFICATE` block in `text`.
    pub fn from_pem(text: &str) -> Result<Self> {
        let blocks = pem_utils::parse_blocks(text)?;
        let block = blocks
            .iter()
            .find(|b| b.tag() == PemLabel::Certificate.as_str())
            .ok_or_else(|| FixtureError::MalformedPem("no CERTIFICATE block".to_string()))?;
        Self::from_der(block.contents())
    }

    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    pub fn issuer(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    pub fn common_name(&self) -> Option<String> {
        self.subject().common_name
    }

    pub fn organization(&self) -> Option<String> {
        self.subject().organization
    }

    /// True when the encoded issuer and subject names are identical.
    pub fn is_self_issued(&self) -> bool {
        self.inner.tbs_certificate.issuer == self.inner.tbs_certificate.subject
    }

    pub fn validity(&self) -> Validity {
        Validity::from_x509(&self.inner.tbs_certificate.validity)
    }

    /// Length of the validity window in whole seconds.
    pub fn validity_seconds(&self) -> i64 {
        let validity = self.validity();
        (validity.not_after - validity.not_before).whole_seconds()
    }

    /// Serial number as encoded in the certificate (big-endian, may carry a
    /// leading zero octet).
    pub fn serial_number(&self) -> Vec<u8> {
        self.inner
            .tbs_certificate
            .serial_number
            .as_bytes()
            .to_vec()
    }

    pub fn signature_algorithm(&self) -> Option<SignatureAlgorithm> {
        SignatureAlgorithm::from_oid(self.inner.signature_algorithm.oid)
    }

    pub fn extensions(&self) -> Vec<ExtensionParam> {
        self.inner
            .tbs_certificate
            .extensions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|ext| ExtensionParam {
                oid: ext.extn_id,
                critical: ext.critical,
                value: ext.extn_value.as_bytes().to_vec(),
            })
            .collect()
    }

    pub fn basic_constraints(&self) -> Option<BasicConstraints> {
        self.extensions()
            .iter()
            .find(|ext| ext.oid == BasicConstraints::OID)
            .and_then(|ext| ext.to_extension().ok())
    }

    /// DER encoding of the certificate's SubjectPublicKeyInfo.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        Ok(self
            .inner
            .tbs_certificate
            .subject_public_key_info
            .to_der()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsa_cert(cn: &str) -> Certificate {
        let key = KeyPair::generate_rsa().unwrap();
        let template = CertificateTemplate::new(cn, SignatureAlgorithm::Sha256WithRSA).unwrap();
        Certificate::new_self_signed(&template, &key).unwrap()
    }

    #[test]
    fn self_signed_cert_survives_pem() {
        let cert = rsa_cert("potato.com");
        let pem = cert.to_pem().unwrap();
        let parsed = Certificate::from_pem(&pem).unwrap();

        assert_eq!(parsed.to_der().unwrap(), cert.to_der().unwrap());
        assert_eq!(parsed.common_name().as_deref(), Some("potato.com"));
        assert!(parsed.is_self_issued());
        assert_eq!(parsed.issuer(), parsed.subject());
    }

    #[test]
    fn rsa_algorithm_identifier_has_null_parameters() {
        let cert = rsa_cert("potato.com");
        assert_eq!(
            cert.signature_algorithm(),
            Some(SignatureAlgorithm::Sha256WithRSA)
        );
        assert!(cert.inner.signature_algorithm.parameters.is_some());
        assert_eq!(
            cert.inner.signature_algorithm,
            cert.inner.tbs_certificate.signature
        );
    }

    #[test]
    fn basic_constraints_present_and_not_ca() {
        let cert = rsa_cert("");
        let bc = cert.basic_constraints().expect("basic constraints");
        assert!(!bc.is_ca);
        assert!(cert.extensions().iter().all(|ext| ext.critical));
    }

    #[test]
    fn from_pem_rejects_key_only_text() {
        let key = KeyPair::generate_ecdsa_p256();
        let text = key.private_key_pem().unwrap();
        assert!(matches!(
            Certificate::from_pem(&text),
            Err(FixtureError::MalformedPem(_))
        ));
    }
}
