use der::Encode;
use x509_cert::certificate::CertificateInner;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::Certificate;
use crate::cert::extensions::BasicConstraints;
use crate::cert::params::{CertificateTemplate, DistinguishedName, ExtensionParam};
use crate::error::{FixtureError, Result};
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> &DistinguishedName;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Signs `template` for the holder of `subject_public_key_info`.
    ///
    /// Fails with [`FixtureError::CertificateSigningFailed`] when the template
    /// asks for a signature algorithm the issuer's key cannot produce.
    fn issue(
        &self,
        template: &CertificateTemplate,
        subject_public_key_info: SubjectPublicKeyInfoOwned,
    ) -> Result<Certificate> {
        let key_algorithm = self.signing_key().signature_algorithm();
        if template.signature_algorithm != key_algorithm {
            return Err(FixtureError::CertificateSigningFailed(format!(
                "template requests {:?} but the signing key produces {:?}",
                template.signature_algorithm, key_algorithm
            )));
        }

        let mut extensions = template.extensions.clone();
        if template.basic_constraints_valid {
            extensions.push(ExtensionParam::from_extension(
                BasicConstraints::default(),
                true,
            )?);
        }

        let tbs_cert = TbsCertificate {
            serial_number: template.serial_number,
            signature_algorithm: template.signature_algorithm,
            issuer: self.issuer_name().clone(),
            validity: template.validity.clone(),
            subject: template.subject.clone(),
            subject_public_key_info,
            extensions,
        };

        let tbs_cert_inner = tbs_cert
            .to_tbs_certificate_inner()
            .map_err(|e| FixtureError::CertificateSigningFailed(e.to_string()))?;
        let tbs_der = tbs_cert_inner
            .to_der()
            .map_err(|e| FixtureError::CertificateSigningFailed(e.to_string()))?;

        let signature = self.signing_key().sign_data(&tbs_der)?;

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: template.signature_algorithm.into(),
            signature: der::asn1::BitString::from_bytes(&signature)?,
        };

        log::debug!(
            "issued {:?} certificate for {:?}",
            template.signature_algorithm,
            template.subject.common_name
        );
        Ok(Certificate { inner: cert_inner })
    }
}

/// Issuer whose name is the subject it signs and whose key is the subject's key.
pub struct SelfSigned<'a> {
    name: DistinguishedName,
    key: &'a KeyPair,
}

impl<'a> SelfSigned<'a> {
    pub fn new(name: DistinguishedName, key: &'a KeyPair) -> Self {
        Self { name, key }
    }
}

impl Issuer for SelfSigned<'_> {
    fn issuer_name(&self) -> &DistinguishedName {
        &self.name
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }
}
