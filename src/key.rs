use const_oid::AssociatedOid;
use der::Encode;
use p256::ecdsa::SigningKey as P256SigningKey;
use p256::ecdsa::signature::Signer as _;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use pkcs8::DecodePrivateKey;
use rand_core::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::signature::SignatureEncoding;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::SignatureAlgorithm;
use crate::error::{FixtureError, Result};
use crate::pem_utils::{self, PemLabel};

/// RSA modulus size for fixture keys.
pub const RSA_KEY_BITS: usize = 2048;

/// Key material backing a fixture certificate.
///
/// Keys are generated fresh for each certificate and never persisted.
#[derive(Debug, Clone)]
pub enum KeyPair {
    Rsa {
        private: Box<RsaPrivateKey>,
        public: RsaPublicKey,
    },
    EcdsaP256 {
        secret: p256::SecretKey,
        signing_key: P256SigningKey,
    },
}

impl KeyPair {
    /// Generate a 2048-bit RSA key pair.
    pub fn generate_rsa() -> Result<Self> {
        let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
            .map_err(|e| FixtureError::KeyGenerationFailed(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        log::trace!("generated {RSA_KEY_BITS}-bit RSA key");
        Ok(KeyPair::Rsa {
            private: Box::new(private),
            public,
        })
    }

    /// Generate an ECDSA P-256 key pair.
    pub fn generate_ecdsa_p256() -> Self {
        let secret = p256::SecretKey::random(&mut OsRng);
        log::trace!("generated P-256 key");
        Self::from_p256_secret(secret)
    }

    fn from_p256_secret(secret: p256::SecretKey) -> Self {
        let signing_key = P256SigningKey::from(&secret);
        KeyPair::EcdsaP256 {
            secret,
            signing_key,
        }
    }

    /// Import an RSA key from PKCS#1 DER (`RSA PRIVATE KEY`).
    pub fn import_pkcs1_der(der: &[u8]) -> Result<Self> {
        let private = RsaPrivateKey::from_pkcs1_der(der)
            .map_err(|e| FixtureError::MalformedPem(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair::Rsa {
            private: Box::new(private),
            public,
        })
    }

    /// Import a P-256 key from SEC1 DER (`EC PRIVATE KEY`).
    pub fn import_sec1_der(der: &[u8]) -> Result<Self> {
        let secret = p256::SecretKey::from_sec1_der(der)
            .map_err(|e| FixtureError::MalformedPem(e.to_string()))?;
        Ok(Self::from_p256_secret(secret))
    }

    /// Import an RSA or P-256 key from PKCS#8 DER (`PRIVATE KEY`).
    pub fn import_pkcs8_der(der: &[u8]) -> Result<Self> {
        if let Ok(private) = RsaPrivateKey::from_pkcs8_der(der) {
            let public = RsaPublicKey::from(&private);
            return Ok(KeyPair::Rsa {
                private: Box::new(private),
                public,
            });
        }
        let secret = p256::SecretKey::from_pkcs8_der(der)
            .map_err(|e| FixtureError::MalformedPem(e.to_string()))?;
        Ok(Self::from_p256_secret(secret))
    }

    /// The certificate signature algorithm this key signs with.
    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        match self {
            KeyPair::Rsa { .. } => SignatureAlgorithm::Sha256WithRSA,
            KeyPair::EcdsaP256 { .. } => SignatureAlgorithm::Sha256WithECDSA,
        }
    }

    /// SubjectPublicKeyInfo for the public half of this key.
    pub fn as_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        let spki = match self {
            KeyPair::Rsa { public, .. } => SubjectPublicKeyInfoOwned::from_key(public.clone())?,
            KeyPair::EcdsaP256 { secret, .. } => {
                SubjectPublicKeyInfoOwned::from_key(secret.public_key())?
            }
        };
        Ok(spki)
    }

    /// Sign `data` with SHA-256. ECDSA signatures are DER encoded, as X.509 expects.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            KeyPair::Rsa { private, .. } => {
                let signing_key: RsaSigningKey<Sha256> = RsaSigningKey::new((**private).clone());
                let signature = rsa::signature::Signer::try_sign(&signing_key, data)
                    .map_err(|e| FixtureError::CertificateSigningFailed(e.to_string()))?;
                Ok(signature.to_vec())
            }
            KeyPair::EcdsaP256 { signing_key, .. } => {
                let signature: p256::ecdsa::Signature = signing_key
                    .try_sign(data)
                    .map_err(|e| FixtureError::CertificateSigningFailed(e.to_string()))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }

    /// Private key in its legacy encoding: PKCS#1 for RSA, SEC1 for EC.
    pub fn private_key_der(&self) -> Result<Vec<u8>> {
        match self {
            KeyPair::Rsa { private, .. } => {
                let doc = private
                    .to_pkcs1_der()
                    .map_err(|e| FixtureError::EncodingError(e.to_string()))?;
                Ok(doc.as_bytes().to_vec())
            }
            KeyPair::EcdsaP256 { secret, .. } => {
                // OpenSSL refuses SEC1 keys without the namedCurve field.
                let private_key = secret.to_bytes();
                let public_key = secret.public_key().to_encoded_point(false);
                let ec_private_key = sec1::EcPrivateKey {
                    private_key: private_key.as_slice(),
                    parameters: Some(sec1::EcParameters::NamedCurve(p256::NistP256::OID)),
                    public_key: Some(public_key.as_bytes()),
                };
                Ok(ec_private_key.to_der()?)
            }
        }
    }

    pub fn private_key_label(&self) -> PemLabel {
        match self {
            KeyPair::Rsa { .. } => PemLabel::RsaPrivateKey,
            KeyPair::EcdsaP256 { .. } => PemLabel::EcPrivateKey,
        }
    }

    /// Private key as a single PEM block (`RSA PRIVATE KEY` or `EC PRIVATE KEY`).
    pub fn private_key_pem(&self) -> Result<String> {
        let der = self.private_key_der()?;
        Ok(pem_utils::der_to_pem(&der, self.private_key_label()))
    }
}
