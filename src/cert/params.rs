use bon::Builder;
use const_oid::ObjectIdentifier;
use der::Tag;
use der::asn1::{Any, SetOfVec};
use time::{Duration, OffsetDateTime};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use super::SignatureAlgorithm;
use super::extensions::ToAndFromX509Extension;
use crate::error::{FixtureError, Result};
use crate::serial::SerialNumber;

/// Organization carried in the subject of every fixture certificate.
pub const FIXTURE_ORGANIZATION: &str = "xyz, Inc.";

/// Lifetime of every fixture certificate.
pub const CERT_VALIDITY: Duration = Duration::hours(1);

/// The logical fields of a fixture certificate, independent of key type.
///
/// # Fields
/// * `serial_number` - Random serial below `2^128`.
/// * `subject` - Subject name; also used as the issuer when self-signing.
/// * `validity` - `notBefore`/`notAfter`, one hour apart.
/// * `signature_algorithm` - Must match the signing key's algorithm.
/// * `basic_constraints_valid` - Emit a critical BasicConstraints extension.
#[derive(Clone, Debug, Builder)]
pub struct CertificateTemplate {
    pub serial_number: SerialNumber,
    pub subject: DistinguishedName,
    pub validity: Validity,
    pub signature_algorithm: SignatureAlgorithm,
    #[builder(default = true)]
    pub basic_constraints_valid: bool,
    #[builder(default)]
    pub extensions: Vec<ExtensionParam>,
}

impl CertificateTemplate {
    /// Template for `common_name`, valid for one hour from now.
    ///
    /// An empty `common_name` leaves the CN attribute out of the subject.
    pub fn new(common_name: &str, signature_algorithm: SignatureAlgorithm) -> Result<Self> {
        Ok(Self::builder()
            .serial_number(SerialNumber::generate()?)
            .subject(DistinguishedName::fixture(common_name))
            .validity(Validity::one_hour_from_now())
            .signature_algorithm(signature_algorithm)
            .build())
    }
}

/// Subject or issuer name.
///
/// Attributes are encoded in the order O, CN, the same relative order a
/// Go or OpenSSL issuer produces.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub organization: Option<String>,
    pub common_name: Option<String>,
}

impl DistinguishedName {
    /// The fixture subject: fixed organization plus an optional common name.
    pub fn fixture(common_name: &str) -> Self {
        Self {
            organization: Some(FIXTURE_ORGANIZATION.to_string()),
            common_name: (!common_name.is_empty()).then(|| common_name.to_string()),
        }
    }

    /// Converts the distinguished name to an X.509 name.
    pub fn as_x509_name(&self) -> Result<Name> {
        let mut rdns = Vec::new();
        if let Some(organization) = &self.organization {
            rdns.push(utf8_attribute(
                const_oid::db::rfc4519::ORGANIZATION_NAME,
                organization,
            )?);
        }
        if let Some(common_name) = &self.common_name {
            rdns.push(utf8_attribute(
                const_oid::db::rfc4519::COMMON_NAME,
                common_name,
            )?);
        }
        Ok(RdnSequence(rdns))
    }

    /// Reads O and CN back out of an X.509 name. Other attributes are ignored.
    pub fn from_x509_name(x509dn: &Name) -> Self {
        let mut dn = DistinguishedName::default();
        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let Ok(value) = attr.value.decode_as::<String>() else {
                    continue;
                };
                match attr.oid {
                    const_oid::db::rfc4519::COMMON_NAME => dn.common_name = Some(value),
                    const_oid::db::rfc4519::ORGANIZATION_NAME => dn.organization = Some(value),
                    _ => {}
                }
            }
        }
        dn
    }
}

fn utf8_attribute(oid: ObjectIdentifier, value: &str) -> Result<RelativeDistinguishedName> {
    let atv = AttributeTypeAndValue {
        oid,
        value: Any::new(Tag::Utf8String, value.as_bytes())?,
    };
    Ok(RelativeDistinguishedName(SetOfVec::try_from(vec![atv])?))
}

/// Certificate validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// One hour starting now, truncated to whole seconds so the encoded
    /// window is exactly [`CERT_VALIDITY`] long.
    pub fn one_hour_from_now() -> Self {
        let now = OffsetDateTime::now_utc();
        let now = now - Duration::nanoseconds(i64::from(now.nanosecond()));
        Self {
            not_before: now,
            not_after: now + CERT_VALIDITY,
        }
    }

    pub fn to_x509(&self) -> Result<x509_cert::time::Validity> {
        Ok(x509_cert::time::Validity {
            not_before: utc_time(self.not_before)?,
            not_after: utc_time(self.not_after)?,
        })
    }

    pub fn from_x509(validity: &x509_cert::time::Validity) -> Self {
        Self {
            not_before: OffsetDateTime::from(validity.not_before.to_system_time()),
            not_after: OffsetDateTime::from(validity.not_after.to_system_time()),
        }
    }
}

fn utc_time(at: OffsetDateTime) -> Result<x509_cert::time::Time> {
    Ok(x509_cert::time::Time::UtcTime(
        der::asn1::UtcTime::from_system_time(at.into())?,
    ))
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        if self.oid != E::OID {
            return Err(FixtureError::EncodingError(format!(
                "extension {} is not {}",
                self.oid,
                E::OID
            )));
        }
        E::from_x509_extension_value(&self.value)
    }
}
