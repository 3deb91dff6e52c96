mod util;

use router_test_util::cert::SignatureAlgorithm;
use router_test_util::cert::params::FIXTURE_ORGANIZATION;
use router_test_util::error::FixtureError;
use router_test_util::{
    TlsCredential, build_ec_tls_credential, build_tls_credential, generate_ec_pair,
    generate_rsa_pair,
};
pub type Result<T> = std::result::Result<T, FixtureError>;

/// An RSA pair for a hostname loads as a credential and names that host.
#[test]
fn rsa_pair_for_potato_com() -> Result<()> {
    util::init_logging();
    let (key_pem, cert_pem) = generate_rsa_pair("potato.com")?;

    let credential = TlsCredential::from_pem(&cert_pem, &key_pem)?;
    assert_eq!(credential.cert_chain().len(), 1);
    assert_eq!(credential.leaf().common_name().as_deref(), Some("potato.com"));
    assert_eq!(
        credential.leaf().organization().as_deref(),
        Some(FIXTURE_ORGANIZATION)
    );
    assert_eq!(
        credential.leaf().signature_algorithm(),
        Some(SignatureAlgorithm::Sha256WithRSA)
    );
    Ok(())
}

/// An EC pair without a common name carries only the organization.
#[test]
fn ec_pair_without_common_name() -> Result<()> {
    util::init_logging();
    let (key_pem, cert_pem) = generate_ec_pair("")?;

    let cert = util::parse_cert(&cert_pem);
    assert_eq!(cert.common_name(), None);
    assert_eq!(cert.organization().as_deref(), Some("xyz, Inc."));
    assert_eq!(
        cert.signature_algorithm(),
        Some(SignatureAlgorithm::Sha256WithECDSA)
    );

    TlsCredential::from_pem(&cert_pem, &key_pem)?;
    build_ec_tls_credential("")?;
    Ok(())
}

#[test]
fn common_name_matches_input_for_both_algorithms() -> Result<()> {
    for cn in ["potato.com", "potato2.com", "*.example.test", "localhost"] {
        let (_, rsa_cert) = generate_rsa_pair(cn)?;
        let (_, ec_cert) = generate_ec_pair(cn)?;
        assert_eq!(util::parse_cert(&rsa_cert).common_name().as_deref(), Some(cn));
        assert_eq!(util::parse_cert(&ec_cert).common_name().as_deref(), Some(cn));
    }
    Ok(())
}

#[test]
fn certificates_are_self_issued() -> Result<()> {
    let (_, rsa_cert) = generate_rsa_pair("potato.com")?;
    let (_, ec_cert) = generate_ec_pair("")?;

    for cert_pem in [rsa_cert, ec_cert] {
        let cert = util::parse_cert(&cert_pem);
        assert!(cert.is_self_issued());
        assert_eq!(cert.issuer(), cert.subject());
    }
    Ok(())
}

#[test]
fn validity_window_is_one_hour() -> Result<()> {
    let (_, rsa_cert) = generate_rsa_pair("potato.com")?;
    let (_, ec_cert) = generate_ec_pair("potato.com")?;

    for cert_pem in [rsa_cert, ec_cert] {
        let cert = util::parse_cert(&cert_pem);
        assert_eq!(cert.validity_seconds(), 3600);

        let now = time::OffsetDateTime::now_utc();
        let validity = cert.validity();
        assert!(validity.not_before <= now);
        assert!(validity.not_after > now);
    }
    Ok(())
}

#[test]
fn credentials_build_for_fresh_pairs() -> Result<()> {
    util::init_logging();
    for cn in ["", "potato.com"] {
        let rsa = build_tls_credential(cn)?;
        assert!(matches!(
            rsa.private_key(),
            rustls::pki_types::PrivateKeyDer::Pkcs1(_)
        ));

        let ec = build_ec_tls_credential(cn)?;
        assert!(matches!(
            ec.private_key(),
            rustls::pki_types::PrivateKeyDer::Sec1(_)
        ));
    }
    Ok(())
}

#[test]
fn credentials_load_into_rustls() -> Result<()> {
    util::init_logging();
    build_tls_credential("potato.com")?.server_config()?;
    build_ec_tls_credential("potato.com")?.server_config()?;
    Ok(())
}

/// Two RSA calls with the same name give different keys, serials and bytes.
#[test]
fn repeated_rsa_calls_differ() -> Result<()> {
    let (key_a, cert_a) = generate_rsa_pair("potato.com")?;
    let (key_b, cert_b) = generate_rsa_pair("potato.com")?;

    assert_ne!(key_a, key_b);
    assert_ne!(cert_a, cert_b);
    assert_ne!(
        util::parse_cert(&cert_a).serial_number(),
        util::parse_cert(&cert_b).serial_number()
    );

    // Each key belongs to its own certificate only.
    assert!(matches!(
        TlsCredential::from_pem(&cert_a, &key_b),
        Err(FixtureError::KeyCertificateMismatch)
    ));
    Ok(())
}

#[test]
fn repeated_ec_calls_have_distinct_serials() -> Result<()> {
    let (_, cert_a) = generate_ec_pair("potato.com")?;
    let (_, cert_b) = generate_ec_pair("potato.com")?;
    assert_ne!(
        util::parse_cert(&cert_a).serial_number(),
        util::parse_cert(&cert_b).serial_number()
    );
    Ok(())
}

#[test]
fn serial_fits_in_128_bits() -> Result<()> {
    let (_, cert_pem) = generate_ec_pair("potato.com")?;
    let serial = util::parse_cert(&cert_pem).serial_number();

    // At most 16 magnitude bytes, plus a 0x00 sign octet when the top bit is set.
    assert!(serial.len() <= 17);
    if serial.len() == 17 {
        assert_eq!(serial[0], 0);
    }
    assert!(serial[0] & 0x80 == 0, "serial must be non-negative");
    Ok(())
}

#[test]
fn ec_key_text_block_order() -> Result<()> {
    let (key_pem, cert_pem) = generate_ec_pair("potato.com")?;
    assert_eq!(util::block_tags(&key_pem), ["EC PARAMETERS", "EC PRIVATE KEY"]);
    assert_eq!(util::block_tags(&cert_pem), ["CERTIFICATE"]);
    Ok(())
}

#[test]
fn rsa_key_text_block() -> Result<()> {
    let (key_pem, cert_pem) = generate_rsa_pair("potato.com")?;
    assert_eq!(util::block_tags(&key_pem), ["RSA PRIVATE KEY"]);
    assert_eq!(util::block_tags(&cert_pem), ["CERTIFICATE"]);
    Ok(())
}

#[test]
fn garbage_pem_is_malformed() {
    let err = TlsCredential::from_pem(
        "-----BEGIN CERTIFICATE-----\n!!!!\n-----END CERTIFICATE-----\n",
        "",
    )
    .unwrap_err();
    assert!(matches!(err, FixtureError::MalformedPem(_)));
}

#[test]
fn generation_is_safe_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let cn = format!("host{i}.potato.com");
                let credential = build_ec_tls_credential(&cn).unwrap();
                assert_eq!(credential.leaf().common_name(), Some(cn));
                credential.leaf().serial_number()
            })
        })
        .collect();

    let mut serials: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    serials.sort();
    serials.dedup();
    assert_eq!(serials.len(), 4);
}
