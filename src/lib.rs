//! # router-test-util - Fixtures for Router Tests
//!
//! Test support for a reverse-proxy router: deterministic runtime
//! configurations and throwaway self-signed certificates for exercising TLS
//! termination without a certificate authority. Certificates are built
//! entirely with rustcrypto libraries.
//!
//! ## Certificates
//!
//! - **RSA**: 2048-bit key, `sha256WithRSAEncryption`, key as PKCS#1
//!   `RSA PRIVATE KEY`
//! - **ECDSA**: P-256 key, `ecdsa-with-SHA256`, key as SEC1 `EC PRIVATE KEY`
//!   preceded by an `EC PARAMETERS` block
//!
//! Every certificate is self-signed, carries the organization `xyz, Inc.`,
//! a random 128-bit serial and is valid for exactly one hour. Nothing is
//! cached or persisted between calls.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use router_test_util::{build_ec_tls_credential, generate_rsa_pair};
//!
//! # fn main() -> Result<(), router_test_util::error::FixtureError> {
//! let (key_pem, cert_pem) = generate_rsa_pair("potato.com")?;
//! println!("{key_pem}{cert_pem}");
//!
//! let credential = build_ec_tls_credential("potato.com")?;
//! let server_config = credential.server_config()?;
//! # let _ = server_config;
//! # Ok(())
//! # }
//! ```
//!
//! ## Router configuration
//!
//! ```rust,no_run
//! use router_test_util::config::{test_config, test_ssl_config};
//!
//! # fn main() -> Result<(), router_test_util::error::FixtureError> {
//! let plain = test_config(8082, 8081, &[4222]);
//! let tls = test_ssl_config(8082, 8081, 8443, &[4222])?;
//! assert_eq!(tls.tls_pem.len(), 2);
//! # let _ = plain;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`error::FixtureError`]. Errors are never
//! retried inside the crate; a failing fixture should fail the test.
//!
//! ## Module Organization
//!
//! - [`generate`]: RSA and EC key/certificate pair generation
//! - [`tls`]: loading generated PEM into a TLS credential
//! - [`config`]: router configuration fixtures
//! - [`cert`]: certificate templates, names and the parsed certificate type
//! - [`key`]: key generation, signing and key encodings
//! - [`issuer`]: self-signing
//! - [`serial`]: random serial numbers
//! - [`pem_utils`]: PEM framing
//! - [`tbs_certificate`]: the to-be-signed certificate structure
//! - [`error`]: error type

pub mod cert;
pub mod config;
pub mod error;
pub mod generate;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod serial;
pub mod tbs_certificate;
pub mod tls;

pub use generate::{generate_ec_pair, generate_rsa_pair};
pub use tls::{TlsCredential, build_ec_tls_credential, build_tls_credential};
