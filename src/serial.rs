use rand_core::{OsRng, RngCore};

use crate::error::{FixtureError, Result};

/// Width of a fixture serial number in bytes. Values are always `< 2^128`.
pub const SERIAL_NUMBER_LEN: usize = 16;

/// A random, non-negative certificate serial number below `2^128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialNumber([u8; SERIAL_NUMBER_LEN]);

impl SerialNumber {
    /// Draws a fresh serial number from the OS entropy source.
    ///
    /// Entropy failure is reported as [`FixtureError::RandomnessUnavailable`];
    /// there is no weaker fallback.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; SERIAL_NUMBER_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| FixtureError::RandomnessUnavailable(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Big-endian magnitude bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Converts into the x509 representation, which adds a leading zero
    /// octet when needed to keep the DER INTEGER positive.
    pub fn to_x509(&self) -> Result<x509_cert::serial_number::SerialNumber> {
        Ok(x509_cert::serial_number::SerialNumber::new(&self.0)?)
    }
}

impl From<u128> for SerialNumber {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}
