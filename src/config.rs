// RSA Configuration
// Tunables for prime search and key derivation

use serde::{Deserialize, Serialize};

use crate::error::{RsaError, RsaResult};

/// Configuration for key generation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsaConfig {
    /// Modulus size used when the caller does not ask for one
    pub default_key_bits: u64,
    /// First public exponent tried; bumped by 2 until coprime with φ(n)
    pub public_exponent: u64,
    /// Miller-Rabin witnesses per candidate. 50 rounds bound the
    /// false-positive rate by 4^-50 = 2^-100.
    pub miller_rabin_rounds: u32,
    /// How many times the prime pair may be redrawn, either because q
    /// collided with p or because the modulus came out one bit short
    pub max_prime_redraws: u32,
    /// Upper bound on `e += 2` steps while searching for a coprime exponent
    pub max_exponent_increments: u64,
    /// Candidate budget per bit of prime length
    pub prime_attempts_per_bit: usize,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            default_key_bits: 2048,
            public_exponent: 65537,
            miller_rabin_rounds: 50,
            max_prime_redraws: 64,
            max_exponent_increments: 1_000_000,
            prime_attempts_per_bit: 64,
        }
    }
}

/// Floor for the candidate budget so tiny primes still get a fair search
const MIN_PRIME_ATTEMPTS: usize = 1024;

impl RsaConfig {
    pub fn with_default_key_bits(mut self, bits: u64) -> Self {
        self.default_key_bits = bits;
        self
    }

    pub fn with_public_exponent(mut self, e: u64) -> Self {
        self.public_exponent = e;
        self
    }

    pub fn with_miller_rabin_rounds(mut self, rounds: u32) -> Self {
        self.miller_rabin_rounds = rounds;
        self
    }

    pub fn with_max_prime_redraws(mut self, redraws: u32) -> Self {
        self.max_prime_redraws = redraws;
        self
    }

    pub fn with_max_exponent_increments(mut self, increments: u64) -> Self {
        self.max_exponent_increments = increments;
        self
    }

    /// Candidate budget for a prime of `bits` bits
    pub fn max_prime_attempts(&self, bits: u64) -> usize {
        let scaled = usize::try_from(bits)
            .unwrap_or(usize::MAX)
            .saturating_mul(self.prime_attempts_per_bit);
        scaled.max(MIN_PRIME_ATTEMPTS)
    }

    /// Reject settings that would make key generation meaningless
    pub fn validate(&self) -> RsaResult<()> {
        if self.miller_rabin_rounds == 0 {
            return Err(RsaError::InvalidParameter(
                "miller_rabin_rounds must be at least 1".to_string(),
            ));
        }
        if self.public_exponent < 3 || self.public_exponent % 2 == 0 {
            return Err(RsaError::InvalidParameter(format!(
                "public exponent must be odd and at least 3, got {}",
                self.public_exponent
            )));
        }
        if self.prime_attempts_per_bit == 0 {
            return Err(RsaError::InvalidParameter(
                "prime_attempts_per_bit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
