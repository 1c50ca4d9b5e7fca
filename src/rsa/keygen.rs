// RSA Key Generation
// Derives (n, e, d) from two independently drawn probable primes

use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::bigint::{from_u64, gcd, generate_prime, mod_inverse, RsaBigInt};
use super::codec::parse_decimal;
use crate::config::RsaConfig;
use crate::error::{RsaError, RsaResult};

/// Below this modulus size keys are accepted but offer no real protection
pub const MIN_SECURE_BITS: u64 = 1024;

/// Smallest modulus that admits two distinct primes of equal length
pub const MIN_KEY_BITS: u64 = 6;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub d: RsaBigInt, // Private exponent
}

/// RSA Key Pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    pub n: RsaBigInt,
    pub e: RsaBigInt,
    pub d: RsaBigInt,
}

/// Key pair with every component as a decimal string, for transport and storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedKeyPair {
    pub n: String,
    pub e: String,
    pub d: String,
}

fn check_modulus(n: &RsaBigInt) -> RsaResult<()> {
    if *n < from_u64(2) {
        return Err(RsaError::InvalidKey("modulus must be at least 2".to_string()));
    }
    Ok(())
}

fn check_exponent(x: &RsaBigInt, name: &str) -> RsaResult<()> {
    if x.is_zero() {
        return Err(RsaError::InvalidKey(format!("{} must be non-zero", name)));
    }
    Ok(())
}

impl RsaPublicKey {
    pub fn new(n: RsaBigInt, e: RsaBigInt) -> RsaResult<Self> {
        check_modulus(&n)?;
        check_exponent(&e, "public exponent")?;
        Ok(Self { n, e })
    }

    /// Parse from decimal strings
    pub fn from_decimal(e: &str, n: &str) -> RsaResult<Self> {
        Self::new(parse_decimal(n, "modulus")?, parse_decimal(e, "public exponent")?)
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

impl RsaPrivateKey {
    pub fn new(n: RsaBigInt, d: RsaBigInt) -> RsaResult<Self> {
        check_modulus(&n)?;
        check_exponent(&d, "private exponent")?;
        Ok(Self { n, d })
    }

    /// Parse from decimal strings
    pub fn from_decimal(d: &str, n: &str) -> RsaResult<Self> {
        Self::new(parse_decimal(n, "modulus")?, parse_decimal(d, "private exponent")?)
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

impl RsaKeyPair {
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }

    pub fn private_key(&self) -> RsaPrivateKey {
        RsaPrivateKey {
            n: self.n.clone(),
            d: self.d.clone(),
        }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    pub fn to_encoded(&self) -> EncodedKeyPair {
        EncodedKeyPair {
            n: self.n.to_str_radix(10),
            e: self.e.to_str_radix(10),
            d: self.d.to_str_radix(10),
        }
    }
}

impl TryFrom<&EncodedKeyPair> for RsaKeyPair {
    type Error = RsaError;

    fn try_from(encoded: &EncodedKeyPair) -> RsaResult<Self> {
        let public = RsaPublicKey::from_decimal(&encoded.e, &encoded.n)?;
        let private = RsaPrivateKey::from_decimal(&encoded.d, &encoded.n)?;
        Ok(RsaKeyPair {
            n: public.n,
            e: public.e,
            d: private.d,
        })
    }
}

/// Derive a key pair from two known primes
///
/// Starts at `initial_e` and steps by 2 until the exponent is coprime with
/// φ(n) = (p-1)(q-1), giving up after `max_increments` steps.
pub fn derive_keypair(
    p: &RsaBigInt,
    q: &RsaBigInt,
    initial_e: u64,
    max_increments: u64,
) -> RsaResult<RsaKeyPair> {
    if p == q {
        return Err(RsaError::KeyDerivation("p and q must be distinct".to_string()));
    }
    if *p < from_u64(2) || *q < from_u64(2) {
        return Err(RsaError::KeyDerivation("p and q must be primes".to_string()));
    }

    let n = p * q;
    let phi = (p - 1u8) * (q - 1u8);

    let mut e = from_u64(initial_e);
    let mut increments = 0u64;
    while !gcd(&e, &phi).is_one() {
        if increments >= max_increments {
            return Err(RsaError::KeyDerivation(format!(
                "no exponent coprime with φ(n) within {} steps of {}",
                max_increments, initial_e
            )));
        }
        e += 2u8;
        increments += 1;
    }
    if increments > 0 {
        warn!(initial_e, e = %e, "public exponent not coprime with φ(n), advanced");
    }

    let d = mod_inverse(&e, &phi)
        .ok_or_else(|| RsaError::KeyDerivation("modular inverse of e does not exist".to_string()))?;

    Ok(RsaKeyPair { n, e, d })
}

/// Generate RSA key pair with specified modulus bit length
///
/// The two primes are `bit_length / 2` bits each, so `bit_length` must be
/// even and at least 6. At 4 bits the only odd 2-bit prime is 3, so p and
/// q could never differ.
pub fn generate_keypair<R>(
    bit_length: u64,
    config: &RsaConfig,
    rng: &mut R,
) -> RsaResult<RsaKeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    config.validate()?;
    if bit_length < MIN_KEY_BITS {
        return Err(RsaError::InvalidParameter(format!(
            "bit length must be at least {}, got {}",
            MIN_KEY_BITS,
            bit_length
        )));
    }
    if bit_length % 2 != 0 {
        return Err(RsaError::InvalidParameter(
            "bit length must be even (p and q should have equal bit length)".to_string(),
        ));
    }
    if bit_length < MIN_SECURE_BITS {
        warn!(
            bits = bit_length,
            "generating an insecure key, use at least {} bits", MIN_SECURE_BITS
        );
    }

    let half_bits = bit_length / 2;
    let rounds = config.miller_rabin_rounds;
    let attempts = config.max_prime_attempts(half_bits);

    let mut p = generate_prime(half_bits, rounds, attempts, rng)?;
    let mut q = generate_prime(half_bits, rounds, attempts, rng)?;

    // Redraw on a p == q collision, or when the product lands one bit short
    let mut redraws = 0u32;
    loop {
        let short = (&p * &q).bits() != bit_length;
        if p != q && !short {
            break;
        }
        if redraws >= config.max_prime_redraws {
            return Err(RsaError::KeyDerivation(format!(
                "no usable prime pair after {} redraws",
                redraws
            )));
        }
        if p == q {
            warn!(bits = half_bits, "q equals p, redrawing");
            q = generate_prime(half_bits, rounds, attempts, rng)?;
        } else {
            debug!(bits = bit_length, "modulus one bit short, redrawing both primes");
            p = generate_prime(half_bits, rounds, attempts, rng)?;
            q = generate_prime(half_bits, rounds, attempts, rng)?;
        }
        redraws += 1;
    }

    let keypair = derive_keypair(&p, &q, config.public_exponent, config.max_exponent_increments)?;
    info!(bits = keypair.bit_length(), "generated RSA key pair");

    Ok(keypair)
}
