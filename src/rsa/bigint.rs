// RSA Big Integer Operations
// Modular arithmetic and probable prime search on top of num-bigint

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::error::{RsaError, RsaResult};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Primes used to discard candidates before running Miller-Rabin
const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
///
/// Right-to-left square-and-multiply, one squaring per exponent bit.
/// Runtime depends on the exponent's bit pattern, so this is not a
/// side-channel resistant primitive.
///
/// `modulus` must be non-zero.
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if the inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    // Iterative extended Euclid; Bezout coefficients go negative, hence BigInt
    let mut old_r = BigInt::from(a.clone());
    let mut r = BigInt::from(m.clone());
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return None;
    }

    old_s.mod_floor(&BigInt::from(m.clone())).to_biguint()
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime; each round cuts the chance of a
/// composite slipping through by at least a factor of 4
pub fn is_probable_prime<R>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool
where
    R: RngCore + CryptoRng + ?Sized,
{
    for &p in SMALL_PRIMES.iter() {
        if *n == RsaBigInt::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }
    if *n < RsaBigInt::from(2u8) {
        return false;
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let two = RsaBigInt::from(2u8);

    'witness: for _ in 0..rounds {
        // Pick random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    true
}

/// Generate a random probable prime of exactly `bit_length` bits
///
/// Every candidate has its top bit set (exact length) and its low bit
/// set (odd). Gives up with `PrimeGeneration` after `max_attempts`
/// candidates.
pub fn generate_prime<R>(
    bit_length: u64,
    rounds: u32,
    max_attempts: usize,
    rng: &mut R,
) -> RsaResult<RsaBigInt>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if bit_length < 2 {
        return Err(RsaError::InvalidParameter(format!(
            "prime bit length must be at least 2, got {}",
            bit_length
        )));
    }

    let mask = (RsaBigInt::one() << (bit_length - 1)) | RsaBigInt::one();

    for attempt in 1..=max_attempts {
        let candidate = rng.gen_biguint(bit_length) | &mask;

        if is_probable_prime(&candidate, rounds, rng) {
            debug!(bits = bit_length, attempts = attempt, "found probable prime");
            return Ok(candidate);
        }
    }

    Err(RsaError::PrimeGeneration {
        bits: bit_length,
        attempts: max_attempts,
    })
}
