// Message Codec
// Moves plaintext between bytes, big integers and base64 transport text
//
// Transport frame (before base64):
//     plaintext length (u32, big-endian) || ciphertext (modulus byte length)
//
// The length is what lets the decoder restore leading zero bytes, which
// carry no magnitude and vanish in the integer domain.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use num_traits::Zero;

use super::bigint::RsaBigInt;
use crate::error::{RsaError, RsaResult};

/// Size of the plaintext length prefix in a frame
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Interpret bytes as an unsigned big-endian integer
pub fn bytes_to_integer(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Serialize `value` as exactly `len` big-endian bytes, left padded with zeros
///
/// Returns None when the value needs more than `len` bytes.
pub fn integer_to_bytes(value: &RsaBigInt, len: usize) -> Option<Vec<u8>> {
    if value.is_zero() {
        return Some(vec![0u8; len]);
    }

    let bytes = value.to_bytes_be();
    if bytes.len() > len {
        return None;
    }

    let mut result = vec![0u8; len];
    result[len - bytes.len()..].copy_from_slice(&bytes);
    Some(result)
}

/// Byte length of the modulus, which is also the ciphertext block size
pub fn modulus_len(n: &RsaBigInt) -> usize {
    ((n.bits() + 7) / 8) as usize
}

/// Convert a plaintext block into the integer the transform consumes
///
/// Fails with `EncodingOverflow` when the block is longer than the
/// modulus or its value is not strictly below it.
pub fn encode_message(plaintext: &[u8], n: &RsaBigInt) -> RsaResult<RsaBigInt> {
    let overflow = || RsaError::EncodingOverflow {
        message_bytes: plaintext.len(),
        modulus_bits: n.bits(),
    };

    if plaintext.len() > modulus_len(n) {
        return Err(overflow());
    }

    let m = bytes_to_integer(plaintext);
    if m >= *n {
        return Err(overflow());
    }

    Ok(m)
}

/// Restore a plaintext block of `len` bytes from the recovered integer
pub fn decode_message(m: &RsaBigInt, len: usize) -> RsaResult<Vec<u8>> {
    integer_to_bytes(m, len).ok_or_else(|| {
        RsaError::DecodingCorruption(format!(
            "recovered message does not fit its declared length of {} bytes",
            len
        ))
    })
}

/// Build the base64 transport text for a ciphertext integer
pub fn encode_frame(plaintext_len: usize, c: &RsaBigInt, n: &RsaBigInt) -> RsaResult<String> {
    let k = modulus_len(n);
    let prefix = u32::try_from(plaintext_len).map_err(|_| RsaError::EncodingOverflow {
        message_bytes: plaintext_len,
        modulus_bits: n.bits(),
    })?;
    let block = integer_to_bytes(c, k).ok_or_else(|| {
        RsaError::InvalidParameter("ciphertext is not reduced modulo n".to_string())
    })?;

    let mut frame = Vec::with_capacity(LENGTH_PREFIX_LEN + k);
    frame.extend_from_slice(&prefix.to_be_bytes());
    frame.extend_from_slice(&block);

    Ok(STANDARD.encode(frame))
}

/// Parse base64 transport text into the plaintext length and ciphertext integer
pub fn decode_frame(text: &str, n: &RsaBigInt) -> RsaResult<(usize, RsaBigInt)> {
    let frame = STANDARD.decode(text)?;
    let k = modulus_len(n);

    if frame.len() != LENGTH_PREFIX_LEN + k {
        return Err(RsaError::DecodingCorruption(format!(
            "invalid ciphertext length: expected {} bytes, got {}",
            LENGTH_PREFIX_LEN + k,
            frame.len()
        )));
    }

    let (prefix, block) = frame.split_at(LENGTH_PREFIX_LEN);
    let mut len_bytes = [0u8; LENGTH_PREFIX_LEN];
    len_bytes.copy_from_slice(prefix);
    let plaintext_len = u32::from_be_bytes(len_bytes) as usize;

    if plaintext_len > k {
        return Err(RsaError::DecodingCorruption(format!(
            "declared plaintext length {} exceeds block size {}",
            plaintext_len, k
        )));
    }

    let c = bytes_to_integer(block);
    if c >= *n {
        return Err(RsaError::DecodingCorruption(
            "ciphertext is not below the modulus".to_string(),
        ));
    }

    Ok((plaintext_len, c))
}

/// Parse a decimal-string key component
pub fn parse_decimal(value: &str, name: &str) -> RsaResult<RsaBigInt> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RsaError::InvalidKey(format!(
            "{} is not a decimal integer",
            name
        )));
    }

    RsaBigInt::parse_bytes(value.as_bytes(), 10)
        .ok_or_else(|| RsaError::InvalidKey(format!("{} is not a decimal integer", name)))
}
