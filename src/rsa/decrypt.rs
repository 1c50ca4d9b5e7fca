// RSA Decryption Implementation
// Raw (unpadded) RSA: m = c^d mod n

use super::bigint::{mod_pow, RsaBigInt};
use super::codec::{bytes_to_integer, decode_frame, decode_message, modulus_len};
use super::keygen::RsaPrivateKey;
use crate::error::{RsaError, RsaResult};

/// Decrypt a ciphertext integer; it must be strictly below the modulus
pub fn decrypt_integer(c: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaResult<RsaBigInt> {
    if *c >= private_key.n {
        return Err(RsaError::DecodingCorruption(
            "ciphertext is not below the modulus".to_string(),
        ));
    }
    Ok(mod_pow(c, &private_key.d, &private_key.n))
}

/// Decrypt a ciphertext block back into `plaintext_len` bytes
///
/// `plaintext_len` may not exceed the modulus byte length.
pub fn decrypt_bytes(
    ciphertext: &[u8],
    plaintext_len: usize,
    private_key: &RsaPrivateKey,
) -> RsaResult<Vec<u8>> {
    let key_bytes = modulus_len(&private_key.n);
    if ciphertext.len() != key_bytes {
        return Err(RsaError::DecodingCorruption(format!(
            "invalid ciphertext length: expected {} bytes, got {}",
            key_bytes,
            ciphertext.len()
        )));
    }
    if plaintext_len > key_bytes {
        return Err(RsaError::DecodingCorruption(format!(
            "declared plaintext length {} exceeds block size {}",
            plaintext_len, key_bytes
        )));
    }

    let m = decrypt_integer(&bytes_to_integer(ciphertext), private_key)?;
    decode_message(&m, plaintext_len)
}

/// Decrypt base64 transport text to the original plaintext bytes
pub fn decrypt_text_to_bytes(ciphertext: &str, private_key: &RsaPrivateKey) -> RsaResult<Vec<u8>> {
    let (plaintext_len, c) = decode_frame(ciphertext, &private_key.n)?;
    let m = decrypt_integer(&c, private_key)?;
    decode_message(&m, plaintext_len)
}

/// Decrypt base64 transport text to a string
pub fn decrypt_to_string(ciphertext: &str, private_key: &RsaPrivateKey) -> RsaResult<String> {
    let plaintext = decrypt_text_to_bytes(ciphertext, private_key)?;
    Ok(String::from_utf8(plaintext)?)
}
