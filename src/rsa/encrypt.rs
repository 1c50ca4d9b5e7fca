// RSA Encryption Implementation
// Raw (unpadded) RSA: c = m^e mod n

use super::bigint::{mod_pow, RsaBigInt};
use super::codec::{encode_frame, encode_message, integer_to_bytes, modulus_len};
use super::keygen::RsaPublicKey;
use crate::error::{RsaError, RsaResult};

/// Encrypt a message integer; it must be strictly below the modulus
pub fn encrypt_integer(m: &RsaBigInt, public_key: &RsaPublicKey) -> RsaResult<RsaBigInt> {
    if *m >= public_key.n {
        return Err(RsaError::EncodingOverflow {
            message_bytes: ((m.bits() + 7) / 8) as usize,
            modulus_bits: public_key.bit_length(),
        });
    }
    Ok(mod_pow(m, &public_key.e, &public_key.n))
}

/// Encrypt bytes using RSA public key
/// Returns a ciphertext block of exactly the modulus byte length
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> RsaResult<Vec<u8>> {
    let m = encode_message(plaintext, &public_key.n)?;
    let c = encrypt_integer(&m, public_key)?;

    integer_to_bytes(&c, modulus_len(&public_key.n))
        .ok_or_else(|| RsaError::InvalidParameter("ciphertext is not reduced modulo n".to_string()))
}

/// Encrypt a string into base64 transport text
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> RsaResult<String> {
    let bytes = plaintext.as_bytes();
    let m = encode_message(bytes, &public_key.n)?;
    let c = encrypt_integer(&m, public_key)?;
    encode_frame(bytes.len(), &c, &public_key.n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::keygen::derive_keypair;

    fn textbook_key() -> RsaPublicKey {
        derive_keypair(&from_u64(61), &from_u64(53), 17, 0)
            .unwrap()
            .public_key()
    }

    #[test]
    fn test_encrypt_integer_textbook() {
        let key = textbook_key();
        assert_eq!(encrypt_integer(&from_u64(65), &key).unwrap(), from_u64(2790));
    }

    #[test]
    fn test_encrypt_integer_overflow() {
        let key = textbook_key();
        for m in [3233u64, 3234, 1 << 20] {
            assert!(matches!(
                encrypt_integer(&from_u64(m), &key),
                Err(RsaError::EncodingOverflow { .. })
            ));
        }
    }

    #[test]
    fn test_encrypt_bytes_block_size() {
        let key = textbook_key();
        // 65 = 'A'
        let ciphertext = encrypt_bytes(b"A", &key).unwrap();
        assert_eq!(ciphertext, vec![0x0a, 0xe6]);

        // Small ciphertexts are still padded to the block size
        assert_eq!(encrypt_bytes(&[0x01], &key).unwrap(), vec![0x00, 0x01]);
    }

    #[test]
    fn test_encrypt_bytes_overflow() {
        let key = textbook_key();
        assert!(matches!(
            encrypt_bytes(&[0x0c, 0xa1], &key),
            Err(RsaError::EncodingOverflow { .. })
        ));
    }

    #[test]
    fn test_encrypt_string_is_deterministic() {
        let key = textbook_key();
        let first = encrypt_string("A", &key).unwrap();
        let second = encrypt_string("A", &key).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, "A");
    }
}
