// RSA Service
// String-in, string-out operations for callers that store keys as text

use rand::thread_rng;

use crate::config::RsaConfig;
use crate::error::RsaResult;
use crate::rsa::decrypt::{decrypt_text_to_bytes, decrypt_to_string};
use crate::rsa::encrypt::encrypt_string;
use crate::rsa::keygen::{generate_keypair, EncodedKeyPair, RsaPrivateKey, RsaPublicKey};

/// Key generation, encryption and decryption over decimal-string keys
///
/// Holds only immutable configuration, so one instance can be shared
/// across threads. Each key generation draws from the calling thread's
/// CSPRNG.
#[derive(Debug, Clone, Default)]
pub struct RsaService {
    config: RsaConfig,
}

impl RsaService {
    pub fn new(config: RsaConfig) -> RsaResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RsaConfig {
        &self.config
    }

    /// Generate a key pair with an n of `bit_length` bits
    pub fn generate_key_pair(&self, bit_length: u64) -> RsaResult<EncodedKeyPair> {
        let mut rng = thread_rng();
        let keypair = generate_keypair(bit_length, &self.config, &mut rng)?;
        Ok(keypair.to_encoded())
    }

    /// Generate a key pair of the configured default size
    pub fn generate_default_key_pair(&self) -> RsaResult<EncodedKeyPair> {
        self.generate_key_pair(self.config.default_key_bits)
    }

    /// Encrypt `plaintext` under (e, n); returns base64 text
    pub fn encrypt(&self, plaintext: &str, e: &str, n: &str) -> RsaResult<String> {
        let public_key = RsaPublicKey::from_decimal(e, n)?;
        encrypt_string(plaintext, &public_key)
    }

    /// Decrypt base64 text under (d, n) back to the original string
    pub fn decrypt(&self, ciphertext: &str, d: &str, n: &str) -> RsaResult<String> {
        let private_key = RsaPrivateKey::from_decimal(d, n)?;
        decrypt_to_string(ciphertext, &private_key)
    }

    /// Like `decrypt`, without requiring the plaintext to be UTF-8
    pub fn decrypt_bytes(&self, ciphertext: &str, d: &str, n: &str) -> RsaResult<Vec<u8>> {
        let private_key = RsaPrivateKey::from_decimal(d, n)?;
        decrypt_text_to_bytes(ciphertext, &private_key)
    }
}
