// RSA Error Types
// One variant per failure mode of the core

use thiserror::Error;

/// Errors produced by key generation, encryption and decryption
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RsaError {
    #[error("No {bits}-bit probable prime found after {attempts} candidates")]
    PrimeGeneration { bits: u64, attempts: usize },

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Message too large for modulus: {message_bytes} bytes against a {modulus_bits}-bit modulus")]
    EncodingOverflow {
        message_bytes: usize,
        modulus_bits: u64,
    },

    #[error("Corrupted ciphertext: {0}")]
    DecodingCorruption(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<base64::DecodeError> for RsaError {
    fn from(e: base64::DecodeError) -> Self {
        RsaError::DecodingCorruption(format!("invalid base64: {}", e))
    }
}

impl From<std::string::FromUtf8Error> for RsaError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        RsaError::DecodingCorruption(format!("invalid UTF-8: {}", e))
    }
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;
