// RSA Module - Main module file
// Exports the raw RSA primitive: primes, keys, transform and codec

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;

pub use bigint::{generate_prime, is_probable_prime, mod_inverse, mod_pow, RsaBigInt};
pub use decrypt::{decrypt_bytes, decrypt_integer, decrypt_text_to_bytes, decrypt_to_string};
pub use encrypt::{encrypt_bytes, encrypt_integer, encrypt_string};
pub use keygen::{
    derive_keypair, generate_keypair, EncodedKeyPair, RsaKeyPair, RsaPrivateKey, RsaPublicKey,
};
