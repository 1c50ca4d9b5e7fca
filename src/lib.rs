//! Textbook RSA over arbitrary-precision integers.
//!
//! Probable prime generation, key pair derivation and the raw
//! `m^e mod n` / `c^d mod n` transform, plus the codec that carries text
//! through it as base64. No padding scheme is applied and nothing is
//! constant-time: this is the bare primitive, not a messaging protocol.
//!
//! ```no_run
//! use textbook_rsa::RsaService;
//!
//! let service = RsaService::default();
//! let keys = service.generate_key_pair(2048)?;
//! let ciphertext = service.encrypt("hello", &keys.e, &keys.n)?;
//! assert_eq!(service.decrypt(&ciphertext, &keys.d, &keys.n)?, "hello");
//! # Ok::<(), textbook_rsa::RsaError>(())
//! ```

pub mod config;
pub mod error;
pub mod rsa;
pub mod service;

pub use config::RsaConfig;
pub use error::{RsaError, RsaResult};
pub use rsa::{EncodedKeyPair, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use service::RsaService;
