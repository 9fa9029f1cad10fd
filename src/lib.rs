//! StrataCrypt layered block-transform cipher engine.
//!
//! StrataCrypt derives a pipeline of reversible byte-level transforms from
//! a secret key and applies them in order to encrypt, and in exact reverse
//! order to decrypt. The key alone determines the block size, the number
//! of pipeline stages, and every per-stage parameter; no schedule is ever
//! stored alongside the ciphertext.
//!
//! # Architecture
//!
//! ```text
//! key (first 8 bytes, big-endian)
//!     ↓ seed
//! MersenneTwister64  (deterministic bit-stream — shape + stage parameters)
//!     ↓
//! Operation factory  (Substitute / Permute / Rotate / ModularCombine / XorCombine)
//!     ↓ ordered pipeline
//! Cipher driver      (pad → forward stages → hex; hex → reverse stages → unpad)
//! ```
//!
//! The construction is a teaching cipher: deterministic, unauthenticated,
//! ECB-style. It must never be used to protect real secrets.
//!
//! # Examples
//!
//! Encrypt and decrypt a message:
//!
//! ```
//! let ciphertext = stratacrypt::encrypt("attack at dawn", "my secret key").unwrap();
//! let plaintext = stratacrypt::decrypt(&ciphertext, "my secret key").unwrap();
//! assert_eq!(plaintext, "attack at dawn");
//! ```
//!
//! Keys shorter than 8 bytes are rejected before any transform runs:
//!
//! ```
//! use stratacrypt::error::StrataCryptError;
//!
//! let result = stratacrypt::encrypt("hello", "1234567");
//! assert_eq!(result, Err(StrataCryptError::KeyTooShort));
//! ```

#![deny(clippy::all)]

pub mod error;

mod encoding;
mod operation;
mod padding;
mod params;
pub(crate) mod random;
mod stratacrypt;
pub(crate) mod utils;

pub use stratacrypt::{decrypt, decrypt_bytes, encrypt, encrypt_bytes};
