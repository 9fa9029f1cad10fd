//! Cipher driver: the public encrypt/decrypt surface.
//!
//! Every call is a single straight-line pass that re-derives the full
//! pipeline from the key — seed, shape parameters, stage sequence — and
//! folds it over the message buffer. No state survives between calls and
//! no entropy enters from outside the key, so identical inputs always
//! produce identical output.

use crate::encoding::{from_hex, to_hex};
use crate::error::StrataCryptError;
use crate::operation::{generate_operations, Operation};
use crate::padding::{pad, unpad};
use crate::params::{derive_seed, draw_shape, ShapeParams};
use crate::random::mersenne_twister::MersenneTwister64;

/// The fully derived pipeline for one call: shape plus ordered stages.
struct Pipeline {
    shape: ShapeParams,
    operations: Vec<Operation>,
}

/// Derives the complete pipeline from the key.
///
/// Generation is identical regardless of direction: one shared generator
/// seeded from the key serves the shape draws and then the stage draws,
/// in a fixed order.
fn build_pipeline(key: &str) -> Result<Pipeline, StrataCryptError> {
    let seed = derive_seed(key)?;
    let mut engine = MersenneTwister64::with_seed(seed);
    let shape = draw_shape(&mut engine);
    let operations = generate_operations(&mut engine, seed, &shape);
    Ok(Pipeline { shape, operations })
}

/// Encrypts a byte buffer with the given key.
///
/// The buffer is padded to a whole number of blocks, then every stage of
/// the key-derived pipeline is applied in generation order.
///
/// # Parameters
/// - `data`: The plaintext bytes.
/// - `key`: The key string; must encode to at least 8 UTF-8 bytes.
///
/// # Returns
/// The transformed bytes, always a non-empty multiple of the derived
/// block size.
///
/// # Errors
/// Returns [`StrataCryptError::KeyTooShort`] if the key is under 8 bytes;
/// the check runs before any transform.
pub fn encrypt_bytes(data: &[u8], key: &str) -> Result<Vec<u8>, StrataCryptError> {
    let pipeline = build_pipeline(key)?;
    let mut buffer = pad(data, pipeline.shape.block_size);
    for operation in pipeline.operations.iter() {
        operation.apply_forward(&mut buffer);
    }
    Ok(buffer)
}

/// Decrypts a byte buffer with the given key.
///
/// Re-derives the same pipeline as [`encrypt_bytes`] and applies each
/// stage's inverse in reverse generation order, then strips padding.
///
/// # Parameters
/// - `data`: The ciphertext bytes.
/// - `key`: The key string; must encode to at least 8 UTF-8 bytes.
///
/// # Errors
/// Returns [`StrataCryptError::KeyTooShort`] if the key is under 8 bytes,
/// or [`StrataCryptError::InvalidBlockLength`] if `data` is not a whole
/// number of derived blocks (truncated or foreign ciphertext).
pub fn decrypt_bytes(data: &[u8], key: &str) -> Result<Vec<u8>, StrataCryptError> {
    let pipeline = build_pipeline(key)?;
    if !data.len().is_multiple_of(pipeline.shape.block_size) {
        return Err(StrataCryptError::InvalidBlockLength);
    }
    let mut buffer = data.to_vec();
    for operation in pipeline.operations.iter().rev() {
        operation.apply_inverse(&mut buffer);
    }
    Ok(unpad(&buffer, pipeline.shape.block_size))
}

/// Encrypts a UTF-8 message to a lowercase hex ciphertext string.
///
/// # Parameters
/// - `message`: The plaintext.
/// - `key`: The key string; must encode to at least 8 UTF-8 bytes.
///
/// # Errors
/// Returns [`StrataCryptError::KeyTooShort`] if the key is under 8 bytes.
///
/// # Examples
///
/// ```
/// let ciphertext = stratacrypt::encrypt("AB", "testkey1").unwrap();
/// assert_eq!(stratacrypt::decrypt(&ciphertext, "testkey1").unwrap(), "AB");
/// ```
pub fn encrypt(message: &str, key: &str) -> Result<String, StrataCryptError> {
    let transformed = encrypt_bytes(message.as_bytes(), key)?;
    Ok(to_hex(&transformed))
}

/// Decrypts a hex ciphertext string back to the UTF-8 plaintext.
///
/// # Parameters
/// - `ciphertext`: Hex text produced by [`encrypt`].
/// - `key`: The key string; must encode to at least 8 UTF-8 bytes.
///
/// # Errors
/// - [`StrataCryptError::KeyTooShort`] if the key is under 8 bytes.
/// - [`StrataCryptError::InvalidHex`] if the ciphertext is not valid hex.
/// - [`StrataCryptError::InvalidBlockLength`] if the decoded bytes are
///   not a whole number of derived blocks.
/// - [`StrataCryptError::InvalidUtf8`] if the recovered bytes are not
///   valid UTF-8 (typically a wrong key).
pub fn decrypt(ciphertext: &str, key: &str) -> Result<String, StrataCryptError> {
    let bytes = from_hex(ciphertext)?;
    let recovered = decrypt_bytes(&bytes, key)?;
    String::from_utf8(recovered).map_err(|_| StrataCryptError::InvalidUtf8)
}
