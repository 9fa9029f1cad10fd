//! Hex text codec for ciphertext transport.
//!
//! The driver hands callers lowercase hex rather than raw bytes, so
//! ciphertext survives any text-entry surface. Pure and independent of
//! the cipher: `from_hex(to_hex(x)) == x` for arbitrary input.

use crate::error::StrataCryptError;

/// Encodes bytes as a lowercase hex string, two digits per byte.
pub(crate) fn to_hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Decodes a hex string to bytes. Accepts upper- and lowercase digits.
///
/// # Errors
/// Returns [`StrataCryptError::InvalidHex`] if the input has odd length
/// or contains a non-hexadecimal character.
pub(crate) fn from_hex(encoded: &str) -> Result<Vec<u8>, StrataCryptError> {
    if !encoded.len().is_multiple_of(2) {
        return Err(StrataCryptError::InvalidHex);
    }
    if !encoded.is_ascii() {
        return Err(StrataCryptError::InvalidHex);
    }
    (0..encoded.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&encoded[i..i + 2], 16)
                .map_err(|_| StrataCryptError::InvalidHex)
        })
        .collect()
}
