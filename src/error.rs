//! Error types for the StrataCrypt library.

use std::fmt;

/// Errors produced by the StrataCrypt library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrataCryptError {
    /// Key is shorter than the 8 bytes required to derive a seed.
    KeyTooShort,
    /// Ciphertext text is not valid hexadecimal.
    InvalidHex,
    /// Byte length is not a multiple of the derived block size.
    InvalidBlockLength,
    /// Decrypted bytes do not form a valid UTF-8 string.
    InvalidUtf8,
}

impl fmt::Display for StrataCryptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrataCryptError::KeyTooShort => {
                write!(f, "Key must be at least 8 bytes long")
            }
            StrataCryptError::InvalidHex => {
                write!(f, "Ciphertext is not valid hexadecimal text")
            }
            StrataCryptError::InvalidBlockLength => {
                write!(
                    f,
                    "Data length is not a multiple of the cipher block size"
                )
            }
            StrataCryptError::InvalidUtf8 => {
                write!(f, "Decrypted bytes are not valid UTF-8")
            }
        }
    }
}

impl std::error::Error for StrataCryptError {}
