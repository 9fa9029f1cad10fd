//! Reversible trailing-byte padding to a whole number of blocks.
//!
//! `pad` always appends at least one byte — an already-aligned message
//! receives a full block of padding — so `unpad` can always read the pad
//! length from the final byte. `unpad` is deliberately lenient: a trailing
//! byte that cannot be a pad length (zero, or larger than the block size)
//! leaves the data untouched instead of failing, matching the original
//! tool's behavior on truncated or corrupted ciphertext.

/// Pads `data` to a multiple of `block_size` by appending `p` bytes of
/// value `p`, where `p = block_size − len % block_size`.
///
/// When `data` is already block-aligned, a full `block_size`-byte padding
/// block is appended; zero bytes of padding are never produced.
///
/// # Parameters
/// - `data`: The message bytes to pad.
/// - `block_size`: Target block width in bytes (at least 1).
///
/// # Returns
/// A new buffer of length `data.len() + p`, a multiple of `block_size`.
pub(crate) fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    debug_assert!(block_size >= 1, "block_size must be at least 1");
    let p = block_size - data.len() % block_size;
    let mut padded = Vec::with_capacity(data.len() + p);
    padded.extend_from_slice(data);
    padded.resize(data.len() + p, p as u8);
    padded
}

/// Removes the trailing padding written by [`pad`].
///
/// Reads the final byte as the pad length `p` and drops the last `p`
/// bytes. Empty input, `p == 0`, `p > block_size` and `p` exceeding the
/// data length all return the data unchanged rather than failing —
/// corrupted padding is silently passed through.
///
/// # Parameters
/// - `data`: The padded bytes.
/// - `block_size`: Block width in bytes used when padding.
///
/// # Returns
/// The data with padding removed, or the unmodified data when the
/// trailing byte is not a plausible pad length.
pub(crate) fn unpad(data: &[u8], block_size: usize) -> Vec<u8> {
    let Some(&last) = data.last() else {
        return Vec::new();
    };
    let p = last as usize;
    if p == 0 || p > block_size || p > data.len() {
        return data.to_vec();
    }
    data[..data.len() - p].to_vec()
}
