//! Fixed-width big-endian integer access into a byte buffer.
//!
//! Every operation kind that reads a block (or a sub-block half) as an
//! integer routes through this pair, so the whole pipeline agrees on
//! big-endian byte order.

/// Reads `width` consecutive bytes at `offset` as a big-endian unsigned
/// integer.
///
/// # Parameters
/// - `buf`: Source byte buffer.
/// - `offset`: Index of the first byte to read.
/// - `width`: Number of bytes to read (1..=8).
///
/// # Panics
/// Panics if `width` is 0 or greater than 8, or if `offset + width`
/// exceeds the buffer length. Out-of-range access indicates a broken
/// alignment invariant upstream (padding guarantees every buffer reaching
/// an operation is a whole number of blocks), so it is a contract
/// violation rather than a recoverable error.
pub(crate) fn read_block(buf: &[u8], offset: usize, width: usize) -> u64 {
    assert!((1..=8).contains(&width), "block width out of range");
    assert!(
        offset + width <= buf.len(),
        "block read past end of buffer"
    );
    let mut value: u64 = 0;
    for &byte in &buf[offset..offset + width] {
        value = (value << 8) | byte as u64;
    }
    value
}

/// Writes the low `width` bytes of `value` at `offset`, big-endian.
///
/// # Parameters
/// - `buf`: Destination byte buffer.
/// - `offset`: Index of the first byte to write.
/// - `value`: Value whose low `width` bytes are stored.
/// - `width`: Number of bytes to write (1..=8).
///
/// # Panics
/// Panics under the same conditions as [`read_block`].
pub(crate) fn write_block(buf: &mut [u8], offset: usize, value: u64, width: usize) {
    assert!((1..=8).contains(&width), "block width out of range");
    assert!(
        offset + width <= buf.len(),
        "block write past end of buffer"
    );
    for i in 0..width {
        buf[offset + i] = (value >> (8 * (width - 1 - i))) as u8;
    }
}
