//! Circular bit rotation within an arbitrary sub-width of a `u64`.
//!
//! The cipher's rotate stage treats each block as a big-endian unsigned
//! integer of `8 × block_size` bits, so rotations must wrap at the block's
//! bit width (16, 32, 48 or 64 bits) rather than at the native 64 bits.

/// Rotates the low `bits` of `value` left by `shift` positions (circular).
///
/// Bits above `bits` are masked off before and after the rotation, so the
/// result always fits the block width. `bits == 64` uses the full native
/// width with no masking.
///
/// # Parameters
/// - `value`: The value to rotate; only the low `bits` are significant.
/// - `shift`: Number of bit positions to rotate; must be less than `bits`.
/// - `bits`: Width of the rotation window (1..=64).
///
/// # Panics
/// Panics if `bits` is 0, exceeds 64, or `shift >= bits`. Callers derive
/// `shift` from the rotation step, which the parameter generator bounds
/// below the smallest block width.
pub(crate) fn rotate_left(value: u64, shift: u32, bits: u32) -> u64 {
    assert!((1..=64).contains(&bits), "rotation width out of range");
    assert!(shift < bits, "shift must be below the rotation width");
    let mask = width_mask(bits);
    if shift == 0 {
        return value & mask;
    }
    let value = value & mask;
    ((value << shift) | (value >> (bits - shift))) & mask
}

/// Rotates the low `bits` of `value` right by `shift` positions (circular).
///
/// Exact inverse of [`rotate_left`] for the same `shift` and `bits`.
///
/// # Parameters
/// - `value`: The value to rotate; only the low `bits` are significant.
/// - `shift`: Number of bit positions to rotate; must be less than `bits`.
/// - `bits`: Width of the rotation window (1..=64).
///
/// # Panics
/// Panics under the same conditions as [`rotate_left`].
pub(crate) fn rotate_right(value: u64, shift: u32, bits: u32) -> u64 {
    assert!((1..=64).contains(&bits), "rotation width out of range");
    assert!(shift < bits, "shift must be below the rotation width");
    let mask = width_mask(bits);
    if shift == 0 {
        return value & mask;
    }
    let value = value & mask;
    ((value >> shift) | (value << (bits - shift))) & mask
}

/// Returns the all-ones mask covering the low `bits` of a `u64`.
pub(crate) fn width_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
