//! The five reversible transform stages and their factory.
//!
//! Each stage is a variant of [`Operation`] owning its parameters as
//! plain data: permutation tables, a direction flag, a modulus width.
//! Parameters are drawn once at factory time and never redrawn during
//! application, so `apply_forward` and `apply_inverse` are pure functions
//! of the buffer and mutual inverses over block-aligned input.
//!
//! Kind selection and scalar parameters come from the shared bit-stream
//! generator; permutation tables come from separate generators seeded
//! with `seed + stage_index`, so table construction never advances the
//! shared stream. Draw order is identical for encryption and decryption.

use crate::params::ShapeParams;
use crate::random::mersenne_twister::MersenneTwister64;
use crate::utils::bits;
use crate::utils::block::{read_block, write_block};

/// One reversible byte-transform stage of the cipher pipeline.
///
/// The stage owns every parameter it needs; applying it draws nothing
/// from any generator. `apply_inverse(apply_forward(b)) == b` holds for
/// every buffer `b` whose length is a multiple of the stage's block size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operation {
    /// Byte-wise substitution through a 256-entry permutation table.
    Substitute {
        table: [u8; 256],
        inverse: [u8; 256],
    },
    /// Intra-block byte reordering through a `block_size`-entry permutation.
    Permute {
        table: Vec<usize>,
        inverse: Vec<usize>,
    },
    /// Circular bit rotation of each block as a big-endian integer.
    Rotate {
        left: bool,
        step: u32,
        block_size: usize,
    },
    /// Modular addition of one block half into the other, over the low
    /// `modulus_bits` bits of each half.
    ModularCombine {
        combine_left: bool,
        modulus_bits: u32,
        block_size: usize,
    },
    /// XOR of one block half into the other. Self-inverse.
    XorCombine {
        combine_left: bool,
        block_size: usize,
    },
}

impl Operation {
    /// Applies the stage in the encryption direction.
    ///
    /// # Parameters
    /// - `buf`: The message buffer; its length must be a multiple of the
    ///   stage's block size (guaranteed by padding upstream).
    pub(crate) fn apply_forward(&self, buf: &mut [u8]) {
        match self {
            Operation::Substitute { table, .. } => substitute(buf, table),
            Operation::Permute { table, .. } => permute(buf, table),
            Operation::Rotate {
                left,
                step,
                block_size,
            } => rotate(buf, *block_size, *step, *left),
            Operation::ModularCombine {
                combine_left,
                modulus_bits,
                block_size,
            } => modular_combine(buf, *block_size, *modulus_bits, *combine_left, true),
            Operation::XorCombine {
                combine_left,
                block_size,
            } => xor_combine(buf, *block_size, *combine_left),
        }
    }

    /// Applies the stage in the decryption direction.
    ///
    /// Exact inverse of [`apply_forward`](Self::apply_forward): inverse
    /// tables for the substitutions, opposite rotation direction, modular
    /// subtraction instead of addition. XorCombine is its own inverse.
    pub(crate) fn apply_inverse(&self, buf: &mut [u8]) {
        match self {
            Operation::Substitute { inverse, .. } => substitute(buf, inverse),
            Operation::Permute { inverse, .. } => permute(buf, inverse),
            Operation::Rotate {
                left,
                step,
                block_size,
            } => rotate(buf, *block_size, *step, !*left),
            Operation::ModularCombine {
                combine_left,
                modulus_bits,
                block_size,
            } => modular_combine(buf, *block_size, *modulus_bits, *combine_left, false),
            Operation::XorCombine {
                combine_left,
                block_size,
            } => xor_combine(buf, *block_size, *combine_left),
        }
    }
}

/// Builds the ordered stage pipeline for one encrypt or decrypt call.
///
/// For each stage index, a kind is drawn uniformly from the five variants
/// off the shared generator, followed by that kind's scalar draws (also
/// shared). Table-based kinds seed a fresh generator with
/// `seed + stage_index` instead, keeping the shared stream position
/// independent of how many tables get built.
///
/// # Parameters
/// - `engine`: The shared generator, already past the shape draws.
/// - `seed`: The key seed, used to derive per-stage table seeds.
/// - `shape`: The derived shape parameters.
///
/// # Returns
/// `shape.operation_count` stages in encryption order.
pub(crate) fn generate_operations(
    engine: &mut MersenneTwister64,
    seed: u64,
    shape: &ShapeParams,
) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(shape.operation_count);
    for index in 0..shape.operation_count {
        let table_seed = seed.wrapping_add(index as u64);
        let operation = match engine.next_bounded(5) {
            0 => {
                let table = shuffled_byte_table(table_seed);
                let mut inverse = [0u8; 256];
                for (value, &mapped) in table.iter().enumerate() {
                    inverse[mapped as usize] = value as u8;
                }
                Operation::Substitute { table, inverse }
            }
            1 => {
                let table = shuffled_indices(shape.block_size, table_seed);
                let mut inverse = vec![0usize; shape.block_size];
                for (position, &mapped) in table.iter().enumerate() {
                    inverse[mapped] = position;
                }
                Operation::Permute { table, inverse }
            }
            2 => Operation::Rotate {
                left: engine.next_bounded(2) == 1,
                step: shape.rotation_step,
                block_size: shape.block_size,
            },
            3 => {
                let combine_left = engine.next_bounded(2) == 1;
                let mid = (shape.block_size / 2) as u64;
                let modulus_bits = 8 * (engine.next_bounded(mid) + 1) as u32;
                Operation::ModularCombine {
                    combine_left,
                    modulus_bits,
                    block_size: shape.block_size,
                }
            }
            _ => Operation::XorCombine {
                combine_left: engine.next_bounded(2) == 1,
                block_size: shape.block_size,
            },
        };
        operations.push(operation);
    }
    operations
}

/// Builds a Fisher–Yates-shuffled permutation of all 256 byte values.
fn shuffled_byte_table(seed: u64) -> [u8; 256] {
    let mut engine = MersenneTwister64::with_seed(seed);
    let mut table = [0u8; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        *slot = i as u8;
    }
    for i in (1..256).rev() {
        let j = engine.next_bounded(i as u64 + 1) as usize;
        table.swap(i, j);
    }
    table
}

/// Builds a Fisher–Yates-shuffled permutation of `0..len`.
fn shuffled_indices(len: usize, seed: u64) -> Vec<usize> {
    let mut engine = MersenneTwister64::with_seed(seed);
    let mut table: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = engine.next_bounded(i as u64 + 1) as usize;
        table.swap(i, j);
    }
    table
}

/// Maps every byte of the buffer through the table.
fn substitute(buf: &mut [u8], table: &[u8; 256]) {
    for byte in buf.iter_mut() {
        *byte = table[*byte as usize];
    }
}

/// Reorders the bytes of each block: `out[base+j] = in[base+table[j]]`.
fn permute(buf: &mut [u8], table: &[usize]) {
    let block_size = table.len();
    assert!(
        buf.len().is_multiple_of(block_size),
        "buffer not block-aligned"
    );
    // Block sizes never exceed 8 bytes, so a stack scratch suffices.
    let mut scratch = [0u8; 8];
    for base in (0..buf.len()).step_by(block_size) {
        scratch[..block_size].copy_from_slice(&buf[base..base + block_size]);
        for (j, &source) in table.iter().enumerate() {
            buf[base + j] = scratch[source];
        }
    }
}

/// Rotates each block, read as a big-endian integer of `8 × block_size`
/// bits, by `step` bits in the given direction.
fn rotate(buf: &mut [u8], block_size: usize, step: u32, left: bool) {
    assert!(
        buf.len().is_multiple_of(block_size),
        "buffer not block-aligned"
    );
    let width = 8 * block_size as u32;
    for base in (0..buf.len()).step_by(block_size) {
        let value = read_block(buf, base, block_size);
        let rotated = if left {
            bits::rotate_left(value, step, width)
        } else {
            bits::rotate_right(value, step, width)
        };
        write_block(buf, base, rotated, block_size);
    }
}

/// Adds (or subtracts, when `add` is false) one half of each block into
/// the other, modulo `2^modulus_bits`.
///
/// Only the low `modulus_bits` bits of the target half — its trailing
/// `modulus_bits / 8` bytes in big-endian layout — are replaced; higher
/// bytes pass through untouched, which is what keeps the transform
/// invertible for every modulus width.
fn modular_combine(buf: &mut [u8], block_size: usize, modulus_bits: u32, combine_left: bool, add: bool) {
    assert!(
        buf.len().is_multiple_of(block_size),
        "buffer not block-aligned"
    );
    let mid = block_size / 2;
    let width_bytes = (modulus_bits / 8) as usize;
    let mask = bits::width_mask(modulus_bits);
    for base in (0..buf.len()).step_by(block_size) {
        let left_offset = base + mid - width_bytes;
        let right_offset = base + block_size - width_bytes;
        let left = read_block(buf, left_offset, width_bytes);
        let right = read_block(buf, right_offset, width_bytes);
        if combine_left {
            let combined = if add {
                left.wrapping_add(right)
            } else {
                left.wrapping_sub(right)
            };
            write_block(buf, left_offset, combined & mask, width_bytes);
        } else {
            let combined = if add {
                right.wrapping_add(left)
            } else {
                right.wrapping_sub(left)
            };
            write_block(buf, right_offset, combined & mask, width_bytes);
        }
    }
}

/// XORs one half of each block into the other.
fn xor_combine(buf: &mut [u8], block_size: usize, combine_left: bool) {
    assert!(
        buf.len().is_multiple_of(block_size),
        "buffer not block-aligned"
    );
    let mid = block_size / 2;
    for base in (0..buf.len()).step_by(block_size) {
        let left = read_block(buf, base, mid);
        let right = read_block(buf, base + mid, mid);
        if combine_left {
            write_block(buf, base, left ^ right, mid);
        } else {
            write_block(buf, base + mid, right ^ left, mid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fills a block-aligned buffer with deterministic pseudorandom bytes.
    fn random_buffer(engine: &mut MersenneTwister64, blocks: usize, block_size: usize) -> Vec<u8> {
        (0..blocks * block_size)
            .map(|_| engine.next_bounded(256) as u8)
            .collect()
    }

    fn assert_roundtrip(operation: &Operation, buf: &[u8]) {
        let mut work = buf.to_vec();
        operation.apply_forward(&mut work);
        operation.apply_inverse(&mut work);
        assert_eq!(work, buf, "inverse did not undo forward: {:?}", operation);
    }

    #[test]
    fn test_substitute_roundtrip() {
        let mut data_engine = MersenneTwister64::with_seed(1);
        for table_seed in [3u64, 77, 901] {
            let table = shuffled_byte_table(table_seed);
            let mut inverse = [0u8; 256];
            for (value, &mapped) in table.iter().enumerate() {
                inverse[mapped as usize] = value as u8;
            }
            let operation = Operation::Substitute { table, inverse };
            let buf = random_buffer(&mut data_engine, 16, 4);
            assert_roundtrip(&operation, &buf);
        }
    }

    #[test]
    fn test_substitute_table_is_bijection() {
        let table = shuffled_byte_table(42);
        let mut seen = [false; 256];
        for &value in table.iter() {
            assert!(!seen[value as usize], "duplicate table entry {}", value);
            seen[value as usize] = true;
        }
    }

    #[test]
    fn test_substitute_changes_bytes() {
        // A shuffled 256-entry table is the identity with probability ~0.
        let table = shuffled_byte_table(42);
        assert!(table.iter().enumerate().any(|(i, &v)| i as u8 != v));
    }

    #[test]
    fn test_permute_roundtrip() {
        let mut data_engine = MersenneTwister64::with_seed(2);
        for block_size in [2usize, 4, 6, 8] {
            for table_seed in [5u64, 88, 1234] {
                let table = shuffled_indices(block_size, table_seed);
                let mut inverse = vec![0usize; block_size];
                for (position, &mapped) in table.iter().enumerate() {
                    inverse[mapped] = position;
                }
                let operation = Operation::Permute { table, inverse };
                let buf = random_buffer(&mut data_engine, 9, block_size);
                assert_roundtrip(&operation, &buf);
            }
        }
    }

    #[test]
    fn test_permute_moves_whole_blocks_independently() {
        let table = vec![1usize, 0];
        let inverse = vec![1usize, 0];
        let operation = Operation::Permute { table, inverse };
        let mut buf = vec![1u8, 2, 3, 4];
        operation.apply_forward(&mut buf);
        assert_eq!(buf, vec![2, 1, 4, 3]);
    }

    #[test]
    fn test_rotate_roundtrip_both_directions() {
        let mut data_engine = MersenneTwister64::with_seed(3);
        for block_size in [2usize, 4, 6, 8] {
            for step in [1u32, 7, 15] {
                for left in [false, true] {
                    let operation = Operation::Rotate {
                        left,
                        step,
                        block_size,
                    };
                    let buf = random_buffer(&mut data_engine, 5, block_size);
                    assert_roundtrip(&operation, &buf);
                }
            }
        }
    }

    #[test]
    fn test_rotate_known_value() {
        let operation = Operation::Rotate {
            left: true,
            step: 8,
            block_size: 2,
        };
        let mut buf = vec![0xAB, 0xCD];
        operation.apply_forward(&mut buf);
        assert_eq!(buf, vec![0xCD, 0xAB]);
    }

    #[test]
    fn test_modular_combine_roundtrip() {
        let mut data_engine = MersenneTwister64::with_seed(4);
        for block_size in [2usize, 4, 6, 8] {
            let mid = block_size / 2;
            for units in 1..=mid {
                for combine_left in [false, true] {
                    let operation = Operation::ModularCombine {
                        combine_left,
                        modulus_bits: 8 * units as u32,
                        block_size,
                    };
                    let buf = random_buffer(&mut data_engine, 7, block_size);
                    assert_roundtrip(&operation, &buf);
                }
            }
        }
    }

    #[test]
    fn test_modular_combine_known_value() {
        // block 0x01 0xFF: left half 0x01 + right half 0xFF = 0x00 mod 256
        let operation = Operation::ModularCombine {
            combine_left: true,
            modulus_bits: 8,
            block_size: 2,
        };
        let mut buf = vec![0x01, 0xFF];
        operation.apply_forward(&mut buf);
        assert_eq!(buf, vec![0x00, 0xFF]);
        operation.apply_inverse(&mut buf);
        assert_eq!(buf, vec![0x01, 0xFF]);
    }

    #[test]
    fn test_modular_combine_narrow_modulus_preserves_high_bytes() {
        // 8-bit modulus on a 4-byte block touches one byte per half.
        let operation = Operation::ModularCombine {
            combine_left: true,
            modulus_bits: 8,
            block_size: 4,
        };
        let mut buf = vec![0xAA, 0x01, 0xBB, 0x02];
        operation.apply_forward(&mut buf);
        assert_eq!(buf, vec![0xAA, 0x03, 0xBB, 0x02]);
    }

    #[test]
    fn test_xor_combine_roundtrip() {
        let mut data_engine = MersenneTwister64::with_seed(5);
        for block_size in [2usize, 4, 6, 8] {
            for combine_left in [false, true] {
                let operation = Operation::XorCombine {
                    combine_left,
                    block_size,
                };
                let buf = random_buffer(&mut data_engine, 6, block_size);
                assert_roundtrip(&operation, &buf);
            }
        }
    }

    #[test]
    fn test_xor_combine_self_inverse() {
        let operation = Operation::XorCombine {
            combine_left: false,
            block_size: 4,
        };
        let original = vec![0xDE, 0xAD, 0xBE, 0xEF];
        let mut forward_twice = original.clone();
        operation.apply_forward(&mut forward_twice);
        operation.apply_forward(&mut forward_twice);
        assert_eq!(forward_twice, original);
    }

    #[test]
    fn test_factory_deterministic() {
        let shape = ShapeParams {
            block_size: 4,
            operation_count: 10,
            rotation_step: 5,
        };
        let mut e1 = MersenneTwister64::with_seed(777);
        let mut e2 = MersenneTwister64::with_seed(777);
        let ops1 = generate_operations(&mut e1, 777, &shape);
        let ops2 = generate_operations(&mut e2, 777, &shape);
        assert_eq!(ops1, ops2);
    }

    #[test]
    fn test_factory_produces_requested_count() {
        let shape = ShapeParams {
            block_size: 6,
            operation_count: 7,
            rotation_step: 3,
        };
        let mut engine = MersenneTwister64::with_seed(1);
        assert_eq!(generate_operations(&mut engine, 1, &shape).len(), 7);
    }

    #[test]
    fn test_factory_covers_all_kinds() {
        // Across enough seeds every one of the five kinds must appear.
        let shape = ShapeParams {
            block_size: 4,
            operation_count: 10,
            rotation_step: 5,
        };
        let mut seen = [false; 5];
        for seed in 0..50u64 {
            let mut engine = MersenneTwister64::with_seed(seed);
            for operation in generate_operations(&mut engine, seed, &shape) {
                let tag = match operation {
                    Operation::Substitute { .. } => 0,
                    Operation::Permute { .. } => 1,
                    Operation::Rotate { .. } => 2,
                    Operation::ModularCombine { .. } => 3,
                    Operation::XorCombine { .. } => 4,
                };
                seen[tag] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "some operation kind never drawn");
    }

    #[test]
    fn test_pipeline_roundtrip_random_sequences() {
        // Whole generated pipelines must invert stage by stage in reverse.
        for seed in [11u64, 2222, 333333] {
            let mut engine = MersenneTwister64::with_seed(seed);
            let shape = crate::params::draw_shape(&mut engine);
            let operations = generate_operations(&mut engine, seed, &shape);

            let mut data_engine = MersenneTwister64::with_seed(seed ^ 0xFFFF);
            let original = random_buffer(&mut data_engine, 12, shape.block_size);
            let mut work = original.clone();
            for operation in operations.iter() {
                operation.apply_forward(&mut work);
            }
            for operation in operations.iter().rev() {
                operation.apply_inverse(&mut work);
            }
            assert_eq!(work, original, "pipeline roundtrip failed for seed {}", seed);
        }
    }

    #[test]
    fn test_modulus_width_within_half() {
        let shape = ShapeParams {
            block_size: 8,
            operation_count: 10,
            rotation_step: 2,
        };
        for seed in 0..30u64 {
            let mut engine = MersenneTwister64::with_seed(seed);
            for operation in generate_operations(&mut engine, seed, &shape) {
                if let Operation::ModularCombine { modulus_bits, .. } = operation {
                    assert!((8..=32).contains(&modulus_bits));
                    assert!(modulus_bits.is_multiple_of(8));
                }
            }
        }
    }
}
