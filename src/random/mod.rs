//! Deterministic random number generation for StrataCrypt.
//!
//! Provides the seeded bit-stream generator that drives shape-parameter
//! derivation and operation-pipeline construction.

pub(crate) mod mersenne_twister;
