//! Character n-gram model: accumulation, merge, sampling and generation.
//!
//! This module provides:
//! - Per-text gram counting (`GramAccumulator`)
//! - Mergeable frequency statistics (`TextStats`)
//! - Weighted next-symbol sampling with order backoff (`Sampler`)
//! - A high-level text generator (`Generator`)

/// Rolling-window gram counter over a code point stream.
///
/// Produces the counts of every gram of length 1..=K ending at each position.
pub mod accumulator;

/// Generation of fixed-length samples with a sliding context window.
pub mod generator;

/// Next-symbol sampling with backoff toward shorter contexts.
pub mod sampler;

/// Frequency table and alphabet, with commutative merge.
pub mod text_stats;

pub use accumulator::GramAccumulator;
pub use generator::Generator;
pub use sampler::{Prediction, Sampler};
pub use text_stats::{AlphabetSet, FrequencyTable, TextStats};
