//! Character n-gram corpus model and text generator.
//!
//! This crate provides:
//! - Streaming UTF-8 decoding of corpus files
//! - Concurrent per-file gram counting with a single-threaded merge
//! - Probabilistic generation with order backoff and seedable randomness
//! - Run configuration and error types
//!
//! A typical run lists a directory, builds the corpus statistics with
//! `pool::build_corpus`, then draws samples with `model::Generator`.

/// Run configuration (order, workers, samples, error policy).
pub mod config;

/// Error types shared by every stage.
pub mod error;

/// Directory helpers (folder normalization, file listing).
pub mod io;

/// Gram counting, statistics, sampling and generation.
pub mod model;

/// Worker pool reading corpus files concurrently.
pub mod pool;

/// Incremental UTF-8 decoder that skips malformed input.
pub mod rune_reader;

pub use config::Config;
pub use error::{NgramError, Result};
