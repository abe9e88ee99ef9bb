use crate::error::{NgramError, Result};

/// Default maximum gram order.
pub const DEFAULT_ORDER: usize = 8;
/// Default number of worker threads.
pub const DEFAULT_WORKERS: usize = 8;
/// Default number of generated samples.
pub const DEFAULT_SAMPLES: usize = 5;
/// Default sample length, in code points.
pub const DEFAULT_SAMPLE_LENGTH: usize = 500;

/// Run configuration shared by the corpus loader and the generator.
///
/// # Invariants
/// - `order >= 1` once `validate` succeeded
/// - `workers == 0` means "one worker per CPU"
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
	/// Maximum gram order (K).
	pub order: usize,
	/// Worker threads used to read the corpus.
	pub workers: usize,
	/// Number of samples to generate.
	pub samples: usize,
	/// Length of each sample, in code points.
	pub sample_length: usize,
	/// Optional RNG seed for reproducible output.
	pub seed: Option<u64>,
	/// Abort the whole run on the first unreadable file.
	pub fail_fast: bool,
	/// Only read files with this extension (no leading dot).
	pub extension: Option<String>,
	/// Grams whose counts are printed in the report.
	pub probes: Vec<String>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			order: DEFAULT_ORDER,
			workers: DEFAULT_WORKERS,
			samples: DEFAULT_SAMPLES,
			sample_length: DEFAULT_SAMPLE_LENGTH,
			seed: None,
			fail_fast: false,
			extension: None,
			probes: vec!["это".to_owned(), "кес".to_owned(), "\n".to_owned()],
		}
	}
}

impl Config {
	/// Checks the values that would make the run meaningless.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order == 0`.
	pub fn validate(&self) -> Result<()> {
		if self.order == 0 {
			return Err(NgramError::InvalidOrder(self.order));
		}
		Ok(())
	}

	/// Resolves the worker count, `0` meaning the number of logical CPUs.
	pub fn effective_workers(&self) -> usize {
		if self.workers == 0 {
			num_cpus::get().max(1)
		} else {
			self.workers
		}
	}
}
