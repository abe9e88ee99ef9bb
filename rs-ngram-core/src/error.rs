//! Error types for corpus loading, accumulation and generation.

use std::path::PathBuf;
use std::{fmt, io};

/// Errors that can occur while building or sampling an n-gram model.
#[derive(Debug)]
pub enum NgramError {
	/// The maximum gram order must be at least 1.
	InvalidOrder(usize),
	/// The corpus path does not exist or is not a directory.
	NotADirectory(PathBuf),
	/// A file or directory could not be opened or read.
	Io { path: PathBuf, source: io::Error },
	/// The worker pool stopped before delivering every expected result.
	WorkerLost { expected: usize, received: usize },
	/// A stored gram has a count below 1.
	CorruptCount { gram: String },
	/// The model has no data to sample from (empty corpus or empty alphabet).
	NoData,
}

impl NgramError {
	/// Wraps an I/O error with the path it happened on.
	pub fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}
}

impl fmt::Display for NgramError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::InvalidOrder(n) => write!(f, "gram order must be >= 1, got {n}"),
			Self::NotADirectory(path) => write!(f, "expected a directory, got: {}", path.display()),
			Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
			Self::WorkerLost { expected, received } => {
				write!(f, "worker pool stopped early: received {received} of {expected} results")
			}
			Self::CorruptCount { gram } => write!(f, "non-positive count detected for gram {gram:?}"),
			Self::NoData => write!(f, "model has no data: cannot sample from an empty corpus"),
		}
	}
}

impl std::error::Error for NgramError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io { source, .. } => Some(source),
			_ => None,
		}
	}
}

pub type Result<T> = std::result::Result<T, NgramError>;
