use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use log::{debug, info, warn};

use crate::config::Config;
use crate::error::{NgramError, Result};
use crate::io::{list_files, open_file};
use crate::model::{GramAccumulator, TextStats};

/// Result of processing one corpus file.
#[derive(Debug)]
pub struct FileOutcome {
	pub path: PathBuf,
	pub result: Result<TextStats>,
}

/// Merged statistics of a corpus, with the files that could not be read.
#[derive(Debug, Default)]
pub struct CorpusStats {
	pub stats: TextStats,
	pub files_processed: usize,
	pub failures: Vec<NgramError>,
}

/// Reads one file and counts its grams up to `order`.
///
/// Malformed UTF-8 is skipped and reported at debug level.
///
/// # Errors
/// Returns `Io` if the file cannot be opened or read.
pub fn read_file_stats<P: AsRef<Path>>(path: P, order: usize) -> Result<TextStats> {
	let path = path.as_ref();
	let mut accumulator = GramAccumulator::new(order)?;
	let reader = open_file(path)?;
	let skipped = accumulator
		.consume_reader(reader)
		.map_err(|e| NgramError::io(path, e))?;

	if skipped > 0 {
		debug!("File {} skipped {} malformed bytes", path.display(), skipped);
	}
	info!("File {} read {} runes.", path.display(), accumulator.runes_read());
	Ok(accumulator.finish())
}

/// Fixed-size pool of threads counting grams, one task per file.
///
/// Paths are pushed once into a job queue shared by the workers. Each worker
/// sends back one `FileOutcome` per file through a channel bounded to the
/// worker count. The calling thread drains exactly one outcome per file and
/// is the only one mutating the merged statistics.
///
/// # Error policy
/// - Default: a file that fails is logged, kept in `CorpusStats::failures`
///   and left out of the merge; the run goes on
/// - `fail_fast`: the first failure aborts the run with that error
#[derive(Clone, Debug)]
pub struct WorkerPool {
	workers: usize,
	order: usize,
	fail_fast: bool,
}

impl WorkerPool {
	/// Creates a pool of `workers` threads counting grams up to `order`.
	///
	/// A worker count of 0 is raised to 1.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order == 0`.
	pub fn new(workers: usize, order: usize) -> Result<Self> {
		if order == 0 {
			return Err(NgramError::InvalidOrder(order));
		}
		Ok(Self { workers: workers.max(1), order, fail_fast: false })
	}

	/// Builds a pool from a run configuration.
	pub fn from_config(config: &Config) -> Result<Self> {
		config.validate()?;
		Ok(Self::new(config.effective_workers(), config.order)?.fail_fast(config.fail_fast))
	}

	/// Sets whether the first failing file aborts the run.
	pub fn fail_fast(mut self, fail_fast: bool) -> Self {
		self.fail_fast = fail_fast;
		self
	}

	pub fn workers(&self) -> usize {
		self.workers
	}

	/// Processes every path and merges the results.
	///
	/// # Errors
	/// - The first file error, in `fail_fast` mode
	/// - `WorkerLost` if the workers stop before every file is accounted for
	pub fn run(&self, paths: Vec<PathBuf>) -> Result<CorpusStats> {
		let expected = paths.len();
		let mut corpus = CorpusStats::default();
		if expected == 0 {
			return Ok(corpus);
		}

		let (job_tx, job_rx) = mpsc::channel::<PathBuf>();
		for path in paths {
			// Cannot fail, the receiver is still alive
			let _ = job_tx.send(path);
		}
		drop(job_tx);
		let jobs = Arc::new(Mutex::new(job_rx));

		let (result_tx, result_rx) = mpsc::sync_channel::<FileOutcome>(self.workers);
		let mut handles = Vec::with_capacity(self.workers);
		for _ in 0..self.workers.min(expected) {
			let jobs = Arc::clone(&jobs);
			let result_tx = result_tx.clone();
			let order = self.order;

			handles.push(thread::spawn(move || {
				loop {
					let next = match jobs.lock() {
						Ok(queue) => queue.recv(),
						Err(_) => break,
					};
					let path = match next {
						Ok(path) => path,
						// Queue drained
						Err(_) => break,
					};
					let result = read_file_stats(&path, order);
					if result_tx.send(FileOutcome { path, result }).is_err() {
						// Collector gave up
						break;
					}
				}
			}));
		}
		drop(result_tx);

		for received in 0..expected {
			let outcome = match result_rx.recv() {
				Ok(outcome) => outcome,
				Err(_) => return Err(NgramError::WorkerLost { expected, received }),
			};
			match outcome.result {
				Ok(stats) => {
					corpus.stats.merge(stats);
					corpus.files_processed += 1;
				}
				Err(e) if self.fail_fast => return Err(e),
				Err(e) => {
					warn!("Skipping {}: {e}", outcome.path.display());
					corpus.failures.push(e);
				}
			}
		}

		for handle in handles {
			if handle.join().is_err() {
				warn!("A corpus worker panicked after delivering its results");
			}
		}

		info!(
			"Merged {} files ({} failed): {} grams, alphabet of {} symbols",
			corpus.files_processed,
			corpus.failures.len(),
			corpus.stats.grams().len(),
			corpus.stats.alphabet().len()
		);
		Ok(corpus)
	}
}

/// Lists the files of `dir` and builds the merged corpus statistics.
///
/// # Errors
/// Returns `NotADirectory`/`Io` if the directory cannot be listed, or any
/// error from `WorkerPool::run`.
pub fn build_corpus<P: AsRef<Path>>(dir: P, config: &Config) -> Result<CorpusStats> {
	let pool = WorkerPool::from_config(config)?;
	let files = list_files(&dir, config.extension.as_deref())?;
	info!(
		"Reading {} files from {} with {} workers",
		files.len(),
		dir.as_ref().display(),
		pool.workers()
	);
	pool.run(files)
}
