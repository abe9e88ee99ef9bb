use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_ngram_core::config::{Config, DEFAULT_ORDER, DEFAULT_SAMPLES, DEFAULT_SAMPLE_LENGTH, DEFAULT_WORKERS};
use rs_ngram_core::io::{ensure_dir, normalize_folder};
use rs_ngram_core::model::{Generator, TextStats};
use rs_ngram_core::pool::build_corpus;
use rs_ngram_core::NgramError;

/// Builds a character n-gram model from a folder of text files and prints
/// generated samples.
#[derive(Parser)]
#[command(name = "rs-ngram")]
#[command(about = "Character n-gram statistics and text generation", long_about = None)]
struct Cli {
	/// Folder with text files (asked for interactively if omitted)
	dir: Option<PathBuf>,

	/// Maximum gram order
	#[arg(short, long, default_value_t = DEFAULT_ORDER)]
	order: usize,

	/// Worker threads reading the corpus (0 = one per CPU)
	#[arg(short, long, default_value_t = DEFAULT_WORKERS)]
	workers: usize,

	/// Number of samples to generate
	#[arg(short, long, default_value_t = DEFAULT_SAMPLES)]
	samples: usize,

	/// Length of each sample, in characters
	#[arg(short, long, default_value_t = DEFAULT_SAMPLE_LENGTH)]
	length: usize,

	/// Seed for reproducible samples
	#[arg(long)]
	seed: Option<u64>,

	/// Stop at the first file that cannot be read
	#[arg(long)]
	fail_fast: bool,

	/// Only read files with this extension
	#[arg(short, long)]
	extension: Option<String>,

	/// Gram whose count is reported (repeatable)
	#[arg(short, long = "probe")]
	probes: Vec<String>,
}

impl Cli {
	fn into_config(self) -> (Option<PathBuf>, Config) {
		let defaults = Config::default();
		let config = Config {
			order: self.order,
			workers: self.workers,
			samples: self.samples,
			sample_length: self.length,
			seed: self.seed,
			fail_fast: self.fail_fast,
			extension: self.extension,
			probes: if self.probes.is_empty() { defaults.probes } else { self.probes },
		};
		(self.dir, config)
	}
}

/// Asks for a folder on stdin until an existing directory is given.
///
/// Returns `None` if stdin is closed.
fn prompt_for_dir() -> io::Result<Option<PathBuf>> {
	let stdin = io::stdin();
	let mut line = String::new();
	loop {
		print!("Provide folder with text files:");
		io::stdout().flush()?;

		line.clear();
		if stdin.lock().read_line(&mut line)? == 0 {
			return Ok(None);
		}
		if line.trim().is_empty() {
			continue;
		}
		let dir = normalize_folder(&line);
		match ensure_dir(&dir) {
			Ok(()) => return Ok(Some(dir)),
			Err(e) => eprintln!("{e}"),
		}
	}
}

/// Resolves the folder given on the command line.
///
/// A path that is not a directory is reported and `None` is returned, so the
/// caller can fall back to asking for one.
fn resolve_arg_dir(arg: &Path) -> Option<PathBuf> {
	let dir = normalize_folder(&arg.to_string_lossy());
	match ensure_dir(&dir) {
		Ok(()) => Some(dir),
		Err(e) => {
			warn!("{e}");
			None
		}
	}
}

/// Formats the probe counts and the most frequent gram of the full order.
///
/// Grams are escaped (`'\n'`), the report ends with a blank line.
fn format_report(stats: &TextStats, config: &Config) -> Result<String, NgramError> {
	let mut report = String::new();
	for probe in &config.probes {
		report.push_str(&format!("'{}' stats: {}\n", probe.escape_debug(), stats.count(probe)));
	}

	let (key, count) = stats.best_gram(config.order)?.unwrap_or(("", 0));
	report.push_str(&format!("Best key '{}' stats: {}\n\n", key.escape_debug(), count));
	Ok(report)
}

fn run(dir: PathBuf, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
	let corpus = build_corpus(&dir, config)?;
	if !corpus.failures.is_empty() {
		info!("{} files were skipped", corpus.failures.len());
	}
	let stats = &corpus.stats;
	stats.verify()?;
	print!("{}", format_report(stats, config)?);

	let mut rng = match config.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};
	let generator = Generator::new(stats, config.order)?;
	for sample in generator.samples(config.samples, config.sample_length, &mut rng)? {
		println!("{sample}");
	}
	Ok(())
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
	let (dir, config) = Cli::parse().into_config();
	config.validate()?;

	let dir = match dir.as_deref().and_then(resolve_arg_dir) {
		Some(dir) => dir,
		None => match prompt_for_dir()? {
			Some(dir) => dir,
			None => return Err("no corpus folder given".into()),
		},
	};

	run(dir, &config)
}

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = try_main() {
		error!("{e}");
		process::exit(1);
	}
}
