use std::env;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{NgramError, Result};

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Surrounding whitespace is trimmed (paths typed at a prompt)
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	let input = input.trim();
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Checks that `dir` exists and is a directory.
///
/// # Errors
/// Returns `NotADirectory` otherwise.
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
	let dir = dir.as_ref();
	if dir.is_dir() {
		Ok(())
	} else {
		Err(NgramError::NotADirectory(dir.to_path_buf()))
	}
}

/// Lists the regular files directly contained in `dir`.
///
/// - Subdirectories are skipped, not recursed
/// - If `extension` is given, only files with that extension are kept
/// - Paths are returned sorted, so runs see files in a stable order
///
/// # Errors
/// Returns `NotADirectory` if `dir` is not a directory, or `Io` if it cannot
/// be read.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: Option<&str>) -> Result<Vec<PathBuf>> {
	let dir = dir.as_ref();
	ensure_dir(dir)?;

	let mut files = Vec::new();
	for entry in fs::read_dir(dir).map_err(|e| NgramError::io(dir, e))? {
		let path = entry.map_err(|e| NgramError::io(dir, e))?.path();
		if !path.is_file() {
			continue;
		}
		if let Some(extension) = extension {
			if path.extension() != Some(std::ffi::OsStr::new(extension)) {
				continue;
			}
		}
		files.push(path);
	}

	files.sort();
	Ok(files)
}

/// Opens a corpus file for buffered reading.
pub(crate) fn open_file<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
	let path = path.as_ref();
	let file = File::open(path).map_err(|e| NgramError::io(path, e))?;
	Ok(BufReader::new(file))
}
