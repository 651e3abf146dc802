use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use crate::error::{MarkovError, MarkovResult};

/// Reads a whole text file into memory.
///
/// # Errors
/// Returns `NotFound` if `path` does not exist, or the underlying I/O error.
pub fn read_all_text<P: AsRef<Path>>(path: P) -> MarkovResult<String> {
	let path = path.as_ref();
	if !path.exists() {
		return Err(MarkovError::NotFound(path.to_path_buf()));
	}
	Ok(fs::read_to_string(path)?)
}

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_lines<P: AsRef<Path>>(path: P) -> MarkovResult<Vec<String>> {
	Ok(read_all_text(path)?.lines().map(str::to_owned).collect())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/input.txt` + `"json"` → `data/input.json`
pub fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists the stems of all files in `dir` whose extension is one of `extensions`.
///
/// Returns sorted, de-duplicated names without path or extension
/// (`chain.json` and `chain.bin` both list as `chain`).
pub fn list_files<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if !path.is_file() {
			continue;
		}

		let matches = path
			.extension()
			.and_then(OsStr::to_str)
			.is_some_and(|ext| extensions.contains(&ext));
		if let (true, Some(stem)) = (matches, path.file_stem()) {
			files.push(stem.to_string_lossy().to_string());
		}
	}

	files.sort();
	files.dedup();
	Ok(files)
}
