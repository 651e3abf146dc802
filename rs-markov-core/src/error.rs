//! # Error Types

use std::path::PathBuf;

/// Errors from Markov chain operations.
#[derive(Debug, thiserror::Error)]
pub enum MarkovError {
	/// The engine configuration is invalid (ex. `order < 1`).
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),

	/// Training text or query input is unusable.
	#[error("invalid input: {0}")]
	InvalidInput(String),

	/// Generation was attempted on an empty chain.
	#[error("the chain has not been trained")]
	NotTrained,

	/// A persisted chain does not match the engine configuration.
	#[error("schema mismatch: expected {expected}, found {found}")]
	SchemaMismatch {
		/// What the engine expected.
		expected: String,
		/// What the document contained.
		found: String,
	},

	/// A referenced file does not exist.
	#[error("file not found: {}", .0.display())]
	NotFound(PathBuf),

	/// I/O error.
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// JSON (de)serialization error.
	#[error(transparent)]
	Json(#[from] serde_json::Error),

	/// Binary (de)serialization error.
	#[error(transparent)]
	Binary(#[from] postcard::Error),
}

/// Result type for Markov chain operations.
pub type MarkovResult<T> = Result<T, MarkovError>;
