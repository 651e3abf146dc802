use serde::{Deserialize, Serialize};

use crate::error::{MarkovError, MarkovResult};

/// Default number of preceding tokens forming a state.
pub const DEFAULT_ORDER: usize = 2;

/// Default hard cap on generated token count.
pub const DEFAULT_MAX_GENERATION_LENGTH: usize = 1000;

/// Configuration of a `MarkovGenerator`.
///
/// The configuration is fixed for the lifetime of an engine. It is validated
/// once at construction through [`MarkovConfig::validate`].
///
/// # Invariants
/// - `order >= 1`
/// - `min_probability_threshold` is finite and within `[0.0, 1.0]`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MarkovConfig {
	/// Number of preceding tokens used as the chain state.
	pub order: usize,

	/// When false, all text is lower-cased before tokenization.
	pub case_sensitive: bool,

	/// When true, non-space whitespace (`\n`, `\t`, ...) becomes its own token.
	pub preserve_whitespace: bool,

	/// Tokens that may end a generation early.
	pub sentence_enders: Vec<String>,

	/// Upper bound on generated tokens, applied on top of each call's own bound.
	pub max_generation_length: usize,

	/// Transitions less likely than this are never sampled.
	pub min_probability_threshold: f64,

	/// Seed of the random source. `None` seeds from the operating system.
	pub seed: Option<u64>,
}

impl Default for MarkovConfig {
	fn default() -> Self {
		Self {
			order: DEFAULT_ORDER,
			case_sensitive: false,
			preserve_whitespace: true,
			sentence_enders: [".", "!", "?"].iter().map(|s| s.to_string()).collect(),
			max_generation_length: DEFAULT_MAX_GENERATION_LENGTH,
			min_probability_threshold: 0.0,
			seed: None,
		}
	}
}

impl MarkovConfig {
	/// Returns a default configuration with the given order.
	pub fn with_order(order: usize) -> Self {
		Self { order, ..Self::default() }
	}

	/// Checks the configuration invariants.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if `order < 1` or if the probability
	/// threshold is outside `[0.0, 1.0]`.
	pub fn validate(&self) -> MarkovResult<()> {
		if self.order < 1 {
			return Err(MarkovError::InvalidConfiguration(
				"order must be >= 1".to_owned(),
			));
		}
		if !(0.0..=1.0).contains(&self.min_probability_threshold) {
			return Err(MarkovError::InvalidConfiguration(format!(
				"min_probability_threshold must be between 0.0 and 1.0, got {}",
				self.min_probability_threshold
			)));
		}
		Ok(())
	}

	/// Returns true if `token` is one of the configured sentence enders.
	pub fn is_sentence_ender(&self, token: &str) -> bool {
		self.sentence_enders.iter().any(|ender| ender == token)
	}
}
