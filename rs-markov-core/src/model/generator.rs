use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{MarkovError, MarkovResult};
use crate::io;
use crate::persistence::{ChainDocument, PersistFormat};

use super::chain::ChainStore;
use super::config::MarkovConfig;
use super::generation;
use super::state::State;
use super::statistics::MarkovStatistics;
use super::training;

/// Default number of tokens requested by a generation.
pub const DEFAULT_MAX_LENGTH: usize = 100;

/// High-level Markov text generator.
///
/// # Responsibilities
/// - Own the configuration, the trained `ChainStore` and the random source
/// - Train from strings, batches and files
/// - Generate text by weighted random walk
/// - Save and load the trained chain
///
/// A `MarkovGenerator` is not internally synchronized: concurrent use must be
/// serialized by the caller (ex. behind a `Mutex`).
#[derive(Debug)]
pub struct MarkovGenerator {
	config: MarkovConfig,
	store: ChainStore,
	rng: StdRng,
}

impl MarkovGenerator {
	/// Creates an untrained generator.
	///
	/// The random source is seeded from `config.seed` when set, and from the
	/// operating system otherwise.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if the configuration is invalid.
	pub fn new(config: MarkovConfig) -> MarkovResult<Self> {
		let rng = match config.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		};
		Self::with_rng(config, rng)
	}

	/// Creates an untrained generator drawing from `rng`.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if the configuration is invalid.
	pub fn with_rng(config: MarkovConfig, rng: StdRng) -> MarkovResult<Self> {
		config.validate()?;
		Ok(Self {
			config,
			store: ChainStore::new(),
			rng,
		})
	}

	/// Builds a generator of the given order trained on `text`.
	pub fn from_text(text: &str, order: usize) -> MarkovResult<Self> {
		let mut generator = Self::new(MarkovConfig::with_order(order))?;
		generator.train(text)?;
		Ok(generator)
	}

	pub fn config(&self) -> &MarkovConfig {
		&self.config
	}

	pub fn order(&self) -> usize {
		self.config.order
	}

	/// Read-only access to the trained chain.
	pub fn store(&self) -> &ChainStore {
		&self.store
	}

	pub fn state_count(&self) -> usize {
		self.store.len()
	}

	pub fn starting_state_count(&self) -> usize {
		self.store.starting_states().len()
	}

	/// Trains the chain on `text`.
	///
	/// Returns the number of transitions recorded.
	///
	/// # Errors
	/// Returns `InvalidInput` if the text is empty or shorter than
	/// `order + 1` tokens.
	pub fn train(&mut self, text: &str) -> MarkovResult<usize> {
		training::train(&mut self.store, text, &self.config)
	}

	/// Trains the chain on each non-blank text in turn.
	///
	/// Returns the number of texts trained. A failure leaves earlier texts trained.
	pub fn train_batch<I, S>(&mut self, texts: I) -> MarkovResult<usize>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		training::train_batch(&mut self.store, texts, &self.config)
	}

	/// Trains the chain on the whole content of a text file.
	///
	/// # Errors
	/// Returns `NotFound` if the file does not exist.
	pub fn train_from_file<P: AsRef<Path>>(&mut self, path: P) -> MarkovResult<usize> {
		let text = io::read_all_text(&path)?;
		let observations = self.train(&text)?;
		log::info!("Trained on {}: {} transitions", path.as_ref().display(), observations);
		Ok(observations)
	}

	/// Trains the chain on each line of a text file, as a batch.
	///
	/// # Errors
	/// Returns `NotFound` if the file does not exist.
	pub fn train_lines_from_file<P: AsRef<Path>>(&mut self, path: P) -> MarkovResult<usize> {
		let lines = io::read_lines(&path)?;
		self.train_batch(&lines)
	}

	/// Generates one text of at most `max_length` tokens.
	///
	/// When `start_with` begins with a known state, generation continues from
	/// it; otherwise a random starting state is used.
	///
	/// # Errors
	/// Returns `NotTrained` if the chain is empty.
	pub fn generate_text(&mut self, max_length: usize, start_with: Option<&str>) -> MarkovResult<String> {
		generation::generate(&self.store, &self.config, &mut self.rng, max_length, start_with)
	}

	/// Lazily generates `count` independent texts.
	pub fn generate_texts<'a>(
		&'a mut self,
		count: usize,
		max_length: usize,
		start_with: Option<&'a str>,
	) -> impl Iterator<Item = MarkovResult<String>> + 'a {
		(0..count).map(move |_| self.generate_text(max_length, start_with))
	}

	/// Returns the next-token probabilities of a state, most likely first.
	///
	/// Unknown states yield an empty list.
	///
	/// # Errors
	/// Returns `InvalidInput` unless exactly `order` tokens are given.
	pub fn next_token_probabilities<S: AsRef<str>>(
		&self,
		state_tokens: &[S],
	) -> MarkovResult<Vec<(String, f64)>> {
		if state_tokens.len() != self.config.order {
			return Err(MarkovError::InvalidInput(format!(
				"state must have exactly {} tokens, got {}",
				self.config.order,
				state_tokens.len()
			)));
		}

		let state = State::new(state_tokens.iter().map(<S as AsRef<str>>::as_ref));
		let mut probabilities: Vec<(String, f64)> = match self.store.get(&state) {
			Some(transitions) => transitions
				.probabilities()
				.map(|(token, probability)| (token.to_owned(), probability))
				.collect(),
			None => Vec::new(),
		};
		probabilities.sort_by(|a, b| b.1.total_cmp(&a.1));
		Ok(probabilities)
	}

	/// Aggregated view of the trained chain.
	pub fn statistics(&self) -> MarkovStatistics {
		MarkovStatistics::collect(&self.store, self.config.order)
	}

	/// Snapshot of the trained chain in its serializable form.
	pub fn to_document(&self) -> ChainDocument {
		ChainDocument::from_store(&self.store, self.config.order)
	}

	/// Replaces the trained chain with the content of `document`.
	///
	/// # Errors
	/// Returns `SchemaMismatch` if the document order differs from the
	/// configured order. The current chain is kept in that case.
	pub fn load_document(&mut self, document: ChainDocument) -> MarkovResult<()> {
		self.store = document.into_store(self.config.order)?;
		Ok(())
	}

	/// Serializes the trained chain as JSON.
	pub fn save_to_string(&self) -> MarkovResult<String> {
		self.to_document().to_json()
	}

	/// Replaces the trained chain with a JSON document.
	pub fn load_from_str(&mut self, json: &str) -> MarkovResult<()> {
		self.load_document(ChainDocument::from_json(json)?)
	}

	/// Writes the trained chain to `path`.
	///
	/// Paths ending in `.bin` are written in the binary format, others as JSON.
	pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> MarkovResult<()> {
		let path = path.as_ref();
		let bytes = self.to_document().encode(PersistFormat::from_path(path))?;
		fs::write(path, bytes)?;
		log::info!("Saved {} states to {}", self.store.len(), path.display());
		Ok(())
	}

	/// Replaces the trained chain with the content of `path`.
	///
	/// # Errors
	/// Returns `NotFound` if the file does not exist and `SchemaMismatch` if
	/// its order differs from the configured order.
	pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> MarkovResult<()> {
		let path = path.as_ref();
		if !path.exists() {
			return Err(MarkovError::NotFound(path.to_path_buf()));
		}
		let bytes = fs::read(path)?;
		self.load_document(ChainDocument::decode(&bytes, PersistFormat::from_path(path))?)?;
		log::info!("Loaded {} states from {}", self.store.len(), path.display());
		Ok(())
	}

	/// Forgets everything learned so far.
	pub fn clear(&mut self) {
		self.store.clear();
	}
}
