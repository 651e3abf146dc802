//! Serialized form of a trained chain.
//!
//! A chain is stored as a [`ChainDocument`]:
//!
//! ```json
//! {
//!   "order": 2,
//!   "states": { "the cat": { "ran": 1, "sat": 1 } },
//!   "starting_states": ["the cat", "the cat"]
//! }
//! ```
//!
//! State keys are the state tokens joined by a single space. States and
//! next tokens are written in first-observation order, so a reloaded chain
//! samples exactly like the one that was saved. The same document can be
//! written as pretty JSON or as a compact `postcard` binary.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MarkovError, MarkovResult};
use crate::model::chain::ChainStore;
use crate::model::state::State;

/// Extension selecting the binary encoding.
pub const BINARY_EXTENSION: &str = "bin";

/// Extension of JSON documents.
pub const JSON_EXTENSION: &str = "json";

/// On-disk encoding of a [`ChainDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersistFormat {
	/// Pretty-printed UTF-8 JSON.
	Json,
	/// `postcard` binary.
	Binary,
}

impl PersistFormat {
	/// Picks the format from a file extension: `.bin` is binary, anything
	/// else is JSON.
	pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
		match path.as_ref().extension() {
			Some(ext) if ext == BINARY_EXTENSION => PersistFormat::Binary,
			_ => PersistFormat::Json,
		}
	}
}

/// Serializable snapshot of a `ChainStore`.
///
/// # Invariants
/// - Every count is the number of times the token followed the state
/// - `starting_states` keeps duplicates and training order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChainDocument {
	pub order: usize,
	pub states: IndexMap<String, IndexMap<String, usize>>,
	pub starting_states: Vec<String>,
}

impl ChainDocument {
	/// Captures the content of `store`.
	pub fn from_store(store: &ChainStore, order: usize) -> Self {
		let states: IndexMap<String, IndexMap<String, usize>> = store
			.iter()
			.map(|(state, transitions)| {
				let counts: IndexMap<String, usize> = transitions
					.iter()
					.map(|(token, count)| (token.to_owned(), count))
					.collect();
				(state.key(), counts)
			})
			.collect();

		Self {
			order,
			states,
			starting_states: store.starting_states().iter().map(State::key).collect(),
		}
	}

	/// Rebuilds a `ChainStore` from this document.
	///
	/// Each `(token, count)` pair is replayed as `count` single observations,
	/// so totals are recomputed rather than trusted.
	///
	/// # Errors
	/// Returns `SchemaMismatch` if the document order differs from `order`, or
	/// if a state key does not hold exactly `order` tokens.
	pub fn into_store(self, order: usize) -> MarkovResult<ChainStore> {
		if self.order != order {
			return Err(MarkovError::SchemaMismatch {
				expected: format!("order {order}"),
				found: format!("order {}", self.order),
			});
		}

		let parse = |key: &str| -> MarkovResult<State> {
			let state = State::from_key(key);
			if state.len() != order {
				return Err(MarkovError::SchemaMismatch {
					expected: format!("{order} tokens per state"),
					found: format!("{} tokens in state {key:?}", state.len()),
				});
			}
			Ok(state)
		};

		let mut store = ChainStore::new();
		for (key, counts) in &self.states {
			let state = parse(key)?;
			let transitions = store.transitions_mut(&state);
			for (token, count) in counts {
				for _ in 0..*count {
					transitions.add_transition(token);
				}
			}
		}
		for key in &self.starting_states {
			store.add_starting_state(parse(key)?);
		}

		Ok(store)
	}

	/// Pretty-printed JSON form.
	pub fn to_json(&self) -> MarkovResult<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Parses the JSON form.
	pub fn from_json(json: &str) -> MarkovResult<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Encodes the document in the given format.
	pub fn encode(&self, format: PersistFormat) -> MarkovResult<Vec<u8>> {
		match format {
			PersistFormat::Json => Ok(self.to_json()?.into_bytes()),
			PersistFormat::Binary => Ok(postcard::to_stdvec(self)?),
		}
	}

	/// Decodes a document from the given format.
	pub fn decode(bytes: &[u8], format: PersistFormat) -> MarkovResult<Self> {
		match format {
			PersistFormat::Json => Ok(serde_json::from_slice(bytes)?),
			PersistFormat::Binary => Ok(postcard::from_bytes(bytes)?),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::config::MarkovConfig;
	use crate::model::training::train;

	fn sample_store() -> ChainStore {
		let config = MarkovConfig::default();
		let mut store = ChainStore::new();
		train(&mut store, "the cat sat. the cat ran.", &config).unwrap();
		train(&mut store, "the cat sat again!", &config).unwrap();
		store
	}

	fn assert_same_content(a: &ChainStore, b: &ChainStore) {
		assert_eq!(a.len(), b.len());
		for (state, transitions) in a.iter() {
			let other = b.get(state).expect("missing state");
			assert_eq!(other.total(), transitions.total());
			for (token, count) in transitions.iter() {
				assert_eq!(other.count(token), count);
			}
		}
		assert_eq!(a.starting_states(), b.starting_states());
	}

	#[test]
	fn document_layout() {
		let document = ChainDocument::from_store(&sample_store(), 2);

		assert_eq!(document.order, 2);
		assert_eq!(document.starting_states, vec!["the cat", "the cat"]);
		let the_cat = &document.states["the cat"];
		assert_eq!(the_cat["sat"], 2);
		assert_eq!(the_cat["ran"], 1);

		let json: serde_json::Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();
		assert_eq!(json["order"], 2);
		assert_eq!(json["states"]["the cat"]["sat"], 2);
		assert_eq!(json["starting_states"][1], "the cat");
	}

	#[test]
	fn json_round_trip() {
		let store = sample_store();
		let json = ChainDocument::from_store(&store, 2).to_json().unwrap();
		let restored = ChainDocument::from_json(&json).unwrap().into_store(2).unwrap();
		assert_same_content(&store, &restored);
	}

	#[test]
	fn binary_round_trip() {
		let store = sample_store();
		let bytes = ChainDocument::from_store(&store, 2)
			.encode(PersistFormat::Binary)
			.unwrap();
		let restored = ChainDocument::decode(&bytes, PersistFormat::Binary)
			.unwrap()
			.into_store(2)
			.unwrap();
		assert_same_content(&store, &restored);
	}

	#[test]
	fn order_mismatch_is_rejected() {
		let document = ChainDocument::from_store(&sample_store(), 2);
		assert!(matches!(
			document.into_store(3),
			Err(MarkovError::SchemaMismatch { .. })
		));
	}

	#[test]
	fn malformed_state_key_is_rejected() {
		let json = r#"{"order": 2, "states": {"only": {"x": 1}}, "starting_states": []}"#;
		let document = ChainDocument::from_json(json).unwrap();
		assert!(matches!(
			document.into_store(2),
			Err(MarkovError::SchemaMismatch { .. })
		));
	}

	#[test]
	fn round_trip_keeps_observation_order() {
		let config = MarkovConfig::with_order(1);
		let mut store = ChainStore::new();
		train(
			&mut store,
			"zebra apple zebra mango zebra kiwi zebra apple zebra banana zebra",
			&config,
		)
		.unwrap();

		let json = ChainDocument::from_store(&store, 1).to_json().unwrap();
		let restored = ChainDocument::from_json(&json).unwrap().into_store(1).unwrap();

		assert_eq!(restored, store);
		let zebra = restored.get(&State::new(["zebra"])).unwrap();
		let order: Vec<&str> = zebra.iter().map(|(token, _)| token).collect();
		assert_eq!(order, vec!["apple", "mango", "kiwi", "banana"]);
		assert_eq!(restored.first_state(), Some(&State::new(["zebra"])));
	}

	#[test]
	fn format_from_extension() {
		assert_eq!(PersistFormat::from_path("chain.bin"), PersistFormat::Binary);
		assert_eq!(PersistFormat::from_path("chain.json"), PersistFormat::Json);
		assert_eq!(PersistFormat::from_path("chain"), PersistFormat::Json);
	}
}
