use crate::error::{MarkovError, MarkovResult};

use super::chain::ChainStore;
use super::config::MarkovConfig;
use super::state::State;
use super::tokenizer::tokenize;

/// Tokenizes `text` and adds its transitions to `store`.
///
/// Returns the number of `state → next token` observations recorded.
///
/// # Errors
/// Returns `InvalidInput` if `text` is empty or yields fewer than
/// `order + 1` tokens. The store is left untouched in that case.
pub fn train(store: &mut ChainStore, text: &str, config: &MarkovConfig) -> MarkovResult<usize> {
	if text.is_empty() {
		return Err(MarkovError::InvalidInput(
			"training text cannot be empty".to_owned(),
		));
	}

	let tokens = tokenize(text, config.case_sensitive, config.preserve_whitespace);
	train_tokens(store, &tokens, config.order)
}

/// Adds the transitions of an already tokenized sequence to `store`.
///
/// Slides a window of `order` tokens over the sequence; each window is a
/// state and the token right after it is the observed transition. The first
/// window is also recorded as a starting state.
///
/// # Errors
/// Returns `InvalidInput` if `tokens` holds fewer than `order + 1` tokens.
pub fn train_tokens<S: AsRef<str>>(
	store: &mut ChainStore,
	tokens: &[S],
	order: usize,
) -> MarkovResult<usize> {
	if tokens.len() < order + 1 {
		return Err(MarkovError::InvalidInput(format!(
			"text must contain at least {} tokens to train, got {}",
			order + 1,
			tokens.len()
		)));
	}

	let observations = tokens.len() - order;
	for (i, window) in tokens.windows(order + 1).enumerate() {
		let state = State::new(window[..order].iter().map(<S as AsRef<str>>::as_ref));
		let next_token = window[order].as_ref();

		if i == 0 {
			store.add_starting_state(state.clone());
		}
		store.observe(&state, next_token);
	}

	log::debug!(
		"Trained {} observations from {} tokens ({} states)",
		observations,
		tokens.len(),
		store.len()
	);
	Ok(observations)
}

/// Trains `store` on each text in turn.
///
/// Empty and blank texts are skipped. Returns the number of texts trained.
///
/// # Errors
/// Stops at the first text that fails to train. Texts trained before the
/// failure stay in the store.
pub fn train_batch<I, S>(store: &mut ChainStore, texts: I, config: &MarkovConfig) -> MarkovResult<usize>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut trained = 0;
	let mut skipped = 0;
	for text in texts {
		let text = text.as_ref();
		if text.trim().is_empty() {
			skipped += 1;
			continue;
		}
		train(store, text, config)?;
		trained += 1;
	}

	log::info!("Batch training: {} texts trained, {} blank texts skipped", trained, skipped);
	Ok(trained)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(order: usize) -> MarkovConfig {
		MarkovConfig::with_order(order)
	}

	#[test]
	fn sliding_window_observations() {
		let mut store = ChainStore::new();
		let observations = train(&mut store, "the cat sat. the cat ran.", &config(2)).unwrap();

		// the cat sat . the cat ran . -> 8 tokens, 6 windows
		assert_eq!(observations, 6);

		let the_cat = store.get(&State::new(["the", "cat"])).unwrap();
		assert_eq!(the_cat.total(), 2);
		assert_eq!(the_cat.count("sat"), 1);
		assert_eq!(the_cat.count("ran"), 1);
		assert_eq!(the_cat.probability("sat"), 0.5);
		assert_eq!(the_cat.probability("ran"), 0.5);

		assert_eq!(store.starting_states(), [State::new(["the", "cat"])]);
	}

	#[test]
	fn every_sequence_adds_a_starting_state() {
		let mut store = ChainStore::new();
		train(&mut store, "the cat sat.", &config(2)).unwrap();
		train(&mut store, "the cat ran.", &config(2)).unwrap();

		assert_eq!(
			store.starting_states(),
			[State::new(["the", "cat"]), State::new(["the", "cat"])]
		);
		let the_cat = store.get(&State::new(["the", "cat"])).unwrap();
		assert_eq!(the_cat.total(), 2);
	}

	#[test]
	fn totals_match_counts() {
		let mut store = ChainStore::new();
		train(
			&mut store,
			"a b a b c a b a c a a b. b a c, a b!",
			&config(1),
		)
		.unwrap();

		for (_, transitions) in store.iter() {
			let sum: usize = transitions.iter().map(|(_, count)| count).sum();
			assert_eq!(sum, transitions.total());
			let probability: f64 = transitions.probabilities().map(|(_, p)| p).sum();
			assert!((probability - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn rejects_short_or_empty_text() {
		let mut store = ChainStore::new();

		assert!(matches!(
			train(&mut store, "", &config(2)),
			Err(MarkovError::InvalidInput(_))
		));
		assert!(matches!(
			train(&mut store, "two words", &config(2)),
			Err(MarkovError::InvalidInput(_))
		));
		assert!(store.is_empty());
		assert!(store.starting_states().is_empty());

		// Exactly order + 1 tokens is enough.
		assert_eq!(train(&mut store, "three words here", &config(2)).unwrap(), 1);
	}

	#[test]
	fn batch_skips_blank_texts() {
		let mut store = ChainStore::new();
		let texts = ["the cat sat", "", "   ", "a dog ran"];

		let trained = train_batch(&mut store, texts, &config(2)).unwrap();
		assert_eq!(trained, 2);
		assert_eq!(store.starting_states().len(), 2);
	}

	#[test]
	fn batch_failure_keeps_prior_training() {
		let mut store = ChainStore::new();
		let texts = vec!["the cat sat".to_owned(), "short".to_owned(), "a dog ran".to_owned()];

		assert!(train_batch(&mut store, &texts, &config(2)).is_err());
		assert_eq!(store.starting_states(), [State::new(["the", "cat"])]);
		assert!(store.get(&State::new(["a", "dog"])).is_none());
	}
}
