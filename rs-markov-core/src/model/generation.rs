use rand::Rng;

use crate::error::{MarkovError, MarkovResult};

use super::chain::ChainStore;
use super::config::MarkovConfig;
use super::state::State;
use super::tokenizer::{detokenize, tokenize};

/// Chance of stopping right after a sentence-ending token.
pub const SENTENCE_END_STOP_PROBABILITY: f64 = 0.3;

/// Chooses the state a generation starts from.
///
/// # Behavior
/// - If `start_with` is non-empty and its first `order` tokens form a known
///   state, that state is used.
/// - Otherwise a starting state is drawn uniformly at random.
/// - Without starting states, the first recorded state is used.
///
/// Returns `None` only if the store is entirely empty.
pub fn initial_state<R: Rng>(
	store: &ChainStore,
	config: &MarkovConfig,
	rng: &mut R,
	start_with: Option<&str>,
) -> Option<State> {
	if let Some(text) = start_with.filter(|text| !text.is_empty()) {
		let tokens = tokenize(text, config.case_sensitive, config.preserve_whitespace);
		if tokens.len() >= config.order {
			let state = State::new(tokens.into_iter().take(config.order));
			if store.contains(&state) {
				return Some(state);
			}
		}
	}

	let starting_states = store.starting_states();
	if !starting_states.is_empty() {
		let pick = rng.random_range(0..starting_states.len());
		return Some(starting_states[pick].clone());
	}

	store.first_state().cloned()
}

/// Performs a weighted random walk over `store` and returns the visited tokens.
///
/// The output starts with the tokens of the initial state, then grows one
/// sampled token at a time until one of:
/// - the output holds `min(max_length, config.max_generation_length)` tokens
/// - the current state has no transition table, or nothing passes the
///   probability threshold
/// - a sentence ender was sampled and the stop draw (probability
///   [`SENTENCE_END_STOP_PROBABILITY`]) succeeded
///
/// # Errors
/// Returns `NotTrained` if the store is empty.
pub fn generate_tokens<R: Rng>(
	store: &ChainStore,
	config: &MarkovConfig,
	rng: &mut R,
	max_length: usize,
	start_with: Option<&str>,
) -> MarkovResult<Vec<String>> {
	if store.is_empty() {
		return Err(MarkovError::NotTrained);
	}

	let max_length = max_length.min(config.max_generation_length);
	let Some(mut current) = initial_state(store, config, rng, start_with) else {
		return Ok(Vec::new());
	};

	let mut output: Vec<String> = current.tokens().to_vec();
	while output.len() < max_length {
		let Some(transitions) = store.get(&current) else {
			break;
		};
		let Some(next_token) =
			transitions.select_random_transition(rng, config.min_probability_threshold)
		else {
			break;
		};

		output.push(next_token.to_owned());
		current = current.advance(next_token);

		if config.is_sentence_ender(next_token) && rng.random::<f64>() < SENTENCE_END_STOP_PROBABILITY {
			break;
		}
	}

	Ok(output)
}

/// Generates text from `store`: [`generate_tokens`] followed by detokenization.
///
/// # Errors
/// Returns `NotTrained` if the store is empty.
pub fn generate<R: Rng>(
	store: &ChainStore,
	config: &MarkovConfig,
	rng: &mut R,
	max_length: usize,
	start_with: Option<&str>,
) -> MarkovResult<String> {
	let tokens = generate_tokens(store, config, rng, max_length, start_with)?;
	Ok(detokenize(&tokens))
}
