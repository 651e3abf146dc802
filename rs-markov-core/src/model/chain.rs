use std::collections::HashMap;

use super::state::State;
use super::transitions::Transitions;

/// Storage of a trained Markov chain.
///
/// The `ChainStore` maps each observed `State` to the single `Transitions`
/// table accumulating every observation for it, and keeps the states that
/// opened a training sequence.
///
/// # Responsibilities
/// - Record `state → next token` observations
/// - Record starting states (append-only, duplicates kept)
/// - Look up transition tables during generation
///
/// # Invariants
/// - No two entries share an equal `State`
/// - States are kept in first-observation order, so iteration and
///   `first_state` are stable for a given training history
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainStore {
	/// Transition tables in first-observation order.
	entries: Vec<(State, Transitions)>,
	/// Position of each state inside `entries`.
	index: HashMap<State, usize>,
	/// States that began a training sequence, in order of appearance.
	starting_states: Vec<State>,
}

impl ChainStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the transition table of `state`, creating an empty one if absent.
	pub fn transitions_mut(&mut self, state: &State) -> &mut Transitions {
		let position = match self.index.get(state) {
			Some(&position) => position,
			None => {
				self.index.insert(state.clone(), self.entries.len());
				self.entries.push((state.clone(), Transitions::new()));
				self.entries.len() - 1
			}
		};
		&mut self.entries[position].1
	}

	/// Records one observation of `next_token` following `state`.
	pub fn observe(&mut self, state: &State, next_token: &str) {
		self.transitions_mut(state).add_transition(next_token);
	}

	/// Appends a starting state.
	pub fn add_starting_state(&mut self, state: State) {
		self.starting_states.push(state);
	}

	/// Returns the transition table of `state`, if any.
	pub fn get(&self, state: &State) -> Option<&Transitions> {
		self.index.get(state).map(|&position| &self.entries[position].1)
	}

	/// Returns true if `state` has a transition table.
	pub fn contains(&self, state: &State) -> bool {
		self.index.contains_key(state)
	}

	/// Number of distinct states.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if no state was ever recorded.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The first state ever recorded.
	pub fn first_state(&self) -> Option<&State> {
		self.entries.first().map(|(state, _)| state)
	}

	/// Iterates over states and their tables in first-observation order.
	pub fn iter(&self) -> impl Iterator<Item = (&State, &Transitions)> {
		self.entries.iter().map(|(state, transitions)| (state, transitions))
	}

	/// Starting states, in order of appearance.
	pub fn starting_states(&self) -> &[State] {
		&self.starting_states
	}

	/// Removes every state and starting state.
	pub fn clear(&mut self) {
		self.entries.clear();
		self.index.clear();
		self.starting_states.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn equal_states_share_one_table() {
		let mut store = ChainStore::new();
		store.observe(&State::new(["the", "cat"]), "sat");
		store.observe(&State::new(["the", "cat"]), "ran");
		store.observe(&State::new(["cat", "sat"]), ".");

		assert_eq!(store.len(), 2);
		let table = store.get(&State::new(["the", "cat"])).unwrap();
		assert_eq!(table.total(), 2);
		assert_eq!(table.count("sat"), 1);
		assert_eq!(table.count("ran"), 1);
		assert!(!store.contains(&State::new(["cat", "the"])));
	}

	#[test]
	fn starting_states_keep_duplicates_and_order() {
		let mut store = ChainStore::new();
		store.add_starting_state(State::new(["a"]));
		store.add_starting_state(State::new(["b"]));
		store.add_starting_state(State::new(["a"]));

		let keys: Vec<String> = store.starting_states().iter().map(State::key).collect();
		assert_eq!(keys, vec!["a", "b", "a"]);
	}

	#[test]
	fn first_state_is_stable() {
		let mut store = ChainStore::new();
		assert!(store.first_state().is_none());

		store.observe(&State::new(["x"]), "y");
		store.observe(&State::new(["y"]), "z");
		store.observe(&State::new(["x"]), "z");
		assert_eq!(store.first_state(), Some(&State::new(["x"])));

		let order: Vec<String> = store.iter().map(|(state, _)| state.key()).collect();
		assert_eq!(order, vec!["x", "y"]);
	}

	#[test]
	fn clear_empties_everything() {
		let mut store = ChainStore::new();
		store.observe(&State::new(["x"]), "y");
		store.add_starting_state(State::new(["x"]));

		store.clear();
		assert!(store.is_empty());
		assert!(store.starting_states().is_empty());
		assert!(store.get(&State::new(["x"])).is_none());
	}
}
