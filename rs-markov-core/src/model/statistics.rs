use serde::{Deserialize, Serialize};

use super::chain::ChainStore;

/// Number of states listed in [`MarkovStatistics::most_common_states`].
pub const MOST_COMMON_STATES: usize = 10;

/// Summary of one state of the chain.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StateInfo {
	/// Textual key of the state.
	pub state: String,
	/// Total number of transitions observed from this state.
	pub transition_count: usize,
	/// Number of distinct next tokens.
	pub next_tokens: usize,
}

/// Read-only snapshot of a trained chain.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MarkovStatistics {
	pub state_count: usize,
	pub starting_state_count: usize,
	pub total_transitions: usize,
	pub average_transitions_per_state: f64,
	pub order: usize,
	/// States with the most observed transitions, most common first.
	pub most_common_states: Vec<StateInfo>,
}

impl MarkovStatistics {
	/// Aggregates `store` into a statistics snapshot.
	pub fn collect(store: &ChainStore, order: usize) -> Self {
		let total_transitions: usize = store.iter().map(|(_, transitions)| transitions.total()).sum();
		let average_transitions_per_state = if store.is_empty() {
			0.0
		} else {
			total_transitions as f64 / store.len() as f64
		};

		let mut most_common_states: Vec<StateInfo> = store
			.iter()
			.map(|(state, transitions)| StateInfo {
				state: state.key(),
				transition_count: transitions.total(),
				next_tokens: transitions.len(),
			})
			.collect();
		// Stable: ties keep first-observation order.
		most_common_states.sort_by(|a, b| b.transition_count.cmp(&a.transition_count));
		most_common_states.truncate(MOST_COMMON_STATES);

		Self {
			state_count: store.len(),
			starting_state_count: store.starting_states().len(),
			total_transitions,
			average_transitions_per_state,
			order,
			most_common_states,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::config::MarkovConfig;
	use crate::model::training::train;

	#[test]
	fn empty_store() {
		let stats = MarkovStatistics::collect(&ChainStore::new(), 2);
		assert_eq!(stats.state_count, 0);
		assert_eq!(stats.total_transitions, 0);
		assert_eq!(stats.average_transitions_per_state, 0.0);
		assert!(stats.most_common_states.is_empty());
	}

	#[test]
	fn aggregates_trained_store() {
		let config = MarkovConfig::default();
		let mut store = ChainStore::new();
		train(&mut store, "the cat sat. the cat ran.", &config).unwrap();

		let stats = MarkovStatistics::collect(&store, config.order);
		// the cat | cat sat | sat . | . the | cat ran
		assert_eq!(stats.state_count, 5);
		assert_eq!(stats.starting_state_count, 1);
		assert_eq!(stats.total_transitions, 6);
		assert!((stats.average_transitions_per_state - 1.2).abs() < 1e-9);
		assert_eq!(stats.order, 2);

		let top = &stats.most_common_states[0];
		assert_eq!(top.state, "the cat");
		assert_eq!(top.transition_count, 2);
		assert_eq!(top.next_tokens, 2);
	}

	#[test]
	fn keeps_only_the_most_common() {
		let config = MarkovConfig::with_order(1);
		let mut store = ChainStore::new();
		let text: Vec<String> = (0..30).map(|i| format!("w{i}")).collect();
		train(&mut store, &text.join(" "), &config).unwrap();

		let stats = MarkovStatistics::collect(&store, 1);
		assert_eq!(stats.state_count, 29);
		assert_eq!(stats.most_common_states.len(), MOST_COMMON_STATES);
		assert_eq!(stats.most_common_states[0].state, "w0");
	}
}
