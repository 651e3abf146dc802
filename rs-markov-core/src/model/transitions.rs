use std::collections::HashMap;

use rand::Rng;

/// Observed next tokens of a single chain state.
///
/// Conceptually, this is the set of outgoing edges of a node in the Markov
/// chain, each edge weighted by its number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during learning
/// - Report per-token probabilities
/// - Pick the next token using weighted random sampling
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
/// - `total` is the sum of all occurrence counts
/// - Entries keep the order in which tokens were first observed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transitions {
	/// Outgoing transitions in first-observation order.
	/// Example: [("sat", 3), ("ran", 1)]
	entries: Vec<(String, usize)>,
	/// Position of each token inside `entries`.
	index: HashMap<String, usize>,
	/// Sum of all occurrence counts.
	total: usize,
}

impl Transitions {
	/// Creates an empty transition table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an occurrence of a transition toward `next_token`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub fn add_transition(&mut self, next_token: &str) {
		match self.index.get(next_token) {
			Some(&position) => self.entries[position].1 += 1,
			None => {
				self.index.insert(next_token.to_owned(), self.entries.len());
				self.entries.push((next_token.to_owned(), 1));
			}
		}
		self.total += 1;
	}

	/// Sum of all occurrence counts.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Number of distinct next tokens.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if no transition was ever recorded.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Occurrence count of `next_token` (0 if never observed).
	pub fn count(&self, next_token: &str) -> usize {
		self.index
			.get(next_token)
			.map_or(0, |&position| self.entries[position].1)
	}

	/// Iterates over `(token, count)` pairs in first-observation order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.entries.iter().map(|(token, count)| (token.as_str(), *count))
	}

	/// Probability of `next_token`, i.e. `count / total`.
	///
	/// Returns 0.0 for unknown tokens or an empty table.
	pub fn probability(&self, next_token: &str) -> f64 {
		if self.total == 0 {
			return 0.0;
		}
		self.count(next_token) as f64 / self.total as f64
	}

	/// Iterates over `(token, probability)` pairs in first-observation order.
	pub fn probabilities(&self) -> impl Iterator<Item = (&str, f64)> {
		let total = self.total as f64;
		self.iter().map(move |(token, count)| (token, count as f64 / total))
	}

	/// Picks the next token using weighted random sampling.
	///
	/// Only transitions whose probability is at least `min_probability` take
	/// part in the draw. Among those, the chance of selecting a token is
	/// proportional to its occurrence count.
	///
	/// This method performs:
	/// - an O(n) filter over the transitions
	/// - a single uniform draw in `[0, filtered total)`
	/// - a cumulative walk to select a bucket
	///
	/// Returns `None` if the table is empty or nothing passes the filter.
	pub fn select_random_transition<R: Rng>(
		&self,
		rng: &mut R,
		min_probability: f64,
	) -> Option<&str> {
		if self.total == 0 {
			return None;
		}

		let total = self.total as f64;
		let valid: Vec<(&str, usize)> = self
			.iter()
			.filter(|(_, count)| *count as f64 / total >= min_probability)
			.collect();
		let (last, _) = *valid.last()?;

		let valid_total: usize = valid.iter().map(|(_, count)| count).sum();
		let draw = rng.random_range(0..valid_total);

		let mut cumulative = 0;
		for (token, count) in &valid {
			cumulative += count;
			if draw < cumulative {
				return Some(*token);
			}
		}

		// Fallback: unreachable while counts are summed correctly.
		Some(last)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn table(tokens: &[&str]) -> Transitions {
		let mut transitions = Transitions::new();
		for token in tokens {
			transitions.add_transition(token);
		}
		transitions
	}

	#[test]
	fn counts_and_total() {
		let transitions = table(&["sat", "ran", "sat", "sat"]);

		assert_eq!(transitions.total(), 4);
		assert_eq!(transitions.len(), 2);
		assert_eq!(transitions.count("sat"), 3);
		assert_eq!(transitions.count("ran"), 1);
		assert_eq!(transitions.count("flew"), 0);

		let sum: usize = transitions.iter().map(|(_, count)| count).sum();
		assert_eq!(sum, transitions.total());
	}

	#[test]
	fn keeps_first_observation_order() {
		let transitions = table(&["b", "a", "c", "a"]);
		let order: Vec<&str> = transitions.iter().map(|(token, _)| token).collect();
		assert_eq!(order, vec!["b", "a", "c"]);
	}

	#[test]
	fn probabilities_sum_to_one() {
		let transitions = table(&["x", "y", "y", "z", "z", "z"]);

		assert!((transitions.probability("z") - 0.5).abs() < 1e-12);
		assert_eq!(transitions.probability("missing"), 0.0);

		let sum: f64 = transitions.probabilities().map(|(_, p)| p).sum();
		assert!((sum - 1.0).abs() < 1e-9);
	}

	#[test]
	fn empty_table_selects_nothing() {
		let mut rng = StdRng::seed_from_u64(1);
		let transitions = Transitions::new();
		assert!(transitions.is_empty());
		assert_eq!(transitions.probability("a"), 0.0);
		assert_eq!(transitions.select_random_transition(&mut rng, 0.0), None);
	}

	#[test]
	fn threshold_filters_transitions() {
		let mut rng = StdRng::seed_from_u64(7);
		let transitions = table(&["sat", "ran"]);

		assert_eq!(transitions.select_random_transition(&mut rng, 0.9), None);

		let rare = table(&["common", "common", "common", "rare"]);
		for _ in 0..100 {
			assert_eq!(rare.select_random_transition(&mut rng, 0.5), Some("common"));
		}
	}

	#[test]
	fn sampling_is_weighted_by_count() {
		let mut rng = StdRng::seed_from_u64(42);
		let transitions = table(&["a", "a", "a", "b"]);

		let draws = 10_000;
		let mut a_count = 0;
		for _ in 0..draws {
			match transitions.select_random_transition(&mut rng, 0.0) {
				Some("a") => a_count += 1,
				Some("b") => {}
				other => panic!("unexpected draw {other:?}"),
			}
		}

		let ratio = a_count as f64 / draws as f64;
		assert!((ratio - 0.75).abs() < 0.03, "ratio was {ratio}");
	}

	#[test]
	fn sampling_is_deterministic_with_seed() {
		let transitions = table(&["a", "b", "c", "d", "a"]);

		let mut first = StdRng::seed_from_u64(3);
		let mut second = StdRng::seed_from_u64(3);
		for _ in 0..50 {
			assert_eq!(
				transitions.select_random_transition(&mut first, 0.0),
				transitions.select_random_transition(&mut second, 0.0)
			);
		}
	}
}
