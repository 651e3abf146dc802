use std::fmt;

/// Separator between tokens in the textual form of a state.
pub const KEY_SEPARATOR: &str = " ";

/// A state of the Markov chain.
///
/// A `State` is the ordered tuple of the `order` tokens preceding a
/// transition. Equality and hashing are element-wise and order-sensitive,
/// so `("the", "cat")` and `("cat", "the")` are distinct states.
///
/// ## Invariants
/// - The token tuple is immutable once constructed
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
	tokens: Box<[String]>,
}

impl State {
	/// Creates a state from a token sequence.
	pub fn new<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			tokens: tokens.into_iter().map(Into::into).collect(),
		}
	}

	/// Rebuilds a state from its textual key (tokens joined by single spaces).
	pub fn from_key(key: &str) -> Self {
		Self::new(key.split(KEY_SEPARATOR))
	}

	/// Returns the textual key of this state.
	pub fn key(&self) -> String {
		self.tokens.join(KEY_SEPARATOR)
	}

	/// Returns the tokens of this state.
	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	/// Number of tokens in this state.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	/// Returns true if the state holds no tokens.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// Slides the window by one token.
	///
	/// The first token is dropped and `next` is appended, so the returned state
	/// has the same length as `self`.
	pub fn advance(&self, next: &str) -> Self {
		Self::new(
			self.tokens
				.iter()
				.skip(1)
				.map(String::as_str)
				.chain(std::iter::once(next)),
		)
	}
}

impl fmt::Display for State {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.key())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	#[test]
	fn equality_is_order_sensitive() {
		let a = State::new(["the", "cat"]);
		let b = State::new(vec!["the".to_owned(), "cat".to_owned()]);
		let c = State::new(["cat", "the"]);

		assert_eq!(a, b);
		assert_ne!(a, c);

		let set: HashSet<State> = [a.clone(), b, c].into_iter().collect();
		assert_eq!(set.len(), 2);
		assert!(set.contains(&a));
	}

	#[test]
	fn key_round_trip() {
		let state = State::new(["the", "cat", "sat"]);
		assert_eq!(state.key(), "the cat sat");
		assert_eq!(state.to_string(), "the cat sat");
		assert_eq!(State::from_key(&state.key()), state);
	}

	#[test]
	fn advance_slides_window() {
		let state = State::new(["the", "cat"]);
		let next = state.advance("sat");
		assert_eq!(next.tokens(), ["cat", "sat"]);
		assert_eq!(next.len(), 2);

		let single = State::new(["a"]).advance("b");
		assert_eq!(single.tokens(), ["b"]);
	}
}
