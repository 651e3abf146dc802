//! Top-level module for the Markov chain system.
//!
//! This module provides a word-level Markov text generator, including:
//! - Text tokenization and detokenization (`tokenizer`)
//! - Fixed-order chain states (`State`)
//! - Per-state transition tables (`Transitions`)
//! - The state → transitions store (`ChainStore`)
//! - Training and generation passes over the store
//! - A high-level engine interface (`MarkovGenerator`)

/// Engine configuration (order, case folding, stopping rules, randomness).
pub mod config;

/// Splits raw text into tokens and joins tokens back into text.
pub mod tokenizer;

/// Fixed-length ordered tuple of tokens used as a chain key.
pub mod state;

/// Observed next-token counts for a single state.
///
/// Supports weighted random sampling and probability queries.
pub mod transitions;

/// Mapping from states to their transition tables, plus the starting states.
pub mod chain;

/// Sliding-window ingestion of token sequences into a `ChainStore`.
pub mod training;

/// Weighted random walk over a trained `ChainStore`.
pub mod generation;

/// Read-only aggregate view of a trained chain.
pub mod statistics;

/// High-level interface owning the configuration, the store and the random source.
///
/// Exposes training, generation, probability queries and persistence.
pub mod generator;
