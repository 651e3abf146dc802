//! Markov-chain text generation library.
//!
//! This crate provides a word-level Markov chain system including:
//! - Tokenization of raw text into words, punctuation and line breaks
//! - Fixed-order states and per-state transition tables
//! - Weighted random generation with sentence-ending heuristics
//! - JSON and compact binary persistence of trained chains
//!
//! The high-level entry point is [`model::generator::MarkovGenerator`].

/// Error type shared by every fallible operation.
pub mod error;

/// Core chain model: tokenizer, states, transitions, training and generation.
pub mod model;

/// Serialized form of a trained chain.
pub mod persistence;

/// I/O utilities (file loading, path helpers).
pub mod io;

pub use error::{MarkovError, MarkovResult};
pub use model::config::MarkovConfig;
pub use model::generator::MarkovGenerator;
