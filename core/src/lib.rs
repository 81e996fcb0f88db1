//! In-memory inverted index over StackExchange-style posts.
//!
//! Documents are normalized by [`tokenizer::normalize`], indexed once into an
//! [`InvertedIndex`] and queried through a [`Searcher`]. Rankings can be scored
//! with the functions in [`metrics`].

pub mod corpus;
pub mod error;
pub mod index;
pub mod metrics;
pub mod persist;
pub mod query;
pub mod stats;
pub mod tokenizer;

pub use error::{Error, Result};
pub use index::{DocId, InvertedIndex};
pub use query::{BooleanOperator, ScoredDoc, Searcher};
