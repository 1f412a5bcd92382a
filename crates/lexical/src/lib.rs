//! Tokenized BM25 inverted index over stored content.
//!
//! [`index::LexicalIndex`] subscribes to [`codegraph_temporal::TemporalStore`]
//! writes via [`subscriber::LexicalSubscriber`], re-tokenizing and
//! re-indexing each path's current content as it changes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod subscriber;
pub mod tokenizer;

pub use index::LexicalIndex;
pub use subscriber::LexicalSubscriber;
