//! Path-keyed temporal store: current content plus append-only history.
//!
//! [`store::TemporalStore`] is the only write sink in the engine (§9); the
//! lexical, vector, and graph indexes subscribe to its writes through
//! [`subscriber::ChangeSubscriber`] rather than holding a reference back
//! into it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;
pub mod subscriber;

pub use store::TemporalStore;
pub use subscriber::ChangeSubscriber;
