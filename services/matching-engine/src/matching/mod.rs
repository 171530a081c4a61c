//! Matching logic module
//!
//! Implements the crossing predicate and trade construction used by the
//! price-time priority loop in [`crate::engine`].

pub mod crossing;
pub mod executor;

pub use crossing::{can_match, incoming_can_match};
pub use executor::MatchExecutor;
