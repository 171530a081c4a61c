//! Matching Engine
//!
//! Price-time priority matching for a single round of the market simulator.
//! Incoming orders are crossed against a per-asset [`Book`], producing trades
//! that are handed to a [`TradeSink`] for settlement; unmatched residuals rest
//! in the book.
//!
//! **Key Invariants:**
//! - Best price first on each side, FIFO within a price level
//! - Trades execute at the aggressor's limit price
//! - Resting orders are never edited in place; partial fills replace them
//! - Deterministic matching (same inputs → same outputs)

pub mod book;
pub mod matching;
pub mod engine;

pub use book::{Book, BookSet, BookSnapshot};
pub use engine::{BatchSummary, EngineError, MatchingEngine, SubmitResult, TradeSink};
