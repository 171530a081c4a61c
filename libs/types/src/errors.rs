//! Error types for record-level operations
//!
//! Error taxonomy using thiserror

use thiserror::Error;

/// Trade booking errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("Agent {agent} is not a counterparty to trade #{sequence}")]
    NotCounterparty { agent: String, sequence: u64 },
}
