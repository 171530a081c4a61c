//! Types library for the limit order market simulator
//!
//! Value records shared by the matching engine and the round scheduler.
//! Everything here is plain data: orders, quotes and trades are immutable once
//! built, and the only stateful type is the per-agent [`position::Position`]
//! ledger.
//!
//! # Modules
//! - `ids`: Identifiers (AgentId, AssetId)
//! - `numeric`: Fixed-point decimal types (Price, Quantity)
//! - `order`: Order, Quote and Side
//! - `trade`: Trade records and counterparty roles
//! - `position`: Agent trade ledger, position and P/L
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod position;
pub mod errors;
