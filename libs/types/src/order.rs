//! Order and quote records
//!
//! Orders are immutable values: a partial fill never edits an order in place,
//! it produces a new one with the reduced size via [`Order::with_size`].

use crate::ids::{AgentId, AssetId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::BUY => f.write_str("B"),
            Side::SELL => f.write_str("S"),
        }
    }
}

/// Limit order owned by an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub agent: AgentId,
    pub side: Side,
    pub size: Quantity,
    pub asset: AssetId,
    pub price: Price,
}

impl Order {
    pub fn new(agent: AgentId, side: Side, size: Quantity, asset: AssetId, price: Price) -> Self {
        Self {
            agent,
            side,
            size,
            asset,
            price,
        }
    }

    /// Copy of this order with a different size (same owner, side, asset, price)
    pub fn with_size(&self, size: Quantity) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    /// A zero-size order never matches and never rests
    pub fn is_empty(&self) -> bool {
        self.size.is_zero()
    }
}

/// Derived market observation (e.g. top of book); not a resting order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub side: Side,
    pub size: Quantity,
    pub asset: AssetId,
    pub price: Price,
}

impl Quote {
    pub fn new(side: Side, size: Quantity, asset: AssetId, price: Price) -> Self {
        Self {
            side,
            size,
            asset,
            price,
        }
    }
}
