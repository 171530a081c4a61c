//! Fixed-spread market maker
//!
//! Posts the same two-sided quote every round, regardless of history.

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use crate::agent::{Agent, MarketMaker};
use crate::series::{BookHistory, TradeHistory};

/// Configuration for the fixed-spread maker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedSpreadConfig {
    pub bid: Price,
    pub ask: Price,
    /// Size quoted on each side
    pub size: Quantity,
}

impl Default for FixedSpreadConfig {
    fn default() -> Self {
        Self {
            bid: Price::from_u64(99),
            ask: Price::from_u64(101),
            size: Quantity::from_u64(1),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixedSpreadMaker {
    pub config: FixedSpreadConfig,
}

impl FixedSpreadMaker {
    pub fn new(config: FixedSpreadConfig) -> Self {
        Self { config }
    }
}

impl MarketMaker for FixedSpreadMaker {
    fn get_orders(&mut self, agent: &Agent, _trades: &TradeHistory, _books: &BookHistory) -> Vec<Order> {
        let Some(asset) = agent.asset() else {
            return Vec::new();
        };
        vec![
            Order::new(agent.id(), Side::BUY, self.config.size, asset.clone(), self.config.bid),
            Order::new(agent.id(), Side::SELL, self.config.size, asset.clone(), self.config.ask),
        ]
    }
}
