//! Last-trade market maker
//!
//! Quotes a two-sided market centred on the most recent trade price for its
//! asset, or on a configured starting mid before anything has traded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use crate::agent::{Agent, MarketMaker};
use crate::series::{BookHistory, TradeHistory};

/// Configuration for the last-trade maker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastTradeConfig {
    /// Mid used until the first trade prints
    pub initial_mid: Price,
    /// Distance from mid to each quote
    pub half_spread: Decimal,
    pub size: Quantity,
}

impl Default for LastTradeConfig {
    fn default() -> Self {
        Self {
            initial_mid: Price::from_u64(100),
            half_spread: Decimal::ONE,
            size: Quantity::from_u64(1),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LastTradeMaker {
    pub config: LastTradeConfig,
}

impl LastTradeMaker {
    pub fn new(config: LastTradeConfig) -> Self {
        Self { config }
    }

    /// Quote centre given the trade history
    pub fn mid(&self, agent: &Agent, trades: &TradeHistory) -> Price {
        agent
            .asset()
            .and_then(|asset| trades.get(asset))
            .and_then(|ts| ts.last())
            .map(|t| t.price)
            .unwrap_or(self.config.initial_mid)
    }
}

impl MarketMaker for LastTradeMaker {
    fn get_orders(&mut self, agent: &Agent, trades: &TradeHistory, _books: &BookHistory) -> Vec<Order> {
        let Some(asset) = agent.asset() else {
            return Vec::new();
        };
        let mid = self.mid(agent, trades);
        let half = self.config.half_spread;
        vec![
            Order::new(agent.id(), Side::BUY, self.config.size, asset.clone(), mid.offset(-half)),
            Order::new(agent.id(), Side::SELL, self.config.size, asset.clone(), mid.offset(half)),
        ]
    }
}
