//! Agents and the role capabilities they plug into the round scheduler
//!
//! An [`Agent`] is the simulator-owned identity and trade ledger of a
//! participant. The strategy that decides its orders lives behind one of the
//! role traits and only ever sees the agent read-only.

use matching_engine::BookSet;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use types::errors::TradeError;
use types::ids::{AgentId, AssetId};
use types::numeric::Price;
use types::order::Order;
use types::position::Position;
use types::trade::Trade;

use crate::series::{BookHistory, TradeHistory};

/// Scheduler phase an agent acts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    MarketMaker,
    Arbitrageur,
    LiquidityTaker,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::MarketMaker => f.write_str("market_maker"),
            AgentKind::Arbitrageur => f.write_str("arbitrageur"),
            AgentKind::LiquidityTaker => f.write_str("liquidity_taker"),
        }
    }
}

/// Named participant bound to a single asset
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    name: String,
    asset: Option<AssetId>,
    position: Position,
}

impl Agent {
    pub fn new(name: impl Into<String>) -> Self {
        let id = AgentId::new();
        Self {
            id,
            name: name.into(),
            asset: None,
            position: Position::new(id),
        }
    }

    /// Bind the agent to the asset it trades
    pub fn with_asset(mut self, asset: impl Into<AssetId>) -> Self {
        let asset = asset.into();
        self.position.track(asset.clone());
        self.asset = Some(asset);
        self
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn asset(&self) -> Option<&AssetId> {
        self.asset.as_ref()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub(crate) fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    /// Book a trade this agent took part in
    pub fn add_trade(&mut self, trade: &Trade) -> Result<(), TradeError> {
        self.position.add_trade(trade)
    }

    /// Net position (positive = long)
    pub fn net_position(&self) -> Decimal {
        self.position.position()
    }

    pub fn pnl(&self, mark: Price) -> Decimal {
        self.position.pnl(mark)
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Quotes first each round, seeing only history
pub trait MarketMaker {
    fn get_orders(&mut self, agent: &Agent, trades: &TradeHistory, books: &BookHistory) -> Vec<Order>;
}

/// Acts after the composite snapshot, seeing only the current round's books
pub trait Arbitrageur {
    fn get_orders(&mut self, agent: &Agent, current: &BookSet) -> Vec<Order>;
}

/// Acts last, seeing history and the current round's books
pub trait LiquidityTaker {
    fn get_orders(
        &mut self,
        agent: &Agent,
        trades: &TradeHistory,
        books: &BookHistory,
        current: &BookSet,
    ) -> Vec<Order>;
}
