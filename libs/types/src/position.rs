//! Agent trade ledger
//!
//! Tracks every trade an agent took part in, plus running buy/sell volume and
//! value. Position and mark-to-market P/L are derived from those four totals.
//! The ledger starts at zero and only ever grows; it is never reset mid-run.

use crate::errors::TradeError;
use crate::ids::{AgentId, AssetId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use crate::trade::{Role, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of the net position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    /// Net bought - profit when price increases
    LONG,
    /// Net sold - profit when price decreases
    SHORT,
    FLAT,
}

/// Per-agent accounting state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    agent: AgentId,
    trades_by_asset: BTreeMap<AssetId, Vec<Trade>>,
    buy_volume: Quantity,
    buy_value: Decimal,
    sell_volume: Quantity,
    sell_value: Decimal,
}

impl Position {
    pub fn new(agent: AgentId) -> Self {
        Self {
            agent,
            trades_by_asset: BTreeMap::new(),
            buy_volume: Quantity::zero(),
            buy_value: Decimal::ZERO,
            sell_volume: Quantity::zero(),
            sell_value: Decimal::ZERO,
        }
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    /// Start an (empty) trade list for an asset
    pub fn track(&mut self, asset: AssetId) {
        self.trades_by_asset.entry(asset).or_default();
    }

    /// Book a trade, inferring which leg this agent is on
    ///
    /// For a self-trade this books only the aggressor leg; use [`Position::book`]
    /// once per leg to keep both sides.
    pub fn add_trade(&mut self, trade: &Trade) -> Result<(), TradeError> {
        let role = trade.role_of(self.agent).ok_or_else(|| TradeError::NotCounterparty {
            agent: self.agent.to_string(),
            sequence: trade.sequence,
        })?;
        self.book(trade, role);
        Ok(())
    }

    /// Book one leg of a trade
    pub fn book(&mut self, trade: &Trade, role: Role) {
        self.trades_by_asset
            .entry(trade.asset.clone())
            .or_default()
            .push(trade.clone());

        match trade.side_for_role(role) {
            Side::BUY => {
                self.buy_volume = self.buy_volume + trade.size;
                self.buy_value += trade.value();
            }
            Side::SELL => {
                self.sell_volume = self.sell_volume + trade.size;
                self.sell_value += trade.value();
            }
        }
    }

    /// Net position: buy volume minus sell volume (positive = long)
    pub fn position(&self) -> Decimal {
        self.buy_volume.as_decimal() - self.sell_volume.as_decimal()
    }

    pub fn position_side(&self) -> PositionSide {
        let position = self.position();
        if position > Decimal::ZERO {
            PositionSide::LONG
        } else if position < Decimal::ZERO {
            PositionSide::SHORT
        } else {
            PositionSide::FLAT
        }
    }

    /// Realized value plus the open position marked at `mark`
    pub fn pnl(&self, mark: Price) -> Decimal {
        let position = self.position();
        let exposure = position.abs() * mark.as_decimal();
        if position >= Decimal::ZERO {
            // LONG: what we sold plus what we hold, less what we paid
            (self.sell_value + exposure) - self.buy_value
        } else {
            // SHORT: what we sold, less what we paid plus the cost to cover
            self.sell_value - (self.buy_value + exposure)
        }
    }

    /// Trades on one asset, in booking order
    pub fn trades(&self, asset: &AssetId) -> &[Trade] {
        self.trades_by_asset
            .get(asset)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn trades_by_asset(&self) -> &BTreeMap<AssetId, Vec<Trade>> {
        &self.trades_by_asset
    }

    pub fn trade_count(&self) -> usize {
        self.trades_by_asset.values().map(Vec::len).sum()
    }

    pub fn buy_volume(&self) -> Quantity {
        self.buy_volume
    }

    pub fn buy_value(&self) -> Decimal {
        self.buy_value
    }

    pub fn sell_volume(&self) -> Quantity {
        self.sell_volume
    }

    pub fn sell_value(&self) -> Decimal {
        self.sell_value
    }

    /// Total traded volume on both sides
    pub fn gross_volume(&self) -> Quantity {
        self.buy_volume + self.sell_volume
    }
}
