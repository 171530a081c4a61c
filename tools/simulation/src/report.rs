//! End-of-run report
//!
//! Summarises a simulator's histories and agent ledgers and serializes them
//! to JSON for external consumption.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use types::ids::{AgentId, AssetId};
use types::numeric::{Price, Quantity};
use types::position::PositionSide;

use crate::agent::AgentKind;
use crate::composite::CompositeQuote;
use crate::error::SimResult;
use crate::simulator::Simulator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReport {
    pub asset: AssetId,
    pub trade_count: usize,
    pub traded_volume: Quantity,
    pub last_price: Option<Price>,
    pub last_composite: Option<CompositeQuote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub name: String,
    pub id: AgentId,
    pub kind: AgentKind,
    pub asset: Option<AssetId>,
    pub position: Decimal,
    pub side: PositionSide,
    pub buy_volume: Quantity,
    pub sell_volume: Quantity,
    /// Marked at the last trade price of the agent's asset; absent before any trade
    pub pnl: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub version: String,
    pub rounds: u64,
    pub assets: Vec<AssetReport>,
    pub agents: Vec<AgentReport>,
}

impl SimulationReport {
    pub fn from_simulator(sim: &Simulator) -> Self {
        let series = sim.series();

        let assets = sim
            .assets()
            .iter()
            .map(|asset| {
                let trades = series.trades_for(asset);
                AssetReport {
                    asset: asset.clone(),
                    trade_count: trades.len(),
                    traded_volume: trades.iter().map(|t| t.size).sum(),
                    last_price: series.last_price(asset),
                    last_composite: series.composites_for(asset).last().cloned(),
                }
            })
            .collect();

        let agents = sim
            .agents()
            .map(|(agent, kind)| {
                let position = agent.position();
                let mark = agent.asset().and_then(|asset| series.last_price(asset));
                AgentReport {
                    name: agent.name().to_string(),
                    id: agent.id(),
                    kind,
                    asset: agent.asset().cloned(),
                    position: position.position(),
                    side: position.position_side(),
                    buy_volume: position.buy_volume(),
                    sell_volume: position.sell_volume(),
                    pnl: mark.map(|m| position.pnl(m)),
                }
            })
            .collect();

        Self {
            version: crate::VERSION.to_string(),
            rounds: sim.round(),
            assets,
            agents,
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> SimResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
