//! Limit Order Market Simulator
//!
//! Round-driven simulation of a limit order market. Pluggable agents
//! (market makers, arbitrageurs, liquidity takers) submit orders each round
//! against fresh per-asset books; trades are matched with price-time
//! priority and booked to both counterparties.
//!
//! # Modules
//! - `agent`: Agent identity/ledger and the three role traits
//! - `simulator`: Round scheduler
//! - `composite`: Top-of-book and weighted-average composite quotes
//! - `series`: Per-asset trade, book and composite histories
//! - `bots`: Reference maker and taker strategies
//! - `config`: JSON run configuration
//! - `report`: End-of-run JSON report
//! - `error`: Simulator errors

pub mod agent;
pub mod bots;
pub mod composite;
pub mod config;
pub mod error;
pub mod report;
pub mod series;
pub mod simulator;

pub use agent::{Agent, AgentKind, Arbitrageur, LiquidityTaker, MarketMaker};
pub use composite::{CompositeMethod, CompositeQuote};
pub use config::SimulationConfig;
pub use error::{SimError, SimResult};
pub use report::SimulationReport;
pub use series::TimeSeries;
pub use simulator::{RoundSummary, Simulator};

/// Crate version constant
pub const VERSION: &str = "1.0.0";
