//! Simulation configuration
//!
//! A run is described by a JSON document naming the assets, the number of
//! rounds, the RNG seed and the agents to register. Decimal fields are
//! written as strings (`"99.5"`).

use serde::{Deserialize, Serialize};
use std::path::Path;
use types::ids::AssetId;

use crate::agent::Agent;
use crate::bots::{
    FixedSpreadConfig, FixedSpreadMaker, LastTradeConfig, LastTradeMaker, RandomTaker,
    RandomTakerConfig,
};
use crate::composite::CompositeMethod;
use crate::error::{SimError, SimResult};
use crate::simulator::{Simulator, DEFAULT_STARTING_SEQUENCE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MakerStrategy {
    FixedSpread(FixedSpreadConfig),
    LastTrade(LastTradeConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TakerStrategy {
    Random(RandomTakerConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakerConfig {
    pub name: String,
    pub asset: AssetId,
    pub strategy: MakerStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakerConfig {
    pub name: String,
    pub asset: AssetId,
    pub strategy: TakerStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub assets: Vec<AssetId>,
    pub rounds: u64,
    /// Base seed; each random agent gets `seed + registration index`
    pub seed: u64,
    /// Sequence carried by the first trade
    #[serde(default = "default_starting_sequence")]
    pub starting_sequence: u64,
    #[serde(default)]
    pub composite: CompositeMethod,
    #[serde(default)]
    pub makers: Vec<MakerConfig>,
    #[serde(default)]
    pub takers: Vec<TakerConfig>,
}

fn default_starting_sequence() -> u64 {
    DEFAULT_STARTING_SEQUENCE
}

impl Default for SimulationConfig {
    /// Two makers and one random taker on `AA` for 20 rounds
    fn default() -> Self {
        let asset = AssetId::new("AA");
        Self {
            assets: vec![asset.clone()],
            rounds: 20,
            seed: 42,
            starting_sequence: DEFAULT_STARTING_SEQUENCE,
            composite: CompositeMethod::TopOfBook,
            makers: vec![
                MakerConfig {
                    name: "A".to_string(),
                    asset: asset.clone(),
                    strategy: MakerStrategy::FixedSpread(FixedSpreadConfig::default()),
                },
                MakerConfig {
                    name: "B".to_string(),
                    asset: asset.clone(),
                    strategy: MakerStrategy::LastTrade(LastTradeConfig::default()),
                },
            ],
            takers: vec![TakerConfig {
                name: "C".to_string(),
                asset,
                strategy: TakerStrategy::Random(RandomTakerConfig::default()),
            }],
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.assets.is_empty() {
            return Err(SimError::Config("at least one asset is required".to_string()));
        }

        let agents = self
            .makers
            .iter()
            .map(|m| (&m.name, &m.asset))
            .chain(self.takers.iter().map(|t| (&t.name, &t.asset)));
        for (name, asset) in agents {
            if !self.assets.contains(asset) {
                return Err(SimError::Config(format!(
                    "agent {name} trades {asset}, which is not in assets"
                )));
            }
        }

        for taker in &self.takers {
            let TakerStrategy::Random(cfg) = &taker.strategy;
            if !(0.0..=1.0).contains(&cfg.buy_probability) {
                return Err(SimError::Config(format!(
                    "agent {} has buy_probability {} outside [0, 1]",
                    taker.name, cfg.buy_probability
                )));
            }
        }

        Ok(())
    }

    /// Register every configured agent on a fresh simulator
    pub fn build(&self) -> SimResult<Simulator> {
        self.validate()?;
        let mut sim = Simulator::new(self.assets.iter().cloned())
            .with_composite(self.composite)
            .with_starting_sequence(self.starting_sequence);

        for entry in &self.makers {
            let agent = Agent::new(entry.name.clone()).with_asset(entry.asset.clone());
            match &entry.strategy {
                MakerStrategy::FixedSpread(cfg) => {
                    sim.add_market_maker(agent, FixedSpreadMaker::new(cfg.clone()))?
                }
                MakerStrategy::LastTrade(cfg) => {
                    sim.add_market_maker(agent, LastTradeMaker::new(cfg.clone()))?
                }
            };
        }

        for (i, entry) in self.takers.iter().enumerate() {
            let agent = Agent::new(entry.name.clone()).with_asset(entry.asset.clone());
            let seed = self.seed.wrapping_add(i as u64);
            match &entry.strategy {
                TakerStrategy::Random(cfg) => {
                    sim.add_liquidity_taker(agent, RandomTaker::new(cfg.clone(), seed))?
                }
            };
        }

        Ok(sim)
    }
}
