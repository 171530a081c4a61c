//! Random liquidity taker
//!
//! Each round picks a side at random and takes the entire top-of-book order
//! on the opposite side at its price. Uses a seeded ChaCha8 RNG so runs are
//! reproducible.

use matching_engine::BookSet;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use types::order::{Order, Side};

use crate::agent::{Agent, LiquidityTaker};
use crate::series::{BookHistory, TradeHistory};

/// Configuration for the random taker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomTakerConfig {
    /// Probability of buying the offer rather than selling into the bid
    pub buy_probability: f64,
}

impl Default for RandomTakerConfig {
    fn default() -> Self {
        Self {
            buy_probability: 0.5,
        }
    }
}

pub struct RandomTaker {
    pub config: RandomTakerConfig,
    pub orders_submitted: usize,
    rng: ChaCha8Rng,
}

impl RandomTaker {
    /// Create a new taker with a deterministic seed.
    pub fn new(config: RandomTakerConfig, seed: u64) -> Self {
        Self {
            config,
            orders_submitted: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn pick_side(&mut self) -> Side {
        let p = self.config.buy_probability.clamp(0.0, 1.0);
        if self.rng.gen_bool(p) {
            Side::BUY
        } else {
            Side::SELL
        }
    }
}

impl LiquidityTaker for RandomTaker {
    fn get_orders(
        &mut self,
        agent: &Agent,
        _trades: &TradeHistory,
        _books: &BookHistory,
        current: &BookSet,
    ) -> Vec<Order> {
        let side = self.pick_side();
        let Some(book) = agent.asset().and_then(|asset| current.get(asset)) else {
            return Vec::new();
        };
        // Nothing to take on an empty side
        let Some(tob) = book.top_of_opposite(side) else {
            return Vec::new();
        };

        self.orders_submitted += 1;
        vec![Order::new(agent.id(), side, tob.size, tob.asset.clone(), tob.price)]
    }
}
