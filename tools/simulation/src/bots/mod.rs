//! Reference strategies
//!
//! - `fixed_spread`: quotes a constant bid and ask every round
//! - `last_trade`: quotes around the last traded price
//! - `random_taker`: crosses the whole top of book on a random side

pub mod fixed_spread;
pub mod last_trade;
pub mod random_taker;

pub use fixed_spread::{FixedSpreadConfig, FixedSpreadMaker};
pub use last_trade::{LastTradeConfig, LastTradeMaker};
pub use random_taker::{RandomTaker, RandomTakerConfig};
