//! Trade execution logic
//!
//! Builds trade records for each crossing and stamps them with a
//! monotonically increasing sequence number.

use types::numeric::Quantity;
use types::order::Order;
use types::trade::Trade;

/// Match executor for handling trade generation
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Sequence the next trade will carry
    pub fn peek_sequence(&self) -> u64 {
        self.sequence_counter
    }

    /// Build the trade between an incoming order and the resting order it meets
    ///
    /// The trade prints at the aggressor's limit price and carries the
    /// aggressor's side. Self-trades are not prevented. The sequence is only
    /// consumed by [`MatchExecutor::commit`], so a trade that is never
    /// committed leaves no gap.
    pub fn prepare_trade(
        &self,
        round: u64,
        aggressor: &Order,
        provider: &Order,
        size: Quantity,
    ) -> Trade {
        Trade::new(
            self.sequence_counter,
            round,
            aggressor.agent,
            aggressor.side,
            provider.agent,
            size,
            aggressor.asset.clone(),
            aggressor.price,
        )
    }

    /// Consume the sequence of a settled trade
    pub fn commit(&mut self, trade: &Trade) {
        self.sequence_counter = trade.sequence + 1;
    }
}

impl Default for MatchExecutor {
    fn default() -> Self {
        Self::new(0)
    }
}
