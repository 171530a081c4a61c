//! Matching engine core
//!
//! Applies a batch of incoming orders to the current round's books. Each
//! order is fully matched, partially matched with the residual resting on
//! its own side, or rests untouched.

use std::cmp::Ordering;
use thiserror::Error;
use tracing::{debug, warn};
use types::errors::TradeError;
use types::ids::AssetId;
use types::numeric::Quantity;
use types::order::Order;
use types::trade::Trade;

use crate::book::{Book, BookSet};
use crate::matching::{crossing, executor::MatchExecutor};

/// Settlement seam: receives every trade, in execution order, before the
/// book is updated for it
pub trait TradeSink {
    fn settle(&mut self, trade: &Trade) -> Result<(), EngineError>;
}

impl TradeSink for Vec<Trade> {
    fn settle(&mut self, trade: &Trade) -> Result<(), EngineError> {
        self.push(trade.clone());
        Ok(())
    }
}

/// Main matching engine
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    /// Trade executor with sequence generation
    executor: MatchExecutor,
    /// Round stamped on trades
    round: u64,
}

/// Result of submitting an order
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// Zero-size order; nothing happened
    Ignored,
    /// Order was added to book (no match)
    Resting { order: Order },
    /// Order was partially filled; the residual now rests
    PartiallyFilled { trades: Vec<Trade>, resting: Order },
    /// Order was completely filled
    Filled { trades: Vec<Trade> },
}

impl SubmitResult {
    pub fn trades(&self) -> &[Trade] {
        match self {
            SubmitResult::PartiallyFilled { trades, .. } | SubmitResult::Filled { trades } => trades,
            SubmitResult::Ignored | SubmitResult::Resting { .. } => &[],
        }
    }

    /// Order left resting in the book, if any
    pub fn resting(&self) -> Option<&Order> {
        match self {
            SubmitResult::Resting { order } => Some(order),
            SubmitResult::PartiallyFilled { resting, .. } => Some(resting),
            SubmitResult::Ignored | SubmitResult::Filled { .. } => None,
        }
    }
}

/// Counters for one `process_orders` batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub orders: usize,
    pub submitted_volume: Quantity,
    pub trades: usize,
    pub matched_volume: Quantity,
}

impl BatchSummary {
    fn record(&mut self, submitted: Quantity, result: &SubmitResult) {
        let trades = result.trades();
        self.orders += 1;
        self.submitted_volume = self.submitted_volume + submitted;
        self.trades += trades.len();
        self.matched_volume = self.matched_volume + trades.iter().map(|t| t.size).sum::<Quantity>();
    }

    pub fn merge(&mut self, other: &BatchSummary) {
        self.orders += other.orders;
        self.submitted_volume = self.submitted_volume + other.submitted_volume;
        self.trades += other.trades;
        self.matched_volume = self.matched_volume + other.matched_volume;
    }
}

impl MatchingEngine {
    /// Create a new matching engine with starting sequence
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            executor: MatchExecutor::new(starting_sequence),
            round: 0,
        }
    }

    /// Stamp subsequent trades with `round`
    pub fn start_round(&mut self, round: u64) {
        self.round = round;
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Sequence the next trade will carry
    pub fn next_sequence(&self) -> u64 {
        self.executor.peek_sequence()
    }

    /// Apply orders in sequence, each against the book for its asset
    ///
    /// Fails on the first order whose asset has no book, or on the first
    /// settlement failure; orders before it stay applied.
    pub fn process_orders<S>(
        &mut self,
        books: &mut BookSet,
        orders: impl IntoIterator<Item = Order>,
        sink: &mut S,
    ) -> Result<BatchSummary, EngineError>
    where
        S: TradeSink + ?Sized,
    {
        let mut summary = BatchSummary::default();

        for order in orders {
            let book = books
                .get_mut(&order.asset)
                .ok_or_else(|| EngineError::UnknownAsset {
                    asset: order.asset.clone(),
                })?;
            let submitted = order.size;
            let result = self.submit_order(book, order, sink)?;
            summary.record(submitted, &result);
        }

        Ok(summary)
    }

    /// Submit a single order to one book
    ///
    /// Crosses against the opposite side while its best price satisfies the
    /// order's limit (equal prices cross), then rests whatever is left.
    pub fn submit_order<S>(
        &mut self,
        book: &mut Book,
        order: Order,
        sink: &mut S,
    ) -> Result<SubmitResult, EngineError>
    where
        S: TradeSink + ?Sized,
    {
        if order.is_empty() {
            warn!(agent = %order.agent, asset = %order.asset, "Skipping zero-size order");
            return Ok(SubmitResult::Ignored);
        }

        let resting_side = order.side.opposite();
        let mut trades = Vec::new();
        let mut incoming = order;

        let residual = loop {
            let tob = match book.top_of_opposite(incoming.side) {
                Some(tob) if crossing::incoming_can_match(incoming.side, incoming.price, tob.price) => {
                    tob.clone()
                }
                _ => break Some(incoming),
            };

            let fill = incoming.size.min(tob.size);
            let trade = self.executor.prepare_trade(self.round, &incoming, &tob, fill);
            sink.settle(&trade)?;
            self.executor.commit(&trade);
            debug!(
                sequence = trade.sequence,
                asset = %trade.asset,
                side = %trade.side,
                size = %trade.size,
                price = %trade.price,
                aggressor = %trade.aggressor,
                provider = %trade.provider,
                "Trade executed"
            );
            trades.push(trade);

            match incoming.size.cmp(&tob.size) {
                Ordering::Less => {
                    book.replace_top(resting_side, tob.with_size(tob.size.saturating_sub(fill)));
                    break None;
                }
                Ordering::Equal => {
                    book.pop_top(resting_side);
                    break None;
                }
                Ordering::Greater => {
                    book.pop_top(resting_side);
                    incoming = incoming.with_size(incoming.size.saturating_sub(fill));
                }
            }
        };

        Ok(match residual {
            Some(rest) => {
                debug!(
                    asset = %rest.asset,
                    side = %rest.side,
                    size = %rest.size,
                    price = %rest.price,
                    "Order resting"
                );
                book.insert(rest.clone());
                if trades.is_empty() {
                    SubmitResult::Resting { order: rest }
                } else {
                    SubmitResult::PartiallyFilled {
                        trades,
                        resting: rest,
                    }
                }
            }
            None => SubmitResult::Filled { trades },
        })
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Engine errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No book for asset {asset}")]
    UnknownAsset { asset: AssetId },

    #[error("Unknown agent: {agent}")]
    UnknownAgent { agent: String },

    #[error("Settlement failed: {0}")]
    Settlement(#[from] TradeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::AgentId;
    use types::numeric::Price;
    use types::order::Side;

    fn asset() -> AssetId {
        AssetId::new("AA")
    }

    fn order(agent: AgentId, side: Side, price: u64, size: u64) -> Order {
        Order::new(agent, side, Quantity::from_u64(size), asset(), Price::from_u64(price))
    }

    fn books() -> BookSet {
        BookSet::fresh(&[asset()])
    }

    #[test]
    fn test_engine_resting_order() {
        let mut engine = MatchingEngine::new(1);
        let mut book = Book::new(asset());
        let mut trades: Vec<Trade> = Vec::new();
        let buy = order(AgentId::new(), Side::BUY, 99, 1);

        let result = engine.submit_order(&mut book, buy.clone(), &mut trades).unwrap();

        assert_eq!(result, SubmitResult::Resting { order: buy });
        assert!(trades.is_empty());
        assert_eq!(book.best_bid().unwrap().price, Price::from_u64(99));
    }

    #[test]
    fn test_partial_fill_across_levels() {
        let mut engine = MatchingEngine::new(1);
        let mut book = Book::new(asset());
        let mut trades: Vec<Trade> = Vec::new();
        let (m1, m2, taker) = (AgentId::new(), AgentId::new(), AgentId::new());

        engine.submit_order(&mut book, order(m1, Side::SELL, 100, 3), &mut trades).unwrap();
        engine.submit_order(&mut book, order(m2, Side::SELL, 101, 10), &mut trades).unwrap();
        let result = engine
            .submit_order(&mut book, order(taker, Side::BUY, 101, 5), &mut trades)
            .unwrap();

        assert!(matches!(result, SubmitResult::Filled { .. }));
        assert_eq!(trades.len(), 2);
        // Aggressor pays its own limit on both fills
        assert_eq!((trades[0].size, trades[0].price), (Quantity::from_u64(3), Price::from_u64(101)));
        assert_eq!((trades[1].size, trades[1].price), (Quantity::from_u64(2), Price::from_u64(101)));
        assert_eq!(trades[0].provider, m1);
        assert_eq!(trades[1].provider, m2);

        let ask = book.best_ask().unwrap();
        assert_eq!(ask.agent, m2);
        assert_eq!(ask.size, Quantity::from_u64(8));
        assert_eq!(ask.price, Price::from_u64(101));
        assert!(book.bids().is_empty());
    }

    #[test]
    fn test_exact_match_removes_resting() {
        let mut engine = MatchingEngine::new(1);
        let mut book = Book::new(asset());
        let mut trades: Vec<Trade> = Vec::new();

        engine
            .submit_order(&mut book, order(AgentId::new(), Side::BUY, 99, 4), &mut trades)
            .unwrap();
        engine
            .submit_order(&mut book, order(AgentId::new(), Side::SELL, 99, 4), &mut trades)
            .unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].size, Quantity::from_u64(4));
        assert_eq!(trades[0].price, Price::from_u64(99));
        assert_eq!(trades[0].side, Side::SELL);
        assert!(book.is_empty());
    }

    #[test]
    fn test_residual_rests_after_sweep() {
        let mut engine = MatchingEngine::new(1);
        let mut book = Book::new(asset());
        let mut trades: Vec<Trade> = Vec::new();

        engine
            .submit_order(&mut book, order(AgentId::new(), Side::BUY, 99, 2), &mut trades)
            .unwrap();
        let result = engine
            .submit_order(&mut book, order(AgentId::new(), Side::SELL, 98, 5), &mut trades)
            .unwrap();

        match result {
            SubmitResult::PartiallyFilled { trades, resting } => {
                assert_eq!(trades.len(), 1);
                assert_eq!(trades[0].price, Price::from_u64(98));
                assert_eq!(resting.size, Quantity::from_u64(3));
            }
            other => panic!("Expected PartiallyFilled, got {other:?}"),
        }
        assert!(book.bids().is_empty());
        assert_eq!(book.best_ask().unwrap().size, Quantity::from_u64(3));
    }

    #[test]
    fn test_no_cross() {
        let mut engine = MatchingEngine::new(1);
        let mut book = Book::new(asset());
        let mut trades: Vec<Trade> = Vec::new();

        engine
            .submit_order(&mut book, order(AgentId::new(), Side::SELL, 101, 1), &mut trades)
            .unwrap();
        let result = engine
            .submit_order(&mut book, order(AgentId::new(), Side::BUY, 100, 1), &mut trades)
            .unwrap();

        assert!(matches!(result, SubmitResult::Resting { .. }));
        assert!(trades.is_empty());
        assert_eq!(book.order_count(), 2);
    }

    #[test]
    fn test_fifo_within_level() {
        let mut engine = MatchingEngine::new(1);
        let mut book = Book::new(asset());
        let mut trades: Vec<Trade> = Vec::new();
        let (early, late) = (AgentId::new(), AgentId::new());

        engine.submit_order(&mut book, order(early, Side::SELL, 100, 1), &mut trades).unwrap();
        engine.submit_order(&mut book, order(late, Side::SELL, 100, 1), &mut trades).unwrap();
        engine
            .submit_order(&mut book, order(AgentId::new(), Side::BUY, 100, 1), &mut trades)
            .unwrap();

        assert_eq!(trades[0].provider, early);
        assert_eq!(book.best_ask().unwrap().agent, late);
    }

    #[test]
    fn test_zero_size_order_ignored() {
        let mut engine = MatchingEngine::new(1);
        let mut book = Book::new(asset());
        let mut trades: Vec<Trade> = Vec::new();

        engine
            .submit_order(&mut book, order(AgentId::new(), Side::SELL, 100, 1), &mut trades)
            .unwrap();
        let result = engine
            .submit_order(&mut book, order(AgentId::new(), Side::BUY, 100, 0), &mut trades)
            .unwrap();

        assert_eq!(result, SubmitResult::Ignored);
        assert!(trades.is_empty());
        assert_eq!(book.order_count(), 1);
    }

    #[test]
    fn test_process_orders_summary_and_sequence() {
        let mut engine = MatchingEngine::new(10);
        engine.start_round(3);
        let mut books = books();
        let mut trades: Vec<Trade> = Vec::new();
        let orders = vec![
            order(AgentId::new(), Side::SELL, 100, 3),
            order(AgentId::new(), Side::SELL, 101, 10),
            order(AgentId::new(), Side::BUY, 101, 5),
        ];

        let summary = engine.process_orders(&mut books, orders, &mut trades).unwrap();

        assert_eq!(summary.orders, 3);
        assert_eq!(summary.submitted_volume, Quantity::from_u64(18));
        assert_eq!(summary.trades, 2);
        assert_eq!(summary.matched_volume, Quantity::from_u64(5));
        assert_eq!(trades.iter().map(|t| t.sequence).collect::<Vec<_>>(), vec![10, 11]);
        assert!(trades.iter().all(|t| t.round == 3));
        assert_eq!(engine.next_sequence(), 12);
    }

    #[test]
    fn test_unknown_asset_rejected() {
        let mut engine = MatchingEngine::new(1);
        let mut books = books();
        let mut trades: Vec<Trade> = Vec::new();
        let stray = Order::new(
            AgentId::new(),
            Side::BUY,
            Quantity::from_u64(1),
            AssetId::new("ZZ"),
            Price::from_u64(100),
        );

        let err = engine.process_orders(&mut books, vec![stray], &mut trades).unwrap_err();
        assert_eq!(err, EngineError::UnknownAsset { asset: AssetId::new("ZZ") });
    }

    struct RejectingSink;

    impl TradeSink for RejectingSink {
        fn settle(&mut self, trade: &Trade) -> Result<(), EngineError> {
            Err(EngineError::UnknownAgent {
                agent: trade.provider.to_string(),
            })
        }
    }

    #[test]
    fn test_settlement_failure_leaves_book_untouched() {
        let mut engine = MatchingEngine::new(1);
        let mut books = books();
        let mut trades: Vec<Trade> = Vec::new();
        engine
            .process_orders(&mut books, vec![order(AgentId::new(), Side::SELL, 100, 2)], &mut trades)
            .unwrap();

        let result = engine.process_orders(
            &mut books,
            vec![order(AgentId::new(), Side::BUY, 100, 1)],
            &mut RejectingSink,
        );

        assert!(matches!(result, Err(EngineError::UnknownAgent { .. })));
        // No trade was recorded, so its sequence is still free
        assert_eq!(engine.next_sequence(), 1);
        let book = books.get(&asset()).unwrap();
        assert_eq!(book.best_ask().unwrap().size, Quantity::from_u64(2));
        assert!(book.bids().is_empty());

        engine
            .process_orders(&mut books, vec![order(AgentId::new(), Side::BUY, 100, 1)], &mut trades)
            .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].sequence, 1);
    }
}
