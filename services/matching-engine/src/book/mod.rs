//! Order book infrastructure module
//!
//! Contains price levels, bid book, ask book, and the per-asset [`Book`] and
//! [`BookSet`] a round trades against.

pub mod price_level;
pub mod bid_book;
pub mod ask_book;

pub use price_level::PriceLevel;
pub use bid_book::BidBook;
pub use ask_book::AskBook;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use types::ids::AssetId;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

/// Two-sided book for one asset, scoped to a single round
#[derive(Debug, Clone)]
pub struct Book {
    asset: AssetId,
    bids: BidBook,
    asks: AskBook,
}

impl Book {
    pub fn new(asset: AssetId) -> Self {
        Self {
            asset,
            bids: BidBook::new(),
            asks: AskBook::new(),
        }
    }

    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    pub fn bids(&self) -> &BidBook {
        &self.bids
    }

    pub fn asks(&self) -> &AskBook {
        &self.asks
    }

    /// Highest, earliest resting buy order
    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.best()
    }

    /// Lowest, earliest resting sell order
    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.best()
    }

    /// Rest an order on its own side behind any orders at the same price
    pub fn insert(&mut self, order: Order) {
        match order.side {
            Side::BUY => self.bids.insert(order),
            Side::SELL => self.asks.insert(order),
        }
    }

    /// Resting order that an incoming order on `side` meets first
    pub fn top_of_opposite(&self, side: Side) -> Option<&Order> {
        match side {
            Side::BUY => self.asks.best(),
            Side::SELL => self.bids.best(),
        }
    }

    /// Remove the top-of-book order on `side`
    pub(crate) fn pop_top(&mut self, side: Side) -> Option<Order> {
        match side {
            Side::BUY => self.bids.pop_best(),
            Side::SELL => self.asks.pop_best(),
        }
    }

    /// Swap the top-of-book order on `side` for a reduced copy in the same slot
    pub(crate) fn replace_top(&mut self, side: Side, order: Order) -> Option<Order> {
        match side {
            Side::BUY => self.bids.replace_best(order),
            Side::SELL => self.asks.replace_best(order),
        }
    }

    pub fn order_count(&self) -> usize {
        self.bids.order_count() + self.asks.order_count()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Aggregated top N levels on each side
    pub fn depth_snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            asset: self.asset.clone(),
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
        }
    }
}

/// Book snapshot for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub asset: AssetId,
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}

/// One book per asset
#[derive(Debug, Clone, Default)]
pub struct BookSet {
    books: BTreeMap<AssetId, Book>,
}

impl BookSet {
    /// Empty books for every asset
    pub fn fresh<'a>(assets: impl IntoIterator<Item = &'a AssetId>) -> Self {
        let books = assets
            .into_iter()
            .map(|asset| (asset.clone(), Book::new(asset.clone())))
            .collect();
        Self { books }
    }

    pub fn get(&self, asset: &AssetId) -> Option<&Book> {
        self.books.get(asset)
    }

    pub fn get_mut(&mut self, asset: &AssetId) -> Option<&mut Book> {
        self.books.get_mut(asset)
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.books.contains_key(asset)
    }

    /// Books in asset order
    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &Book)> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
