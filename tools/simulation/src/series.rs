//! Per-asset historical time series
//!
//! All three histories are append-only and cumulative across rounds. Trades
//! land as they execute, one composite quote lands per round after the maker
//! phase, and a copy of each book lands once the round has finished.

use matching_engine::Book;
use std::collections::BTreeMap;
use types::ids::AssetId;
use types::numeric::Price;
use types::trade::Trade;

use crate::composite::CompositeQuote;

pub type TradeHistory = BTreeMap<AssetId, Vec<Trade>>;
pub type BookHistory = BTreeMap<AssetId, Vec<Book>>;
pub type CompositeHistory = BTreeMap<AssetId, Vec<CompositeQuote>>;

#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    trades: TradeHistory,
    books: BookHistory,
    composites: CompositeHistory,
}

impl TimeSeries {
    /// Empty histories for every asset
    pub fn new<'a>(assets: impl IntoIterator<Item = &'a AssetId>) -> Self {
        let mut series = Self::default();
        for asset in assets {
            series.trades.insert(asset.clone(), Vec::new());
            series.books.insert(asset.clone(), Vec::new());
            series.composites.insert(asset.clone(), Vec::new());
        }
        series
    }

    pub fn trades(&self) -> &TradeHistory {
        &self.trades
    }

    pub fn books(&self) -> &BookHistory {
        &self.books
    }

    pub fn composites(&self) -> &CompositeHistory {
        &self.composites
    }

    pub fn trades_for(&self, asset: &AssetId) -> &[Trade] {
        self.trades.get(asset).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn books_for(&self, asset: &AssetId) -> &[Book] {
        self.books.get(asset).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn composites_for(&self, asset: &AssetId) -> &[CompositeQuote] {
        self.composites.get(asset).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Price of the most recent trade on `asset`
    pub fn last_price(&self, asset: &AssetId) -> Option<Price> {
        self.trades_for(asset).last().map(|t| t.price)
    }

    pub(crate) fn record_trade(&mut self, trade: Trade) {
        self.trades.entry(trade.asset.clone()).or_default().push(trade);
    }

    pub(crate) fn record_composite(&mut self, asset: AssetId, quote: CompositeQuote) {
        self.composites.entry(asset).or_default().push(quote);
    }

    pub(crate) fn record_book(&mut self, book: Book) {
        self.books.entry(book.asset().clone()).or_default().push(book);
    }
}
