//! Composite quotes
//!
//! Read-only projections of a book into a bid/ask pair, sampled once per
//! round after the makers have quoted.

use matching_engine::Book;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::AssetId;
use types::numeric::{Price, Quantity};
use types::order::{Order, Quote, Side};

/// How a book is reduced to a composite quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMethod {
    /// Best bid and best ask prices, size zero
    #[default]
    TopOfBook,
    /// Size-weighted average price over every resting order on each side
    WeightedAverage,
}

impl CompositeMethod {
    pub fn quote(&self, book: &Book) -> CompositeQuote {
        match self {
            CompositeMethod::TopOfBook => top_of_book(book),
            CompositeMethod::WeightedAverage => weighted_average(book),
        }
    }
}

/// Bid/ask pair; either side is absent when the book side is empty
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompositeQuote {
    pub bid: Option<Quote>,
    pub ask: Option<Quote>,
}

impl CompositeQuote {
    /// Midpoint of bid and ask, when both are present
    pub fn mid(&self) -> Option<Price> {
        let bid = self.bid.as_ref()?.price.as_decimal();
        let ask = self.ask.as_ref()?.price.as_decimal();
        Some(Price::new((bid + ask) / Decimal::TWO))
    }
}

pub fn top_of_book(book: &Book) -> CompositeQuote {
    let asset = book.asset();
    CompositeQuote {
        bid: book
            .best_bid()
            .map(|o| Quote::new(Side::BUY, Quantity::zero(), asset.clone(), o.price)),
        ask: book
            .best_ask()
            .map(|o| Quote::new(Side::SELL, Quantity::zero(), asset.clone(), o.price)),
    }
}

pub fn weighted_average(book: &Book) -> CompositeQuote {
    CompositeQuote {
        bid: weighted_side(Side::BUY, book.asset(), book.bids().iter()),
        ask: weighted_side(Side::SELL, book.asset(), book.asks().iter()),
    }
}

fn weighted_side<'a>(
    side: Side,
    asset: &AssetId,
    orders: impl Iterator<Item = &'a Order>,
) -> Option<Quote> {
    let (size, notional) = orders.fold((Quantity::zero(), Decimal::ZERO), |(size, notional), o| {
        (size + o.size, notional + o.size.notional(o.price))
    });
    if size.is_zero() {
        return None;
    }
    let price = Price::new(notional / size.as_decimal());
    Some(Quote::new(side, size, asset.clone(), price))
}
