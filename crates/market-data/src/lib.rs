//! Price history contract for the portfolio aggregator.
//!
//! Provider-specific market-data clients (Yahoo, Alpha Vantage, ...) are out of
//! scope for this system; every caller needs exactly one query:
//! `PriceHistory(symbols, from, to) -> {symbol: [(date, close)]}`. This crate
//! defines that contract as [`PriceHistoryProvider`] so the valuation engine in
//! `aggregator-core` stays decoupled from whatever feeds it prices.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{ClosePrice, PriceHistoryResult};
pub use provider::{NullPriceHistoryProvider, PriceHistoryProvider};
