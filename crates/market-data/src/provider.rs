//! The one contract the valuation engine needs from a market-data source.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::PriceHistoryResult;

/// A source of historical daily closing prices.
///
/// Provider-specific implementations (a particular vendor's REST API, a cached
/// local store, ...) live outside this crate; this trait is the only seam the
/// valuation engine depends on.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Unique identifier for logging and diagnostics.
    fn id(&self) -> &'static str;

    /// Fetch daily closing prices for `symbols` over `[from, to]` (inclusive).
    ///
    /// Symbols with no coverage are omitted from the result rather than erroring,
    /// so a single unknown ticker never fails an entire backfill run.
    async fn price_history(
        &self,
        symbols: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceHistoryResult, MarketDataError>;
}

/// A [`PriceHistoryProvider`] with no coverage for anything.
///
/// Useful as a placeholder until a real feed is wired in, and in tests that
/// exercise the valuation engine without caring about price data. Every
/// query succeeds with an empty result rather than erroring, matching
/// [`PriceHistoryProvider::price_history`]'s "unknown symbols are simply
/// absent" contract.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPriceHistoryProvider;

#[async_trait]
impl PriceHistoryProvider for NullPriceHistoryProvider {
    fn id(&self) -> &'static str {
        "null"
    }

    async fn price_history(
        &self,
        _symbols: &[String],
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<PriceHistoryResult, MarketDataError> {
        Ok(PriceHistoryResult::new())
    }
}
