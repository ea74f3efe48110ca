//! Types exchanged across the price history contract.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single day's closing price for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePrice {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// Result of a `PriceHistory` query: one ordered series of closes per symbol.
///
/// Symbols the provider has no data for are simply absent from the map rather than
/// mapped to an empty vector, so callers can distinguish "no coverage" from "no
/// trading days in range".
pub type PriceHistoryResult = HashMap<String, Vec<ClosePrice>>;
