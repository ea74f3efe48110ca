//! Pure calculation helpers used by [`super::valuation_service::ValuationEngine`]:
//! carry-forward price lookups and half-up market value quantization.

use std::collections::{BTreeMap, HashMap};

use aggregator_market_data::PriceHistoryResult;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::utils::time_utils::get_days_between;

/// Builds a dense `{symbol -> {date -> close}}` map across `[start, end]`
/// by carrying forward the most recent close seen on or before each day
/// (§4.2.4). Days before a symbol's first price have no entry.
pub fn build_price_lookup(
    history: &PriceHistoryResult,
    start: NaiveDate,
    end: NaiveDate,
) -> HashMap<String, HashMap<NaiveDate, Decimal>> {
    let mut lookup = HashMap::new();
    for (symbol, closes) in history {
        let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for close in closes {
            by_date.insert(close.date, close.close);
        }
        let mut dense = HashMap::new();
        let mut last_seen: Option<Decimal> = None;
        for day in get_days_between(start, end) {
            if let Some(price) = by_date.get(&day) {
                last_seen = Some(*price);
            }
            if let Some(price) = last_seen {
                dense.insert(day, price);
            }
        }
        lookup.insert(symbol.clone(), dense);
    }
    lookup
}

pub fn quantize_market_value(quantity: Decimal, price: Decimal) -> Decimal {
    (quantity * price).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggregator_market_data::ClosePrice;
    use rust_decimal_macros::dec;

    #[test]
    fn carries_forward_price_over_weekend() {
        let mut history = PriceHistoryResult::new();
        history.insert(
            "AAPL".to_string(),
            vec![
                ClosePrice { date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), close: dec!(150) },
                ClosePrice { date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(), close: dec!(155) },
            ],
        );
        let lookup = build_price_lookup(
            &history,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        );
        let aapl = &lookup["AAPL"];
        assert_eq!(aapl[&NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()], dec!(150));
        assert_eq!(aapl[&NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()], dec!(150));
        assert_eq!(aapl[&NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()], dec!(155));
    }

    #[test]
    fn quantizes_half_up_to_cents() {
        assert_eq!(quantize_market_value(dec!(3), dec!(1.005)), dec!(3.02));
    }
}
