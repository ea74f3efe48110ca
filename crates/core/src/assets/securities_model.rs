//! Security domain model.
//!
//! A security is identified by `ticker`, which carries provider-specific
//! conventions for non-tradable positions: `_CASH:{CCY}` for a cash sleeve,
//! `_SF:{hex8}` for a SimpleFIN-only instrument with no public ticker,
//! `_MAN:{...}` for manually entered holdings, and the single well-known
//! `_ZERO_BALANCE` sentinel security used by the valuation engine.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Ticker of the lazily-created sentinel security written for accounts that
/// hold zero positions on a given valuation day.
pub const ZERO_BALANCE_TICKER: &str = "_ZERO_BALANCE";
pub const ZERO_BALANCE_NAME: &str = "Zero Balance Sentinel";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub id: String,
    pub ticker: String,
    pub name: Option<String>,
    pub currency: String,
    pub manual_asset_class_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Security {
    /// `CASH_TICKERS` plus the `_CASH:` prefix convention — mirrors the
    /// valuation engine's cash-equivalent test so callers outside that engine
    /// (e.g. the lot reconciliation engine's activity matching) agree with it.
    pub fn is_cash_equivalent(ticker: &str) -> bool {
        const CASH_TICKERS: &[&str] = &[
            "USD", "CASH", "CAD", "SPAXX", "FDRXX", "SWVXX", "VMFXX", "FZFXX",
        ];
        let upper = ticker.to_ascii_uppercase();
        CASH_TICKERS.contains(&upper.as_str()) || upper.starts_with("_CASH:")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSecurity {
    pub id: Option<String>,
    pub ticker: String,
    pub name: Option<String>,
    pub currency: String,
    pub manual_asset_class_id: Option<String>,
}

impl NewSecurity {
    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Security ticker cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}
