//! Activity domain model.
//!
//! Activities are the ledger entries the sync orchestrator writes and the
//! lot reconciliation and returns engines read back. The type set is
//! intentionally narrow: only the categories those two engines actually
//! branch on.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Deposit,
    Withdrawal,
    Transfer,
    Receive,
    Buy,
    Sell,
    Dividend,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Deposit => "DEPOSIT",
            ActivityType::Withdrawal => "WITHDRAWAL",
            ActivityType::Transfer => "TRANSFER",
            ActivityType::Receive => "RECEIVE",
            ActivityType::Buy => "BUY",
            ActivityType::Sell => "SELL",
            ActivityType::Dividend => "DIVIDEND",
        }
    }

    /// Types the returns engine folds into its external cash-flow series.
    /// Trading activities (buy/sell) and dividends never count — dividends
    /// are already reflected in the snapshot-derived market value.
    pub fn is_external_cash_flow(&self) -> bool {
        matches!(
            self,
            ActivityType::Deposit
                | ActivityType::Withdrawal
                | ActivityType::Transfer
                | ActivityType::Receive
        )
    }

    /// Types the lot reconciliation engine matches against snapshot deltas
    /// to recover an acquisition price for a newly opened or added-to lot.
    pub fn is_lot_forming(&self) -> bool {
        matches!(self, ActivityType::Buy)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEPOSIT" => Ok(ActivityType::Deposit),
            "WITHDRAWAL" => Ok(ActivityType::Withdrawal),
            "TRANSFER" => Ok(ActivityType::Transfer),
            "RECEIVE" => Ok(ActivityType::Receive),
            "BUY" => Ok(ActivityType::Buy),
            "SELL" => Ok(ActivityType::Sell),
            "DIVIDEND" => Ok(ActivityType::Dividend),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown activity type '{other}'"
            )))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub account_id: String,
    /// `None` for pure cash movements (deposit/withdrawal); set for
    /// buy/sell/dividend and for asset-carrying transfers/receives.
    pub security_id: Option<String>,
    pub activity_type: ActivityType,
    pub activity_date: NaiveDate,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    /// Signed amount in the account's currency, stored exactly as the
    /// provider reported it — sign-normalization for cash-flow purposes
    /// happens in the returns engine, not here.
    pub amount: Decimal,
    pub currency: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub id: Option<String>,
    pub account_id: String,
    pub security_id: Option<String>,
    pub activity_type: ActivityType,
    pub activity_date: NaiveDate,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub amount: Decimal,
    pub currency: String,
}

impl NewActivity {
    pub fn validate(&self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Activity account_id cannot be empty".to_string(),
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Activity currency cannot be empty".to_string(),
            )));
        }
        let needs_security = matches!(
            self.activity_type,
            ActivityType::Buy | ActivityType::Sell | ActivityType::Dividend
        );
        if needs_security && self.security_id.is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "{} activity requires a security_id",
                self.activity_type
            ))));
        }
        if matches!(self.activity_type, ActivityType::Buy | ActivityType::Sell)
            && (self.quantity.is_none() || self.unit_price.is_none())
        {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "{} activity requires quantity and unit_price",
                self.activity_type
            ))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types_case_insensitively() {
        assert_eq!(ActivityType::from_str("buy").unwrap(), ActivityType::Buy);
        assert_eq!(
            ActivityType::from_str("WITHDRAWAL").unwrap(),
            ActivityType::Withdrawal
        );
        assert!(ActivityType::from_str("SPLIT").is_err());
    }

    #[test]
    fn only_deposit_withdrawal_transfer_receive_are_cash_flows() {
        assert!(ActivityType::Deposit.is_external_cash_flow());
        assert!(ActivityType::Withdrawal.is_external_cash_flow());
        assert!(ActivityType::Transfer.is_external_cash_flow());
        assert!(ActivityType::Receive.is_external_cash_flow());
        assert!(!ActivityType::Buy.is_external_cash_flow());
        assert!(!ActivityType::Sell.is_external_cash_flow());
        assert!(!ActivityType::Dividend.is_external_cash_flow());
    }

    #[test]
    fn validate_requires_security_for_trades_and_dividends() {
        let mut new = NewActivity {
            id: None,
            account_id: "a1".into(),
            security_id: None,
            activity_type: ActivityType::Buy,
            activity_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            quantity: Some(Decimal::ONE),
            unit_price: Some(Decimal::ONE),
            amount: Decimal::ONE,
            currency: "USD".into(),
        };
        assert!(new.validate().is_err());
        new.security_id = Some("sec1".into());
        assert!(new.validate().is_ok());
    }
}
