//! Tax-lot domain model (§3: `HoldingLot`, `LotDisposal`).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotSource {
    Initial,
    Inferred,
    Activity,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisposalSource {
    Inferred,
    Activity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingLot {
    pub id: String,
    pub account_id: String,
    pub security_id: String,
    pub ticker: String,
    /// `None` for `initial` lots — the historical baseline predates any
    /// observed transaction, so it has no acquisition date to report and
    /// sorts before all dated lots under FIFO.
    pub acquisition_date: Option<NaiveDate>,
    pub cost_basis_per_unit: Decimal,
    pub original_quantity: Decimal,
    pub current_quantity: Decimal,
    pub is_closed: bool,
    pub source: LotSource,
    pub activity_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHoldingLot {
    pub account_id: String,
    pub security_id: String,
    pub ticker: String,
    pub acquisition_date: Option<NaiveDate>,
    pub cost_basis_per_unit: Decimal,
    pub original_quantity: Decimal,
    pub current_quantity: Decimal,
    pub source: LotSource,
    pub activity_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotDisposal {
    pub id: String,
    pub holding_lot_id: String,
    pub account_id: String,
    pub security_id: String,
    pub quantity: Decimal,
    pub proceeds_per_unit: Decimal,
    pub disposal_date: NaiveDate,
    pub source: DisposalSource,
    pub activity_id: Option<String>,
    pub disposal_group_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLotDisposal {
    pub holding_lot_id: String,
    pub account_id: String,
    pub security_id: String,
    pub quantity: Decimal,
    pub proceeds_per_unit: Decimal,
    pub disposal_date: NaiveDate,
    pub source: DisposalSource,
    pub activity_id: Option<String>,
    pub disposal_group_id: String,
}

/// Per-security, per-account summary used by the holdings API surface
/// (§6's "lot summaries").
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LotSummary {
    pub security_id: String,
    pub open_quantity: Decimal,
    pub cost_basis: Decimal,
    pub unrealized_gain_loss: Decimal,
    pub lot_count: usize,
    pub realized_gain_loss: Decimal,
}
