//! API-facing DTOs that don't belong in `aggregator-core` because they
//! combine several engines' output for one HTTP response (spec.md §6).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use aggregator_core::portfolio::lots::LotSummary;

/// `GET /api/accounts/{id}/holdings` row: a holding's latest market value
/// joined with its lot summary, when one exists (a security with no open
/// lots and no realized history has none).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingView {
    pub security_id: String,
    pub ticker: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub market_value: Decimal,
    pub lot_summary: Option<LotSummary>,
}

/// Query params accepted by `GET /api/accounts/{id}/activities`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub activity_type: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    50
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedActivities {
    pub activities: Vec<aggregator_core::activities::Activity>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// `GET /api/returns` query params — a thin HTTP surface over
/// [`aggregator_core::portfolio::returns::ReturnsEngine::get_returns`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsQuery {
    #[serde(default = "default_scope")]
    pub scope: String,
    pub periods: Option<String>,
}

fn default_scope() -> String {
    "all".to_string()
}
