//! Repository contract for lots and disposals.

use async_trait::async_trait;

use super::lots_model::{HoldingLot, LotDisposal, NewHoldingLot, NewLotDisposal};
use crate::errors::Result;

#[async_trait]
pub trait LotRepositoryTrait: Send + Sync {
    async fn create_lot(&self, new_lot: NewHoldingLot) -> Result<HoldingLot>;

    /// Open lots for (account, security), ordered
    /// `acquisition_date ASC NULLS FIRST, id ASC` (§4.3's FIFO order).
    fn open_lots(&self, account_id: &str, security_id: &str) -> Result<Vec<HoldingLot>>;

    /// Sum of `current_quantity` across open lots for (account, security).
    fn open_quantity(&self, account_id: &str, security_id: &str) -> Result<rust_decimal::Decimal>;

    async fn apply_disposal(&self, lot_id: &str, remaining_quantity: rust_decimal::Decimal) -> Result<()>;

    async fn create_disposal(&self, new_disposal: NewLotDisposal) -> Result<LotDisposal>;

    fn list_lots_for_account(&self, account_id: &str) -> Result<Vec<HoldingLot>>;
    fn list_disposals_for_account(&self, account_id: &str) -> Result<Vec<LotDisposal>>;
}
