mod lots_model;
mod lots_service;
mod lots_traits;

pub use lots_model::{
    DisposalSource, HoldingLot, LotDisposal, LotSource, LotSummary, NewHoldingLot, NewLotDisposal,
};
pub use lots_service::{summarize_lots, LotReconciliationEngine};
pub use lots_traits::LotRepositoryTrait;
