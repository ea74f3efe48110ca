//! SQLite storage implementation for holding lots and lot disposals.

mod model;
mod repository;

pub use model::{HoldingLotDB, LotDisposalDB};
pub use repository::LotRepository;
