//! Account snapshots: the sparse, immutable record sync writes.

mod snapshot_model;
mod snapshot_traits;

pub use snapshot_model::{
    AccountSnapshot, Holding, NewAccountSnapshot, NewHolding, SnapshotStatus,
};
pub use snapshot_traits::SnapshotRepositoryTrait;
