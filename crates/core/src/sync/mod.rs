//! Sync orchestrator: domain models, the provider adapter contract, and
//! the engine that merges provider output into accounts/snapshots/activities.

mod sync_model;
mod sync_orchestrator;
mod sync_traits;

pub use sync_model::{
    ProviderAccount, ProviderActivity, ProviderAdapter, ProviderHolding, ProviderLogStatus,
    ProviderSyncError, ProviderSyncResult, SyncLogEntry, SyncSession,
};
pub use sync_orchestrator::SyncOrchestrator;
pub use sync_traits::SyncSessionRepositoryTrait;
