//! Accounts module - domain model, service, and repository traits.

mod accounts_constants;
mod accounts_model;
mod accounts_service;
mod accounts_traits;
pub mod providers;

pub use accounts_constants::*;
pub use accounts_model::{
    Account, AccountUpdate, DeactivateAccountRequest, NewAccount, SyncStatus,
};
pub use accounts_service::AccountService;
pub use accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
pub use providers::{ProviderRegistration, ProviderRegistryTrait};
