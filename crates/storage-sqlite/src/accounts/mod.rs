//! SQLite storage implementation for accounts and the provider registry.

mod model;
mod provider_registry;
mod repository;

pub use model::AccountDB;
pub use provider_registry::ProviderRegistryRepository;
pub use repository::AccountRepository;
