//! Settings module - user preferences keyed by a dotted namespace.

mod settings_model;
mod settings_service;
mod settings_traits;

pub use settings_model::{validate_key, Preference};
pub use settings_service::{SettingsService, SettingsServiceTrait};
pub use settings_traits::PreferenceRepositoryTrait;
