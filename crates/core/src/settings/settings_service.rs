//! Preference business logic: key-format validation ahead of the storage
//! layer so every backend enforces the same rule.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::settings_model::validate_key;
use super::{Preference, PreferenceRepositoryTrait};
use crate::errors::Result;

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_preference(&self, key: &str) -> Result<Option<Preference>>;
    fn list_preferences(&self) -> Result<Vec<Preference>>;
    async fn set_preference(&self, key: &str, value: Value) -> Result<Preference>;
    async fn delete_preference(&self, key: &str) -> Result<()>;
}

pub struct SettingsService {
    repository: Arc<dyn PreferenceRepositoryTrait>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn PreferenceRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_preference(&self, key: &str) -> Result<Option<Preference>> {
        validate_key(key)?;
        self.repository.get(key)
    }

    fn list_preferences(&self) -> Result<Vec<Preference>> {
        self.repository.list()
    }

    async fn set_preference(&self, key: &str, value: Value) -> Result<Preference> {
        validate_key(key)?;
        self.repository.set(key, value).await
    }

    async fn delete_preference(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.repository.delete(key).await
    }
}
