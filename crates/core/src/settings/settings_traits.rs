//! Repository trait for preferences.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;
use crate::settings::Preference;

#[async_trait]
pub trait PreferenceRepositoryTrait: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Preference>>;
    fn list(&self) -> Result<Vec<Preference>>;
    async fn set(&self, key: &str, value: Value) -> Result<Preference>;
    async fn delete(&self, key: &str) -> Result<()>;
}
