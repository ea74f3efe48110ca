//! Provider enable/disable registry.
//!
//! The sync orchestrator only runs adapters whose name appears here with
//! `is_enabled = true`. Disabling a provider does not touch accounts already
//! linked to it — it just skips them on the next sync pass.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRegistration {
    pub name: String,
    pub is_enabled: bool,
}

#[async_trait]
pub trait ProviderRegistryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<ProviderRegistration>>;
    async fn set_enabled(&self, name: &str, is_enabled: bool) -> Result<ProviderRegistration>;
}
