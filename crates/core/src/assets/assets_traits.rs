//! Repository contracts for securities and asset classes.

use async_trait::async_trait;

use super::asset_class_model::{AssetClass, NewAssetClass};
use super::securities_model::{NewSecurity, Security};
use crate::errors::Result;

#[async_trait]
pub trait SecurityRepositoryTrait: Send + Sync {
    async fn create(&self, new_security: NewSecurity) -> Result<Security>;
    fn get_by_id(&self, security_id: &str) -> Result<Security>;
    fn get_by_ticker(&self, ticker: &str) -> Result<Option<Security>>;
    fn list(&self) -> Result<Vec<Security>>;
    /// Finds or lazily creates the `_ZERO_BALANCE` sentinel security. The
    /// valuation engine calls this only when it actually needs to write a
    /// sentinel row, so the security is created on first use, not at startup.
    async fn get_or_create_zero_balance_security(&self) -> Result<Security>;
    /// Tickers of every security tagged with the `"Crypto"` asset class.
    /// `None` when that asset class does not exist (callers should then not
    /// constrain crypto routing at all, matching the source behavior).
    fn crypto_tickers(&self) -> Result<Option<Vec<String>>>;

    /// Assigns (`Some`) or clears (`None`) a security's manual asset class.
    async fn set_asset_class(
        &self,
        security_id: &str,
        asset_class_id: Option<String>,
    ) -> Result<Security>;
}

#[async_trait]
pub trait AssetClassRepositoryTrait: Send + Sync {
    async fn create(&self, new_class: NewAssetClass) -> Result<AssetClass>;
    async fn update(&self, id: &str, name: String) -> Result<AssetClass>;
    async fn delete(&self, id: &str) -> Result<()>;
    fn get_by_id(&self, id: &str) -> Result<AssetClass>;
    fn list(&self) -> Result<Vec<AssetClass>>;
}
