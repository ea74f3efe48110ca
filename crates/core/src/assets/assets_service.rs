//! Thin service layer over the security/asset-class repositories. The asset
//! class side is a small, non-hot-path CRUD surface (spec's `/api/asset-types`);
//! nothing here participates in the valuation/lot/returns engines directly —
//! they depend on the repository traits instead.

use std::sync::Arc;

use super::asset_class_model::{AssetClass, NewAssetClass};
use super::assets_traits::{AssetClassRepositoryTrait, SecurityRepositoryTrait};
use super::securities_model::Security;
use crate::errors::Result;

pub struct AssetClassService {
    repository: Arc<dyn AssetClassRepositoryTrait>,
}

impl AssetClassService {
    pub fn new(repository: Arc<dyn AssetClassRepositoryTrait>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, new_class: NewAssetClass) -> Result<AssetClass> {
        new_class.validate()?;
        self.repository.create(new_class).await
    }

    pub async fn update(&self, id: &str, name: String) -> Result<AssetClass> {
        self.repository.update(id, name).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await
    }

    pub fn list(&self) -> Result<Vec<AssetClass>> {
        self.repository.list()
    }
}

pub struct SecurityService {
    repository: Arc<dyn SecurityRepositoryTrait>,
}

impl SecurityService {
    pub fn new(repository: Arc<dyn SecurityRepositoryTrait>) -> Self {
        Self { repository }
    }

    pub fn list(&self) -> Result<Vec<Security>> {
        self.repository.list()
    }

    pub fn get(&self, security_id: &str) -> Result<Security> {
        self.repository.get_by_id(security_id)
    }

    pub async fn set_asset_class(
        &self,
        security_id: &str,
        asset_class_id: Option<String>,
    ) -> Result<Security> {
        self.repository
            .set_asset_class(security_id, asset_class_id)
            .await
    }
}
