//! AssetClass domain model — user-defined groupings (e.g. "Crypto", "Bonds")
//! that a [`super::securities_model::Security`] can be manually tagged with.
//! The valuation engine special-cases the class named exactly `"Crypto"` to
//! route symbol detection (see `ValuationEngine::detect_crypto_symbols`).

use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

pub const CRYPTO_ASSET_CLASS_NAME: &str = "Crypto";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssetClass {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetClass {
    pub id: Option<String>,
    pub name: String,
}

impl NewAssetClass {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Asset class name cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}
