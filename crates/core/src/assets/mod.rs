//! Assets module - securities and the asset classes they can be tagged with.

mod asset_class_model;
mod assets_service;
mod assets_traits;
mod securities_model;

pub use asset_class_model::{AssetClass, NewAssetClass, CRYPTO_ASSET_CLASS_NAME};
pub use assets_service::{AssetClassService, SecurityService};
pub use assets_traits::{AssetClassRepositoryTrait, SecurityRepositoryTrait};
pub use securities_model::{NewSecurity, Security, ZERO_BALANCE_NAME, ZERO_BALANCE_TICKER};
