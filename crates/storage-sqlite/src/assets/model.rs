//! Database models for securities and asset classes.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use aggregator_core::assets::{AssetClass, NewAssetClass, NewSecurity, Security};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::securities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SecurityDB {
    pub id: String,
    pub ticker: String,
    pub name: Option<String>,
    pub currency: String,
    pub manual_asset_class_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SecurityDB> for Security {
    fn from(db: SecurityDB) -> Self {
        Self {
            id: db.id,
            ticker: db.ticker,
            name: db.name,
            currency: db.currency,
            manual_asset_class_id: db.manual_asset_class_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewSecurity> for SecurityDB {
    fn from(domain: NewSecurity) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            ticker: domain.ticker,
            name: domain.name,
            currency: domain.currency,
            manual_asset_class_id: domain.manual_asset_class_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_classes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetClassDB {
    pub id: String,
    pub name: String,
}

impl From<AssetClassDB> for AssetClass {
    fn from(db: AssetClassDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
        }
    }
}

impl From<NewAssetClass> for AssetClassDB {
    fn from(domain: NewAssetClass) -> Self {
        Self {
            id: domain.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: domain.name,
        }
    }
}
