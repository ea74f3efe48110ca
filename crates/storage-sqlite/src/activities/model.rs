//! Database model for activities.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;

use aggregator_core::activities::{Activity, ActivityType, NewActivity};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::activities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityDB {
    pub id: String,
    pub account_id: String,
    pub security_id: Option<String>,
    pub activity_type: String,
    pub activity_date: NaiveDate,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
    pub amount: String,
    pub currency: String,
    pub created_at: NaiveDateTime,
}

impl From<ActivityDB> for Activity {
    fn from(db: ActivityDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            security_id: db.security_id,
            activity_type: ActivityType::from_str(&db.activity_type).unwrap_or(ActivityType::Deposit),
            activity_date: db.activity_date,
            quantity: db.quantity.and_then(|s| Decimal::from_str(&s).ok()),
            unit_price: db.unit_price.and_then(|s| Decimal::from_str(&s).ok()),
            amount: Decimal::from_str(&db.amount).unwrap_or_default(),
            currency: db.currency,
            created_at: db.created_at,
        }
    }
}

impl From<NewActivity> for ActivityDB {
    fn from(domain: NewActivity) -> Self {
        Self {
            id: domain.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            account_id: domain.account_id,
            security_id: domain.security_id,
            activity_type: domain.activity_type.as_str().to_string(),
            activity_date: domain.activity_date,
            quantity: domain.quantity.map(|d| d.to_string()),
            unit_price: domain.unit_price.map(|d| d.to_string()),
            amount: domain.amount.to_string(),
            currency: domain.currency,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
