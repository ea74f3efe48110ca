//! Database model for preferences.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use aggregator_core::settings::Preference;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::preferences)]
#[diesel(primary_key(key))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PreferenceDB {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

impl From<PreferenceDB> for Preference {
    fn from(db: PreferenceDB) -> Self {
        Self {
            key: db.key,
            value: serde_json::from_str(&db.value).unwrap_or(serde_json::Value::Null),
            updated_at: db.updated_at,
        }
    }
}
