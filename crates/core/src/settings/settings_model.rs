//! Preference domain model (§6's `/api/preferences/{key:path}`): an
//! arbitrary-JSON value keyed by a dotted, namespaced string.

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use crate::errors::{Error, Result, ValidationError};

const MAX_KEY_LENGTH: usize = 128;

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z][a-z0-9]*(\.[a-zA-Z][a-zA-Z0-9_]*)+$").expect("preference key pattern is valid")
    })
}

/// Rejects keys that don't match the dotted-namespace convention (e.g.
/// `ui.theme`, `sync.autoRefresh`) or exceed the length cap.
pub fn validate_key(key: &str) -> Result<()> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "preference key exceeds {MAX_KEY_LENGTH} characters"
        ))));
    }
    if !key_pattern().is_match(key) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "preference key '{key}' does not match the required dotted-namespace format"
        ))));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub key: String,
    pub value: Value,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dotted_namespaced_keys() {
        assert!(validate_key("ui.theme").is_ok());
        assert!(validate_key("sync.autoRefresh.enabled").is_ok());
    }

    #[test]
    fn rejects_keys_without_a_namespace_separator() {
        assert!(validate_key("theme").is_err());
    }

    #[test]
    fn rejects_keys_starting_with_uppercase_or_digit() {
        assert!(validate_key("Ui.theme").is_err());
        assert!(validate_key("1ui.theme").is_err());
    }

    #[test]
    fn rejects_overlong_keys() {
        let long_key = format!("ui.{}", "x".repeat(130));
        assert!(validate_key(&long_key).is_err());
    }
}
