//! Environment-based configuration (SPEC_FULL.md §B.3). Validated eagerly at
//! startup so a misconfigured deployment fails fast instead of mid-request.
//! Provider credentials are explicitly out of scope (spec.md §6) — nothing
//! here names one.

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./data/aggregator.db".to_string()),
            listen_addr: std::env::var("HTTP_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string()),
        }
    }
}
