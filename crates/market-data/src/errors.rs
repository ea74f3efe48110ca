//! Error type for the price history contract.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum MarketDataError {
    #[error("provider '{provider}' does not support {operation}")]
    NotSupported { provider: String, operation: String },

    #[error("provider '{provider}' request failed: {message}")]
    ProviderError { provider: String, message: String },

    #[error("provider '{provider}' is rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },
}
