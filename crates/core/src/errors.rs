//! Core error types.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use std::num::ParseFloatError;
use thiserror::Error;

use aggregator_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio application.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Sync operation failed: {0}")]
    Sync(#[from] SyncError),

    #[error("Lot reconciliation failed: {0}")]
    Reconciliation(#[from] ReconciliationError),

    #[error("Returns calculation failed: {0}")]
    Returns(#[from] ReturnsError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Errors raised while the sync orchestrator pulls from a provider adapter
/// and reconciles its response into accounts, activities, and snapshots.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Authentication with provider '{provider}' failed: {message}")]
    AuthError { provider: String, message: String },

    #[error("Could not reach provider '{provider}': {message}")]
    ConnectionError { provider: String, message: String },

    #[error("Provider '{provider}' returned an error: {message}")]
    ProviderError { provider: String, message: String },

    #[error("A sync is already in progress for provider '{0}'")]
    SyncInProgress(String),

    #[error("Account '{0}' has no prior snapshot and no baseline to sync from")]
    NoBaseline(String),
}

/// Errors raised while reconstructing tax-lot history from snapshot deltas.
#[derive(Error, Debug)]
pub enum ReconciliationError {
    #[error("Lot '{lot_id}' not found during disposal")]
    LotNotFound { lot_id: String },

    #[error(
        "Insufficient open lots to dispose {requested} units of security '{security_id}' \
         in account '{account_id}' (only {available} available)"
    )]
    InsufficientLots {
        account_id: String,
        security_id: String,
        requested: String,
        available: String,
    },

    /// A snapshot reported a negative quantity. Short positions are not
    /// modeled; this is surfaced rather than silently misinterpreted.
    #[error(
        "Snapshot for account '{account_id}' security '{security_id}' reports a negative \
         quantity ({quantity}), which is not a supported position"
    )]
    NegativeQuantity {
        account_id: String,
        security_id: String,
        quantity: String,
    },
}

/// Errors raised while computing money-weighted returns.
#[derive(Error, Debug)]
pub enum ReturnsError {
    #[error("Unknown return period: '{0}'")]
    UnknownPeriod(String),

    #[error("XIRR did not converge after {iterations} iterations")]
    DidNotConverge { iterations: u32 },

    #[error("No valuation data available for the requested window")]
    NoData,
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<Box<dyn std::error::Error>> for Error {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Error {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
