//! SQLite storage implementations for the portfolio engines.

pub mod lots;
pub mod snapshot;
pub mod valuation;
