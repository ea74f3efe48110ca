//! Domain entities, services, and calculation engines for the portfolio
//! aggregator.
//!
//! Database-agnostic: every module exposes repository traits implemented
//! by the `aggregator-storage-sqlite` crate, so this crate never touches a
//! connection directly.

pub mod accounts;
pub mod activities;
pub mod assets;
pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod settings;
pub mod sync;
pub mod utils;

pub use errors::{Error, Result};
