//! Provider adapter retry support for the portfolio aggregator.
//!
//! The adapter contract itself (`ProviderAdapter`) and the orchestration
//! algorithm that drives it both live in `aggregator-core`, which stays
//! database- and transport-agnostic. This crate holds the one piece of
//! ambient transport behavior the contract asks every adapter for: retrying
//! transient connection failures with backoff before giving up.

mod retry;

pub use retry::RetryingAdapter;
