//! The three engines that turn raw synced data into portfolio answers:
//! [`valuation`] (daily market values), [`lots`] (tax-lot history), and
//! [`returns`] (money-weighted performance). [`snapshot`] holds the shared
//! `AccountSnapshot`/`Holding` model all three read from.

pub mod lots;
pub mod returns;
pub mod snapshot;
pub mod valuation;
