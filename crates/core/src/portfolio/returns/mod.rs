mod returns_calculator;
mod returns_model;
mod returns_periods;
mod returns_service;

pub use returns_model::{CashFlow, PeriodReturn, ReturnSet, ReturnsReport, DEFAULT_PERIODS};
pub use returns_service::ReturnsEngine;
