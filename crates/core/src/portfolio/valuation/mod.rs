mod valuation_calculator;
mod valuation_model;
mod valuation_service;
mod valuation_traits;

pub use valuation_model::{DailyHoldingValue, GapReport, NewDailyHoldingValue, ValuationResult};
pub use valuation_service::ValuationEngine;
pub use valuation_traits::ValuationRepositoryTrait;
