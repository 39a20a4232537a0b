//! # Financial calculators
//!
//! Home-loan and rental arithmetic shown next to a listing: EMI and
//! amortization, affordability, loan eligibility, stamp duty, rental deposit
//! and rent-versus-buy. Amounts are plain rupee `f64`s; rates are annual
//! percentages (8.5 means 8.5 %).

mod costs;
mod loan;
mod rent_vs_buy;

use thiserror::Error;

pub use costs::*;
pub use loan::*;
pub use rent_vs_buy::*;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FinanceError {
    #[error("{field} {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },
    #[error("no rate table for `{0}`")]
    UnknownRegion(String),
}

/// Longest loan or comparison period any calculator accepts.
pub const MAX_TENURE_YEARS: u32 = 50;
pub const MAX_TENURE_MONTHS: u32 = MAX_TENURE_YEARS * 12;

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64, FinanceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(FinanceError::InvalidInput {
            field,
            reason: "must be a non-negative number",
        })
    }
}

pub(crate) fn require_positive<T: PartialOrd + Default>(
    field: &'static str,
    value: T,
) -> Result<T, FinanceError> {
    if value > T::default() {
        Ok(value)
    } else {
        Err(FinanceError::InvalidInput {
            field,
            reason: "must be positive",
        })
    }
}

/// A positive period no longer than `max`, in whatever unit the caller uses.
pub(crate) fn require_tenure(
    field: &'static str,
    value: u32,
    max: u32,
) -> Result<u32, FinanceError> {
    let value = require_positive(field, value)?;
    if value > max {
        return Err(FinanceError::InvalidInput {
            field,
            reason: "exceeds the 50 year limit",
        });
    }
    Ok(value)
}
