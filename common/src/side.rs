//! Debit/credit side of a posting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Side of a posting. Determines the sign of the stored amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit (stored as a non-negative amount).
    Debit,
    /// Credit (stored as a negative amount).
    Credit,
}

impl Side {
    /// Token used in the persisted and textual form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Debit => "debit",
            Side::Credit => "credit",
        }
    }

    /// Side implied by a signed amount. Zero counts as debit.
    pub fn of_signed(raw: Decimal) -> Self {
        if raw.is_sign_negative() && !raw.is_zero() {
            Side::Credit
        } else {
            Side::Debit
        }
    }

    /// Apply this side's sign to a magnitude.
    pub fn signed(&self, magnitude: Decimal) -> Decimal {
        match self {
            Side::Debit => magnitude.abs(),
            Side::Credit => -magnitude.abs(),
        }
    }

    /// The other side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Debit => Side::Credit,
            Side::Credit => Side::Debit,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(Side::Debit),
            "credit" => Ok(Side::Credit),
            other => Err(LedgerError::InvalidArgument(format!(
                "unknown side `{other}`, expected `debit` or `credit`"
            ))),
        }
    }
}
