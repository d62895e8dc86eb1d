//! Date filters and options for balance queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LedgerError, Result};

/// Date format accepted for loosely-typed options.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive or half-open range of journal dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    end_inclusive: bool,
}

impl DateRange {
    /// `[start, end]`.
    pub fn closed(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::build(start, end, true)
    }

    /// `[start, end)`.
    pub fn half_open(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::build(start, end, false)
    }

    fn build(start: NaiveDate, end: NaiveDate, end_inclusive: bool) -> Result<Self> {
        if start > end {
            return Err(LedgerError::InvalidArgument(format!(
                "date range starts after it ends: {start} > {end}"
            )));
        }
        Ok(Self {
            start,
            end,
            end_inclusive,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn is_end_inclusive(&self) -> bool {
        self.end_inclusive
    }

    /// Check if a date falls within the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.start {
            return false;
        }
        if self.end_inclusive {
            date <= self.end
        } else {
            date < self.end
        }
    }
}

/// Which journal dates a balance query considers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilter {
    /// All time.
    #[default]
    All,
    /// Every journal dated on or before the cutoff.
    AsOf(NaiveDate),
    /// Every journal dated within the range.
    Range(DateRange),
}

impl DateFilter {
    /// Check if a journal date passes the filter.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::AsOf(cutoff) => date <= *cutoff,
            DateFilter::Range(range) => range.contains(date),
        }
    }

    /// Parse the loosely-typed form: a date string (cutoff), a two-element
    /// array (closed range) or an object with `from` and either `to`
    /// (closed) or `until` (half-open).
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(DateFilter::All),
            Value::String(s) => Ok(DateFilter::AsOf(parse_date(s)?)),
            Value::Array(items) => match items.as_slice() {
                [start, end] => Ok(DateFilter::Range(DateRange::closed(
                    date_value(start)?,
                    date_value(end)?,
                )?)),
                _ => Err(LedgerError::InvalidArgument(
                    "date range array needs exactly two dates".to_string(),
                )),
            },
            Value::Object(map) => {
                let start = map.get("from").ok_or_else(|| {
                    LedgerError::InvalidArgument("date range needs `from`".to_string())
                })?;
                let start = date_value(start)?;
                match (map.get("to"), map.get("until")) {
                    (Some(end), None) => {
                        Ok(DateFilter::Range(DateRange::closed(start, date_value(end)?)?))
                    }
                    (None, Some(end)) => Ok(DateFilter::Range(DateRange::half_open(
                        start,
                        date_value(end)?,
                    )?)),
                    _ => Err(LedgerError::InvalidArgument(
                        "date range needs exactly one of `to` or `until`".to_string(),
                    )),
                }
            }
            other => Err(LedgerError::InvalidArgument(format!(
                "invalid date filter: {other}"
            ))),
        }
    }
}

/// Options for balance and sum queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceOptions {
    /// Date filter on the journal date.
    pub date: DateFilter,
    /// Only consider journals marked permanent.
    pub permanent_only: bool,
}

impl BalanceOptions {
    /// All journals, all time.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: DateFilter) -> Self {
        self.date = date;
        self
    }

    pub fn as_of(self, cutoff: NaiveDate) -> Self {
        self.with_date(DateFilter::AsOf(cutoff))
    }

    pub fn within(self, range: DateRange) -> Self {
        self.with_date(DateFilter::Range(range))
    }

    pub fn permanent_only(mut self) -> Self {
        self.permanent_only = true;
        self
    }

    /// Parse options from a JSON mapping with keys `date` and `permanent_only`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            LedgerError::InvalidArgument("options should be a mapping".to_string())
        })?;

        let mut options = Self::default();
        for (key, entry) in map {
            match key.as_str() {
                "date" => options.date = DateFilter::from_value(entry)?,
                "permanent_only" => {
                    options.permanent_only = entry.as_bool().ok_or_else(|| {
                        LedgerError::InvalidArgument(
                            "`permanent_only` should be a boolean".to_string(),
                        )
                    })?;
                }
                other => {
                    return Err(LedgerError::InvalidArgument(format!(
                        "unknown balance option `{other}`"
                    )))
                }
            }
        }
        Ok(options)
    }
}

fn date_value(value: &Value) -> Result<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        other => Err(LedgerError::InvalidArgument(format!(
            "expected a date, got {other}"
        ))),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidArgument(format!("invalid date `{s}`")))
}
