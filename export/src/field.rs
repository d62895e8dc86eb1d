//! DATEV field kinds and value rendering.
//!
//! DATEV files are semicolon separated. Text is always double-quoted with
//! inner quotes doubled, decimals use a comma and two places, dates are
//! written without separators, booleans as `0`/`1`. Decimals with more than
//! two significant places are rejected rather than rounded.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::{ExportError, ExportResult};

/// Date layouts used by DATEV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `YYYYMMDD`
    YearMonthDay,
    /// `DDMM`, the year comes from the header period.
    DayMonth,
}

impl DateStyle {
    fn pattern(&self) -> &'static str {
        match self {
            DateStyle::YearMonthDay => "%Y%m%d",
            DateStyle::DayMonth => "%d%m",
        }
    }
}

/// How a column renders its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Quoted text, truncated to `limit` characters.
    Text { limit: Option<usize> },
    Integer,
    /// Two decimal places, comma separator.
    Decimal,
    Date(DateStyle),
    /// `YYYYMMDDHHMMSSFFF`
    Timestamp,
    /// `0` or `1`.
    Bool,
}

impl FieldKind {
    pub const fn text(limit: usize) -> Self {
        FieldKind::Text { limit: Some(limit) }
    }

    pub const fn unlimited_text() -> Self {
        FieldKind::Text { limit: None }
    }
}

/// A named column of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Column {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Empty,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Bool(bool),
}

impl From<&str> for ExportValue {
    fn from(value: &str) -> Self {
        ExportValue::Text(value.to_string())
    }
}

impl From<String> for ExportValue {
    fn from(value: String) -> Self {
        ExportValue::Text(value)
    }
}

impl From<i64> for ExportValue {
    fn from(value: i64) -> Self {
        ExportValue::Integer(value)
    }
}

impl From<u32> for ExportValue {
    fn from(value: u32) -> Self {
        ExportValue::Integer(i64::from(value))
    }
}

impl From<Decimal> for ExportValue {
    fn from(value: Decimal) -> Self {
        ExportValue::Decimal(value)
    }
}

impl From<NaiveDate> for ExportValue {
    fn from(value: NaiveDate) -> Self {
        ExportValue::Date(value)
    }
}

impl From<NaiveDateTime> for ExportValue {
    fn from(value: NaiveDateTime) -> Self {
        ExportValue::Timestamp(value)
    }
}

impl From<bool> for ExportValue {
    fn from(value: bool) -> Self {
        ExportValue::Bool(value)
    }
}

impl<T: Into<ExportValue>> From<Option<T>> for ExportValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ExportValue::Empty, Into::into)
    }
}

/// Render one cell.
pub fn render(column: &str, kind: FieldKind, value: &ExportValue) -> ExportResult<String> {
    let invalid = |reason: &str| ExportError::InvalidValue {
        column: column.to_string(),
        reason: reason.to_string(),
    };

    let rendered = match (kind, value) {
        (_, ExportValue::Empty) => String::new(),

        (FieldKind::Text { limit }, ExportValue::Text(text)) => quote(&truncate(text, limit)),
        (FieldKind::Text { limit }, ExportValue::Integer(number)) => {
            quote(&truncate(&number.to_string(), limit))
        }

        (FieldKind::Integer, ExportValue::Integer(number)) => number.to_string(),
        (FieldKind::Integer, ExportValue::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid("expected an integer"))?
            .to_string(),

        (FieldKind::Decimal, ExportValue::Decimal(amount)) => {
            if amount.normalize().scale() > 2 {
                return Err(invalid("more than two decimal places"));
            }
            decimal(*amount)
        }
        (FieldKind::Decimal, ExportValue::Integer(number)) => decimal(Decimal::from(*number)),

        (FieldKind::Date(style), ExportValue::Date(date)) => date.format(style.pattern()).to_string(),
        (FieldKind::Date(style), ExportValue::Timestamp(at)) => {
            at.date().format(style.pattern()).to_string()
        }

        (FieldKind::Timestamp, ExportValue::Timestamp(at)) => {
            at.format("%Y%m%d%H%M%S%3f").to_string()
        }

        (FieldKind::Bool, ExportValue::Bool(flag)) => u8::from(*flag).to_string(),
        (FieldKind::Bool, ExportValue::Integer(number)) if matches!(number, 0 | 1) => {
            number.to_string()
        }

        (kind, value) => {
            return Err(invalid(&format!("{value:?} does not fit a {kind:?} field")));
        }
    };
    Ok(rendered)
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn truncate(text: &str, limit: Option<usize>) -> String {
    match limit {
        Some(limit) => text.chars().take(limit).collect(),
        None => text.to_string(),
    }
}

fn decimal(amount: Decimal) -> String {
    format!("{:.2}", amount).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cell(kind: FieldKind, value: impl Into<ExportValue>) -> String {
        render("Test", kind, &value.into()).unwrap()
    }

    #[test]
    fn test_text_is_quoted_and_truncated() {
        assert_eq!(cell(FieldKind::text(5), "Geldautomat"), "\"Gelda\"");
        assert_eq!(cell(FieldKind::unlimited_text(), "Sag \"Hallo\""), "\"Sag \"\"Hallo\"\"\"");
        assert_eq!(cell(FieldKind::text(3), "Ärger"), "\"Ärg\"");
    }

    #[test]
    fn test_decimal_uses_comma() {
        assert_eq!(cell(FieldKind::Decimal, dec!(105)), "105,00");
        assert_eq!(cell(FieldKind::Decimal, dec!(8.4)), "8,40");
        assert_eq!(cell(FieldKind::Decimal, dec!(1.500)), "1,50");
    }

    #[test]
    fn test_decimal_never_rounds() {
        let err = render("Umsatz", FieldKind::Decimal, &dec!(0.125).into()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_VALUE");
        assert!(render("Umsatz", FieldKind::Decimal, &dec!(0.1251).into()).is_err());
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2016, 6, 23).unwrap();
        assert_eq!(cell(FieldKind::Date(DateStyle::DayMonth), date), "2306");
        assert_eq!(cell(FieldKind::Date(DateStyle::YearMonthDay), date), "20160623");

        let at = date.and_hms_milli_opt(10, 5, 7, 42).unwrap();
        assert_eq!(cell(FieldKind::Timestamp, at), "20160623100507042");
    }

    #[test]
    fn test_bool_and_empty() {
        assert_eq!(cell(FieldKind::Bool, false), "0");
        assert_eq!(cell(FieldKind::Bool, true), "1");
        assert_eq!(cell(FieldKind::Integer, Option::<u32>::None), "");
    }

    #[test]
    fn test_mismatched_value() {
        let err = render("Konto", FieldKind::Integer, &ExportValue::Bool(true)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_VALUE");
        assert!(render("Konto", FieldKind::Integer, &"abc".into()).is_err());
    }
}
