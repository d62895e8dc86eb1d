//! DATEV file assembly.
//!
//! A [`DatevFile`] collects rendered rows for one [`Format`] and writes the
//! metadata record, the column titles and the rows as semicolon separated
//! CRLF lines. Values are rendered when a row is pushed, so an unknown
//! column or an ill-typed value fails early.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::debug;

use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::field::{render, DateStyle, ExportValue, FieldKind};
use crate::format::{Format, BOOKINGS};

const FORMAT_MARKER: &str = "EXTF";
const FORMAT_VERSION: u16 = 700;
const ORIGIN: &str = "RE";
/// `Buchungstyp`: financial accounting.
const BOOKING_TYPE_FINANCIAL: u8 = 1;

/// One data row: column label to value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, ExportValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing an earlier value for the same label.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<ExportValue>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(label, _)| *label == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<ExportValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Merge `other` into this row. Values from `other` win.
    pub fn merge(&mut self, other: Row) {
        for (column, value) in other.cells {
            self.set(column, value);
        }
    }

    pub fn get(&self, column: &str) -> Option<&ExportValue> {
        self.cells
            .iter()
            .find(|(label, _)| label == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExportValue)> {
        self.cells.iter().map(|(label, value)| (label.as_str(), value))
    }
}

/// A DATEV file being assembled.
#[derive(Debug, Clone)]
pub struct DatevFile {
    format: &'static Format,
    config: ExportConfig,
    rows: Vec<Vec<String>>,
}

impl DatevFile {
    /// Start a file. Fails if the header configuration is invalid.
    pub fn new(format: &'static Format, config: ExportConfig) -> ExportResult<Self> {
        config.validate().map_err(ExportError::InvalidConfig)?;
        Ok(Self {
            format,
            config,
            rows: Vec::new(),
        })
    }

    pub fn format(&self) -> &'static Format {
        self.format
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render and append a row.
    pub fn push(&mut self, row: &Row) -> ExportResult<()> {
        let mut fields = vec![String::new(); self.format.columns.len()];
        for (label, value) in row.iter() {
            let (index, column) =
                self.format
                    .column(label)
                    .ok_or_else(|| ExportError::UnknownColumn {
                        format: self.format.name,
                        column: label.to_string(),
                    })?;
            fields[index] = render(column.name, column.kind, value)?;
        }
        self.rows.push(fields);
        Ok(())
    }

    /// The complete file contents.
    pub fn render(&self) -> ExportResult<String> {
        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .terminator(Terminator::CRLF)
            .quote_style(QuoteStyle::Never)
            .flexible(true)
            .from_writer(Vec::new());

        writer.write_record(self.header()?)?;
        writer.write_record(self.format.titles())?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))?;
        let output = String::from_utf8(bytes)?;

        debug!(
            format = self.format.name,
            rows = self.rows.len(),
            "Rendered DATEV file"
        );
        Ok(output)
    }

    /// Write the file to `path`.
    pub fn to_file(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        let path = path.as_ref();
        fs::write(path, self.render()?)?;
        debug!(path = %path.display(), "Wrote DATEV file");
        Ok(())
    }

    /// The metadata record.
    fn header(&self) -> ExportResult<Vec<String>> {
        let config = &self.config;
        let text = |value: Option<&str>| field(FieldKind::unlimited_text(), value);
        let date = |value: Option<NaiveDate>| field(FieldKind::Date(DateStyle::YearMonthDay), value);
        let is_bookings = self.format.category == BOOKINGS.category;

        let mut header = vec![
            text(Some(FORMAT_MARKER))?,
            FORMAT_VERSION.to_string(),
            self.format.category.to_string(),
            text(Some(self.format.name))?,
            self.format.version.to_string(),
            field(FieldKind::Timestamp, config.created_at)?,
            String::new(),
            text(Some(ORIGIN))?,
            text(config.exported_by.as_deref())?,
            text(None)?,
            field(FieldKind::Integer, config.advisor_id)?,
            field(FieldKind::Integer, config.client_id)?,
            date(config.fiscal_year_start)?,
            config.account_length.to_string(),
            date(config.date_from)?,
            date(config.date_to)?,
            field(FieldKind::text(30), config.description.as_deref())?,
            field(FieldKind::text(2), config.initials.as_deref())?,
            if is_bookings {
                BOOKING_TYPE_FINANCIAL.to_string()
            } else {
                String::new()
            },
            String::new(),
            field(FieldKind::Bool, config.locked)?,
            text(Some(config.currency.as_str()))?,
        ];

        header.extend(
            config
                .extra
                .iter()
                .map(|(_, value)| format!("\"{}\"", value.replace('"', "\"\""))),
        );
        Ok(header)
    }
}

fn field(kind: FieldKind, value: impl Into<ExportValue>) -> ExportResult<String> {
    render("Header", kind, &value.into())
}
