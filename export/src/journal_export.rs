//! Journal export into a DATEV booking batch.
//!
//! DATEV books every line against a single counter account. For each
//! journal one posting is picked as the main posting: the first one on a
//! debtor or creditor account, else the first one with the largest amount.
//! Every other posting becomes one row booked against the main account.

use std::cmp::Reverse;
use std::path::Path;

use kontor_ledger::{JournalEntry, PostingLine};
use tracing::{debug, instrument};

use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::format::BOOKINGS;
use crate::writer::{DatevFile, Row};

/// Disables the automatic tax calculation for a row.
const NO_TAX_AUTOMATION: &str = "40";
const SUBJECT_LIMIT: usize = 60;

type LineExtras<'a> = Box<dyn Fn(&PostingLine) -> Row + 'a>;

/// Exports journals as `Buchungsstapel`.
pub struct JournalExport<'a> {
    entries: &'a [JournalEntry],
    config: ExportConfig,
    extras: Option<LineExtras<'a>>,
}

impl<'a> JournalExport<'a> {
    pub fn new(entries: &'a [JournalEntry], config: ExportConfig) -> Self {
        Self {
            entries,
            config,
            extras: None,
        }
    }

    /// Add caller-supplied columns to every row. They override the
    /// columns filled from the posting.
    pub fn with_extras(mut self, extras: impl Fn(&PostingLine) -> Row + 'a) -> Self {
        self.extras = Some(Box::new(extras));
        self
    }

    /// All data rows, journals ordered by date then id.
    pub fn rows(&self) -> Vec<Row> {
        let mut entries: Vec<&JournalEntry> = self.entries.iter().collect();
        entries.sort_by_key(|entry| (entry.journal.date, entry.journal.id));

        entries
            .into_iter()
            .flat_map(|entry| self.entry_rows(entry))
            .collect()
    }

    #[instrument(skip(self), fields(journals = self.entries.len()))]
    pub fn file(&self) -> ExportResult<DatevFile> {
        let mut file = DatevFile::new(&BOOKINGS, self.config.clone())?;
        for row in self.rows() {
            file.push(&row)?;
        }
        debug!(rows = file.row_count(), "Journal export built");
        Ok(file)
    }

    pub fn render(&self) -> ExportResult<String> {
        self.file()?.render()
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        self.file()?.to_file(path)
    }

    fn entry_rows(&self, entry: &JournalEntry) -> Vec<Row> {
        let Some(main) = main_line(&entry.lines) else {
            return Vec::new();
        };

        let mut others: Vec<&PostingLine> = entry
            .lines
            .iter()
            .filter(|line| line.posting.id != main.posting.id)
            .collect();
        others.sort_by_key(|line| {
            (
                line.posting.side() == main.posting.side(),
                Reverse(line.posting.amount()),
            )
        });

        others
            .into_iter()
            .map(|line| self.row(entry, line, main))
            .collect()
    }

    fn row(&self, entry: &JournalEntry, line: &PostingLine, main: &PostingLine) -> Row {
        let journal = &entry.journal;
        let posting = &line.posting;

        let account = if posting.is_debit() {
            line.account.number
        } else {
            main.account.number
        };
        let counter_account = if posting.is_credit() {
            line.account.number
        } else {
            main.account.number
        };
        let subject = journal
            .subject
            .as_deref()
            .map(|subject| subject.chars().take(SUBJECT_LIMIT).collect::<String>());

        let mut row = Row::new()
            .with("Umsatz (ohne Soll/Haben-Kz)", posting.amount())
            .with("Soll/Haben-Kennzeichen", "S")
            .with("Konto", account)
            .with("Gegenkonto (ohne BU-Schlüssel)", counter_account)
            .with("BU-Schlüssel", NO_TAX_AUTOMATION)
            .with("Belegdatum", journal.date)
            .with("Belegfeld 1", journal.number.clone())
            .with("Buchungstext", subject)
            .with("Festschreibung", journal.permanent);

        if let Some(cost_center) = &line.cost_center {
            row.set("KOST1 - Kostenstelle", cost_center.number.as_str());
        }
        if let Some(extras) = &self.extras {
            row.merge(extras(line));
        }
        row
    }
}

/// First line on a contact account, else the first line with the largest
/// amount.
fn main_line(lines: &[PostingLine]) -> Option<&PostingLine> {
    lines
        .iter()
        .find(|line| line.account.is_contact())
        .or_else(|| {
            lines.iter().fold(None, |largest: Option<&PostingLine>, line| match largest {
                Some(largest) if largest.posting.amount() >= line.posting.amount() => {
                    Some(largest)
                }
                _ => Some(line),
            })
        })
}
