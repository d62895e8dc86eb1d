//! Account labels export (`Kontenbeschriftungen`).

use std::path::Path;

use kontor_ledger::Account;
use tracing::debug;

use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::format::ACCOUNTS;
use crate::writer::{DatevFile, Row};

type AccountExtras<'a> = Box<dyn Fn(&Account) -> Row + 'a>;

/// Exports every general ledger account. Debtors and creditors go through
/// [`ContactExport`](crate::ContactExport) instead.
pub struct AccountExport<'a> {
    accounts: &'a [Account],
    config: ExportConfig,
    extras: Option<AccountExtras<'a>>,
}

impl<'a> AccountExport<'a> {
    pub fn new(accounts: &'a [Account], config: ExportConfig) -> Self {
        Self {
            accounts,
            config,
            extras: None,
        }
    }

    pub fn with_extras(mut self, extras: impl Fn(&Account) -> Row + 'a) -> Self {
        self.extras = Some(Box::new(extras));
        self
    }

    /// One row per non-contact account, ordered by number.
    pub fn rows(&self) -> Vec<Row> {
        let mut accounts: Vec<&Account> = self
            .accounts
            .iter()
            .filter(|account| !account.is_contact())
            .collect();
        accounts.sort_by_key(|account| account.number);

        accounts
            .into_iter()
            .map(|account| {
                let mut row = Row::new()
                    .with("Konto", account.number)
                    .with("Kontenbeschriftung", account.name.as_str());
                if let Some(extras) = &self.extras {
                    row.merge(extras(account));
                }
                row
            })
            .collect()
    }

    pub fn file(&self) -> ExportResult<DatevFile> {
        let mut file = DatevFile::new(&ACCOUNTS, self.config.clone())?;
        for row in self.rows() {
            file.push(&row)?;
        }
        debug!(rows = file.row_count(), "Account export built");
        Ok(file)
    }

    pub fn render(&self) -> ExportResult<String> {
        self.file()?.render()
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        self.file()?.to_file(path)
    }
}
