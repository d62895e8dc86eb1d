//! Debtor and creditor export (`Debitoren/Kreditoren`).

use std::path::Path;

use kontor_ledger::Account;
use tracing::debug;

use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::format::CONTACTS;
use crate::writer::{DatevFile, Row};

/// Exports debtor and creditor accounts.
///
/// The ledger only knows the account number and name, so the caller maps
/// each account to its master data columns (name, address, bank details).
pub struct ContactExport<'a> {
    accounts: &'a [Account],
    config: ExportConfig,
    fields: Box<dyn Fn(&Account) -> Row + 'a>,
}

impl<'a> ContactExport<'a> {
    pub fn new(
        accounts: &'a [Account],
        config: ExportConfig,
        fields: impl Fn(&Account) -> Row + 'a,
    ) -> Self {
        Self {
            accounts,
            config,
            fields: Box::new(fields),
        }
    }

    /// One row per contact account, ordered by number.
    pub fn rows(&self) -> Vec<Row> {
        let mut accounts: Vec<&Account> = self
            .accounts
            .iter()
            .filter(|account| account.is_contact())
            .collect();
        accounts.sort_by_key(|account| account.number);

        accounts
            .into_iter()
            .map(|account| {
                let mut row = Row::new().with("Konto", account.number);
                row.merge((self.fields)(account));
                row
            })
            .collect()
    }

    pub fn file(&self) -> ExportResult<DatevFile> {
        let mut file = DatevFile::new(&CONTACTS, self.config.clone())?;
        for row in self.rows() {
            file.push(&row)?;
        }
        debug!(rows = file.row_count(), "Contact export built");
        Ok(file)
    }

    pub fn render(&self) -> ExportResult<String> {
        self.file()?.render()
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        self.file()?.to_file(path)
    }
}
