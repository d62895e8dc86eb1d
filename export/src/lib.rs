//! Kontor DATEV Export
//!
//! Renders ledger data into the DATEV interchange format:
//!
//! - **Buchungsstapel**: journals as booking rows ([`JournalExport`])
//! - **Kontenbeschriftungen**: account labels ([`AccountExport`])
//! - **Debitoren/Kreditoren**: contact master data ([`ContactExport`])
//!
//! Every file starts with a metadata record built from an [`ExportConfig`],
//! followed by the column titles and one line per row.

pub mod config;
pub mod error;
pub mod field;
pub mod format;
pub mod writer;
pub mod journal_export;
pub mod account_export;
pub mod contact_export;

pub use config::ExportConfig;
pub use error::{ExportError, ExportResult};
pub use field::{Column, DateStyle, ExportValue, FieldKind};
pub use format::{Format, ACCOUNTS, BOOKINGS, CONTACTS};
pub use writer::{DatevFile, Row};
pub use journal_export::JournalExport;
pub use account_export::AccountExport;
pub use contact_export::ContactExport;
