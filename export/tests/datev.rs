//! DATEV exports rendered from a populated ledger.

use std::collections::HashMap;
use std::fs;

use chrono::NaiveDate;
use kontor_common::{AccountId, DateFilter};
use kontor_export::{AccountExport, ContactExport, ExportConfig, JournalExport, Row};
use kontor_ledger::{AccountKind, Ledger, NewAccount, NewCostCenter, NewJournal, PostingSpec};
use rust_decimal_macros::dec;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 6, day).unwrap()
}

fn config(description: &str) -> ExportConfig {
    ExportConfig::new(1234567, 78901, NaiveDate::from_ymd_opt(2016, 1, 1).unwrap())
        .with_period(date(1), date(30))
        .with_description(description)
}

/// Accounts keyed by number.
fn chart(ledger: &Ledger, accounts: &[(u32, &str, AccountKind)]) -> HashMap<u32, AccountId> {
    accounts
        .iter()
        .map(|(number, name, kind)| {
            let account = ledger
                .create_account(NewAccount::new(*number, *name, *kind))
                .unwrap();
            (*number, account.id)
        })
        .collect()
}

fn booking_ledger() -> (Ledger, HashMap<u32, AccountId>) {
    let ledger = Ledger::in_memory();
    let accounts = chart(
        &ledger,
        &[
            (1000, "Kasse", AccountKind::Asset),
            (1200, "Bank", AccountKind::Asset),
            (1576, "Abziehbare Vorsteuer 19 %", AccountKind::Asset),
            (1600, "Verbindlichkeiten aLuL", AccountKind::Liability),
            (1718, "Erhaltene Anzahlungen", AccountKind::Liability),
            (1776, "Umsatzsteuer 19 %", AccountKind::Liability),
            (4920, "Telefon", AccountKind::Expense),
            (8400, "Erlöse 19 %", AccountKind::Revenue),
            (10000, "Diverse Debitoren", AccountKind::Debtor),
        ],
    );
    (ledger, accounts)
}

fn book(ledger: &Ledger, journal: NewJournal, postings: Vec<PostingSpec>) {
    let outcome = ledger.create_journal(journal, postings).unwrap();
    assert!(outcome.is_valid(), "{:?}", outcome.errors());
}

fn render_journals(ledger: &Ledger) -> String {
    let entries = ledger.journal_entries(&DateFilter::All);
    let output = JournalExport::new(&entries, config("Kontor-Buchungen"))
        .render()
        .unwrap();
    output
}

#[test]
fn test_journal_export_header() {
    let (ledger, _) = booking_ledger();
    let output = render_journals(&ledger);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("1234567;"));
    assert!(lines[0].contains("78901;"));
    assert!(lines[0].contains("20160601;20160630;"));
    assert!(lines[0].contains("\"Kontor-Buchungen\";"));
    assert!(lines[1].contains("Konto;Gegenkonto (ohne BU-Schlüssel);"));
}

#[test]
fn test_journal_export_simple_journal() {
    let (ledger, accounts) = booking_ledger();
    book(
        &ledger,
        NewJournal::new("Geldautomat").with_number("BELEG-1").on(date(23)),
        vec![
            PostingSpec::debit(accounts[&1000], dec!(105)),
            PostingSpec::credit(accounts[&1200], dec!(105)),
        ],
    );

    let output = render_journals(&ledger);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);

    let row = lines[2];
    assert!(row.starts_with("105,00;\"S\";"));
    assert!(row.contains("1000;1200;"));
    assert!(row.contains("\"40\";2306;\"BELEG-1\";"));
    assert!(row.contains("\"Geldautomat\";"));
    assert!(row.contains(";0;"));
}

#[test]
fn test_journal_export_split_booking() {
    let (ledger, accounts) = booking_ledger();
    book(
        &ledger,
        NewJournal::new("Telefonrechnung").with_number("BELEG-2").on(date(24)),
        vec![
            PostingSpec::debit(accounts[&4920], dec!(8.40)),
            PostingSpec::debit(accounts[&1576], dec!(1.60)),
            PostingSpec::credit(accounts[&1600], dec!(10.00)),
        ],
    );

    let output = render_journals(&ledger);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 4);

    assert!(lines[2].starts_with("8,40;"));
    assert!(lines[2].contains("4920;1600;"));
    assert!(lines[2].contains("2406;"));

    assert!(lines[3].starts_with("1,60;"));
    assert!(lines[3].contains("1576;1600;"));
    assert!(lines[3].contains("2406;"));
}

#[test]
fn test_journal_export_contact_is_main_posting() {
    let (ledger, accounts) = booking_ledger();
    book(
        &ledger,
        NewJournal::new("Warenverkauf mit Anzahlung")
            .with_number("BELEG-3")
            .on(date(25)),
        vec![
            PostingSpec::debit(accounts[&10000], dec!(4760)),
            PostingSpec::debit(accounts[&1718], dec!(1000)),
            PostingSpec::debit(accounts[&1776], dec!(190)),
            PostingSpec::credit(accounts[&8400], dec!(5000)),
            PostingSpec::credit(accounts[&1776], dec!(950)),
        ],
    );

    let entries = ledger.journal_entries(&DateFilter::All);
    let output = JournalExport::new(&entries, config("Kontor-Buchungen"))
        .with_extras(|line| {
            Row::new().with("Identifikationsnummer", format!("ID:{}", line.posting.id))
        })
        .render()
        .unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 6);

    let expected = [
        ("5000,00;", "10000;8400;"),
        ("950,00;", "10000;1776;"),
        ("1000,00;", "1718;10000;"),
        ("190,00;", "1776;10000;"),
    ];
    for (line, (amount, accounts)) in lines[2..].iter().zip(expected) {
        assert!(line.starts_with(amount), "{line}");
        assert!(line.contains(accounts), "{line}");
        assert!(line.contains("2506;"), "{line}");
        assert!(line.contains("\"ID:"), "{line}");
    }
}

#[test]
fn test_journal_export_orders_by_date() {
    let (ledger, accounts) = booking_ledger();
    book(
        &ledger,
        NewJournal::new("Später").with_number("B-2").on(date(20)),
        vec![
            PostingSpec::debit(accounts[&1000], dec!(2)),
            PostingSpec::credit(accounts[&1200], dec!(2)),
        ],
    );
    book(
        &ledger,
        NewJournal::new("Früher").with_number("B-1").on(date(10)),
        vec![
            PostingSpec::debit(accounts[&1000], dec!(1)),
            PostingSpec::credit(accounts[&1200], dec!(1)),
        ],
    );

    let output = render_journals(&ledger);
    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[2].contains("\"B-1\""));
    assert!(lines[3].contains("\"B-2\""));
}

#[test]
fn test_journal_export_cost_center_and_permanent() {
    let (ledger, accounts) = booking_ledger();
    let cost_center = ledger
        .create_cost_center(NewCostCenter::new("FZ1", "Firmenwagen"))
        .unwrap();
    book(
        &ledger,
        NewJournal::new("Telefonrechnung").on(date(24)).permanent(),
        vec![
            PostingSpec::debit(accounts[&4920], dec!(8.40)).with_cost_center(cost_center.id),
            PostingSpec::debit(accounts[&1576], dec!(1.60)),
            PostingSpec::credit(accounts[&1600], dec!(10.00)),
        ],
    );

    let output = render_journals(&ledger);
    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[2].contains("4920;1600;"));
    assert!(lines[2].contains("\"FZ1\";"));
    assert!(lines[2].contains(";1;"));
    assert!(!lines[3].contains("\"FZ1\""));
}

#[test]
fn test_journal_export_truncates_subject() {
    let (ledger, accounts) = booking_ledger();
    let subject = "x".repeat(80);
    book(
        &ledger,
        NewJournal::new(subject.as_str()).on(date(5)),
        vec![
            PostingSpec::debit(accounts[&1000], dec!(1)),
            PostingSpec::credit(accounts[&1200], dec!(1)),
        ],
    );

    let output = render_journals(&ledger);
    let row = output.lines().nth(2).unwrap();
    assert!(row.contains(&format!(";\"{}\";", "x".repeat(60))));
    assert!(!row.contains(&"x".repeat(61)));
}

#[test]
fn test_journal_export_to_file() {
    let (ledger, accounts) = booking_ledger();
    book(
        &ledger,
        NewJournal::new("Geldautomat").with_number("BELEG-1").on(date(23)),
        vec![
            PostingSpec::debit(accounts[&1000], dec!(105)),
            PostingSpec::credit(accounts[&1200], dec!(105)),
        ],
    );

    let entries = ledger.journal_entries(&DateFilter::All);
    let export = JournalExport::new(&entries, config("Kontor-Buchungen"));
    let path = std::env::temp_dir().join(format!("kontor-journals-{}.csv", std::process::id()));

    export.to_file(&path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(written, export.render().unwrap());
    assert!(written.contains("\"Buchungsstapel\""));
}

fn labelled_ledger() -> Ledger {
    let ledger = Ledger::in_memory();
    chart(
        &ledger,
        &[
            (1000, "Kasse", AccountKind::Asset),
            (1776, "Umsatzsteuer 19 %", AccountKind::Liability),
            (4920, "Telefon", AccountKind::Expense),
            (8400, "Erlöse 19 %", AccountKind::Revenue),
            (9000, "Saldenvorträge Sachkonten", AccountKind::Forward),
            (10000, "Diverse Kreditoren", AccountKind::Creditor),
            (70000, "Diverse Debitoren", AccountKind::Debtor),
        ],
    );
    ledger
}

#[test]
fn test_account_export() {
    let ledger = labelled_ledger();
    let accounts = ledger.accounts();
    let output = AccountExport::new(&accounts, config("Kontor-Konten"))
        .with_extras(|_| Row::new().with("Sprach-ID", "de-DE"))
        .render()
        .unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert!(lines[0].contains("\"Kontenbeschriftungen\";"));
    assert!(lines[0].contains("\"Kontor-Konten\";"));
    assert_eq!(lines.len(), 7);

    let expected = [
        (1000, "Kasse"),
        (1776, "Umsatzsteuer 19 %"),
        (4920, "Telefon"),
        (8400, "Erlöse 19 %"),
        (9000, "Saldenvorträge Sachkonten"),
    ];
    for (line, (number, name)) in lines[2..].iter().zip(expected) {
        assert!(line.starts_with(&format!("{number};")), "{line}");
        assert!(line.contains(&format!("\"{name}\";")), "{line}");
        assert!(line.contains(";\"de-DE\""), "{line}");
    }
}

#[test]
fn test_account_export_to_file() {
    let ledger = labelled_ledger();
    let accounts = ledger.accounts();
    let export = AccountExport::new(&accounts, config("Kontor-Konten"));
    let path = std::env::temp_dir().join(format!("kontor-accounts-{}.csv", std::process::id()));

    export.to_file(&path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(written.lines().count(), 7);
    assert!(written.lines().nth(2).unwrap().starts_with("1000;\"Kasse\";"));
}

fn contact_ledger() -> Ledger {
    let ledger = Ledger::in_memory();
    chart(
        &ledger,
        &[
            (1000, "Kasse", AccountKind::Asset),
            (10000, "Meyer GmbH", AccountKind::Creditor),
            (70000, "Schulze AG", AccountKind::Debtor),
        ],
    );
    ledger
}

#[test]
fn test_contact_export() {
    let ledger = contact_ledger();
    let accounts = ledger.accounts();
    let output = ContactExport::new(&accounts, config("Kontor-Kontakte"), |account| {
        Row::new().with("Kurzbezeichnung", account.name.as_str())
    })
    .render()
    .unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert!(lines[0].contains("\"Debitoren/Kreditoren\";"));
    assert!(lines[0].contains("\"Kontor-Kontakte\";"));
    assert_eq!(lines.len(), 4);

    assert!(lines[2].starts_with("10000;"));
    assert!(lines[2].contains("\"Meyer GmbH\";"));
    assert!(lines[3].starts_with("70000;"));
    assert!(lines[3].contains("\"Schulze AG\";"));
}

#[test]
fn test_contact_export_to_file() {
    let ledger = contact_ledger();
    let accounts = ledger.accounts();
    let export = ContactExport::new(&accounts, config("Kontor-Kontakte"), |account| {
        Row::new().with("Name (Adressatentyp Unternehmen)", account.name.as_str())
    });
    let path = std::env::temp_dir().join(format!("kontor-contacts-{}.csv", std::process::id()));

    export.to_file(&path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(written.lines().count(), 4);
    assert!(written.contains("10000;\"Meyer GmbH\";"));
}

#[test]
fn test_unknown_extra_column_fails() {
    let ledger = contact_ledger();
    let accounts = ledger.accounts();
    let err = ContactExport::new(&accounts, config("Kontor-Kontakte"), |_| {
        Row::new().with("Buchungstext", "falsch")
    })
    .render()
    .unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_COLUMN");
}
