//! DATEV format descriptions.
//!
//! Each format names its data category, version and the full ordered list
//! of columns. Rows only fill the columns they need; the rest stay empty.

use crate::field::{Column, DateStyle, FieldKind};

const TEXT_2: FieldKind = FieldKind::text(2);
const TEXT_20: FieldKind = FieldKind::text(20);
const TEXT_36: FieldKind = FieldKind::text(36);
const TEXT_210: FieldKind = FieldKind::text(210);
const DAY_MONTH: FieldKind = FieldKind::Date(DateStyle::DayMonth);
const FULL_DATE: FieldKind = FieldKind::Date(DateStyle::YearMonthDay);

/// A DATEV file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Data category (`Datenkategorie`).
    pub category: u16,
    /// Format name (`Formatname`).
    pub name: &'static str,
    /// Format version (`Formatversion`).
    pub version: u16,
    pub columns: &'static [Column],
}

impl Format {
    /// Position and definition of a column.
    pub fn column(&self, name: &str) -> Option<(usize, &'static Column)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.name == name)
    }

    pub fn titles(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.name)
    }
}

/// Booking batch (`Buchungsstapel`).
pub static BOOKINGS: Format = Format {
    category: 21,
    name: "Buchungsstapel",
    version: 9,
    columns: &[
        Column::new("Umsatz (ohne Soll/Haben-Kz)", FieldKind::Decimal),
        Column::new("Soll/Haben-Kennzeichen", FieldKind::text(1)),
        Column::new("WKZ Umsatz", FieldKind::text(3)),
        Column::new("Kurs", FieldKind::Decimal),
        Column::new("Basis-Umsatz", FieldKind::Decimal),
        Column::new("WKZ Basis-Umsatz", FieldKind::text(3)),
        Column::new("Konto", FieldKind::Integer),
        Column::new("Gegenkonto (ohne BU-Schlüssel)", FieldKind::Integer),
        Column::new("BU-Schlüssel", FieldKind::text(4)),
        Column::new("Belegdatum", DAY_MONTH),
        Column::new("Belegfeld 1", TEXT_36),
        Column::new("Belegfeld 2", FieldKind::text(12)),
        Column::new("Skonto", FieldKind::Decimal),
        Column::new("Buchungstext", FieldKind::text(60)),
        Column::new("Postensperre", FieldKind::Bool),
        Column::new("Diverse Adressnummer", FieldKind::text(9)),
        Column::new("Geschäftspartnerbank", FieldKind::Integer),
        Column::new("Sachverhalt", FieldKind::Integer),
        Column::new("Zinssperre", FieldKind::Bool),
        Column::new("Beleglink", TEXT_210),
        Column::new("Beleg-Info - Art 1", TEXT_20),
        Column::new("Beleg-Info - Inhalt 1", TEXT_210),
        Column::new("Beleg-Info - Art 2", TEXT_20),
        Column::new("Beleg-Info - Inhalt 2", TEXT_210),
        Column::new("Beleg-Info - Art 3", TEXT_20),
        Column::new("Beleg-Info - Inhalt 3", TEXT_210),
        Column::new("Beleg-Info - Art 4", TEXT_20),
        Column::new("Beleg-Info - Inhalt 4", TEXT_210),
        Column::new("Beleg-Info - Art 5", TEXT_20),
        Column::new("Beleg-Info - Inhalt 5", TEXT_210),
        Column::new("Beleg-Info - Art 6", TEXT_20),
        Column::new("Beleg-Info - Inhalt 6", TEXT_210),
        Column::new("Beleg-Info - Art 7", TEXT_20),
        Column::new("Beleg-Info - Inhalt 7", TEXT_210),
        Column::new("Beleg-Info - Art 8", TEXT_20),
        Column::new("Beleg-Info - Inhalt 8", TEXT_210),
        Column::new("KOST1 - Kostenstelle", TEXT_36),
        Column::new("KOST2 - Kostenstelle", TEXT_36),
        Column::new("Kost-Menge", FieldKind::Decimal),
        Column::new("EU-Land u. UStID", FieldKind::text(15)),
        Column::new("EU-Steuersatz", FieldKind::Decimal),
        Column::new("Abw. Versteuerungsart", FieldKind::text(1)),
        Column::new("Sachverhalt L+L", FieldKind::Integer),
        Column::new("Funktionsergänzung L+L", FieldKind::Integer),
        Column::new("BU 49 Hauptfunktionstyp", FieldKind::Integer),
        Column::new("BU 49 Hauptfunktionsnummer", FieldKind::Integer),
        Column::new("BU 49 Funktionsergänzung", FieldKind::Integer),
        Column::new("Zusatzinformation - Art 1", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 1", TEXT_210),
        Column::new("Zusatzinformation - Art 2", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 2", TEXT_210),
        Column::new("Zusatzinformation - Art 3", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 3", TEXT_210),
        Column::new("Zusatzinformation - Art 4", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 4", TEXT_210),
        Column::new("Zusatzinformation - Art 5", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 5", TEXT_210),
        Column::new("Zusatzinformation - Art 6", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 6", TEXT_210),
        Column::new("Zusatzinformation - Art 7", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 7", TEXT_210),
        Column::new("Zusatzinformation - Art 8", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 8", TEXT_210),
        Column::new("Zusatzinformation - Art 9", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 9", TEXT_210),
        Column::new("Zusatzinformation - Art 10", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 10", TEXT_210),
        Column::new("Zusatzinformation - Art 11", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 11", TEXT_210),
        Column::new("Zusatzinformation - Art 12", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 12", TEXT_210),
        Column::new("Zusatzinformation - Art 13", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 13", TEXT_210),
        Column::new("Zusatzinformation - Art 14", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 14", TEXT_210),
        Column::new("Zusatzinformation - Art 15", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 15", TEXT_210),
        Column::new("Zusatzinformation - Art 16", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 16", TEXT_210),
        Column::new("Zusatzinformation - Art 17", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 17", TEXT_210),
        Column::new("Zusatzinformation - Art 18", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 18", TEXT_210),
        Column::new("Zusatzinformation - Art 19", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 19", TEXT_210),
        Column::new("Zusatzinformation - Art 20", TEXT_20),
        Column::new("Zusatzinformation - Inhalt 20", TEXT_210),
        Column::new("Stück", FieldKind::Integer),
        Column::new("Gewicht", FieldKind::Decimal),
        Column::new("Zahlweise", FieldKind::Integer),
        Column::new("Forderungsart", FieldKind::text(10)),
        Column::new("Veranlagungsjahr", FieldKind::Integer),
        Column::new("Zugeordnete Fälligkeit", FULL_DATE),
        Column::new("Skontotyp", FieldKind::Integer),
        Column::new("Auftragsnummer", FieldKind::text(30)),
        Column::new("Buchungstyp", TEXT_2),
        Column::new("USt-Schlüssel (Anzahlungen)", FieldKind::Integer),
        Column::new("EU-Land (Anzahlungen)", TEXT_2),
        Column::new("Sachverhalt L+L (Anzahlungen)", FieldKind::Integer),
        Column::new("EU-Steuersatz (Anzahlungen)", FieldKind::Decimal),
        Column::new("Erlöskonto (Anzahlungen)", FieldKind::Integer),
        Column::new("Herkunft-Kz", TEXT_2),
        Column::new("Buchungs GUID", TEXT_36),
        Column::new("KOST-Datum", FULL_DATE),
        Column::new("SEPA-Mandatsreferenz", FieldKind::text(35)),
        Column::new("Skontosperre", FieldKind::Bool),
        Column::new("Gesellschaftername", FieldKind::text(76)),
        Column::new("Beteiligtennummer", FieldKind::Integer),
        Column::new("Identifikationsnummer", FieldKind::text(11)),
        Column::new("Zeichnernummer", TEXT_20),
        Column::new("Postensperre bis", FULL_DATE),
        Column::new("Bezeichnung SoBil-Sachverhalt", FieldKind::text(30)),
        Column::new("Kennzeichen SoBil-Buchung", FieldKind::Integer),
        Column::new("Festschreibung", FieldKind::Bool),
        Column::new("Leistungsdatum", FULL_DATE),
        Column::new("Datum Zuord. Steuerperiode", FULL_DATE),
    ],
};

/// Account labels (`Kontenbeschriftungen`).
pub static ACCOUNTS: Format = Format {
    category: 20,
    name: "Kontenbeschriftungen",
    version: 2,
    columns: &[
        Column::new("Konto", FieldKind::Integer),
        Column::new("Kontenbeschriftung", FieldKind::text(40)),
        Column::new("Sprach-ID", FieldKind::text(5)),
        Column::new("Kontenbeschriftung lang", FieldKind::text(300)),
    ],
};

/// Debtor and creditor master data (`Debitoren/Kreditoren`).
pub static CONTACTS: Format = Format {
    category: 16,
    name: "Debitoren/Kreditoren",
    version: 5,
    columns: &[
        Column::new("Konto", FieldKind::Integer),
        Column::new("Name (Adressatentyp Unternehmen)", FieldKind::text(50)),
        Column::new("Unternehmensgegenstand", FieldKind::text(50)),
        Column::new("Name (Adressatentyp natürl. Person)", FieldKind::text(30)),
        Column::new("Vorname (Adressatentyp natürl. Person)", FieldKind::text(30)),
        Column::new("Name (Adressatentyp keine Angabe)", FieldKind::text(50)),
        Column::new("Adressatentyp", FieldKind::text(1)),
        Column::new("Kurzbezeichnung", FieldKind::text(15)),
        Column::new("EU-Land", TEXT_2),
        Column::new("EU-USt-IdNr.", FieldKind::text(13)),
        Column::new("Anrede", FieldKind::text(30)),
        Column::new("Titel/Akad. Grad", FieldKind::text(25)),
        Column::new("Adelstitel", FieldKind::text(15)),
        Column::new("Namensvorsatz", FieldKind::text(14)),
        Column::new("Adressart", FieldKind::text(3)),
        Column::new("Straße", TEXT_36),
        Column::new("Postfach", FieldKind::text(10)),
        Column::new("Postleitzahl", FieldKind::text(10)),
        Column::new("Ort", FieldKind::text(30)),
        Column::new("Land", TEXT_2),
        Column::new("Versandzusatz", FieldKind::text(50)),
        Column::new("Adresszusatz", TEXT_36),
        Column::new("Abweichende Anrede", FieldKind::text(30)),
        Column::new("Abw. Zustellbezeichnung 1", FieldKind::text(50)),
        Column::new("Abw. Zustellbezeichnung 2", TEXT_36),
        Column::new("Kennz. Korrespondenzadresse", FieldKind::Integer),
        Column::new("Adresse Gültig von", FULL_DATE),
        Column::new("Adresse Gültig bis", FULL_DATE),
        Column::new("Telefon", FieldKind::text(60)),
        Column::new("Bemerkung (Telefon)", FieldKind::text(40)),
        Column::new("Telefon GL", FieldKind::text(60)),
        Column::new("Bemerkung (Telefon GL)", FieldKind::text(40)),
        Column::new("E-Mail", FieldKind::text(60)),
        Column::new("Bemerkung (E-Mail)", FieldKind::text(40)),
        Column::new("Internet", FieldKind::text(60)),
        Column::new("Bemerkung (Internet)", FieldKind::text(40)),
        Column::new("Fax", FieldKind::text(60)),
        Column::new("Bemerkung (Fax)", FieldKind::text(40)),
        Column::new("Sonstige", FieldKind::text(60)),
        Column::new("Bemerkung (Sonstige 1)", FieldKind::text(40)),
        Column::new("Bankleitzahl 1", FieldKind::text(8)),
        Column::new("Bankbezeichnung 1", FieldKind::text(30)),
        Column::new("Bank-Kontonummer 1", FieldKind::text(10)),
        Column::new("Länderkennzeichen 1", TEXT_2),
        Column::new("IBAN-Nr. 1", FieldKind::text(34)),
        Column::new("SWIFT-Code 1", FieldKind::text(11)),
        Column::new("Abw. Kontoinhaber 1", FieldKind::text(70)),
        Column::new("Kennz. Hauptbankverb. 1", FieldKind::text(1)),
        Column::new("Bankverb 1 Gültig von", FULL_DATE),
        Column::new("Bankverb 1 Gültig bis", FULL_DATE),
        Column::new("Briefanrede", FieldKind::text(100)),
        Column::new("Grußformel", FieldKind::text(50)),
        Column::new("Kunden-/Lief.-Nr.", FieldKind::text(15)),
        Column::new("Steuernummer", FieldKind::text(20)),
        Column::new("Sprache", FieldKind::Integer),
        Column::new("Ansprechpartner", FieldKind::text(40)),
        Column::new("Vertreter", FieldKind::text(40)),
        Column::new("Sachbearbeiter", FieldKind::text(40)),
        Column::new("Diverse-Konto", FieldKind::Bool),
        Column::new("Ausgabeziel", FieldKind::Integer),
        Column::new("Währungssteuerung", FieldKind::Integer),
        Column::new("Kreditlimit (Debitor)", FieldKind::Decimal),
        Column::new("Zahlungsbedingung", FieldKind::Integer),
        Column::new("Fälligkeit in Tagen (Debitor)", FieldKind::Integer),
        Column::new("Skonto in Prozent (Debitor)", FieldKind::Decimal),
        Column::new("Kreditoren-Ziel 1 Tg.", FieldKind::Integer),
        Column::new("Kreditoren-Skonto 1 %", FieldKind::Decimal),
        Column::new("Kreditoren-Ziel 2 Tg.", FieldKind::Integer),
        Column::new("Kreditoren-Skonto 2 %", FieldKind::Decimal),
        Column::new("Kreditoren-Ziel 3 Brutto Tg.", FieldKind::Integer),
        Column::new("Kreditoren-Ziel 4 Tg.", FieldKind::Integer),
        Column::new("Kreditoren-Skonto 4 %", FieldKind::Decimal),
        Column::new("Kreditoren-Ziel 5 Tg.", FieldKind::Integer),
        Column::new("Kreditoren-Skonto 5 %", FieldKind::Decimal),
        Column::new("Mahnung", FieldKind::Integer),
        Column::new("Kontoauszug", FieldKind::Integer),
        Column::new("Mahntext 1", FieldKind::Integer),
        Column::new("Mahntext 2", FieldKind::Integer),
        Column::new("Mahntext 3", FieldKind::Integer),
        Column::new("Kontoauszugstext", FieldKind::Integer),
        Column::new("Mahnlimit Betrag", FieldKind::Decimal),
        Column::new("Mahnlimit %", FieldKind::Decimal),
        Column::new("Zinsberechnung", FieldKind::Integer),
        Column::new("Mahnzinssatz 1", FieldKind::Decimal),
        Column::new("Mahnzinssatz 2", FieldKind::Decimal),
        Column::new("Mahnzinssatz 3", FieldKind::Decimal),
        Column::new("Lastschrift", FieldKind::text(1)),
        Column::new("Mandantenbank", FieldKind::Integer),
        Column::new("Zahlungsträger", FieldKind::text(1)),
        Column::new("Indiv. Feld 1", FieldKind::text(40)),
        Column::new("Indiv. Feld 2", FieldKind::text(40)),
        Column::new("Indiv. Feld 3", FieldKind::text(40)),
        Column::new("Indiv. Feld 4", FieldKind::text(40)),
        Column::new("Indiv. Feld 5", FieldKind::text(40)),
        Column::new("Indiv. Feld 6", FieldKind::text(40)),
        Column::new("Indiv. Feld 7", FieldKind::text(40)),
        Column::new("Indiv. Feld 8", FieldKind::text(40)),
        Column::new("Indiv. Feld 9", FieldKind::text(40)),
        Column::new("Indiv. Feld 10", FieldKind::text(40)),
        Column::new("Zahlungsbedingungen Kreditor", FieldKind::Integer),
        Column::new("Gesellschaftername", FieldKind::text(76)),
        Column::new("Leerfeld", FieldKind::unlimited_text()),
        Column::new("Status", FieldKind::Integer),
        Column::new("Nummer Fremdsystem", FieldKind::text(15)),
        Column::new("Insolvent", FieldKind::Bool),
    ],
};
