//! DATEV header configuration.
//!
//! The first line of every DATEV file is a metadata record naming the tax
//! advisor, the client, the fiscal year and the covered period. Options can
//! be built in code, read from the environment or parsed from a key/value
//! mapping keyed by the DATEV header labels.

use chrono::{NaiveDate, NaiveDateTime};

/// Header options shared by every export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Tax advisor number (`Berater`).
    pub advisor_id: Option<u32>,
    /// Client number (`Mandant`).
    pub client_id: Option<u32>,
    /// First day of the fiscal year (`WJ-Beginn`).
    pub fiscal_year_start: Option<NaiveDate>,
    /// Length of general ledger account numbers (`Sachkontenlänge`).
    pub account_length: u8,
    /// Start of the exported period (`Datum vom`).
    pub date_from: Option<NaiveDate>,
    /// End of the exported period (`Datum bis`).
    pub date_to: Option<NaiveDate>,
    /// Batch description (`Bezeichnung`).
    pub description: Option<String>,
    /// User who created the file (`Exportiert von`).
    pub exported_by: Option<String>,
    /// Dictation initials (`Diktatkürzel`).
    pub initials: Option<String>,
    /// Lock the whole batch on import (`Festschreibung`).
    pub locked: bool,
    /// Currency code (`WKZ`).
    pub currency: String,
    /// Creation timestamp (`Erzeugt am`). Left empty when unset.
    pub created_at: Option<NaiveDateTime>,
    /// Unrecognized options, appended to the header verbatim.
    pub extra: Vec<(String, String)>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            advisor_id: None,
            client_id: None,
            fiscal_year_start: None,
            account_length: 4,
            date_from: None,
            date_to: None,
            description: None,
            exported_by: None,
            initials: None,
            locked: false,
            currency: "EUR".to_string(),
            created_at: None,
            extra: Vec::new(),
        }
    }
}

impl ExportConfig {
    pub fn new(advisor_id: u32, client_id: u32, fiscal_year_start: NaiveDate) -> Self {
        Self {
            advisor_id: Some(advisor_id),
            client_id: Some(client_id),
            fiscal_year_start: Some(fiscal_year_start),
            ..Self::default()
        }
    }

    pub fn with_period(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(advisor) = std::env::var("DATEV_ADVISOR_ID") {
            if let Ok(advisor) = advisor.trim().parse() {
                config.advisor_id = Some(advisor);
            }
        }

        if let Ok(client) = std::env::var("DATEV_CLIENT_ID") {
            if let Ok(client) = client.trim().parse() {
                config.client_id = Some(client);
            }
        }

        if let Ok(start) = std::env::var("DATEV_FISCAL_YEAR_START") {
            config.fiscal_year_start = parse_date(&start);
        }

        if let Ok(description) = std::env::var("DATEV_DESCRIPTION") {
            config.description = Some(description);
        }

        if let Ok(from) = std::env::var("DATEV_DATE_FROM") {
            config.date_from = parse_date(&from);
        }

        if let Ok(to) = std::env::var("DATEV_DATE_TO") {
            config.date_to = parse_date(&to);
        }

        config
    }

    /// Build from `(label, value)` pairs keyed by DATEV header labels.
    ///
    /// Labels this type does not model end up in [`extra`](Self::extra).
    pub fn from_options<I, K, V>(options: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Self::default();

        for (key, value) in options {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                "Berater" => config.advisor_id = Some(parse_number(&key, &value)?),
                "Mandant" => config.client_id = Some(parse_number(&key, &value)?),
                "WJ-Beginn" => config.fiscal_year_start = Some(require_date(&key, &value)?),
                "Sachkontenlänge" => config.account_length = parse_number(&key, &value)?,
                "Datum vom" => config.date_from = Some(require_date(&key, &value)?),
                "Datum bis" => config.date_to = Some(require_date(&key, &value)?),
                "Bezeichnung" => config.description = Some(value),
                "Exportiert von" => config.exported_by = Some(value),
                "Diktatkürzel" => config.initials = Some(value),
                "Festschreibung" => config.locked = matches!(value.trim(), "1" | "true"),
                "WKZ" => config.currency = value,
                _ => config.extra.push((key, value)),
            }
        }

        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        match self.advisor_id {
            None => return Err("Berater is required".to_string()),
            Some(advisor) if !(1001..=9_999_999).contains(&advisor) => {
                return Err(format!("Berater {advisor} is out of range 1001..9999999"));
            }
            Some(_) => {}
        }

        match self.client_id {
            None => return Err("Mandant is required".to_string()),
            Some(client) if !(1..=99_999).contains(&client) => {
                return Err(format!("Mandant {client} is out of range 1..99999"));
            }
            Some(_) => {}
        }

        if self.fiscal_year_start.is_none() {
            return Err("WJ-Beginn is required".to_string());
        }

        if !(4..=8).contains(&self.account_length) {
            return Err("Sachkontenlänge must be between 4 and 8".to_string());
        }

        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err("Datum vom cannot be after Datum bis".to_string());
            }
        }

        if self.currency.len() != 3 {
            return Err(format!("WKZ `{}` is not a currency code", self.currency));
        }

        Ok(())
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
        .ok()
}

fn require_date(key: &str, value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("{key}: `{value}` is not a date"))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{key}: `{value}` is not a number"))
}
