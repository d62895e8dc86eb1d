//! Tax rates booked through an account.

use kontor_common::{AccountId, ErrorCode, Errors, LedgerError, Result, TaxId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::Tables;

/// A tax rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    /// Store-assigned identifier.
    pub id: TaxId,
    /// Short name, e.g. "USt19".
    pub name: String,
    /// Longer description.
    pub description: Option<String>,
    /// Rate in percent.
    pub value: Decimal,
    /// Account the tax is booked on.
    pub account_id: AccountId,
}

impl Tax {
    pub fn validate(&self, tables: &Tables) -> Errors {
        let mut errors = Errors::new();
        if self.name.trim().is_empty() {
            errors.add("name", ErrorCode::Blank);
        }
        match tables.account(self.account_id) {
            None => errors.add("account_id", ErrorCode::Blank),
            Some(account) if account.tax_id == Some(self.id) => {
                errors.add("account_id", ErrorCode::CircularReference)
            }
            Some(_) => {}
        }
        errors
    }
}

/// Attributes for a new tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTax {
    pub name: String,
    pub description: Option<String>,
    pub value: Decimal,
    pub account_id: AccountId,
}

impl NewTax {
    pub fn new(name: impl Into<String>, value: Decimal, account_id: AccountId) -> Self {
        Self {
            name: name.into(),
            description: None,
            value,
            account_id,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Changes to an existing tax. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub value: Option<Decimal>,
    pub account_id: Option<AccountId>,
}

pub(crate) fn create(tables: &mut Tables, new: NewTax) -> Result<Tax> {
    let tax = Tax {
        id: TaxId::new(tables.next_key()),
        name: new.name,
        description: new.description,
        value: new.value,
        account_id: new.account_id,
    };
    tax.validate(tables).into_result(LedgerError::Validation)?;
    tables.put_tax(tax.clone());
    Ok(tax)
}

pub(crate) fn update(tables: &mut Tables, id: TaxId, changes: TaxChanges) -> Result<Tax> {
    let mut tax = tables
        .tax(id)
        .cloned()
        .ok_or_else(|| LedgerError::not_found("tax", id))?;
    if let Some(name) = changes.name {
        tax.name = name;
    }
    if let Some(description) = changes.description {
        tax.description = description;
    }
    if let Some(value) = changes.value {
        tax.value = value;
    }
    if let Some(account_id) = changes.account_id {
        tax.account_id = account_id;
    }
    tax.validate(tables).into_result(LedgerError::Validation)?;
    tables.put_tax(tax.clone());
    Ok(tax)
}

pub(crate) fn delete(tables: &mut Tables, id: TaxId) -> Result<Tax> {
    if tables.tax(id).is_none() {
        return Err(LedgerError::not_found("tax", id));
    }
    if tables.accounts_with_tax(id).next().is_some() {
        return Err(LedgerError::ReferentialIntegrity(Errors::single(
            "accounts",
            ErrorCode::RestrictDependentDestroy,
        )));
    }
    tables
        .remove_tax(id)
        .ok_or_else(|| LedgerError::not_found("tax", id))
}
