//! Cost centers for revenue and expense postings.

use kontor_common::{CostCenterId, ErrorCode, Errors, LedgerError, Result};
use serde::{Deserialize, Serialize};

use crate::store::Tables;

/// A cost center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCenter {
    /// Store-assigned identifier.
    pub id: CostCenterId,
    /// Cost center number, unique.
    pub number: String,
    /// Display name.
    pub name: String,
    /// Free-form note.
    pub note: Option<String>,
}

impl CostCenter {
    pub fn validate(&self, tables: &Tables) -> Errors {
        let mut errors = Errors::new();
        if self.number.trim().is_empty() {
            errors.add("number", ErrorCode::Blank);
        } else if let Some(other) = tables.cost_center_by_number(&self.number) {
            if other.id != self.id {
                errors.add("number", ErrorCode::Taken);
            }
        }
        if self.name.trim().is_empty() {
            errors.add("name", ErrorCode::Blank);
        }
        errors
    }
}

/// Attributes for a new cost center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCostCenter {
    pub number: String,
    pub name: String,
    pub note: Option<String>,
}

impl NewCostCenter {
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

pub(crate) fn create(tables: &mut Tables, new: NewCostCenter) -> Result<CostCenter> {
    let cost_center = CostCenter {
        id: CostCenterId::new(tables.next_key()),
        number: new.number,
        name: new.name,
        note: new.note,
    };
    cost_center
        .validate(tables)
        .into_result(LedgerError::Validation)?;
    tables.put_cost_center(cost_center.clone());
    Ok(cost_center)
}

pub(crate) fn delete(tables: &mut Tables, id: CostCenterId) -> Result<CostCenter> {
    if tables.cost_center(id).is_none() {
        return Err(LedgerError::not_found("cost center", id));
    }
    if tables.postings_with_cost_center(id).next().is_some() {
        return Err(LedgerError::ReferentialIntegrity(Errors::single(
            "postings",
            ErrorCode::RestrictDependentDestroy,
        )));
    }
    tables
        .remove_cost_center(id)
        .ok_or_else(|| LedgerError::not_found("cost center", id))
}
