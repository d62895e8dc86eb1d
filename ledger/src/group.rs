//! Statutory account groups.
//!
//! Groups classify accounts for balance sheet and profit and loss layout.
//! Only the attributes needed to check account placement live here.

use kontor_common::{ErrorCode, Errors, GroupId, LedgerError, Result, BASE};
use serde::{Deserialize, Serialize};

use crate::store::Tables;

/// Statement a group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupTarget {
    Asset,
    Liability,
    ProfitAndLoss,
}

/// A statutory group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Store-assigned identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Statement the group belongs to.
    pub target: GroupTarget,
    /// Holds the annual result. Never assigned to accounts directly.
    pub is_result: bool,
}

impl Group {
    pub fn validate(&self) -> Errors {
        let mut errors = Errors::new();
        if self.name.trim().is_empty() {
            errors.add("name", ErrorCode::Blank);
        }
        if self.is_result && self.target != GroupTarget::Liability {
            errors.add(BASE, ErrorCode::LiabilityNeededForResult);
        }
        errors
    }
}

/// Attributes for a new group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub target: GroupTarget,
    pub is_result: bool,
}

impl NewGroup {
    pub fn new(name: impl Into<String>, target: GroupTarget) -> Self {
        Self {
            name: name.into(),
            target,
            is_result: false,
        }
    }

    pub fn result(mut self) -> Self {
        self.is_result = true;
        self
    }
}

pub(crate) fn create(tables: &mut Tables, new: NewGroup) -> Result<Group> {
    let group = Group {
        id: GroupId::new(tables.next_key()),
        name: new.name,
        target: new.target,
        is_result: new.is_result,
    };
    group.validate().into_result(LedgerError::Validation)?;
    tables.put_group(group.clone());
    Ok(group)
}

pub(crate) fn delete(tables: &mut Tables, id: GroupId) -> Result<Group> {
    if tables.group(id).is_none() {
        return Err(LedgerError::not_found("group", id));
    }
    if tables.accounts_in_group(id).next().is_some() {
        return Err(LedgerError::ReferentialIntegrity(Errors::single(
            "accounts",
            ErrorCode::RestrictDependentDestroy,
        )));
    }
    tables
        .remove_group(id)
        .ok_or_else(|| LedgerError::not_found("group", id))
}
