//! Account tree traversal and structural maintenance.
//!
//! The tree is stored as a parent id on each account plus the store's
//! parent → children index. Traversals borrow the tables and are lazy:
//! creating one does no work until it is iterated, and every call starts
//! a fresh walk.

use chrono::Utc;
use kontor_common::{AccountId, ErrorCode, Errors, LedgerError, Result};

use crate::account::{Account, AccountChanges, NewAccount};
use crate::store::Tables;

/// Read-only view over the account hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct AccountTree<'a> {
    tables: &'a Tables,
}

impl<'a> AccountTree<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        Self { tables }
    }

    /// Pre-order walk of the subtree rooted at `root`, root first. Siblings
    /// are visited in ascending number. Empty if `root` does not exist.
    pub fn descendants(&self, root: AccountId) -> Descendants<'a> {
        let stack = if self.tables.account(root).is_some() {
            vec![root]
        } else {
            Vec::new()
        };
        Descendants {
            tables: self.tables,
            stack,
        }
    }

    /// Walk from the parent of `id` up to the root.
    pub fn ancestors(&self, id: AccountId) -> Ancestors<'a> {
        Ancestors {
            tables: self.tables,
            next: self.tables.account(id).and_then(|account| account.parent_id),
            remaining: self.tables.account_count(),
        }
    }

    /// Distance from the root; roots have depth zero.
    pub fn depth(&self, id: AccountId) -> usize {
        self.ancestors(id).count()
    }

    /// Accounts without a parent, ordered by number.
    pub fn roots(&self) -> impl Iterator<Item = &'a Account> + 'a {
        self.tables
            .accounts_by_number()
            .filter(|account| account.parent_id.is_none())
    }
}

/// Lazy pre-order subtree iterator.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    tables: &'a Tables,
    stack: Vec<AccountId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Account;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(account) = self.tables.account(id) {
                self.stack
                    .extend(self.tables.children_of(id).iter().rev().copied());
                return Some(account);
            }
        }
        None
    }
}

/// Lazy parent chain iterator.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    tables: &'a Tables,
    next: Option<AccountId>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Account;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let account = self.tables.account(self.next?)?;
        self.remaining -= 1;
        self.next = account.parent_id;
        Some(account)
    }
}

pub(crate) fn create(tables: &mut Tables, new: NewAccount) -> Result<Account> {
    let Some(number) = new.number else {
        let mut errors = Errors::single("number", ErrorCode::Blank);
        if new.name.trim().is_empty() {
            errors.add("name", ErrorCode::Blank);
        }
        return Err(LedgerError::Validation(errors));
    };

    let now = Utc::now();
    let account = Account {
        id: AccountId::new(tables.next_key()),
        number,
        name: new.name,
        kind: new.kind,
        parent_id: new.parent_id,
        group_id: new.group_id,
        tax_id: new.tax_id,
        accountable: new.accountable,
        created_at: now,
        updated_at: now,
    };
    account
        .validate(tables)
        .into_result(LedgerError::Validation)?;
    tables.put_account(account.clone());
    Ok(account)
}

pub(crate) fn update(tables: &mut Tables, id: AccountId, changes: AccountChanges) -> Result<Account> {
    let current = tables
        .account(id)
        .ok_or_else(|| LedgerError::not_found("account", id))?;
    let mut account = changes.apply_to(current);
    account.updated_at = Utc::now();
    account
        .validate(tables)
        .into_result(LedgerError::Validation)?;
    tables.put_account(account.clone());
    Ok(account)
}

pub(crate) fn delete(tables: &mut Tables, id: AccountId) -> Result<Account> {
    if tables.account(id).is_none() {
        return Err(LedgerError::not_found("account", id));
    }

    let mut errors = Errors::new();
    if tables.has_postings_on(id) {
        errors.add("postings", ErrorCode::RestrictDependentDestroy);
    }
    if tables.taxes_for_account(id).next().is_some() {
        errors.add("taxes", ErrorCode::RestrictDependentDestroy);
    }
    if !tables.children_of(id).is_empty() {
        errors.add("children", ErrorCode::RestrictDependentDestroy);
    }
    errors.into_result(LedgerError::ReferentialIntegrity)?;

    tables
        .remove_account(id)
        .ok_or_else(|| LedgerError::not_found("account", id))
}
