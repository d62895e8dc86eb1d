//! Account definitions for ledger.

use std::fmt;

use chrono::{DateTime, Utc};
use kontor_common::{AccountId, AccountableRef, ErrorCode, Errors, GroupId, TaxId};
use serde::{Deserialize, Serialize};

use crate::group::GroupTarget;
use crate::store::Tables;
use crate::tree::AccountTree;

/// Kind of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Balance sheet asset.
    #[default]
    Asset,
    /// Balance sheet liability.
    Liability,
    /// Profit and loss revenue.
    Revenue,
    /// Profit and loss expense.
    Expense,
    /// Carry-forward account for opening balances.
    Forward,
    /// Customer (personal) account.
    Debtor,
    /// Supplier (personal) account.
    Creditor,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Asset => "asset",
            AccountKind::Liability => "liability",
            AccountKind::Revenue => "revenue",
            AccountKind::Expense => "expense",
            AccountKind::Forward => "forward",
            AccountKind::Debtor => "debtor",
            AccountKind::Creditor => "creditor",
        }
    }

    /// Revenue or expense.
    pub fn is_profit_and_loss(&self) -> bool {
        matches!(self, AccountKind::Revenue | AccountKind::Expense)
    }

    /// Debtor or creditor.
    pub fn is_contact(&self) -> bool {
        matches!(self, AccountKind::Debtor | AccountKind::Creditor)
    }

    /// Group target an account of this kind may be assigned to, if any.
    pub fn group_target(&self) -> Option<GroupTarget> {
        match self {
            AccountKind::Asset => Some(GroupTarget::Asset),
            AccountKind::Liability => Some(GroupTarget::Liability),
            AccountKind::Revenue | AccountKind::Expense => Some(GroupTarget::ProfitAndLoss),
            AccountKind::Forward | AccountKind::Debtor | AccountKind::Creditor => None,
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ledger account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier.
    pub id: AccountId,
    /// Account number, unique across the chart.
    pub number: u32,
    /// Account name.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Parent account.
    pub parent_id: Option<AccountId>,
    /// Statutory group.
    pub group_id: Option<GroupId>,
    /// Tax booked through this account.
    pub tax_id: Option<TaxId>,
    /// Linked business record.
    pub accountable: Option<AccountableRef>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Number left-padded to four digits.
    pub fn number_as_string(&self) -> String {
        format!("{:04}", self.number)
    }

    pub fn is_profit_and_loss(&self) -> bool {
        self.kind.is_profit_and_loss()
    }

    pub fn is_contact(&self) -> bool {
        self.kind.is_contact()
    }

    /// Check this account against the current tables.
    pub fn validate(&self, tables: &Tables) -> Errors {
        let mut errors = Errors::new();

        if self.name.trim().is_empty() {
            errors.add("name", ErrorCode::Blank);
        }

        if let Some(other) = tables.account_by_number(self.number) {
            if other.id != self.id {
                errors.add("number", ErrorCode::Taken);
            }
        }

        if let Some(parent_id) = self.parent_id {
            if tables.account(parent_id).is_none() {
                errors.add("parent_id", ErrorCode::Blank);
            } else if parent_id == self.id
                || AccountTree::new(tables)
                    .descendants(self.id)
                    .any(|account| account.id == parent_id)
            {
                errors.add("parent_id", ErrorCode::Cycle);
            }
        }

        if let Some(group_id) = self.group_id {
            match tables.group(group_id) {
                None => errors.add("group_id", ErrorCode::Blank),
                Some(group) => {
                    match self.kind.group_target() {
                        Some(target) if target == group.target => {}
                        Some(_) => errors.add("kind", ErrorCode::GroupMismatch),
                        None => errors.add("kind", ErrorCode::GroupConflict),
                    }
                    if group.is_result {
                        errors.add("group_id", ErrorCode::NoGroupAllowedForResult);
                    }
                }
            }
        }

        if let Some(tax_id) = self.tax_id {
            match tables.tax(tax_id) {
                None => errors.add("tax_id", ErrorCode::Blank),
                Some(tax) if tax.account_id == self.id => {
                    errors.add("tax_id", ErrorCode::CircularReference)
                }
                Some(_) => {}
            }
        }

        // Stored postings keep their cost center when the kind changes
        if !self.kind.is_profit_and_loss()
            && tables
                .postings_of_account(self.id)
                .any(|posting| posting.cost_center_id.is_some())
        {
            errors.add("kind", ErrorCode::AllowedForExpenseOrRevenueOnly);
        }

        errors
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number_as_string(), self.name)
    }
}

/// Attributes for a new account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub number: Option<u32>,
    pub name: String,
    pub kind: AccountKind,
    pub parent_id: Option<AccountId>,
    pub group_id: Option<GroupId>,
    pub tax_id: Option<TaxId>,
    pub accountable: Option<AccountableRef>,
}

impl NewAccount {
    pub fn new(number: u32, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            number: Some(number),
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_tax(mut self, tax_id: TaxId) -> Self {
        self.tax_id = Some(tax_id);
        self
    }

    pub fn with_accountable(mut self, accountable: AccountableRef) -> Self {
        self.accountable = Some(accountable);
        self
    }
}

/// Changes to an existing account. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountChanges {
    pub number: Option<u32>,
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub parent_id: Option<Option<AccountId>>,
    pub group_id: Option<Option<GroupId>>,
    pub tax_id: Option<Option<TaxId>>,
    pub accountable: Option<Option<AccountableRef>>,
}

impl AccountChanges {
    /// Apply the changes onto a copy of `account`.
    pub fn apply_to(self, account: &Account) -> Account {
        let mut changed = account.clone();
        if let Some(number) = self.number {
            changed.number = number;
        }
        if let Some(name) = self.name {
            changed.name = name;
        }
        if let Some(kind) = self.kind {
            changed.kind = kind;
        }
        if let Some(parent_id) = self.parent_id {
            changed.parent_id = parent_id;
        }
        if let Some(group_id) = self.group_id {
            changed.group_id = group_id;
        }
        if let Some(tax_id) = self.tax_id {
            changed.tax_id = tax_id;
        }
        if let Some(accountable) = self.accountable {
            changed.accountable = accountable;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(number: u32, name: &str) -> Account {
        let now = Utc::now();
        Account {
            id: AccountId::new(1),
            number,
            name: name.to_string(),
            kind: AccountKind::Asset,
            parent_id: None,
            group_id: None,
            tax_id: None,
            accountable: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_number_as_string() {
        assert_eq!(account(999, "Foo").number_as_string(), "0999");
        assert_eq!(account(70000, "Foo").number_as_string(), "70000");
    }

    #[test]
    fn test_display() {
        assert_eq!(account(27, "Software").to_string(), "0027 (Software)");
    }

    #[test]
    fn test_kind_taxonomy() {
        assert!(AccountKind::Revenue.is_profit_and_loss());
        assert!(AccountKind::Expense.is_profit_and_loss());
        assert!(!AccountKind::Asset.is_profit_and_loss());
        assert!(AccountKind::Debtor.is_contact());
        assert!(AccountKind::Creditor.is_contact());
        assert_eq!(AccountKind::Forward.group_target(), None);
        assert_eq!(AccountKind::Expense.group_target(), Some(GroupTarget::ProfitAndLoss));
    }

    #[test]
    fn test_changes_apply() {
        let original = account(1000, "Kasse");
        let changed = AccountChanges {
            name: Some("Bank".to_string()),
            parent_id: Some(Some(AccountId::new(9))),
            ..Default::default()
        }
        .apply_to(&original);

        assert_eq!(changed.name, "Bank");
        assert_eq!(changed.number, 1000);
        assert_eq!(changed.parent_id, Some(AccountId::new(9)));
    }

    #[test]
    fn test_validate_blank_name_and_unknown_refs() {
        let tables = Tables::default();
        let mut candidate = account(1000, "  ");
        candidate.parent_id = Some(AccountId::new(7));
        candidate.group_id = Some(GroupId::new(8));
        candidate.tax_id = Some(TaxId::new(9));

        let errors = candidate.validate(&tables);
        assert!(errors.added("name", ErrorCode::Blank));
        assert!(errors.added("parent_id", ErrorCode::Blank));
        assert!(errors.added("group_id", ErrorCode::Blank));
        assert!(errors.added("tax_id", ErrorCode::Blank));
    }
}
