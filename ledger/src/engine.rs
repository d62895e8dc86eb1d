//! Ledger facade.

use std::sync::Arc;

use kontor_common::{
    AccountId, BalanceOptions, CostCenterId, DateFilter, Errors, GroupId, JournalId, LedgerError,
    Result, TaxId,
};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::account::{Account, AccountChanges, NewAccount};
use crate::balance::{AccountSum, BalanceAggregator};
use crate::cost_center::{self, CostCenter, NewCostCenter};
use crate::group::{self, Group, NewGroup};
use crate::journal::{
    Journal, JournalEntry, JournalOutcome, JournalUpdate, NewJournal, PostingLine,
};
use crate::posting::{Posting, PostingSpec};
use crate::store::{LedgerStore, MemoryStore};
use crate::tax::{self, NewTax, Tax, TaxChanges};
use crate::tree::{self, AccountTree};
use crate::validator::{self, Abort, Authority, JournalTarget};

/// Entry point for all ledger reads and writes.
///
/// Every write runs in one store transaction and either commits completely
/// or leaves the committed state untouched.
pub struct Ledger<S: LedgerStore = MemoryStore> {
    store: Arc<S>,
}

impl Ledger<MemoryStore> {
    /// Ledger over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

impl Default for Ledger<MemoryStore> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S: LedgerStore> Clone for Ledger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LedgerStore> Ledger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // Accounts

    #[instrument(skip(self, new), fields(number = ?new.number))]
    pub fn create_account(&self, new: NewAccount) -> Result<Account> {
        let account = self.store.transaction(|tables| tree::create(tables, new))?;
        info!(account_id = %account.id, account = %account, "Account created");
        Ok(account)
    }

    #[instrument(skip(self, changes))]
    pub fn update_account(&self, id: AccountId, changes: AccountChanges) -> Result<Account> {
        let account = self
            .store
            .transaction(|tables| tree::update(tables, id, changes))?;
        info!(account_id = %account.id, account = %account, "Account updated");
        Ok(account)
    }

    #[instrument(skip(self))]
    pub fn delete_account(&self, id: AccountId) -> Result<Account> {
        let account = self
            .store
            .transaction(|tables| tree::delete(tables, id))
            .map_err(|err| {
                warn!(account_id = %id, error = %err, "Account deletion refused");
                err
            })?;
        info!(account_id = %id, "Account deleted");
        Ok(account)
    }

    pub fn account(&self, id: AccountId) -> Result<Account> {
        self.store.read(|tables| {
            tables
                .account(id)
                .cloned()
                .ok_or_else(|| LedgerError::not_found("account", id))
        })
    }

    pub fn account_by_number(&self, number: u32) -> Result<Account> {
        self.store.read(|tables| {
            tables
                .account_by_number(number)
                .cloned()
                .ok_or_else(|| LedgerError::not_found("account", number))
        })
    }

    /// All accounts ordered by number.
    pub fn accounts(&self) -> Vec<Account> {
        self.store
            .read(|tables| tables.accounts_by_number().cloned().collect())
    }

    /// The account followed by its subtree in pre-order.
    pub fn descendants(&self, id: AccountId) -> Result<Vec<Account>> {
        self.store.read(|tables| {
            if tables.account(id).is_none() {
                return Err(LedgerError::not_found("account", id));
            }
            Ok(AccountTree::new(tables).descendants(id).cloned().collect())
        })
    }

    /// Parent chain up to the root.
    pub fn ancestors(&self, id: AccountId) -> Result<Vec<Account>> {
        self.store.read(|tables| {
            if tables.account(id).is_none() {
                return Err(LedgerError::not_found("account", id));
            }
            Ok(AccountTree::new(tables).ancestors(id).cloned().collect())
        })
    }

    /// Postings booked on the account or anywhere in its subtree.
    pub fn account_postings(&self, id: AccountId) -> Result<Vec<Posting>> {
        self.store.read(|tables| {
            if tables.account(id).is_none() {
                return Err(LedgerError::not_found("account", id));
            }
            Ok(AccountTree::new(tables)
                .descendants(id)
                .flat_map(|account| tables.postings_of_account(account.id).cloned())
                .collect())
        })
    }

    // Groups, taxes, cost centers

    #[instrument(skip(self, new), fields(name = %new.name))]
    pub fn create_group(&self, new: NewGroup) -> Result<Group> {
        let group = self.store.transaction(|tables| group::create(tables, new))?;
        info!(group_id = %group.id, "Group created");
        Ok(group)
    }

    #[instrument(skip(self))]
    pub fn delete_group(&self, id: GroupId) -> Result<Group> {
        let group = self.store.transaction(|tables| group::delete(tables, id))?;
        info!(group_id = %id, "Group deleted");
        Ok(group)
    }

    pub fn group(&self, id: GroupId) -> Result<Group> {
        self.store.read(|tables| {
            tables
                .group(id)
                .cloned()
                .ok_or_else(|| LedgerError::not_found("group", id))
        })
    }

    #[instrument(skip(self, new), fields(name = %new.name))]
    pub fn create_tax(&self, new: NewTax) -> Result<Tax> {
        let tax = self.store.transaction(|tables| tax::create(tables, new))?;
        info!(tax_id = %tax.id, "Tax created");
        Ok(tax)
    }

    #[instrument(skip(self, changes))]
    pub fn update_tax(&self, id: TaxId, changes: TaxChanges) -> Result<Tax> {
        let tax = self
            .store
            .transaction(|tables| tax::update(tables, id, changes))?;
        info!(tax_id = %id, "Tax updated");
        Ok(tax)
    }

    #[instrument(skip(self))]
    pub fn delete_tax(&self, id: TaxId) -> Result<Tax> {
        let tax = self.store.transaction(|tables| tax::delete(tables, id))?;
        info!(tax_id = %id, "Tax deleted");
        Ok(tax)
    }

    pub fn tax(&self, id: TaxId) -> Result<Tax> {
        self.store.read(|tables| {
            tables
                .tax(id)
                .cloned()
                .ok_or_else(|| LedgerError::not_found("tax", id))
        })
    }

    #[instrument(skip(self, new), fields(number = %new.number))]
    pub fn create_cost_center(&self, new: NewCostCenter) -> Result<CostCenter> {
        let cost_center = self
            .store
            .transaction(|tables| cost_center::create(tables, new))?;
        info!(cost_center_id = %cost_center.id, "Cost center created");
        Ok(cost_center)
    }

    #[instrument(skip(self))]
    pub fn delete_cost_center(&self, id: CostCenterId) -> Result<CostCenter> {
        let cost_center = self
            .store
            .transaction(|tables| cost_center::delete(tables, id))?;
        info!(cost_center_id = %id, "Cost center deleted");
        Ok(cost_center)
    }

    pub fn cost_center(&self, id: CostCenterId) -> Result<CostCenter> {
        self.store.read(|tables| {
            tables
                .cost_center(id)
                .cloned()
                .ok_or_else(|| LedgerError::not_found("cost center", id))
        })
    }

    // Journals

    /// Create a journal together with its postings.
    ///
    /// A rejected journal is not an `Err`: the returned outcome carries the
    /// errors and nothing was stored.
    #[instrument(skip(self, new, postings), fields(postings = postings.len()))]
    pub fn create_journal(
        &self,
        new: NewJournal,
        postings: Vec<PostingSpec>,
    ) -> Result<JournalOutcome> {
        let update = JournalUpdate {
            postings: Some(postings),
            ..JournalUpdate::default()
        };
        self.write_journal(JournalTarget::Draft(new), update, Authority::AssignPostings)
    }

    /// Replace postings of a persisted journal and re-validate it as a
    /// whole. Either every change commits or none does.
    #[instrument(skip(self, postings), fields(postings = postings.len()))]
    pub fn assign_postings(
        &self,
        id: JournalId,
        postings: Vec<PostingSpec>,
    ) -> Result<JournalOutcome> {
        let update = JournalUpdate {
            postings: Some(postings),
            ..JournalUpdate::default()
        };
        self.write_journal(JournalTarget::Persisted(id), update, Authority::AssignPostings)
    }

    /// Change journal attributes. Postings cannot be changed this way.
    #[instrument(skip(self, update))]
    pub fn update_journal(&self, id: JournalId, update: JournalUpdate) -> Result<JournalOutcome> {
        self.write_journal(JournalTarget::Persisted(id), update, Authority::Attributes)
    }

    fn write_journal(
        &self,
        target: JournalTarget,
        update: JournalUpdate,
        authority: Authority,
    ) -> Result<JournalOutcome> {
        let result = self
            .store
            .transaction(|tables| validator::apply(tables, target, update, authority));

        match result {
            Ok(outcome) => {
                info!(
                    journal_id = %outcome.journal().id,
                    postings = outcome.postings().len(),
                    amount = %outcome.amount(),
                    "Journal saved"
                );
                Ok(outcome)
            }
            Err(Abort::Rejected(outcome)) => {
                warn!(errors = %outcome.errors(), "Journal rejected");
                Ok(outcome)
            }
            Err(Abort::Failed(err)) => Err(err),
        }
    }

    /// Delete a journal and its postings. Permanent journals are refused.
    #[instrument(skip(self))]
    pub fn destroy_journal(&self, id: JournalId) -> Result<Journal> {
        let journal = self
            .store
            .transaction(|tables| validator::destroy(tables, id))
            .map_err(|err| {
                warn!(journal_id = %id, error = %err, "Journal deletion refused");
                err
            })?;
        info!(journal_id = %id, "Journal destroyed");
        Ok(journal)
    }

    pub fn journal(&self, id: JournalId) -> Result<Journal> {
        self.store.read(|tables| {
            tables
                .journal(id)
                .cloned()
                .ok_or_else(|| LedgerError::not_found("journal", id))
        })
    }

    pub fn journal_postings(&self, id: JournalId) -> Result<Vec<Posting>> {
        self.store.read(|tables| {
            if tables.journal(id).is_none() {
                return Err(LedgerError::not_found("journal", id));
            }
            Ok(tables.postings_of_journal(id).cloned().collect())
        })
    }

    /// Journals ordered by date, then id.
    pub fn journals(&self) -> Vec<Journal> {
        self.store
            .read(|tables| tables.journals_by_date().into_iter().cloned().collect())
    }

    /// Journals passing `filter`, joined with their posting lines, ordered
    /// by date, then id.
    pub fn journal_entries(&self, filter: &DateFilter) -> Vec<JournalEntry> {
        self.store.read(|tables| {
            tables
                .journals_by_date()
                .into_iter()
                .filter(|journal| filter.matches(journal.date))
                .map(|journal| JournalEntry {
                    journal: journal.clone(),
                    lines: tables
                        .postings_of_journal(journal.id)
                        .filter_map(|posting| {
                            let account = tables.account(posting.account_id)?;
                            Some(PostingLine {
                                posting: posting.clone(),
                                account: account.clone(),
                                cost_center: posting
                                    .cost_center_id
                                    .and_then(|id| tables.cost_center(id))
                                    .cloned(),
                            })
                        })
                        .collect(),
                })
                .collect()
        })
    }

    /// Re-check every persisted journal against the double-entry invariant.
    #[instrument(skip(self))]
    pub fn verify_integrity(&self) -> Vec<(JournalId, Errors)> {
        let offenders = self.store.read(validator::verify);
        if offenders.is_empty() {
            info!("Ledger integrity verified");
        } else {
            warn!(offenders = offenders.len(), "Unbalanced journals found");
        }
        offenders
    }

    // Balances

    /// Signed sum of the account and its subtree.
    pub fn balance(&self, id: AccountId, options: &BalanceOptions) -> Result<Decimal> {
        self.store
            .read(|tables| BalanceAggregator::new(tables).balance(id, options))
    }

    /// Every account with the sum of its own postings, ordered by number.
    pub fn with_sums(&self, options: &BalanceOptions) -> Vec<AccountSum> {
        self.store
            .read(|tables| BalanceAggregator::new(tables).with_sums(options))
    }

    /// Root accounts with their whole subtree folded in.
    pub fn merged_with_sums(&self, options: &BalanceOptions) -> Result<Vec<AccountSum>> {
        self.store
            .read(|tables| BalanceAggregator::new(tables).merged_with_sums(options))
    }
}
