//! Storage collaborator for the ledger.
//!
//! The ledger talks to its store through [`LedgerStore`]: shared read access
//! to the committed [`Tables`], and an exclusive transaction scope that
//! commits when the closure succeeds and rolls back when it fails.
//!
//! [`Tables`] is the relational view the domain operates on. It keeps the
//! primary tables keyed by store-assigned serial ids (insertion order) plus
//! the foreign-key indices the queries need: accounts by number, children
//! by parent, postings by journal and by account.

mod memory;

pub use memory::MemoryStore;

use std::collections::{BTreeMap, HashMap};

use kontor_common::{AccountId, CostCenterId, GroupId, JournalId, PostingId, TaxId};

use crate::account::Account;
use crate::cost_center::CostCenter;
use crate::group::Group;
use crate::journal::Journal;
use crate::posting::Posting;
use crate::tax::Tax;

/// Transactional store holding the ledger tables.
///
/// Implementations must serialize transactions against each other and must
/// never expose uncommitted writes to `read`.
pub trait LedgerStore: Send + Sync {
    /// Run `f` against the last committed state.
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T;

    /// Run `f` inside a transaction. Writes are committed if `f` returns
    /// `Ok` and discarded otherwise.
    fn transaction<T, E>(&self, f: impl FnOnce(&mut Tables) -> Result<T, E>) -> Result<T, E>;
}

/// Ledger tables and their indices.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    last_key: u64,
    accounts: BTreeMap<AccountId, Account>,
    account_numbers: BTreeMap<u32, AccountId>,
    children: HashMap<AccountId, Vec<AccountId>>,
    groups: BTreeMap<GroupId, Group>,
    taxes: BTreeMap<TaxId, Tax>,
    cost_centers: BTreeMap<CostCenterId, CostCenter>,
    journals: BTreeMap<JournalId, Journal>,
    postings: BTreeMap<PostingId, Posting>,
    postings_by_journal: HashMap<JournalId, Vec<PostingId>>,
    postings_by_account: HashMap<AccountId, Vec<PostingId>>,
}

impl Tables {
    /// Allocate the next serial key.
    pub fn next_key(&mut self) -> u64 {
        self.last_key += 1;
        self.last_key
    }

    // Accounts

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    pub fn account_by_number(&self, number: u32) -> Option<&Account> {
        self.account_numbers
            .get(&number)
            .and_then(|id| self.accounts.get(id))
    }

    /// All accounts ordered by number.
    pub fn accounts_by_number(&self) -> impl Iterator<Item = &Account> + '_ {
        self.account_numbers
            .values()
            .filter_map(|id| self.accounts.get(id))
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Direct children of an account, ordered by number.
    pub fn children_of(&self, id: AccountId) -> &[AccountId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Insert or replace an account, keeping the number and children
    /// indices in step.
    pub fn put_account(&mut self, account: Account) {
        if let Some(previous) = self.accounts.remove(&account.id) {
            self.unindex_account(&previous);
        }
        self.account_numbers.insert(account.number, account.id);
        if let Some(parent_id) = account.parent_id {
            let number = account.number;
            let accounts = &self.accounts;
            let siblings = self.children.entry(parent_id).or_default();
            let position = siblings
                .iter()
                .position(|sibling| {
                    accounts
                        .get(sibling)
                        .map_or(false, |s| s.number > number)
                })
                .unwrap_or(siblings.len());
            siblings.insert(position, account.id);
        }
        self.accounts.insert(account.id, account);
    }

    pub fn remove_account(&mut self, id: AccountId) -> Option<Account> {
        let account = self.accounts.remove(&id)?;
        self.unindex_account(&account);
        self.children.remove(&id);
        self.postings_by_account.remove(&id);
        Some(account)
    }

    fn unindex_account(&mut self, account: &Account) {
        if self.account_numbers.get(&account.number) == Some(&account.id) {
            self.account_numbers.remove(&account.number);
        }
        if let Some(parent_id) = account.parent_id {
            if let Some(siblings) = self.children.get_mut(&parent_id) {
                siblings.retain(|sibling| *sibling != account.id);
            }
        }
    }

    /// Accounts assigned to a group.
    pub fn accounts_in_group(&self, id: GroupId) -> impl Iterator<Item = &Account> + '_ {
        self.accounts_by_number()
            .filter(move |account| account.group_id == Some(id))
    }

    /// Accounts referencing a tax.
    pub fn accounts_with_tax(&self, id: TaxId) -> impl Iterator<Item = &Account> + '_ {
        self.accounts_by_number()
            .filter(move |account| account.tax_id == Some(id))
    }

    // Groups

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn put_group(&mut self, group: Group) {
        self.groups.insert(group.id, group);
    }

    pub fn remove_group(&mut self, id: GroupId) -> Option<Group> {
        self.groups.remove(&id)
    }

    // Taxes

    pub fn tax(&self, id: TaxId) -> Option<&Tax> {
        self.taxes.get(&id)
    }

    /// Taxes linked to an account as their booking account.
    pub fn taxes_for_account(&self, id: AccountId) -> impl Iterator<Item = &Tax> + '_ {
        self.taxes.values().filter(move |tax| tax.account_id == id)
    }

    pub fn put_tax(&mut self, tax: Tax) {
        self.taxes.insert(tax.id, tax);
    }

    pub fn remove_tax(&mut self, id: TaxId) -> Option<Tax> {
        self.taxes.remove(&id)
    }

    // Cost centers

    pub fn cost_center(&self, id: CostCenterId) -> Option<&CostCenter> {
        self.cost_centers.get(&id)
    }

    pub fn cost_center_by_number(&self, number: &str) -> Option<&CostCenter> {
        self.cost_centers.values().find(|cc| cc.number == number)
    }

    pub fn put_cost_center(&mut self, cost_center: CostCenter) {
        self.cost_centers.insert(cost_center.id, cost_center);
    }

    pub fn remove_cost_center(&mut self, id: CostCenterId) -> Option<CostCenter> {
        self.cost_centers.remove(&id)
    }

    /// Postings carrying a cost center.
    pub fn postings_with_cost_center(
        &self,
        id: CostCenterId,
    ) -> impl Iterator<Item = &Posting> + '_ {
        self.postings
            .values()
            .filter(move |posting| posting.cost_center_id == Some(id))
    }

    // Journals

    pub fn journal(&self, id: JournalId) -> Option<&Journal> {
        self.journals.get(&id)
    }

    pub fn journal_by_number(&self, number: &str) -> Option<&Journal> {
        self.journals
            .values()
            .find(|journal| journal.number.as_deref() == Some(number))
    }

    /// Journals ordered by date, then by id.
    pub fn journals_by_date(&self) -> Vec<&Journal> {
        let mut journals: Vec<&Journal> = self.journals.values().collect();
        journals.sort_by_key(|journal| (journal.date, journal.id));
        journals
    }

    pub fn put_journal(&mut self, journal: Journal) {
        self.journals.insert(journal.id, journal);
    }

    /// Remove a journal together with its postings.
    pub fn remove_journal(&mut self, id: JournalId) -> Option<Journal> {
        let journal = self.journals.remove(&id)?;
        for posting_id in self.postings_by_journal.remove(&id).unwrap_or_default() {
            self.remove_posting(posting_id);
        }
        Some(journal)
    }

    // Postings

    pub fn posting(&self, id: PostingId) -> Option<&Posting> {
        self.postings.get(&id)
    }

    /// Postings of a journal in insertion order.
    pub fn postings_of_journal(&self, id: JournalId) -> impl Iterator<Item = &Posting> + '_ {
        self.postings_by_journal
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|posting_id| self.postings.get(posting_id))
    }

    /// Postings booked directly on an account, in insertion order.
    pub fn postings_of_account(&self, id: AccountId) -> impl Iterator<Item = &Posting> + '_ {
        self.postings_by_account
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|posting_id| self.postings.get(posting_id))
    }

    pub fn has_postings_on(&self, id: AccountId) -> bool {
        self.postings_by_account
            .get(&id)
            .map_or(false, |postings| !postings.is_empty())
    }

    /// Insert or replace a posting, keeping the journal and account indices
    /// in step. A replaced posting keeps its position within the journal.
    pub fn put_posting(&mut self, posting: Posting) {
        match self.postings.insert(posting.id, posting.clone()) {
            Some(previous) => {
                if previous.account_id != posting.account_id {
                    if let Some(ids) = self.postings_by_account.get_mut(&previous.account_id) {
                        ids.retain(|id| *id != posting.id);
                    }
                    self.postings_by_account
                        .entry(posting.account_id)
                        .or_default()
                        .push(posting.id);
                }
            }
            None => {
                self.postings_by_journal
                    .entry(posting.journal_id)
                    .or_default()
                    .push(posting.id);
                self.postings_by_account
                    .entry(posting.account_id)
                    .or_default()
                    .push(posting.id);
            }
        }
    }

    pub fn remove_posting(&mut self, id: PostingId) -> Option<Posting> {
        let posting = self.postings.remove(&id)?;
        if let Some(ids) = self.postings_by_journal.get_mut(&posting.journal_id) {
            ids.retain(|posting_id| *posting_id != id);
        }
        if let Some(ids) = self.postings_by_account.get_mut(&posting.account_id) {
            ids.retain(|posting_id| *posting_id != id);
        }
        Some(posting)
    }

    pub fn posting_count(&self) -> usize {
        self.postings.len()
    }
}
