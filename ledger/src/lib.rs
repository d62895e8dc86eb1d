//! Kontor Ledger Engine
//!
//! Double-entry ledger core: a hierarchical chart of accounts, journals
//! whose postings must balance, balances over date ranges and account
//! subtrees, all behind a transactional store.

pub mod store;
pub mod account;
pub mod tree;
pub mod group;
pub mod tax;
pub mod cost_center;
pub mod posting;
pub mod journal;
pub mod validator;
pub mod balance;
pub mod engine;

pub use engine::Ledger;
pub use store::{LedgerStore, MemoryStore, Tables};
pub use account::{Account, AccountChanges, AccountKind, NewAccount};
pub use tree::AccountTree;
pub use group::{Group, GroupTarget, NewGroup};
pub use tax::{NewTax, Tax, TaxChanges};
pub use cost_center::{CostCenter, NewCostCenter};
pub use posting::{Posting, PostingSpec, PostingValue};
pub use journal::{
    Journal, JournalEntry, JournalOutcome, JournalState, JournalUpdate, NewJournal, PostingLine,
};
pub use validator::JournalValidator;
pub use balance::{merge_child_sums, AccountSum, BalanceAggregator};
