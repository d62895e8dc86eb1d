//! Double-entry validation and the posting replacement protocol.
//!
//! Every journal write runs through [`apply`] inside a store transaction.
//! The function never commits on its own: it returns `Ok` with a persisted
//! outcome when the caller's transaction may commit, or an [`Abort`] that
//! makes the transaction roll back.
//!
//! Order of a write:
//!
//! 1. A journal that is already permanent rejects any change.
//! 2. Attribute changes are applied and the journal row is written.
//! 3. Posting specs are applied: blank specs are skipped, specs with an id
//!    update or remove that posting, specs without an id add one. Postings
//!    not mentioned stay.
//! 4. The double-entry invariant is checked on the resulting postings.
//! 5. Any recorded error rejects the write.

use std::collections::HashSet;

use kontor_common::{
    AccountId, CostCenterId, ErrorCode, Errors, JournalId, LedgerError, PostingId, BASE,
};
use rust_decimal::Decimal;

use crate::journal::{Journal, JournalOutcome, JournalState, JournalUpdate, NewJournal};
use crate::posting::{Posting, PostingSpec, PostingValue};
use crate::store::Tables;

/// Checks the double-entry invariant for one journal.
pub struct JournalValidator;

impl JournalValidator {
    /// At least two distinct accounts, and signed amounts summing to zero.
    /// Both conditions are always checked.
    pub fn check(postings: &[Posting]) -> Errors {
        let mut errors = Errors::new();

        let accounts: HashSet<AccountId> = postings.iter().map(|p| p.account_id).collect();
        if accounts.len() < 2 {
            errors.add(BASE, ErrorCode::AccountMissing);
        }

        let total: Decimal = postings.iter().map(|p| p.raw_amount).sum();
        if !total.is_zero() {
            errors.add(BASE, ErrorCode::AmountMismatch);
        }

        errors
    }

    /// Journal attribute rules: document number unique.
    pub fn check_journal(tables: &Tables, journal: &Journal) -> Errors {
        let mut errors = Errors::new();
        if let Some(number) = journal.number.as_deref() {
            if let Some(other) = tables.journal_by_number(number) {
                if other.id != journal.id {
                    errors.add("number", ErrorCode::Taken);
                }
            }
        }
        errors
    }

    /// Posting rules: amount set, account exists, cost center only on
    /// revenue or expense accounts.
    pub fn check_posting(
        tables: &Tables,
        account_id: Option<AccountId>,
        value: &PostingValue,
        cost_center_id: Option<CostCenterId>,
    ) -> Errors {
        let mut errors = Errors::new();

        if value.raw_amount().is_none() {
            errors.add("postings.amount", ErrorCode::Blank);
        }

        let account = account_id.and_then(|id| tables.account(id));
        if account.is_none() {
            errors.add("postings.account_id", ErrorCode::Blank);
        }

        if let Some(cost_center_id) = cost_center_id {
            if tables.cost_center(cost_center_id).is_none() {
                errors.add("postings.cost_center_id", ErrorCode::Blank);
            } else if account.map_or(false, |account| !account.is_profit_and_loss()) {
                errors.add(
                    "postings.cost_center_id",
                    ErrorCode::AllowedForExpenseOrRevenueOnly,
                );
            }
        }

        errors
    }
}

/// Journal a write applies to.
#[derive(Debug, Clone)]
pub(crate) enum JournalTarget {
    Draft(NewJournal),
    Persisted(JournalId),
}

/// Who is allowed to replace postings in a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Authority {
    /// Plain attribute update.
    Attributes,
    /// Posting replacement through `assign_postings`.
    AssignPostings,
}

/// Why a journal write did not commit.
#[derive(Debug)]
pub(crate) enum Abort {
    /// Recorded errors; the outcome goes back to the caller.
    Rejected(JournalOutcome),
    /// Raised error.
    Failed(LedgerError),
}

impl From<LedgerError> for Abort {
    fn from(err: LedgerError) -> Self {
        Abort::Failed(err)
    }
}

/// Run a journal write against `tables`.
pub(crate) fn apply(
    tables: &mut Tables,
    target: JournalTarget,
    mut update: JournalUpdate,
    authority: Authority,
) -> Result<JournalOutcome, Abort> {
    if update.postings.is_some() && authority != Authority::AssignPostings {
        return Err(Abort::Failed(LedgerError::InvalidArgument(
            "postings can only be replaced through assign_postings".to_string(),
        )));
    }

    let (mut journal, state) = match target {
        JournalTarget::Draft(new) => {
            let id = JournalId::new(tables.next_key());
            (new.build(id), JournalState::Draft)
        }
        JournalTarget::Persisted(id) => {
            let journal = tables
                .journal(id)
                .cloned()
                .ok_or_else(|| LedgerError::not_found("journal", id))?;
            (journal, JournalState::Persisted)
        }
    };

    let mut postings: Vec<Posting> = tables.postings_of_journal(journal.id).cloned().collect();

    if state == JournalState::Persisted && journal.permanent {
        return Err(reject(
            journal,
            postings,
            Errors::single(BASE, ErrorCode::ChangesNotAllowed),
            state,
        ));
    }

    update.apply_attributes(&mut journal);
    if state == JournalState::Persisted {
        journal.updated_at = chrono::Utc::now();
    }
    let mut errors = JournalValidator::check_journal(tables, &journal);
    tables.put_journal(journal.clone());

    if let Some(specs) = update.postings.take() {
        for spec in specs.into_iter().filter(|spec| !spec.is_blank()) {
            errors.extend(apply_spec(tables, journal.id, &mut postings, spec)?);
        }
        errors.extend(JournalValidator::check(&postings));
    }

    if !errors.is_empty() {
        return Err(reject(journal, postings, errors, state));
    }

    Ok(JournalOutcome::new(
        journal,
        postings,
        Errors::new(),
        JournalState::Persisted,
    ))
}

fn reject(journal: Journal, postings: Vec<Posting>, errors: Errors, from: JournalState) -> Abort {
    debug_assert!(from.can_transition_to(JournalState::Rejected));
    Abort::Rejected(JournalOutcome::new(
        journal,
        postings,
        errors,
        JournalState::Rejected,
    ))
}

/// Apply one [`PostingSpec`] onto the journal's postings. Valid postings are written
/// to `tables`; invalid ones only contribute errors.
fn apply_spec(
    tables: &mut Tables,
    journal_id: JournalId,
    postings: &mut Vec<Posting>,
    spec: PostingSpec,
) -> Result<Errors, LedgerError> {
    let (position, mut value, id) = match spec.id {
        Some(id) => {
            let position = postings
                .iter()
                .position(|posting| posting.id == id)
                .ok_or_else(|| LedgerError::not_found("posting", id))?;
            if spec.destroy {
                postings.remove(position);
                tables.remove_posting(id);
                return Ok(Errors::new());
            }
            (Some(position), postings[position].value(), id)
        }
        None if spec.destroy => return Ok(Errors::new()),
        None => (None, PostingValue::new(), PostingId::new(tables.next_key())),
    };

    spec.apply_value(&mut value)?;

    let existing = position.map(|position| &postings[position]);
    let account_id = spec.account_id.or(existing.map(|p| p.account_id));
    let cost_center_id = spec
        .cost_center_id
        .or(existing.and_then(|p| p.cost_center_id));
    let accountable = spec
        .accountable
        .or_else(|| existing.and_then(|p| p.accountable.clone()));

    let errors = JournalValidator::check_posting(tables, account_id, &value, cost_center_id);
    if !errors.is_empty() {
        return Ok(errors);
    }

    let (Some(account_id), Some(raw_amount)) = (account_id, value.raw_amount()) else {
        return Ok(errors);
    };
    let posting = Posting {
        id,
        journal_id,
        account_id,
        cost_center_id,
        accountable,
        raw_amount,
    };
    tables.put_posting(posting.clone());
    match position {
        Some(position) => postings[position] = posting,
        None => postings.push(posting),
    }
    Ok(errors)
}

/// Remove a journal and its postings unless it is permanent.
pub(crate) fn destroy(tables: &mut Tables, id: JournalId) -> Result<Journal, LedgerError> {
    let journal = tables
        .journal(id)
        .ok_or_else(|| LedgerError::not_found("journal", id))?;
    if journal.permanent {
        return Err(LedgerError::ReferentialIntegrity(Errors::single(
            BASE,
            ErrorCode::ChangesNotAllowed,
        )));
    }
    tables
        .remove_journal(id)
        .ok_or_else(|| LedgerError::not_found("journal", id))
}

/// Re-check every persisted journal. Returns offenders with their errors.
pub(crate) fn verify(tables: &Tables) -> Vec<(JournalId, Errors)> {
    tables
        .journals_by_date()
        .into_iter()
        .filter_map(|journal| {
            let postings: Vec<Posting> = tables.postings_of_journal(journal.id).cloned().collect();
            let errors = JournalValidator::check(&postings);
            (!errors.is_empty()).then_some((journal.id, errors))
        })
        .collect()
}
