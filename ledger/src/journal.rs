//! Journal types for double-entry bookkeeping.

use chrono::{DateTime, Local, NaiveDate, Utc};
use kontor_common::{AccountableRef, ErrorCode, Errors, JournalId, LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::cost_center::CostCenter;
use crate::posting::{Posting, PostingSpec};

/// A journal: one business transaction made of balanced postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    /// Store-assigned identifier.
    pub id: JournalId,
    /// Document number, unique when present.
    pub number: Option<String>,
    /// Booking text.
    pub subject: Option<String>,
    /// Booking date.
    pub date: NaiveDate,
    /// Locked against any further change.
    pub permanent: bool,
    /// Free-form note.
    pub note: Option<String>,
    /// Linked business record.
    pub accountable: Option<AccountableRef>,
    /// When the journal was created.
    pub created_at: DateTime<Utc>,
    /// When the journal was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Attributes for a new journal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewJournal {
    pub number: Option<String>,
    pub subject: Option<String>,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub permanent: bool,
    pub note: Option<String>,
    pub accountable: Option<AccountableRef>,
}

impl NewJournal {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn permanent(mut self) -> Self {
        self.permanent = true;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_accountable(mut self, accountable: AccountableRef) -> Self {
        self.accountable = Some(accountable);
        self
    }

    pub(crate) fn build(self, id: JournalId) -> Journal {
        let now = Utc::now();
        Journal {
            id,
            number: present(self.number),
            subject: self.subject,
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            permanent: self.permanent,
            note: self.note,
            accountable: self.accountable,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changes to an existing journal. `None` leaves a field untouched.
///
/// `postings` is only honored through `assign_postings`; a plain update
/// carrying it is refused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalUpdate {
    pub number: Option<Option<String>>,
    pub subject: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    pub permanent: Option<bool>,
    pub note: Option<Option<String>>,
    pub accountable: Option<Option<AccountableRef>>,
    pub postings: Option<Vec<PostingSpec>>,
}

impl JournalUpdate {
    pub fn subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(Some(subject.into())),
            ..Self::default()
        }
    }

    pub fn permanent(permanent: bool) -> Self {
        Self {
            permanent: Some(permanent),
            ..Self::default()
        }
    }

    /// Apply attribute changes to `journal`. Postings are left alone.
    pub(crate) fn apply_attributes(&mut self, journal: &mut Journal) {
        if let Some(number) = self.number.take() {
            journal.number = present(number);
        }
        if let Some(subject) = self.subject.take() {
            journal.subject = subject;
        }
        if let Some(date) = self.date.take() {
            journal.date = date;
        }
        if let Some(permanent) = self.permanent.take() {
            journal.permanent = permanent;
        }
        if let Some(note) = self.note.take() {
            journal.note = note;
        }
        if let Some(accountable) = self.accountable.take() {
            journal.accountable = accountable;
        }
    }
}

/// Blank journal numbers are stored as no number.
fn present(number: Option<String>) -> Option<String> {
    number.filter(|number| !number.trim().is_empty())
}

/// Lifecycle of a journal write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JournalState {
    /// Not yet persisted.
    Draft,
    /// Committed and valid.
    Persisted,
    /// Rejected; the write was rolled back and the outcome is final.
    Rejected,
}

impl JournalState {
    /// Get valid next states from this state.
    pub fn valid_transitions(&self) -> &'static [JournalState] {
        match self {
            JournalState::Draft => &[JournalState::Persisted, JournalState::Rejected],
            JournalState::Persisted => &[JournalState::Persisted, JournalState::Rejected],
            JournalState::Rejected => &[],
        }
    }

    /// Check if transition to target state is valid.
    pub fn can_transition_to(&self, target: JournalState) -> bool {
        self.valid_transitions().contains(&target)
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

/// Result of a journal write.
///
/// Holds the journal and postings as they were when the write finished. A
/// rejected outcome keeps the attempted state and the errors, independent
/// of the rolled-back store; for a rejected new journal the id was never
/// allocated.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalOutcome {
    journal: Journal,
    postings: Vec<Posting>,
    errors: Errors,
    state: JournalState,
}

impl JournalOutcome {
    pub(crate) fn new(
        journal: Journal,
        postings: Vec<Posting>,
        errors: Errors,
        state: JournalState,
    ) -> Self {
        Self {
            journal,
            postings,
            errors,
            state,
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn state(&self) -> JournalState {
        self.state
    }

    pub fn is_valid(&self) -> bool {
        self.state == JournalState::Persisted && self.errors.is_empty()
    }

    pub fn is_rejected(&self) -> bool {
        self.state == JournalState::Rejected
    }

    pub fn debit_postings(&self) -> impl Iterator<Item = &Posting> {
        debit_postings(&self.postings)
    }

    pub fn credit_postings(&self) -> impl Iterator<Item = &Posting> {
        credit_postings(&self.postings)
    }

    /// Total of the debit side.
    pub fn amount(&self) -> Decimal {
        amount(&self.postings)
    }

    /// Turn a rejected outcome into the matching error.
    pub fn into_result(self) -> Result<Self> {
        if self.is_valid() {
            return Ok(self);
        }
        let errors = self.errors;
        if errors.has_code(ErrorCode::ChangesNotAllowed) {
            Err(LedgerError::ReferentialIntegrity(errors))
        } else if errors.has_code(ErrorCode::AccountMissing)
            || errors.has_code(ErrorCode::AmountMismatch)
        {
            Err(LedgerError::InvariantViolation(errors))
        } else {
            Err(LedgerError::Validation(errors))
        }
    }
}

/// Postings with a non-negative signed amount.
pub fn debit_postings(postings: &[Posting]) -> impl Iterator<Item = &Posting> {
    postings.iter().filter(|posting| posting.is_debit())
}

/// Postings with a negative signed amount.
pub fn credit_postings(postings: &[Posting]) -> impl Iterator<Item = &Posting> {
    postings.iter().filter(|posting| posting.is_credit())
}

/// Sum of the debit amounts.
pub fn amount(postings: &[Posting]) -> Decimal {
    debit_postings(postings).map(Posting::amount).sum()
}

/// A posting joined with its account and cost center.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingLine {
    pub posting: Posting,
    pub account: Account,
    pub cost_center: Option<CostCenter>,
}

/// A journal joined with its posting lines, in posting order.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub journal: Journal,
    pub lines: Vec<PostingLine>,
}
