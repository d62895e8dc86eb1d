//! Error types for ledger operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable reason attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Value is missing or refers to a record that does not exist.
    Blank,
    /// Value must be unique and is already used.
    Taken,
    /// Account kind does not match the group target.
    GroupMismatch,
    /// Account kind cannot be placed in any group.
    GroupConflict,
    /// Result groups cannot be assigned to accounts.
    NoGroupAllowedForResult,
    /// Only liability groups may be result groups.
    LiabilityNeededForResult,
    /// Tax and account reference each other.
    CircularReference,
    /// Re-parenting would create a cycle in the account tree.
    Cycle,
    /// Cost centers are only allowed on revenue or expense accounts.
    AllowedForExpenseOrRevenueOnly,
    /// A journal references fewer than two distinct accounts.
    AccountMissing,
    /// The signed posting amounts of a journal do not sum to zero.
    AmountMismatch,
    /// The record is permanent and cannot change.
    ChangesNotAllowed,
    /// Dependent records prevent the deletion.
    RestrictDependentDestroy,
}

impl ErrorCode {
    /// Snake-case code, stable across versions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Blank => "blank",
            ErrorCode::Taken => "taken",
            ErrorCode::GroupMismatch => "group_mismatch",
            ErrorCode::GroupConflict => "group_conflict",
            ErrorCode::NoGroupAllowedForResult => "no_group_allowed_for_result",
            ErrorCode::LiabilityNeededForResult => "liability_needed_for_result",
            ErrorCode::CircularReference => "circular_reference",
            ErrorCode::Cycle => "cycle",
            ErrorCode::AllowedForExpenseOrRevenueOnly => "allowed_for_expense_or_revenue_only",
            ErrorCode::AccountMissing => "account_missing",
            ErrorCode::AmountMismatch => "amount_mismatch",
            ErrorCode::ChangesNotAllowed => "changes_not_allowed",
            ErrorCode::RestrictDependentDestroy => "restrict_dependent_destroy",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field used for errors that concern the record as a whole.
pub const BASE: &str = "base";

/// A single error recorded against a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name, `base` for record-level errors.
    pub field: String,
    /// Reason code.
    pub code: ErrorCode,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.code)
    }
}

/// Ordered set of field errors collected while validating a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Errors(Vec<FieldError>);

impl Errors {
    /// Empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Error set holding one entry.
    pub fn single(field: impl Into<String>, code: ErrorCode) -> Self {
        let mut errors = Self::new();
        errors.add(field, code);
        errors
    }

    /// Record an error. Duplicates are kept once.
    pub fn add(&mut self, field: impl Into<String>, code: ErrorCode) {
        let error = FieldError {
            field: field.into(),
            code,
        };
        if !self.0.contains(&error) {
            self.0.push(error);
        }
    }

    /// Whether exactly this error was recorded.
    pub fn added(&self, field: &str, code: ErrorCode) -> bool {
        self.0.iter().any(|e| e.field == field && e.code == code)
    }

    /// Whether any error carries this code, regardless of field.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.0.iter().any(|e| e.code == code)
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: Errors) {
        for error in other.0 {
            self.add(error.field, error.code);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` when empty, otherwise the set wrapped by `wrap`.
    pub fn into_result(self, wrap: fn(Errors) -> LedgerError) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(wrap(self))
        }
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

/// Main error type for ledger operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Field-level, user-correctable problems.
    #[error("Validation failed: {0}")]
    Validation(Errors),

    /// The double-entry invariant does not hold for a journal.
    #[error("Ledger invariant violated: {0}")]
    InvariantViolation(Errors),

    /// Dependents or the permanent flag block a change.
    #[error("Referential integrity: {0}")]
    ReferentialIntegrity(Errors),

    /// Programmer error: a call was made with an unusable argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The account tree is inconsistent within the queried scope.
    #[error("Account tree inconsistent: {0}")]
    TreeInconsistency(String),

    /// Referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Store failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Shorthand for a missing record.
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Recorded field errors, if this error carries any.
    pub fn errors(&self) -> Option<&Errors> {
        match self {
            LedgerError::Validation(errors)
            | LedgerError::InvariantViolation(errors)
            | LedgerError::ReferentialIntegrity(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether the error is fatal for the current operation rather than user-correctable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidArgument(_)
                | LedgerError::TreeInconsistency(_)
                | LedgerError::Storage(_)
        )
    }

    /// Get error code for callers that map errors to responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "VALIDATION_ERROR",
            LedgerError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            LedgerError::ReferentialIntegrity(_) => "REFERENTIAL_INTEGRITY",
            LedgerError::InvalidArgument(_) => "INVALID_ARGUMENT",
            LedgerError::TreeInconsistency(_) => "TREE_INCONSISTENCY",
            LedgerError::NotFound { .. } => "NOT_FOUND",
            LedgerError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
