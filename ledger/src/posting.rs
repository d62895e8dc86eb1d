//! Postings and the signed-amount value they carry.
//!
//! A posting stores one signed decimal: debits are non-negative, credits
//! are negative. Callers never see the sign directly; they work with a
//! non-negative `amount` plus a `side`. [`PostingValue`] holds that
//! translation, including the case where the side is chosen before the
//! amount is known.

use std::str::FromStr;

use kontor_common::{
    AccountId, AccountableRef, CostCenterId, JournalId, LedgerError, PostingId, Result, Side,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Signed amount plus an optional explicitly chosen side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingValue {
    raw_amount: Option<Decimal>,
    explicit_side: Option<Side>,
}

impl PostingValue {
    /// Value with neither amount nor side.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value loaded from a stored signed amount. The side follows the sign.
    pub fn from_raw(raw_amount: Decimal) -> Self {
        Self {
            raw_amount: Some(raw_amount),
            explicit_side: Some(Side::of_signed(raw_amount)),
        }
    }

    /// Amount and side in one step.
    pub fn of(amount: Decimal, side: Side) -> Result<Self> {
        let mut value = Self::new();
        value.set_side(side);
        value.set_amount(amount)?;
        Ok(value)
    }

    /// Choose the side, re-signing a known amount.
    pub fn set_side(&mut self, side: Side) {
        self.explicit_side = Some(side);
        if let Some(amount) = self.amount() {
            self.raw_amount = Some(side.signed(amount));
        }
    }

    /// Choose the side from its textual token (`debit` / `credit`).
    pub fn set_side_token(&mut self, token: &str) -> Result<()> {
        self.set_side(Side::from_str(token)?);
        Ok(())
    }

    /// Set a non-negative amount. Without a chosen side the posting
    /// becomes a debit.
    pub fn set_amount(&mut self, amount: Decimal) -> Result<()> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(LedgerError::InvalidArgument(format!(
                "negative amount not allowed: {amount}"
            )));
        }
        let side = *self.explicit_side.get_or_insert(Side::Debit);
        self.raw_amount = Some(side.signed(amount));
        Ok(())
    }

    /// Forget the amount. The side defaults to debit like `set_amount`.
    pub fn clear_amount(&mut self) {
        self.explicit_side.get_or_insert(Side::Debit);
        self.raw_amount = None;
    }

    /// Absolute amount, if set.
    pub fn amount(&self) -> Option<Decimal> {
        self.raw_amount.map(|raw| raw.abs())
    }

    /// Chosen side, else the side implied by the stored sign.
    pub fn side(&self) -> Option<Side> {
        self.explicit_side
            .or_else(|| self.raw_amount.map(Side::of_signed))
    }

    /// Stored signed amount.
    pub fn raw_amount(&self) -> Option<Decimal> {
        self.raw_amount
    }

    pub fn is_debit(&self) -> bool {
        self.side() == Some(Side::Debit)
    }

    pub fn is_credit(&self) -> bool {
        self.side() == Some(Side::Credit)
    }
}

/// A persisted posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Store-assigned identifier.
    pub id: PostingId,
    /// Owning journal.
    pub journal_id: JournalId,
    /// Account booked on.
    pub account_id: AccountId,
    /// Cost center, revenue and expense accounts only.
    pub cost_center_id: Option<CostCenterId>,
    /// Linked business record.
    pub accountable: Option<AccountableRef>,
    /// Signed amount: debit ≥ 0, credit < 0.
    pub raw_amount: Decimal,
}

impl Posting {
    pub fn value(&self) -> PostingValue {
        PostingValue::from_raw(self.raw_amount)
    }

    pub fn amount(&self) -> Decimal {
        self.raw_amount.abs()
    }

    pub fn side(&self) -> Side {
        Side::of_signed(self.raw_amount)
    }

    pub fn is_debit(&self) -> bool {
        self.side() == Side::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.side() == Side::Credit
    }
}

/// One entry of a posting replacement request.
///
/// Without `id` it adds a posting. With `id` it updates that posting, or
/// removes it when `destroy` is set. An entry with no attributes at all is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingSpec {
    pub id: Option<PostingId>,
    pub account_id: Option<AccountId>,
    pub amount: Option<Decimal>,
    pub side: Option<Side>,
    pub cost_center_id: Option<CostCenterId>,
    pub accountable: Option<AccountableRef>,
    pub destroy: bool,
}

impl PostingSpec {
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self::booking(account_id, amount, Side::Debit)
    }

    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self::booking(account_id, amount, Side::Credit)
    }

    fn booking(account_id: AccountId, amount: Decimal, side: Side) -> Self {
        Self {
            account_id: Some(account_id),
            amount: Some(amount),
            side: Some(side),
            ..Self::default()
        }
    }

    /// Reference an existing posting.
    pub fn existing(id: PostingId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Remove the referenced posting.
    pub fn remove(id: PostingId) -> Self {
        Self {
            id: Some(id),
            destroy: true,
            ..Self::default()
        }
    }

    pub fn with_cost_center(mut self, cost_center_id: CostCenterId) -> Self {
        self.cost_center_id = Some(cost_center_id);
        self
    }

    pub fn with_accountable(mut self, accountable: AccountableRef) -> Self {
        self.accountable = Some(accountable);
        self
    }

    /// True if every attribute is unset.
    pub fn is_blank(&self) -> bool {
        self.id.is_none()
            && self.account_id.is_none()
            && self.amount.is_none()
            && self.side.is_none()
            && self.cost_center_id.is_none()
            && self.accountable.is_none()
    }

    /// Apply side then amount onto `value`.
    pub fn apply_value(&self, value: &mut PostingValue) -> Result<()> {
        if let Some(side) = self.side {
            value.set_side(side);
        }
        if let Some(amount) = self.amount {
            value.set_amount(amount)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_before_amount() {
        let mut value = PostingValue::new();
        value.set_side(Side::Credit);
        value.set_amount(dec!(10)).unwrap();

        assert_eq!(value.raw_amount(), Some(dec!(-10)));
        assert_eq!(value.amount(), Some(dec!(10)));
        assert!(value.is_credit());
    }

    #[test]
    fn test_amount_defaults_to_debit() {
        let mut value = PostingValue::new();
        value.set_amount(dec!(10)).unwrap();

        assert_eq!(value.raw_amount(), Some(dec!(10)));
        assert_eq!(value.side(), Some(Side::Debit));
    }

    #[test]
    fn test_side_change_resigns_amount() {
        let mut value = PostingValue::new();
        value.set_amount(dec!(10)).unwrap();
        value.set_side(Side::Credit);
        assert_eq!(value.raw_amount(), Some(dec!(-10)));

        value.set_side(Side::Debit);
        assert_eq!(value.raw_amount(), Some(dec!(10)));
    }

    #[test]
    fn test_unset_value() {
        let value = PostingValue::new();
        assert_eq!(value.amount(), None);
        assert_eq!(value.side(), None);
        assert!(!value.is_debit());
        assert!(!value.is_credit());
    }

    #[test]
    fn test_clear_amount_keeps_side() {
        let mut value = PostingValue::of(dec!(5), Side::Credit).unwrap();
        value.clear_amount();
        assert_eq!(value.amount(), None);
        assert_eq!(value.side(), Some(Side::Credit));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut value = PostingValue::new();
        assert!(matches!(
            value.set_side_token("foo"),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            value.set_amount(dec!(-10)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert_eq!(value, PostingValue::new());

        value.set_side_token("credit").unwrap();
        assert!(value.is_credit());
    }

    #[test]
    fn test_loaded_value_keeps_side_on_amount_change() {
        let mut value = PostingValue::from_raw(dec!(-10));
        value.set_amount(dec!(20)).unwrap();
        assert_eq!(value.raw_amount(), Some(dec!(-20)));
    }

    #[test]
    fn test_spec_blank() {
        assert!(PostingSpec::default().is_blank());
        assert!(!PostingSpec::existing(PostingId::new(1)).is_blank());
        assert!(!PostingSpec::debit(AccountId::new(1), dec!(1)).is_blank());
    }
}
