//! Account balances and sums over the account tree.

use std::collections::HashMap;

use kontor_common::{AccountId, BalanceOptions, LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::posting::Posting;
use crate::store::Tables;
use crate::tree::AccountTree;

/// An account with the sum of its postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSum {
    /// The account.
    pub account: Account,
    /// Signed sum. Zero without postings.
    pub sum_amount: Decimal,
}

/// Computes balances from the committed tables.
#[derive(Debug, Clone, Copy)]
pub struct BalanceAggregator<'a> {
    tables: &'a Tables,
}

impl<'a> BalanceAggregator<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        Self { tables }
    }

    /// Signed sum over the account and its whole subtree.
    pub fn balance(&self, account_id: AccountId, options: &BalanceOptions) -> Result<Decimal> {
        if self.tables.account(account_id).is_none() {
            return Err(LedgerError::not_found("account", account_id));
        }
        Ok(AccountTree::new(self.tables)
            .descendants(account_id)
            .map(|account| self.own_sum(account.id, options))
            .sum())
    }

    /// Every account, ordered by number, with the sum of the postings
    /// booked directly on it.
    pub fn with_sums(&self, options: &BalanceOptions) -> Vec<AccountSum> {
        self.tables
            .accounts_by_number()
            .map(|account| AccountSum {
                account: account.clone(),
                sum_amount: self.own_sum(account.id, options),
            })
            .collect()
    }

    /// Like [`with_sums`](Self::with_sums), with every child folded into
    /// its parent so only roots remain.
    pub fn merged_with_sums(&self, options: &BalanceOptions) -> Result<Vec<AccountSum>> {
        merge_child_sums(self.with_sums(options))
    }

    fn own_sum(&self, account_id: AccountId, options: &BalanceOptions) -> Decimal {
        self.tables
            .postings_of_account(account_id)
            .filter(|posting| self.selected(posting, options))
            .map(|posting| posting.raw_amount)
            .sum()
    }

    fn selected(&self, posting: &Posting, options: &BalanceOptions) -> bool {
        match self.tables.journal(posting.journal_id) {
            Some(journal) => {
                options.date.matches(journal.date) && (!options.permanent_only || journal.permanent)
            }
            None => false,
        }
    }
}

/// Fold every non-root sum into its parent, deepest level first, and keep
/// only the roots in their original order.
///
/// Every parent referenced in `sums` must be part of `sums`.
pub fn merge_child_sums(mut sums: Vec<AccountSum>) -> Result<Vec<AccountSum>> {
    let index: HashMap<AccountId, usize> = sums
        .iter()
        .enumerate()
        .map(|(position, sum)| (sum.account.id, position))
        .collect();

    let depths = depths(&sums, &index)?;
    let mut order: Vec<usize> = (0..sums.len()).collect();
    order.sort_by(|a, b| depths[*b].cmp(&depths[*a]));

    let mut folded = vec![false; sums.len()];
    for child in order {
        let Some(parent_id) = sums[child].account.parent_id else {
            continue;
        };
        let parent = index[&parent_id];
        let amount = sums[child].sum_amount;
        sums[parent].sum_amount += amount;
        folded[child] = true;
    }

    Ok(sums
        .into_iter()
        .zip(folded)
        .filter_map(|(sum, folded)| (!folded).then_some(sum))
        .collect())
}

/// Depth of each entry within the working set.
fn depths(sums: &[AccountSum], index: &HashMap<AccountId, usize>) -> Result<Vec<usize>> {
    let mut depths: Vec<Option<usize>> = vec![None; sums.len()];

    for start in 0..sums.len() {
        let mut path = Vec::new();
        let mut current = start;
        let known = loop {
            if let Some(depth) = depths[current] {
                break Some(depth);
            }
            if path.len() > sums.len() {
                return Err(LedgerError::TreeInconsistency(format!(
                    "cycle through account {}",
                    sums[start].account.id
                )));
            }
            path.push(current);
            match sums[current].account.parent_id {
                None => break None,
                Some(parent_id) => {
                    current = *index.get(&parent_id).ok_or_else(|| {
                        LedgerError::TreeInconsistency(format!(
                            "parent {} of account {} is not part of the sums",
                            parent_id, sums[current].account.id
                        ))
                    })?;
                }
            }
        };

        let mut depth = known.map_or(0, |depth| depth + 1);
        for position in path.into_iter().rev() {
            depths[position] = Some(depth);
            depth += 1;
        }
    }

    Ok(depths.into_iter().map(Option::unwrap_or_default).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountKind;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sum(id: u64, parent: Option<u64>, amount: Decimal) -> AccountSum {
        let now = Utc::now();
        AccountSum {
            account: Account {
                id: AccountId::new(id),
                number: id as u32,
                name: format!("Account {id}"),
                kind: AccountKind::Asset,
                parent_id: parent.map(AccountId::new),
                group_id: None,
                tax_id: None,
                accountable: None,
                created_at: now,
                updated_at: now,
            },
            sum_amount: amount,
        }
    }

    #[test]
    fn test_merge_three_levels() {
        let sums = vec![
            sum(1, None, dec!(1)),
            sum(2, Some(1), dec!(10)),
            sum(3, Some(2), dec!(100)),
            sum(4, Some(1), dec!(1000)),
            sum(5, None, dec!(5)),
        ];

        let merged = merge_child_sums(sums).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].account.id, AccountId::new(1));
        assert_eq!(merged[0].sum_amount, dec!(1111));
        assert_eq!(merged[1].sum_amount, dec!(5));
    }

    #[test]
    fn test_merge_children_listed_before_parents() {
        let sums = vec![
            sum(3, Some(2), dec!(100)),
            sum(2, Some(1), dec!(10)),
            sum(1, None, dec!(1)),
        ];

        let merged = merge_child_sums(sums).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].sum_amount, dec!(111));
    }

    #[test]
    fn test_merge_missing_parent() {
        let sums = vec![sum(1, None, dec!(1)), sum(2, Some(9), dec!(10))];
        assert!(matches!(
            merge_child_sums(sums),
            Err(LedgerError::TreeInconsistency(_))
        ));
    }

    #[test]
    fn test_merge_cycle() {
        let sums = vec![sum(1, Some(2), dec!(1)), sum(2, Some(1), dec!(1))];
        assert!(matches!(
            merge_child_sums(sums),
            Err(LedgerError::TreeInconsistency(_))
        ));
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_child_sums(Vec::new()).unwrap().is_empty());
    }
}
