use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::core::constants::EPSILON;
use crate::core::models::{
    expense::Expense,
    group::Group,
    member::Member,
    split::{ShareEntry, SplitPolicy},
};

/// Owed amount per member id.
pub type Shares = BTreeMap<String, f64>;

/// Why a stored split configuration cannot be honoured.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MalformedSplit {
    #[error("{0} split has no shares")]
    EmptyShares(&'static str),
    #[error("share for user {0} is not a finite, non-negative number")]
    InvalidValue(String),
    #[error("percentages sum to {0}, expected 1.0")]
    PercentagesTotal(f64),
    #[error("fixed amounts sum to {total}, expected {expected}")]
    FixedAmountsTotal { total: f64, expected: f64 },
    #[error("FIXED_AMOUNTS can only be set on an expense")]
    FixedAmountsAsDefault,
    #[error("unknown split policy")]
    UnknownPolicy,
}

/// Shares for one expense, plus the reason if the allocator had to fall
/// back to an equal split.
#[derive(Clone, Debug, PartialEq)]
pub struct Allocation {
    pub shares: Shares,
    pub fallback: Option<MalformedSplit>,
}

/// Checks a policy's share list. `expected_total` is the expense amount for
/// fixed amounts; `is_override` is false when the policy is a group default.
pub fn validate_policy(policy: &SplitPolicy, expected_total: f64, is_override: bool) -> Result<(), MalformedSplit> {
    match policy {
        SplitPolicy::Equal => Ok(()),
        SplitPolicy::Unknown => Err(MalformedSplit::UnknownPolicy),
        SplitPolicy::Percentages { shares } => {
            let total = checked_total(policy.kind(), shares)?;
            if (total - 1.0).abs() > EPSILON {
                return Err(MalformedSplit::PercentagesTotal(total));
            }
            Ok(())
        }
        SplitPolicy::FixedAmounts { shares } => {
            if !is_override {
                return Err(MalformedSplit::FixedAmountsAsDefault);
            }
            let total = checked_total(policy.kind(), shares)?;
            if (total - expected_total).abs() > EPSILON {
                return Err(MalformedSplit::FixedAmountsTotal {
                    total,
                    expected: expected_total,
                });
            }
            Ok(())
        }
    }
}

fn checked_total(kind: &'static str, shares: &[ShareEntry]) -> Result<f64, MalformedSplit> {
    if shares.is_empty() {
        return Err(MalformedSplit::EmptyShares(kind));
    }
    if let Some(bad) = shares.iter().find(|s| !s.value.is_finite() || s.value < 0.0) {
        return Err(MalformedSplit::InvalidValue(bad.user_id.clone()));
    }
    Ok(shares.iter().map(|s| s.value).sum())
}

/// Each member's owed share of `expense`.
///
/// Uses the expense's own split config when present, otherwise the group
/// default. Every member in `members` is a key of the result. Malformed
/// configurations fall back to an equal split and log a warning.
pub fn compute_shares(expense: &Expense, members: &[Member], group: &Group) -> Shares {
    allocate(expense, members, group).shares
}

pub fn allocate(expense: &Expense, members: &[Member], group: &Group) -> Allocation {
    let member_ids: Vec<&str> = members.iter().map(|m| m.user_id.as_str()).collect();
    if member_ids.is_empty() {
        return Allocation {
            shares: Shares::new(),
            fallback: None,
        };
    }

    let is_override = expense.split_config.is_some();
    let policy = expense.split_config.as_ref().unwrap_or(&group.default_split_policy);

    if let Err(reason) = validate_policy(policy, expense.amount, is_override) {
        warn!(
            "Split config {} not usable for expense {} ({}), falling back to EQUAL split",
            policy.kind(),
            expense.id,
            reason
        );
        return Allocation {
            shares: equal_shares(expense.amount, &member_ids),
            fallback: Some(reason),
        };
    }

    let shares = match policy {
        SplitPolicy::Equal | SplitPolicy::Unknown => equal_shares(expense.amount, &member_ids),
        SplitPolicy::Percentages { shares } => listed_shares(shares, &member_ids, |fraction| expense.amount * fraction),
        SplitPolicy::FixedAmounts { shares } => listed_shares(shares, &member_ids, |value| value),
    };
    Allocation { shares, fallback: None }
}

fn equal_shares(amount: f64, member_ids: &[&str]) -> Shares {
    let share = amount / member_ids.len() as f64;
    member_ids.iter().map(|id| (id.to_string(), share)).collect()
}

// Pairs naming non-members are dropped; repeated pairs for one member add up.
fn listed_shares(entries: &[ShareEntry], member_ids: &[&str], owed: impl Fn(f64) -> f64) -> Shares {
    let mut shares: Shares = member_ids.iter().map(|id| (id.to_string(), 0.0)).collect();
    for entry in entries {
        if let Some(slot) = shares.get_mut(entry.user_id.as_str()) {
            *slot += owed(entry.value);
        }
    }
    shares
}
