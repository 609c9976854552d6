use std::collections::HashMap;

use tracing::debug;

use crate::core::models::{
    balance::{GroupBalances, MemberBalance},
    expense::Expense,
    group::Group,
    member::Member,
    payment::Payment,
};
use crate::core::settlement::settle;
use crate::core::split::compute_shares;

/// Net balance per member.
///
/// Payers are credited the full expense and every member is debited their
/// share; payments debit the payer and credit the payee. Ids that are not in
/// `members` still take part in the arithmetic but are not reported.
pub fn net_balances(group: &Group, members: &[Member], expenses: &[Expense], payments: &[Payment]) -> Vec<MemberBalance> {
    let mut ledger: HashMap<String, f64> = members.iter().map(|m| (m.user_id.clone(), 0.0)).collect();

    for expense in expenses {
        *ledger.entry(expense.paid_by.clone()).or_insert(0.0) += expense.amount;
        for (user_id, share) in compute_shares(expense, members, group) {
            *ledger.entry(user_id).or_insert(0.0) -= share;
        }
    }

    for payment in payments {
        *ledger.entry(payment.payer.clone()).or_insert(0.0) -= payment.amount;
        *ledger.entry(payment.payee.clone()).or_insert(0.0) += payment.amount;
    }

    members
        .iter()
        .map(|m| MemberBalance {
            user_id: m.user_id.clone(),
            name: m.name.clone(),
            balance: ledger.get(&m.user_id).copied().unwrap_or(0.0),
        })
        .collect()
}

pub fn compute_group_balances(
    group: &Group,
    members: &[Member],
    expenses: &[Expense],
    payments: &[Payment],
) -> GroupBalances {
    debug!(
        "Computing balances for group {} ({} members, {} expenses, {} payments)",
        group.id,
        members.len(),
        expenses.len(),
        payments.len()
    );
    let members = net_balances(group, members, expenses, payments);
    let suggested_reimbursements = settle(&members);

    GroupBalances {
        currency: group.currency.clone(),
        members,
        suggested_reimbursements,
    }
}
