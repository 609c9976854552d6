use tracing::debug;

use crate::core::constants::EPSILON;
use crate::core::models::balance::{MemberBalance, Reimbursement};

/// Suggests reimbursements that bring every balance back to zero.
///
/// Debtors are matched most-negative first against creditors largest first,
/// each step moving `min(debt, credit)`. Produces at most
/// `debtors + creditors - 1` transfers. Balances within [`EPSILON`] of zero
/// count as settled.
pub fn settle(balances: &[MemberBalance]) -> Vec<Reimbursement> {
    let mut debtors: Vec<(&MemberBalance, f64)> = balances
        .iter()
        .filter(|b| b.balance < -EPSILON)
        .map(|b| (b, b.balance))
        .collect();
    let mut creditors: Vec<(&MemberBalance, f64)> = balances
        .iter()
        .filter(|b| b.balance > EPSILON)
        .map(|b| (b, b.balance))
        .collect();

    debtors.sort_by(|a, b| a.1.total_cmp(&b.1));
    creditors.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut reimbursements = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let (debtor, owed) = debtors[i];
        let (creditor, due) = creditors[j];
        let amount = (-owed).min(due);

        reimbursements.push(Reimbursement {
            from: debtor.user_id.clone(),
            from_name: debtor.name.clone(),
            to: creditor.user_id.clone(),
            to_name: creditor.name.clone(),
            amount,
        });

        debtors[i].1 += amount;
        creditors[j].1 -= amount;

        if debtors[i].1.abs() < EPSILON {
            i += 1;
        }
        if creditors[j].1.abs() < EPSILON {
            j += 1;
        }
    }

    debug!(
        "Settled {} debtors against {} creditors in {} reimbursements",
        debtors.len(),
        creditors.len(),
        reimbursements.len()
    );
    reimbursements
}
