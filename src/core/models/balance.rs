use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Signed net position: positive means the group owes the member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MemberBalance {
    pub user_id: String,
    pub name: String,
    pub balance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reimbursement {
    pub from: String,
    pub from_name: String,
    pub to: String,
    pub to_name: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GroupBalances {
    pub currency: String,
    pub members: Vec<MemberBalance>,
    pub suggested_reimbursements: Vec<Reimbursement>,
}
