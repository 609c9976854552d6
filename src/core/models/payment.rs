use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Direct reimbursement from one member to another.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: String,
    pub group_id: String,
    pub payer: String,
    pub payee: String,
    pub amount: f64,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EnrichedPayment {
    #[serde(flatten)]
    pub payment: Payment,
    pub payer_name: String,
    pub payee_name: String,
}
