use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::SplitEaseError;
use crate::core::models::split::SplitPolicy;

// Request structs for JSON payloads. The acting user always comes from the
// bearer token, never from the body.
#[derive(Deserialize, ToSchema)]
pub struct UpsertProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    pub currency: String,
}

#[derive(Deserialize, ToSchema)]
pub struct InviteMemberRequest {
    pub email: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateGroupSettingsRequest {
    pub name: Option<String>,
    pub default_split_policy: Option<SplitPolicy>,
}

#[derive(Deserialize, ToSchema)]
pub struct AddExpenseRequest {
    pub description: String,
    pub amount: f64,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub date: Option<DateTime<Utc>>,
    pub split_config: Option<SplitPolicy>,
}

#[derive(Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub payee_user_id: String,
    pub amount: f64,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for SplitEaseError to implement IntoResponse
pub struct ApiError(pub SplitEaseError);

impl From<SplitEaseError> for ApiError {
    fn from(err: SplitEaseError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            SplitEaseError::Unauthenticated | SplitEaseError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            SplitEaseError::UserNotFound(_) | SplitEaseError::EmailNotFound(_) | SplitEaseError::GroupNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            SplitEaseError::AlreadyGroupMember(_) | SplitEaseError::EmailTaken(_) => StatusCode::CONFLICT,
            SplitEaseError::NotGroupMember(_) => StatusCode::FORBIDDEN,
            SplitEaseError::SelfPayment
            | SplitEaseError::InvalidSplitUser(_)
            | SplitEaseError::InvalidSplit(_)
            | SplitEaseError::InvalidInput(..) => StatusCode::BAD_REQUEST,
            SplitEaseError::InternalServerError(_)
            | SplitEaseError::StorageError(_)
            | SplitEaseError::LoggingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let error = match self.0 {
            SplitEaseError::InvalidInput(_, detail) => format!("{}: {}", detail.title, detail.description),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
