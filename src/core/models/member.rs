use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Membership row; at most one per (group, user).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Membership {
    pub group_id: String,
    pub user_id: String,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub joined_at: DateTime<Utc>,
}

/// A current group member with a resolved display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Member {
    pub user_id: String,
    pub name: String,
}

impl Member {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Member {
            user_id: user_id.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberProfile {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
}
