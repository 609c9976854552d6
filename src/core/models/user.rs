use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::constants::UNKNOWN_USER_NAME;

/// Profile of a user known to the identity provider. `id` is the provider's
/// stable subject identifier.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Name shown for a user: their name, else their email, else a placeholder.
pub fn display_name(user: Option<&User>) -> String {
    user.and_then(|u| u.name.clone().or_else(|| u.email.clone()))
        .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string())
}
