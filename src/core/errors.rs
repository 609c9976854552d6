use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum SplitEaseError {
    #[error("User not authenticated")]
    Unauthenticated,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("No user registered with email {0}")]
    EmailNotFound(String),
    #[error("Email {0} is already registered")]
    EmailTaken(String),
    #[error("Group {0} not found")]
    GroupNotFound(String),
    #[error("User {0} is already a group member")]
    AlreadyGroupMember(String),
    #[error("User {0} is not a group member")]
    NotGroupMember(String),
    #[error("Payer and payee cannot be the same person")]
    SelfPayment,
    #[error("Invalid split user: {0}")]
    InvalidSplitUser(String),
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl SplitEaseError {
    pub fn invalid_input(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        SplitEaseError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }
}
