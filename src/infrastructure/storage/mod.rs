use crate::core::errors::SplitEaseError;
use crate::core::models::{
    expense::Expense, group::Group, member::Membership, payment::Payment, user::User,
};
use async_trait::async_trait;

/// Document store holding the ledger. Lists come back in no particular order.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fails with `EmailTaken` if another user already holds the email.
    async fn upsert_user(&self, user: User) -> Result<User, SplitEaseError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, SplitEaseError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, SplitEaseError>;
    async fn save_group(&self, group: Group) -> Result<(), SplitEaseError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitEaseError>;
    /// Fails with `AlreadyGroupMember` if the user already belongs to the group.
    async fn add_membership(&self, membership: Membership) -> Result<(), SplitEaseError>;
    async fn get_membership(&self, group_id: &str, user_id: &str) -> Result<Option<Membership>, SplitEaseError>;
    async fn list_memberships(&self, group_id: &str) -> Result<Vec<Membership>, SplitEaseError>;
    async fn list_user_groups(&self, user_id: &str) -> Result<Vec<Group>, SplitEaseError>;
    async fn save_expense(&self, expense: Expense) -> Result<(), SplitEaseError>;
    async fn list_expenses(&self, group_id: &str) -> Result<Vec<Expense>, SplitEaseError>;
    async fn save_payment(&self, payment: Payment) -> Result<(), SplitEaseError>;
    async fn list_payments(&self, group_id: &str) -> Result<Vec<Payment>, SplitEaseError>;
}

pub mod in_memory;
