use crate::core::errors::SplitEaseError;
use crate::core::models::{
    expense::Expense, group::Group, member::Membership, payment::Payment, user::User,
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

// Profiles and the email index change together, so they share one lock.
#[derive(Default)]
struct UserTables {
    by_id: HashMap<String, User>,
    by_email: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    users: Arc<RwLock<UserTables>>,
    groups: Arc<RwLock<HashMap<String, Group>>>,
    // keyed by (group_id, user_id)
    memberships: Arc<RwLock<HashMap<(String, String), Membership>>>,
    expenses: Arc<RwLock<HashMap<String, Expense>>>,
    payments: Arc<RwLock<HashMap<String, Payment>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn upsert_user(&self, user: User) -> Result<User, SplitEaseError> {
        let mut users = self.users.write().await;
        if let Some(email) = &user.email {
            if users.by_email.get(email).is_some_and(|owner| *owner != user.id) {
                return Err(SplitEaseError::EmailTaken(email.clone()));
            }
        }
        if let Some(old_email) = users.by_id.get(&user.id).and_then(|u| u.email.clone()) {
            users.by_email.remove(&old_email);
        }
        if let Some(email) = &user.email {
            users.by_email.insert(email.clone(), user.id.clone());
        }
        users.by_id.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, SplitEaseError> {
        let users = self.users.read().await;
        Ok(users.by_id.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, SplitEaseError> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id).cloned()))
    }

    async fn save_group(&self, group: Group) -> Result<(), SplitEaseError> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitEaseError> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).cloned())
    }

    async fn add_membership(&self, membership: Membership) -> Result<(), SplitEaseError> {
        let mut memberships = self.memberships.write().await;
        let key = (membership.group_id.clone(), membership.user_id.clone());
        if memberships.contains_key(&key) {
            return Err(SplitEaseError::AlreadyGroupMember(membership.user_id));
        }
        memberships.insert(key, membership);
        Ok(())
    }

    async fn get_membership(&self, group_id: &str, user_id: &str) -> Result<Option<Membership>, SplitEaseError> {
        let memberships = self.memberships.read().await;
        Ok(memberships
            .get(&(group_id.to_string(), user_id.to_string()))
            .cloned())
    }

    async fn list_memberships(&self, group_id: &str) -> Result<Vec<Membership>, SplitEaseError> {
        let memberships = self.memberships.read().await;
        Ok(memberships
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn list_user_groups(&self, user_id: &str) -> Result<Vec<Group>, SplitEaseError> {
        let memberships = self.memberships.read().await;
        let groups = self.groups.read().await;
        Ok(memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| groups.get(&m.group_id).cloned())
            .collect())
    }

    async fn save_expense(&self, expense: Expense) -> Result<(), SplitEaseError> {
        let mut expenses = self.expenses.write().await;
        expenses.insert(expense.id.clone(), expense);
        Ok(())
    }

    async fn list_expenses(&self, group_id: &str) -> Result<Vec<Expense>, SplitEaseError> {
        let expenses = self.expenses.read().await;
        Ok(expenses
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn save_payment(&self, payment: Payment) -> Result<(), SplitEaseError> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id.clone(), payment);
        Ok(())
    }

    async fn list_payments(&self, group_id: &str) -> Result<Vec<Payment>, SplitEaseError> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .filter(|p| p.group_id == group_id)
            .cloned()
            .collect())
    }
}
