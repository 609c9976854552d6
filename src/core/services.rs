use crate::auth::jwt::{Claims, JwtService};
use crate::core::balance::compute_group_balances;
use crate::core::constants::{
    BALANCES_QUERIED, EXPENSE_ADDED, GROUP_CREATED, GROUP_SETTINGS_UPDATED, MAX_AMOUNT, MAX_DESCRIPTION_LENGTH,
    MAX_NAME_LENGTH, MAX_NOTES_LENGTH, MEMBER_INVITED, PAYMENT_RECORDED, USER_UPSERTED,
};
use crate::core::errors::SplitEaseError;
use crate::core::models::{
    audit::AppLog,
    balance::GroupBalances,
    expense::{EnrichedExpense, Expense},
    group::{Group, GroupDetails},
    member::{Member, MemberProfile, Membership},
    payment::{EnrichedPayment, Payment},
    split::SplitPolicy,
    user::{User, display_name},
};
use crate::core::split::validate_policy;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde_json::json;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct SplitEaseService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
    jwt_service: JwtService,
}

impl<L: LoggingService, S: Storage> SplitEaseService<L, S> {
    pub fn new(storage: S, logging: L, jwt_secret: String) -> Self {
        SplitEaseService {
            storage,
            logging,
            jwt_service: JwtService::new(jwt_secret),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, SplitEaseError> {
        self.jwt_service.validate_token(token)
    }

    async fn validate_group_membership(&self, group_id: &str, user_id: &str) -> Result<Group, SplitEaseError> {
        let group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| SplitEaseError::GroupNotFound(group_id.to_string()))?;
        if self.storage.get_membership(group_id, user_id).await?.is_none() {
            warn!("User {} is not a member of group {}", user_id, group_id);
            return Err(SplitEaseError::NotGroupMember(user_id.to_string()));
        }
        Ok(group)
    }

    async fn log_action(&self, action: &str, details: serde_json::Value, user_id: &str) -> Result<(), SplitEaseError> {
        info!("{} by {}: {}", action, user_id, details);
        self.logging.log_action(action, details, Some(user_id)).await
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), SplitEaseError> {
        if value.trim().is_empty() {
            return Err(SplitEaseError::invalid_input(
                field,
                format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.chars().count() > max_length {
            return Err(SplitEaseError::invalid_input(
                field,
                format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(SplitEaseError::invalid_input(
                field,
                format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), SplitEaseError> {
        if !amount.is_finite() {
            return Err(SplitEaseError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be a finite number",
            ));
        }
        if amount <= 0.0 {
            return Err(SplitEaseError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be greater than 0",
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(SplitEaseError::invalid_input(
                field,
                "Amount Too Large",
                format!("Amount cannot exceed {}", MAX_AMOUNT),
            ));
        }
        Ok(())
    }

    fn normalize_currency(&self, currency: &str) -> Result<String, SplitEaseError> {
        let code = currency.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SplitEaseError::invalid_input(
                "currency",
                "Invalid Currency",
                "Currency must be a three-letter code such as USD",
            ));
        }
        Ok(code.to_ascii_uppercase())
    }

    /// Every share must name a distinct current member.
    fn validate_split_members(&self, policy: &SplitPolicy, member_ids: &HashSet<String>) -> Result<(), SplitEaseError> {
        let mut seen = HashSet::new();
        for share in policy.shares() {
            if !member_ids.contains(&share.user_id) || !seen.insert(share.user_id.as_str()) {
                return Err(SplitEaseError::InvalidSplitUser(share.user_id.clone()));
            }
        }
        Ok(())
    }

    async fn member_ids(&self, group_id: &str) -> Result<HashSet<String>, SplitEaseError> {
        Ok(self
            .storage
            .list_memberships(group_id)
            .await?
            .into_iter()
            .map(|m| m.user_id)
            .collect())
    }

    async fn memberships_in_join_order(&self, group_id: &str) -> Result<Vec<Membership>, SplitEaseError> {
        let mut memberships = self.storage.list_memberships(group_id).await?;
        memberships.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then_with(|| a.user_id.cmp(&b.user_id)));
        Ok(memberships)
    }

    async fn resolve_name(&self, user_id: &str) -> Result<String, SplitEaseError> {
        let user = self.storage.get_user(user_id).await?;
        Ok(display_name(user.as_ref()))
    }

    /// Current members with display names, in join order.
    async fn resolve_members(&self, group_id: &str) -> Result<Vec<Member>, SplitEaseError> {
        let memberships = self.memberships_in_join_order(group_id).await?;
        try_join_all(memberships.into_iter().map(|m| async move {
            let name = self.resolve_name(&m.user_id).await?;
            Ok::<_, SplitEaseError>(Member::new(m.user_id, name))
        }))
        .await
    }

    // USERS

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, SplitEaseError> {
        self.storage.get_user(user_id).await
    }

    pub async fn upsert_user(
        &self,
        user_id: &str,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, SplitEaseError> {
        if let Some(ref name) = name {
            self.validate_string_input("name", name, MAX_NAME_LENGTH)?;
        }
        let email = email.map(|e| e.trim().to_lowercase());
        if let Some(ref email) = email {
            let valid = email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
            if !valid {
                return Err(SplitEaseError::invalid_input(
                    "email",
                    "Invalid Email",
                    format!("{} is not a valid email address", email),
                ));
            }
        }

        let user = self
            .storage
            .upsert_user(User {
                id: user_id.to_string(),
                name: name.map(|n| n.trim().to_string()),
                email,
            })
            .await?;
        self.log_action(USER_UPSERTED, json!({ "user_id": user.id }), user_id)
            .await?;
        Ok(user)
    }

    // GROUPS

    pub async fn create_group(&self, name: String, currency: String, created_by: &str) -> Result<Group, SplitEaseError> {
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;
        let currency = self.normalize_currency(&currency)?;

        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            currency,
            default_split_policy: SplitPolicy::Equal,
            created_by: created_by.to_string(),
            created_at: now,
        };
        self.storage.save_group(group.clone()).await?;
        self.storage
            .add_membership(Membership {
                group_id: group.id.clone(),
                user_id: created_by.to_string(),
                joined_at: now,
            })
            .await?;

        self.log_action(
            GROUP_CREATED,
            json!({ "group_id": group.id, "name": group.name, "currency": group.currency }),
            created_by,
        )
        .await?;
        Ok(group)
    }

    pub async fn get_groups_for_user(&self, user_id: &str) -> Result<Vec<Group>, SplitEaseError> {
        let mut groups = self.storage.list_user_groups(user_id).await?;
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(groups)
    }

    pub async fn get_group_details(&self, group_id: &str, user_id: &str) -> Result<GroupDetails, SplitEaseError> {
        let group = self.validate_group_membership(group_id, user_id).await?;
        let memberships = self.memberships_in_join_order(group_id).await?;
        let members = try_join_all(memberships.into_iter().map(|m| async move {
            let user = self.storage.get_user(&m.user_id).await?;
            Ok::<_, SplitEaseError>(MemberProfile {
                name: display_name(user.as_ref()),
                email: user.and_then(|u| u.email),
                user_id: m.user_id,
            })
        }))
        .await?;
        Ok(GroupDetails { group, members })
    }

    pub async fn invite_user_to_group(
        &self,
        group_id: &str,
        email: &str,
        invited_by: &str,
    ) -> Result<Membership, SplitEaseError> {
        self.validate_group_membership(group_id, invited_by).await?;
        let email = email.trim().to_lowercase();
        let invitee = self
            .storage
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| SplitEaseError::EmailNotFound(email.clone()))?;

        let membership = Membership {
            group_id: group_id.to_string(),
            user_id: invitee.id.clone(),
            joined_at: Utc::now(),
        };
        self.storage.add_membership(membership.clone()).await?;

        self.log_action(
            MEMBER_INVITED,
            json!({ "group_id": group_id, "user_id": invitee.id }),
            invited_by,
        )
        .await?;
        Ok(membership)
    }

    /// Renames the group and/or replaces its default split policy. The
    /// currency is fixed at creation.
    pub async fn update_group_settings(
        &self,
        group_id: &str,
        name: Option<String>,
        default_split_policy: Option<SplitPolicy>,
        updated_by: &str,
    ) -> Result<Group, SplitEaseError> {
        let mut group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| SplitEaseError::GroupNotFound(group_id.to_string()))?;
        if group.created_by != updated_by && self.storage.get_membership(group_id, updated_by).await?.is_none() {
            warn!("User {} attempted to update settings of group {}", updated_by, group_id);
            return Err(SplitEaseError::NotGroupMember(updated_by.to_string()));
        }

        if let Some(name) = name {
            self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;
            group.name = name.trim().to_string();
        }
        if let Some(policy) = default_split_policy {
            validate_policy(&policy, 1.0, false).map_err(|e| SplitEaseError::InvalidSplit(e.to_string()))?;
            let member_ids = self.member_ids(group_id).await?;
            self.validate_split_members(&policy, &member_ids)?;
            group.default_split_policy = policy;
        }

        self.storage.save_group(group.clone()).await?;
        self.log_action(
            GROUP_SETTINGS_UPDATED,
            json!({
                "group_id": group.id,
                "name": group.name,
                "default_split_policy": group.default_split_policy.kind()
            }),
            updated_by,
        )
        .await?;
        Ok(group)
    }

    // EXPENSES

    /// Records an expense paid by `paid_by`, who must be a member.
    pub async fn add_expense(
        &self,
        group_id: &str,
        description: String,
        amount: f64,
        date: Option<DateTime<Utc>>,
        split_config: Option<SplitPolicy>,
        paid_by: &str,
    ) -> Result<Expense, SplitEaseError> {
        self.validate_group_membership(group_id, paid_by).await?;
        self.validate_string_input("description", &description, MAX_DESCRIPTION_LENGTH)?;
        self.validate_amount_input("amount", amount)?;

        if let Some(ref policy) = split_config {
            let member_ids = self.member_ids(group_id).await?;
            self.validate_split_members(policy, &member_ids)?;
            validate_policy(policy, amount, true).map_err(|e| {
                warn!("Rejected split config for group {}: {}", group_id, e);
                SplitEaseError::InvalidSplit(e.to_string())
            })?;
        }

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            description: description.trim().to_string(),
            amount,
            paid_by: paid_by.to_string(),
            date: date.unwrap_or_else(Utc::now),
            split_config,
        };
        self.storage.save_expense(expense.clone()).await?;
        debug!("Expense {} saved in group {}", expense.id, group_id);

        self.log_action(
            EXPENSE_ADDED,
            json!({ "expense_id": expense.id, "group_id": group_id, "amount": amount }),
            paid_by,
        )
        .await?;
        Ok(expense)
    }

    /// Newest first.
    pub async fn get_expenses_for_group(&self, group_id: &str, user_id: &str) -> Result<Vec<EnrichedExpense>, SplitEaseError> {
        self.validate_group_membership(group_id, user_id).await?;
        let mut expenses = self.storage.list_expenses(group_id).await?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        try_join_all(expenses.into_iter().map(|expense| async move {
            let paid_by_name = self.resolve_name(&expense.paid_by).await?;
            Ok::<_, SplitEaseError>(EnrichedExpense { expense, paid_by_name })
        }))
        .await
    }

    // PAYMENTS

    pub async fn record_payment(
        &self,
        group_id: &str,
        payee: &str,
        amount: f64,
        date: Option<DateTime<Utc>>,
        notes: Option<String>,
        payer: &str,
    ) -> Result<Payment, SplitEaseError> {
        if payer == payee {
            return Err(SplitEaseError::SelfPayment);
        }
        self.validate_amount_input("amount", amount)?;
        let notes = notes.filter(|n| !n.trim().is_empty());
        if let Some(ref notes) = notes {
            self.validate_string_input("notes", notes, MAX_NOTES_LENGTH)?;
        }
        self.validate_group_membership(group_id, payer).await?;
        if self.storage.get_membership(group_id, payee).await?.is_none() {
            return Err(SplitEaseError::NotGroupMember(payee.to_string()));
        }

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            payer: payer.to_string(),
            payee: payee.to_string(),
            amount,
            date: date.unwrap_or_else(Utc::now),
            notes,
        };
        self.storage.save_payment(payment.clone()).await?;

        self.log_action(
            PAYMENT_RECORDED,
            json!({
                "payment_id": payment.id,
                "group_id": group_id,
                "payee": payee,
                "amount": amount
            }),
            payer,
        )
        .await?;
        Ok(payment)
    }

    /// Newest first.
    pub async fn get_payments_for_group(&self, group_id: &str, user_id: &str) -> Result<Vec<EnrichedPayment>, SplitEaseError> {
        self.validate_group_membership(group_id, user_id).await?;
        let mut payments = self.storage.list_payments(group_id).await?;
        payments.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        try_join_all(payments.into_iter().map(|payment| async move {
            let (payer_name, payee_name) =
                futures::try_join!(self.resolve_name(&payment.payer), self.resolve_name(&payment.payee))?;
            Ok::<_, SplitEaseError>(EnrichedPayment {
                payment,
                payer_name,
                payee_name,
            })
        }))
        .await
    }

    // BALANCES

    pub async fn get_group_balances(&self, group_id: &str, user_id: &str) -> Result<GroupBalances, SplitEaseError> {
        let group = self.validate_group_membership(group_id, user_id).await?;
        let (members, expenses, payments) = futures::try_join!(
            self.resolve_members(group_id),
            self.storage.list_expenses(group_id),
            self.storage.list_payments(group_id)
        )?;

        let balances = compute_group_balances(&group, &members, &expenses, &payments);

        self.log_action(
            BALANCES_QUERIED,
            json!({
                "group_id": group_id,
                "reimbursements": balances.suggested_reimbursements.len()
            }),
            user_id,
        )
        .await?;
        Ok(balances)
    }

    /// Entries the caller wrote plus entries about groups the caller belongs to.
    pub async fn get_app_logs(&self, user_id: &str) -> Result<Vec<AppLog>, SplitEaseError> {
        let group_ids: HashSet<String> = self
            .storage
            .list_user_groups(user_id)
            .await?
            .into_iter()
            .map(|g| g.id)
            .collect();
        let logs = self.logging.get_logs().await?;
        Ok(logs
            .into_iter()
            .filter(|log| {
                log.user_id.as_deref() == Some(user_id)
                    || log
                        .details
                        .get("group_id")
                        .and_then(|id| id.as_str())
                        .is_some_and(|id| group_ids.contains(id))
            })
            .collect())
    }
}
