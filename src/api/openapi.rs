use utoipa::OpenApi;

use crate::{
    api::models::{
        AddExpenseRequest, CreateGroupRequest, ErrorResponse, InviteMemberRequest, RecordPaymentRequest,
        UpdateGroupSettingsRequest, UpsertProfileRequest,
    },
    core::models::{
        audit::AppLog,
        balance::{GroupBalances, MemberBalance, Reimbursement},
        expense::{EnrichedExpense, Expense},
        group::{Group, GroupDetails},
        member::{MemberProfile, Membership},
        payment::{EnrichedPayment, Payment},
        split::{ShareEntry, SplitPolicy},
        user::User,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::upsert_profile,
        super::handlers::get_user,
        super::handlers::create_group,
        super::handlers::get_groups_for_user,
        super::handlers::get_group_details,
        super::handlers::invite_member,
        super::handlers::update_group_settings,
        super::handlers::add_expense,
        super::handlers::get_expenses_for_group,
        super::handlers::record_payment,
        super::handlers::get_payments_for_group,
        super::handlers::get_group_balances,
        super::handlers::get_app_logs
    ),
    components(schemas(
        UpsertProfileRequest,
        CreateGroupRequest,
        InviteMemberRequest,
        UpdateGroupSettingsRequest,
        AddExpenseRequest,
        RecordPaymentRequest,
        ErrorResponse,
        User,
        Group,
        GroupDetails,
        Membership,
        MemberProfile,
        SplitPolicy,
        ShareEntry,
        Expense,
        EnrichedExpense,
        Payment,
        EnrichedPayment,
        MemberBalance,
        Reimbursement,
        GroupBalances,
        AppLog
    )),
    info(
        title = "SplitEase API",
        description = "Shared expense groups, split rules, payments and computed balances",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
