use crate::{
    api::models::*,
    auth::jwt::Claims,
    core::{
        errors::SplitEaseError,
        models::{
            audit::AppLog,
            balance::GroupBalances,
            expense::{EnrichedExpense, Expense},
            group::{Group, GroupDetails},
            member::Membership,
            payment::{EnrichedPayment, Payment},
            user::User,
        },
        services::SplitEaseService,
    },
    infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage},
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post, put},
};
use http::header;

use std::sync::Arc;

pub type SharedService = Arc<SplitEaseService<InMemoryLogging, InMemoryStorage>>;

// Middleware to validate the identity provider's bearer token
async fn auth_middleware(
    State(service): State<SharedService>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(SplitEaseError::Unauthenticated)?;

    let claims = service.validate_token(token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

// Define API routes
pub fn api_routes(service: SharedService) -> Router {
    Router::new()
        .route("/me", put(upsert_profile))
        .route("/users/{user_id}", get(get_user))
        .route("/groups", post(create_group).get(get_groups_for_user))
        .route("/groups/{group_id}", get(get_group_details))
        .route("/groups/{group_id}/members", post(invite_member))
        .route(
            "/groups/{group_id}/settings",
            axum::routing::patch(update_group_settings),
        )
        .route(
            "/groups/{group_id}/expenses",
            post(add_expense).get(get_expenses_for_group),
        )
        .route(
            "/groups/{group_id}/payments",
            post(record_payment).get(get_payments_for_group),
        )
        .route("/groups/{group_id}/balances", get(get_group_balances))
        .route("/logs", get(get_app_logs))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware))
        .with_state(service)
}

#[utoipa::path(
    put,
    path = "/api/me",
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = User),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 409, description = "Email belongs to another user", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn upsert_profile(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpsertProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let user = service.upsert_user(&claims.sub, req.name, req.email).await?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "ID of the user to retrieve")
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_user(State(service): State<SharedService>, Path(user_id): Path<String>) -> Result<Json<User>, ApiError> {
    let user = service
        .get_user(&user_id)
        .await?
        .ok_or_else(|| SplitEaseError::UserNotFound(user_id))?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created successfully", body = Group),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn create_group(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = service.create_group(req.name, req.currency, &claims.sub).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/groups",
    responses(
        (status = 200, description = "Groups the caller belongs to", body = Vec<Group>)
    ),
    security(("Bearer" = []))
)]
async fn get_groups_for_user(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Group>>, ApiError> {
    let groups = service.get_groups_for_user(&claims.sub).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Group with its members", body = GroupDetails),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_group_details(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupDetails>, ApiError> {
    let details = service.get_group_details(&group_id, &claims.sub).await?;
    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/members",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    request_body = InviteMemberRequest,
    responses(
        (status = 201, description = "User added to the group", body = Membership),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Group or email not found", body = ErrorResponse),
        (status = 409, description = "User is already a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn invite_member(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    Json(req): Json<InviteMemberRequest>,
) -> Result<(StatusCode, Json<Membership>), ApiError> {
    let membership = service
        .invite_user_to_group(&group_id, &req.email, &claims.sub)
        .await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

#[utoipa::path(
    patch,
    path = "/api/groups/{group_id}/settings",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    request_body = UpdateGroupSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = Group),
        (status = 400, description = "Invalid split policy", body = ErrorResponse),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_group_settings(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    Json(req): Json<UpdateGroupSettingsRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .update_group_settings(&group_id, req.name, req.default_split_policy, &claims.sub)
        .await?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/expenses",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    request_body = AddExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded, paid by the caller", body = Expense),
        (status = 400, description = "Invalid amount or split", body = ErrorResponse),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn add_expense(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let expense = service
        .add_expense(
            &group_id,
            req.description,
            req.amount,
            req.date,
            req.split_config,
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/expenses",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Expenses, newest first", body = Vec<EnrichedExpense>),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_expenses_for_group(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<EnrichedExpense>>, ApiError> {
    let expenses = service.get_expenses_for_group(&group_id, &claims.sub).await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/payments",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded from the caller", body = Payment),
        (status = 400, description = "Invalid amount or self payment", body = ErrorResponse),
        (status = 403, description = "Payer or payee is not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn record_payment(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let payment = service
        .record_payment(
            &group_id,
            &req.payee_user_id,
            req.amount,
            req.date,
            req.notes,
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/payments",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Payments, newest first", body = Vec<EnrichedPayment>),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_payments_for_group(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<EnrichedPayment>>, ApiError> {
    let payments = service.get_payments_for_group(&group_id, &claims.sub).await?;
    Ok(Json(payments))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/balances",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Net balances and suggested reimbursements", body = GroupBalances),
        (status = 403, description = "Caller is not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_group_balances(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupBalances>, ApiError> {
    let balances = service.get_group_balances(&group_id, &claims.sub).await?;
    Ok(Json(balances))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Activity of the caller and of the caller's groups", body = Vec<AppLog>)
    ),
    security(("Bearer" = []))
)]
async fn get_app_logs(
    State(service): State<SharedService>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs(&claims.sub).await?;
    Ok(Json(logs))
}
