use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::auth::token::{create_session_token, hash_password, verify_password};
use crate::db::queries::users;
use crate::engine::channel_engine::{Decision, EditOutcome, JoinOutcome};
use crate::engine::context::{RequestContext, Severity};
use crate::engine::error::{EngineError, is_unique_violation};
use crate::engine::validation::{self, ChannelInput, CredentialsInput, MessageInput};

use super::app_state::AppState;
use super::auth_middleware::{AuthUser, SESSION_COOKIE};
use super::pagination::{DEFAULT_PAGE_SIZE, paginate};

/// Safe landing place after a recoverable failure or membership action.
const CHANNEL_LISTING: &str = "/api/channels";

fn ctx_for(state: &AppState, auth: &AuthUser) -> RequestContext {
    RequestContext::new(auth.user_id.clone(), state.notifier.clone())
}

/// Translate an engine error into a response. Recoverable authorization
/// and state-machine violations are notified and answered with a redirect
/// to the channel listing; missing entities are 404s; storage failures
/// are logged and answered with a 500.
fn engine_error_response(state: &AppState, err: EngineError) -> Response {
    match &err {
        EngineError::NotFound(what) => {
            (StatusCode::NOT_FOUND, format!("{what} not found")).into_response()
        }
        EngineError::Database(e) => {
            error!(error = %e, "storage error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
        EngineError::AlreadyMember | EngineError::AlreadyPending => {
            state.notifier.notify(Severity::Warning, &err.to_string());
            Redirect::to(CHANNEL_LISTING).into_response()
        }
        EngineError::NotMember | EngineError::Unauthorized => {
            state.notifier.notify(Severity::Error, &err.to_string());
            Redirect::to(CHANNEL_LISTING).into_response()
        }
    }
}

// ── Auth endpoints ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub username: String,
}

fn session_cookie(token: &str, max_age_hours: i64) -> (header::HeaderName, String) {
    (
        header::SET_COOKIE,
        format!(
            "{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
            max_age_hours * 3600
        ),
    )
}

fn issue_session(state: &AppState, user_id: &str, username: &str) -> Response {
    match create_session_token(
        user_id,
        &state.auth_config.jwt_secret,
        state.auth_config.session_expiry_hours,
    ) {
        Ok(token) => (
            [session_cookie(&token, state.auth_config.session_expiry_hours)],
            Json(SessionResponse {
                user_id: user_id.to_string(),
                username: username.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to issue session token");
            (StatusCode::INTERNAL_SERVER_ERROR, "Login failed").into_response()
        }
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CredentialsInput>,
) -> Response {
    let creds = match validation::validate_credentials(input) {
        Ok(c) => c,
        Err(errors) => return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
    };

    let password_hash = match hash_password(&creds.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "password hashing failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Registration failed").into_response();
        }
    };

    let user_id = Uuid::new_v4().to_string();
    match users::create_user(&state.db, &user_id, &creds.username, &password_hash).await {
        Err(e) if is_unique_violation(&e) => {
            return (StatusCode::CONFLICT, "Username already taken").into_response();
        }
        Err(e) => {
            error!(error = %e, "failed to create user");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
        Ok(()) => {}
    }

    issue_session(&state, &user_id, &creds.username)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CredentialsInput>,
) -> Response {
    let user = match users::get_user_by_username(&state.db, input.username.trim()).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "failed to look up user");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let Some(user) = user else {
        return (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response();
    };
    if !verify_password(&input.password, &user.password_hash) {
        return (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response();
    }

    issue_session(&state, &user.id, &user.username)
}

pub async fn logout() -> Response {
    (
        [(
            header::SET_COOKIE,
            format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax"),
        )],
        Redirect::to(CHANNEL_LISTING),
    )
        .into_response()
}

// ── Channel listings ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
}

pub async fn list_channels(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Response {
    match state.engine.list_channels().await {
        Ok(channels) => {
            Json(paginate(&channels, DEFAULT_PAGE_SIZE, params.page.unwrap_or(1))).into_response()
        }
        Err(err) => engine_error_response(&state, err),
    }
}

pub async fn my_channels(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> Response {
    match state.engine.list_user_channels(&auth.user_id).await {
        Ok(channels) => {
            Json(paginate(&channels, DEFAULT_PAGE_SIZE, params.page.unwrap_or(1))).into_response()
        }
        Err(err) => engine_error_response(&state, err),
    }
}

// ── Channel lifecycle ───────────────────────────────────────────

pub async fn create_channel(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(input): Json<ChannelInput>,
) -> Response {
    let valid = match validation::validate_channel(input) {
        Ok(v) => v,
        Err(errors) => return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
    };

    let ctx = ctx_for(&state, &auth);
    match state.engine.create_channel(&ctx, valid).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(err) => engine_error_response(&state, err),
    }
}

pub async fn get_channel(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> Response {
    let channel = match state.engine.view_channel(&auth.user_id, &channel_id).await {
        Ok(c) => c,
        Err(err) => return engine_error_response(&state, err),
    };

    match state
        .engine
        .message_history(&auth.user_id, &channel_id, None, 50)
        .await
    {
        Ok((messages, has_more)) => Json(json!({
            "channel": channel,
            "messages": messages,
            "has_more": has_more,
        }))
        .into_response(),
        Err(err) => engine_error_response(&state, err),
    }
}

pub async fn edit_channel(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
    Json(input): Json<ChannelInput>,
) -> Response {
    let valid = match validation::validate_channel(input) {
        Ok(v) => v,
        Err(errors) => return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
    };

    let ctx = ctx_for(&state, &auth);
    match state.engine.edit_channel(&ctx, &channel_id, valid).await {
        Ok(EditOutcome::Updated) => Json(json!({ "status": "updated" })).into_response(),
        Ok(EditOutcome::RequestsProcessed(n)) => Json(json!({
            "status": "updated",
            "requests_processed": n,
        }))
        .into_response(),
        Err(err) => engine_error_response(&state, err),
    }
}

pub async fn delete_channel(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> Response {
    let ctx = ctx_for(&state, &auth);
    match state.engine.delete_channel(&ctx, &channel_id).await {
        Ok(()) => Redirect::to("/api/me/channels").into_response(),
        Err(err) => engine_error_response(&state, err),
    }
}

// ── Membership actions ──────────────────────────────────────────

pub async fn join_channel(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> Response {
    let ctx = ctx_for(&state, &auth);
    match state.engine.request_join(&ctx, &channel_id).await {
        Ok(JoinOutcome::Joined) => {
            Redirect::to(&format!("{CHANNEL_LISTING}/{channel_id}")).into_response()
        }
        Ok(JoinOutcome::RequestPending) => Redirect::to(CHANNEL_LISTING).into_response(),
        Err(err) => engine_error_response(&state, err),
    }
}

pub async fn leave_channel(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> Response {
    let ctx = ctx_for(&state, &auth);
    match state.engine.leave_channel(&ctx, &channel_id).await {
        Ok(()) => Redirect::to(CHANNEL_LISTING).into_response(),
        Err(err) => engine_error_response(&state, err),
    }
}

#[derive(Deserialize)]
pub struct MemberParams {
    pub q: Option<String>,
    pub page: Option<usize>,
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(channel_id): Path<String>,
    Query(params): Query<MemberParams>,
) -> Response {
    match state
        .engine
        .list_members(&channel_id, params.q.as_deref())
        .await
    {
        Ok(members) => {
            Json(paginate(&members, DEFAULT_PAGE_SIZE, params.page.unwrap_or(1))).into_response()
        }
        Err(err) => engine_error_response(&state, err),
    }
}

// ── Join requests ───────────────────────────────────────────────

pub async fn list_join_requests(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Response {
    let ctx = ctx_for(&state, &auth);
    match state.engine.list_join_requests(&ctx, &channel_id).await {
        Ok(requests) => {
            Json(paginate(&requests, DEFAULT_PAGE_SIZE, params.page.unwrap_or(1))).into_response()
        }
        Err(err) => engine_error_response(&state, err),
    }
}

#[derive(Deserialize)]
pub struct DecisionInput {
    pub decision: Decision,
}

pub async fn decide_request(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(request_id): Path<String>,
    Json(input): Json<DecisionInput>,
) -> Response {
    let ctx = ctx_for(&state, &auth);
    match state
        .engine
        .decide_request(&ctx, &request_id, input.decision)
        .await
    {
        Ok(channel_id) => {
            Redirect::to(&format!("{CHANNEL_LISTING}/{channel_id}/requests")).into_response()
        }
        Err(err) => engine_error_response(&state, err),
    }
}

// ── Messages ────────────────────────────────────────────────────

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
    Json(input): Json<MessageInput>,
) -> Response {
    let valid = match validation::validate_message(input) {
        Ok(v) => v,
        Err(errors) => return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
    };

    let ctx = ctx_for(&state, &auth);
    match state.engine.post_message(&ctx, &channel_id, valid).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(err) => engine_error_response(&state, err),
    }
}

#[derive(Deserialize)]
pub struct HistoryParams {
    pub before: Option<String>,
    pub limit: Option<i64>,
}

pub async fn get_message_history(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Response {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);

    match state
        .engine
        .message_history(&auth.user_id, &channel_id, params.before.as_deref(), limit)
        .await
    {
        Ok((messages, has_more)) => Json(json!({
            "messages": messages,
            "has_more": has_more,
        }))
        .into_response(),
        Err(err) => engine_error_response(&state, err),
    }
}
