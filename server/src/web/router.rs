use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::app_state::AppState;
use super::rest_api;

/// Build the axum router with all HTTP routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Auth
        .route("/api/auth/register", post(rest_api::register))
        .route("/api/auth/login", post(rest_api::login))
        .route("/api/auth/logout", post(rest_api::logout))
        // Channels
        .route(
            "/api/channels",
            get(rest_api::list_channels).post(rest_api::create_channel),
        )
        .route(
            "/api/channels/{id}",
            get(rest_api::get_channel)
                .patch(rest_api::edit_channel)
                .delete(rest_api::delete_channel),
        )
        // Membership
        .route("/api/channels/{id}/join", post(rest_api::join_channel))
        .route("/api/channels/{id}/leave", post(rest_api::leave_channel))
        .route("/api/channels/{id}/members", get(rest_api::list_members))
        // Join requests
        .route(
            "/api/channels/{id}/requests",
            get(rest_api::list_join_requests),
        )
        .route("/api/requests/{id}", post(rest_api::decide_request))
        // Messages
        .route(
            "/api/channels/{id}/messages",
            get(rest_api::get_message_history).post(rest_api::post_message),
        )
        // Caller's memberships
        .route("/api/me/channels", get(rest_api::my_channels))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
