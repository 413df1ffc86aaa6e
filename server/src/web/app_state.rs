use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::config::AuthConfig;
use crate::engine::channel_engine::ChannelEngine;
use crate::engine::context::Notifier;

/// Shared state for the web server.
pub struct AppState {
    pub engine: Arc<ChannelEngine>,
    pub db: SqlitePool,
    pub auth_config: AuthConfig,
    pub notifier: Arc<dyn Notifier>,
}
