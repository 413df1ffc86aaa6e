use sqlx::SqliteExecutor;

use crate::db::models::UserRow;

/// Insert a new user account.
pub async fn create_user(
    ex: impl SqliteExecutor<'_>,
    id: &str,
    username: &str,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (id, username, password_hash) VALUES (?, ?, ?)")
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .execute(ex)
        .await?;
    Ok(())
}

/// Get a user by ID.
pub async fn get_user(
    ex: impl SqliteExecutor<'_>,
    user_id: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(ex)
        .await
}

/// Get a user by username.
pub async fn get_user_by_username(
    ex: impl SqliteExecutor<'_>,
    username: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(ex)
        .await
}
