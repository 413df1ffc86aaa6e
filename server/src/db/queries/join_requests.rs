use sqlx::SqliteExecutor;

use crate::db::models::{JoinRequestDetailRow, JoinRequestRow};

/// Insert a pending join request. Fails with a uniqueness violation if one
/// already exists for the (channel, user) pair.
pub async fn create_request(
    ex: impl SqliteExecutor<'_>,
    id: &str,
    channel_id: &str,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO join_requests (id, channel_id, user_id) VALUES (?, ?, ?)")
        .bind(id)
        .bind(channel_id)
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Get a join request by ID.
pub async fn get_request(
    ex: impl SqliteExecutor<'_>,
    request_id: &str,
) -> Result<Option<JoinRequestRow>, sqlx::Error> {
    sqlx::query_as::<_, JoinRequestRow>("SELECT * FROM join_requests WHERE id = ?")
        .bind(request_id)
        .fetch_optional(ex)
        .await
}

/// Check whether a user has a pending request on a channel.
pub async fn has_pending(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM join_requests WHERE channel_id = ? AND user_id = ?",
    )
    .bind(channel_id)
    .bind(user_id)
    .fetch_one(ex)
    .await
}

/// Delete a join request by ID.
pub async fn delete_request(
    ex: impl SqliteExecutor<'_>,
    request_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM join_requests WHERE id = ?")
        .bind(request_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// All pending requests on a channel, oldest first (bulk-approve order).
pub async fn list_pending(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
) -> Result<Vec<JoinRequestRow>, sqlx::Error> {
    sqlx::query_as::<_, JoinRequestRow>(
        "SELECT * FROM join_requests WHERE channel_id = ? ORDER BY created_at, id",
    )
    .bind(channel_id)
    .fetch_all(ex)
    .await
}

/// Pending requests with requester usernames, newest first (admin review).
pub async fn list_pending_details(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
) -> Result<Vec<JoinRequestDetailRow>, sqlx::Error> {
    sqlx::query_as::<_, JoinRequestDetailRow>(
        "SELECT r.id, r.channel_id, r.user_id, u.username, r.created_at \
         FROM join_requests r \
         JOIN users u ON u.id = r.user_id \
         WHERE r.channel_id = ? \
         ORDER BY r.created_at DESC, r.id",
    )
    .bind(channel_id)
    .fetch_all(ex)
    .await
}

/// Delete all join requests of a channel (channel deletion cascade).
pub async fn delete_for_channel(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM join_requests WHERE channel_id = ?")
        .bind(channel_id)
        .execute(ex)
        .await?;
    Ok(())
}
