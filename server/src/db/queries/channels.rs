use sqlx::SqliteExecutor;

use crate::db::models::{ChannelRow, ChannelSummaryRow};

/// Insert a new channel.
pub async fn create_channel(
    ex: impl SqliteExecutor<'_>,
    id: &str,
    title: &str,
    admin_user_id: &str,
    is_private: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO channels (id, title, admin_user_id, is_private) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(title)
        .bind(admin_user_id)
        .bind(is_private)
        .execute(ex)
        .await?;
    Ok(())
}

/// Get a channel by its ID.
pub async fn get_channel(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
) -> Result<Option<ChannelRow>, sqlx::Error> {
    sqlx::query_as::<_, ChannelRow>("SELECT * FROM channels WHERE id = ?")
        .bind(channel_id)
        .fetch_optional(ex)
        .await
}

/// Update a channel's title and visibility.
pub async fn update_channel(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
    title: &str,
    is_private: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE channels SET title = ?, is_private = ? WHERE id = ?")
        .bind(title)
        .bind(is_private)
        .bind(channel_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Reassign the channel admin.
pub async fn set_admin(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE channels SET admin_user_id = ? WHERE id = ?")
        .bind(user_id)
        .bind(channel_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Delete a channel row. Associated memberships, join requests, and
/// messages are deleted explicitly by the lifecycle transaction.
pub async fn delete_channel(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM channels WHERE id = ?")
        .bind(channel_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// List all channels with their member counts, newest first.
pub async fn list_channels(
    ex: impl SqliteExecutor<'_>,
) -> Result<Vec<ChannelSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, ChannelSummaryRow>(
        "SELECT c.*, COUNT(m.user_id) AS member_count \
         FROM channels c \
         LEFT JOIN memberships m ON m.channel_id = c.id \
         GROUP BY c.id \
         ORDER BY c.created_at DESC, c.id",
    )
    .fetch_all(ex)
    .await
}
