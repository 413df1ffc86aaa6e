use sqlx::SqliteExecutor;

use crate::db::models::MessageDetailRow;

/// Insert a new channel message.
pub async fn insert_message(
    ex: impl SqliteExecutor<'_>,
    id: &str,
    channel_id: &str,
    user_id: &str,
    content: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO messages (id, channel_id, user_id, content) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(channel_id)
        .bind(user_id)
        .bind(content)
        .execute(ex)
        .await?;
    Ok(())
}

/// Fetch channel message history with cursor-based pagination.
/// Returns messages before `before_time`, ordered newest first.
pub async fn fetch_history(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
    before_time: Option<&str>,
    limit: i64,
) -> Result<Vec<MessageDetailRow>, sqlx::Error> {
    match before_time {
        Some(before) => {
            sqlx::query_as::<_, MessageDetailRow>(
                "SELECT m.id, m.channel_id, m.user_id, u.username, m.content, m.created_at \
                 FROM messages m \
                 JOIN users u ON u.id = m.user_id \
                 WHERE m.channel_id = ? AND m.created_at < ? \
                 ORDER BY m.created_at DESC, m.id DESC \
                 LIMIT ?",
            )
            .bind(channel_id)
            .bind(before)
            .bind(limit)
            .fetch_all(ex)
            .await
        }
        None => {
            sqlx::query_as::<_, MessageDetailRow>(
                "SELECT m.id, m.channel_id, m.user_id, u.username, m.content, m.created_at \
                 FROM messages m \
                 JOIN users u ON u.id = m.user_id \
                 WHERE m.channel_id = ? \
                 ORDER BY m.created_at DESC, m.id DESC \
                 LIMIT ?",
            )
            .bind(channel_id)
            .bind(limit)
            .fetch_all(ex)
            .await
        }
    }
}

/// Delete all messages of a channel (channel deletion cascade).
pub async fn delete_for_channel(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM messages WHERE channel_id = ?")
        .bind(channel_id)
        .execute(ex)
        .await?;
    Ok(())
}
