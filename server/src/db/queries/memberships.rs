use sqlx::SqliteExecutor;

use crate::db::models::{ChannelSummaryRow, MemberRow};

/// Add a member to a channel. Fails with a uniqueness violation if the
/// membership already exists.
pub async fn add_member(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO memberships (channel_id, user_id) VALUES (?, ?)")
        .bind(channel_id)
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Remove a member from a channel.
pub async fn remove_member(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM memberships WHERE channel_id = ? AND user_id = ?")
        .bind(channel_id)
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Check whether a user is a member of a channel.
pub async fn is_member(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM memberships WHERE channel_id = ? AND user_id = ?",
    )
    .bind(channel_id)
    .bind(user_id)
    .fetch_one(ex)
    .await
}

/// Count the current members of a channel.
pub async fn member_count(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM memberships WHERE channel_id = ?")
        .bind(channel_id)
        .fetch_one(ex)
        .await
}

/// User IDs of all channel members except the given user.
pub async fn other_member_ids(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
    excluding_user_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT user_id FROM memberships \
         WHERE channel_id = ? AND user_id != ? \
         ORDER BY joined_at, user_id",
    )
    .bind(channel_id)
    .bind(excluding_user_id)
    .fetch_all(ex)
    .await
}

/// List channel members with usernames, newest joiners first.
/// An optional filter restricts to usernames containing the substring.
pub async fn list_members(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
    username_filter: Option<&str>,
) -> Result<Vec<MemberRow>, sqlx::Error> {
    match username_filter {
        Some(q) => {
            sqlx::query_as::<_, MemberRow>(
                "SELECT m.user_id, u.username, m.joined_at \
                 FROM memberships m \
                 JOIN users u ON u.id = m.user_id \
                 WHERE m.channel_id = ? AND u.username LIKE '%' || ? || '%' \
                 ORDER BY m.joined_at DESC, u.username",
            )
            .bind(channel_id)
            .bind(q)
            .fetch_all(ex)
            .await
        }
        None => {
            sqlx::query_as::<_, MemberRow>(
                "SELECT m.user_id, u.username, m.joined_at \
                 FROM memberships m \
                 JOIN users u ON u.id = m.user_id \
                 WHERE m.channel_id = ? \
                 ORDER BY m.joined_at DESC, u.username",
            )
            .bind(channel_id)
            .fetch_all(ex)
            .await
        }
    }
}

/// List the channels a user belongs to, most recently joined first.
pub async fn list_user_channels(
    ex: impl SqliteExecutor<'_>,
    user_id: &str,
) -> Result<Vec<ChannelSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, ChannelSummaryRow>(
        "SELECT c.*, \
            (SELECT COUNT(*) FROM memberships mc WHERE mc.channel_id = c.id) AS member_count \
         FROM channels c \
         JOIN memberships m ON m.channel_id = c.id \
         WHERE m.user_id = ? \
         ORDER BY m.joined_at DESC, c.id",
    )
    .bind(user_id)
    .fetch_all(ex)
    .await
}

/// Delete all memberships of a channel (channel deletion cascade).
pub async fn delete_for_channel(
    ex: impl SqliteExecutor<'_>,
    channel_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM memberships WHERE channel_id = ?")
        .bind(channel_id)
        .execute(ex)
        .await?;
    Ok(())
}
