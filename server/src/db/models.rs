use serde::{Deserialize, Serialize};

/// A stored user account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}

/// A stored channel from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChannelRow {
    pub id: String,
    pub title: String,
    pub admin_user_id: String,
    pub is_private: i32,
    pub created_at: String,
}

/// A channel plus its current member count, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChannelSummaryRow {
    pub id: String,
    pub title: String,
    pub admin_user_id: String,
    pub is_private: i32,
    pub created_at: String,
    pub member_count: i64,
}

/// A channel membership record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MembershipRow {
    pub channel_id: String,
    pub user_id: String,
    pub joined_at: String,
}

/// A membership joined with the member's username, for member listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberRow {
    pub user_id: String,
    pub username: String,
    pub joined_at: String,
}

/// A pending request to join a private channel.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JoinRequestRow {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub created_at: String,
}

/// A join request joined with the requester's username, for admin review.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JoinRequestDetailRow {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub username: String,
    pub created_at: String,
}

/// A stored message from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRow {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}

/// A message joined with the sender's username, for history listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageDetailRow {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub created_at: String,
}
