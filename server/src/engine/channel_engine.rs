use std::sync::Arc;

use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::models::{
    ChannelRow, ChannelSummaryRow, JoinRequestDetailRow, MemberRow, MessageDetailRow,
};
use crate::db::queries::{channels, join_requests, memberships, messages};
use crate::engine::context::{RequestContext, Severity};
use crate::engine::error::{EngineError, is_unique_violation};
use crate::engine::succession::SuccessorPicker;
use crate::engine::validation::{ValidChannel, ValidMessage};

/// Admin decision on a pending join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

/// Outcome of a join attempt: public channels admit directly, private
/// channels leave the caller with a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    RequestPending,
}

/// Outcome of a channel edit, for notification text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    RequestsProcessed(usize),
}

/// The central hub for channel membership and messaging. Stateless across
/// requests — the database is the only shared resource, and every
/// multi-step mutation runs inside a single transaction.
pub struct ChannelEngine {
    db: SqlitePool,
    picker: Arc<dyn SuccessorPicker>,
}

impl ChannelEngine {
    pub fn new(db: SqlitePool, picker: Arc<dyn SuccessorPicker>) -> Self {
        Self { db, picker }
    }

    // ── Channel lifecycle ───────────────────────────────────────────

    /// Create a channel with the caller as admin and first member.
    /// Returns the new channel ID.
    pub async fn create_channel(
        &self,
        ctx: &RequestContext,
        input: ValidChannel,
    ) -> Result<String, EngineError> {
        let channel_id = Uuid::new_v4().to_string();

        // Channel row and creator membership commit together: a channel
        // must never exist without its admin being a member.
        let mut tx = self.db.begin().await?;
        channels::create_channel(
            &mut *tx,
            &channel_id,
            &input.title,
            &ctx.user_id,
            input.is_private,
        )
        .await?;
        memberships::add_member(&mut *tx, &channel_id, &ctx.user_id).await?;
        tx.commit().await?;

        info!(%channel_id, title = %input.title, admin = %ctx.user_id, "channel created");
        ctx.notify(Severity::Success, "Channel created successfully.");
        Ok(channel_id)
    }

    /// Edit a channel's title and visibility. Only the admin may edit.
    /// Flipping a private channel public approves all pending join
    /// requests inside the same transaction as the edit.
    pub async fn edit_channel(
        &self,
        ctx: &RequestContext,
        channel_id: &str,
        input: ValidChannel,
    ) -> Result<EditOutcome, EngineError> {
        let channel = channels::get_channel(&self.db, channel_id)
            .await?
            .ok_or(EngineError::NotFound("channel"))?;
        if channel.admin_user_id != ctx.user_id {
            return Err(EngineError::Unauthorized);
        }

        let going_public = channel.is_private != 0 && !input.is_private;

        let mut tx = self.db.begin().await?;
        let mut approved = 0usize;
        if going_public {
            for request in join_requests::list_pending(&mut *tx, channel_id).await? {
                memberships::add_member(&mut *tx, channel_id, &request.user_id).await?;
                join_requests::delete_request(&mut *tx, &request.id).await?;
                approved += 1;
            }
        }
        channels::update_channel(&mut *tx, channel_id, &input.title, input.is_private).await?;
        tx.commit().await?;

        info!(%channel_id, approved, "channel updated");
        if going_public {
            ctx.notify(
                Severity::Success,
                "Channel updated successfully. Join requests are processed.",
            );
            Ok(EditOutcome::RequestsProcessed(approved))
        } else {
            ctx.notify(Severity::Success, "Channel updated successfully.");
            Ok(EditOutcome::Updated)
        }
    }

    /// Delete a channel and everything in it. Only the admin may delete.
    pub async fn delete_channel(
        &self,
        ctx: &RequestContext,
        channel_id: &str,
    ) -> Result<(), EngineError> {
        let channel = channels::get_channel(&self.db, channel_id)
            .await?
            .ok_or(EngineError::NotFound("channel"))?;
        if channel.admin_user_id != ctx.user_id {
            return Err(EngineError::Unauthorized);
        }

        let mut tx = self.db.begin().await?;
        Self::cascade_delete(&mut tx, channel_id).await?;
        tx.commit().await?;

        info!(%channel_id, "channel deleted");
        ctx.notify(Severity::Success, "Channel deleted successfully.");
        Ok(())
    }

    /// Leave a channel. A departing admin hands the channel to one of the
    /// remaining members, picked by the injected successor port; the sole
    /// remaining member takes the channel down with them. Succession and
    /// membership removal commit as one unit, so the channel is never
    /// observable without an admin-member.
    pub async fn leave_channel(
        &self,
        ctx: &RequestContext,
        channel_id: &str,
    ) -> Result<(), EngineError> {
        let channel = channels::get_channel(&self.db, channel_id)
            .await?
            .ok_or(EngineError::NotFound("channel"))?;

        let mut tx = self.db.begin().await?;
        if !memberships::is_member(&mut *tx, channel_id, &ctx.user_id).await? {
            return Err(EngineError::NotMember);
        }

        if channel.admin_user_id == ctx.user_id {
            if memberships::member_count(&mut *tx, channel_id).await? == 1 {
                Self::cascade_delete(&mut tx, channel_id).await?;
                tx.commit().await?;

                info!(%channel_id, user = %ctx.user_id, "admin left; channel deleted");
                ctx.notify(Severity::Success, "You have left the channel successfully.");
                return Ok(());
            }

            let others = memberships::other_member_ids(&mut *tx, channel_id, &ctx.user_id).await?;
            let successor = self
                .picker
                .pick(&others)
                .ok_or(EngineError::NotFound("replacement admin"))?;
            channels::set_admin(&mut *tx, channel_id, &successor).await?;
            info!(%channel_id, %successor, "channel admin reassigned");
        }

        memberships::remove_member(&mut *tx, channel_id, &ctx.user_id).await?;
        tx.commit().await?;

        info!(%channel_id, user = %ctx.user_id, "left channel");
        ctx.notify(Severity::Success, "You have left the channel successfully.");
        Ok(())
    }

    /// Delete a channel's messages, join requests, and memberships, then
    /// the channel itself, within the caller's transaction.
    async fn cascade_delete(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        channel_id: &str,
    ) -> Result<(), EngineError> {
        messages::delete_for_channel(&mut **tx, channel_id).await?;
        join_requests::delete_for_channel(&mut **tx, channel_id).await?;
        memberships::delete_for_channel(&mut **tx, channel_id).await?;
        channels::delete_channel(&mut **tx, channel_id).await?;
        Ok(())
    }

    // ── Join requests ───────────────────────────────────────────────

    /// Ask to join a channel. Public channels admit directly; private
    /// channels record a pending request for the admin to decide.
    pub async fn request_join(
        &self,
        ctx: &RequestContext,
        channel_id: &str,
    ) -> Result<JoinOutcome, EngineError> {
        let channel = channels::get_channel(&self.db, channel_id)
            .await?
            .ok_or(EngineError::NotFound("channel"))?;

        if memberships::is_member(&self.db, channel_id, &ctx.user_id).await? {
            return Err(EngineError::AlreadyMember);
        }
        if join_requests::has_pending(&self.db, channel_id, &ctx.user_id).await? {
            return Err(EngineError::AlreadyPending);
        }

        if channel.is_private != 0 {
            let request_id = Uuid::new_v4().to_string();
            // A concurrent duplicate loses the race on the UNIQUE
            // constraint and surfaces as AlreadyPending.
            match join_requests::create_request(&self.db, &request_id, channel_id, &ctx.user_id)
                .await
            {
                Err(e) if is_unique_violation(&e) => return Err(EngineError::AlreadyPending),
                other => other?,
            }

            info!(%channel_id, user = %ctx.user_id, "join request created");
            ctx.notify(
                Severity::Success,
                "Your join request has been sent to the channel.",
            );
            Ok(JoinOutcome::RequestPending)
        } else {
            match memberships::add_member(&self.db, channel_id, &ctx.user_id).await {
                Err(e) if is_unique_violation(&e) => return Err(EngineError::AlreadyMember),
                other => other?,
            }

            info!(%channel_id, user = %ctx.user_id, "joined public channel");
            ctx.notify(Severity::Success, "You have successfully joined the channel.");
            Ok(JoinOutcome::Joined)
        }
    }

    /// Approve or reject a pending join request. Decisions from anyone
    /// but the channel admin are ignored without error. Returns the
    /// channel ID the request belonged to.
    pub async fn decide_request(
        &self,
        ctx: &RequestContext,
        request_id: &str,
        decision: Decision,
    ) -> Result<String, EngineError> {
        let request = join_requests::get_request(&self.db, request_id)
            .await?
            .ok_or(EngineError::NotFound("join request"))?;
        let channel = channels::get_channel(&self.db, &request.channel_id)
            .await?
            .ok_or(EngineError::NotFound("channel"))?;

        if channel.admin_user_id != ctx.user_id {
            warn!(%request_id, user = %ctx.user_id, "ignoring decision from non-admin");
            return Ok(request.channel_id);
        }

        match decision {
            Decision::Approve => {
                // Membership creation and request removal commit together,
                // keeping member/pending states mutually exclusive.
                let mut tx = self.db.begin().await?;
                match memberships::add_member(&mut *tx, &request.channel_id, &request.user_id).await
                {
                    Err(e) if is_unique_violation(&e) => return Err(EngineError::AlreadyMember),
                    other => other?,
                }
                join_requests::delete_request(&mut *tx, request_id).await?;
                tx.commit().await?;

                info!(%request_id, channel = %request.channel_id, user = %request.user_id, "join request approved");
                ctx.notify(Severity::Success, "Join request approved.");
            }
            Decision::Reject => {
                join_requests::delete_request(&self.db, request_id).await?;

                info!(%request_id, channel = %request.channel_id, user = %request.user_id, "join request rejected");
                ctx.notify(Severity::Success, "Join request rejected.");
            }
        }
        Ok(request.channel_id)
    }

    /// Pending join requests for a channel. Admin only.
    pub async fn list_join_requests(
        &self,
        ctx: &RequestContext,
        channel_id: &str,
    ) -> Result<Vec<JoinRequestDetailRow>, EngineError> {
        let channel = channels::get_channel(&self.db, channel_id)
            .await?
            .ok_or(EngineError::NotFound("channel"))?;
        if channel.admin_user_id != ctx.user_id {
            return Err(EngineError::Unauthorized);
        }
        Ok(join_requests::list_pending_details(&self.db, channel_id).await?)
    }

    // ── Access gate & messaging ─────────────────────────────────────

    /// Whether a user may view and post in a channel: members only.
    pub async fn can_view(&self, user_id: &str, channel_id: &str) -> Result<bool, EngineError> {
        Ok(memberships::is_member(&self.db, channel_id, user_id).await?)
    }

    /// Fetch a channel for viewing. Non-members are turned away with
    /// Unauthorized, which the web layer renders as a redirect to the
    /// public listing.
    pub async fn view_channel(
        &self,
        user_id: &str,
        channel_id: &str,
    ) -> Result<ChannelRow, EngineError> {
        let channel = channels::get_channel(&self.db, channel_id)
            .await?
            .ok_or(EngineError::NotFound("channel"))?;
        if !self.can_view(user_id, channel_id).await? {
            return Err(EngineError::Unauthorized);
        }
        Ok(channel)
    }

    /// Append a message to a channel the caller is a member of.
    /// Returns the new message ID.
    pub async fn post_message(
        &self,
        ctx: &RequestContext,
        channel_id: &str,
        input: ValidMessage,
    ) -> Result<String, EngineError> {
        channels::get_channel(&self.db, channel_id)
            .await?
            .ok_or(EngineError::NotFound("channel"))?;
        if !self.can_view(&ctx.user_id, channel_id).await? {
            return Err(EngineError::Unauthorized);
        }

        let message_id = Uuid::new_v4().to_string();
        messages::insert_message(&self.db, &message_id, channel_id, &ctx.user_id, &input.content)
            .await?;

        info!(%channel_id, user = %ctx.user_id, %message_id, "message posted");
        Ok(message_id)
    }

    /// Fetch message history for a channel the caller is a member of,
    /// newest first. Returns the page and whether older messages remain.
    pub async fn message_history(
        &self,
        user_id: &str,
        channel_id: &str,
        before: Option<&str>,
        limit: i64,
    ) -> Result<(Vec<MessageDetailRow>, bool), EngineError> {
        channels::get_channel(&self.db, channel_id)
            .await?
            .ok_or(EngineError::NotFound("channel"))?;
        if !self.can_view(user_id, channel_id).await? {
            return Err(EngineError::Unauthorized);
        }

        // Fetch one extra row to learn whether more history remains.
        let mut rows = messages::fetch_history(&self.db, channel_id, before, limit + 1).await?;
        let has_more = rows.len() as i64 > limit;
        rows.truncate(limit as usize);
        Ok((rows, has_more))
    }

    // ── Listings ────────────────────────────────────────────────────

    /// All channels with member counts, newest first.
    pub async fn list_channels(&self) -> Result<Vec<ChannelSummaryRow>, EngineError> {
        Ok(channels::list_channels(&self.db).await?)
    }

    /// Channels the user belongs to, most recently joined first.
    pub async fn list_user_channels(
        &self,
        user_id: &str,
    ) -> Result<Vec<ChannelSummaryRow>, EngineError> {
        Ok(memberships::list_user_channels(&self.db, user_id).await?)
    }

    /// Members of a channel, optionally filtered by username substring.
    pub async fn list_members(
        &self,
        channel_id: &str,
        username_filter: Option<&str>,
    ) -> Result<Vec<MemberRow>, EngineError> {
        channels::get_channel(&self.db, channel_id)
            .await?
            .ok_or(EngineError::NotFound("channel"))?;
        Ok(memberships::list_members(&self.db, channel_id, username_filter).await?)
    }
}
