// src/db/messagedb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DBClient;
use crate::models::messagemodel::{Message, MessageWithUsers, Notification, Recipient};

#[async_trait]
pub trait MessageExt {
    /// Messages the user sent or received, newest first.
    async fn get_user_messages(&self, user_id: Uuid) -> Result<Vec<MessageWithUsers>, sqlx::Error>;

    async fn send_message(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        message_text: String,
    ) -> Result<Message, sqlx::Error>;

    async fn count_unread_messages(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn mark_message_read(
        &self,
        message_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Option<Message>, sqlx::Error>;

    async fn get_recipients(&self, exclude_user_id: Uuid) -> Result<Vec<Recipient>, sqlx::Error>;

    async fn get_notifications(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error>;
}

#[async_trait]
impl MessageExt for DBClient {
    async fn get_user_messages(&self, user_id: Uuid) -> Result<Vec<MessageWithUsers>, sqlx::Error> {
        sqlx::query_as::<_, MessageWithUsers>(
            r#"
            SELECT m.*,
                   su.name AS sender_name,
                   ru.name AS receiver_name
            FROM messages m
            JOIN users su ON su.id = m.sender_id
            JOIN users ru ON ru.id = m.receiver_id
            WHERE m.sender_id = $1 OR m.receiver_id = $1
            ORDER BY m.sent_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn send_message(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        message_text: String,
    ) -> Result<Message, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_id, receiver_id, message_text, is_read)
            VALUES ($1, $2, $3, FALSE)
            RETURNING *
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(message_text)
        .fetch_one(&self.pool)
        .await
    }

    async fn count_unread_messages(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_message_read(
        &self,
        message_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Option<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r#"
            UPDATE messages
            SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND receiver_id = $2
            RETURNING *
            "#,
        )
        .bind(message_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_recipients(&self, exclude_user_id: Uuid) -> Result<Vec<Recipient>, sqlx::Error> {
        sqlx::query_as::<_, Recipient>(
            "SELECT id, name, user_type FROM users WHERE id <> $1 ORDER BY name",
        )
        .bind(exclude_user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_notifications(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM (
                SELECT 'bid_review' AS kind,
                       'Your bid on ' || t.title || ' was '
                           || CASE WHEN bd.is_approved THEN 'approved' ELSE 'rejected' END AS title,
                       bd.id AS reference_id,
                       COALESCE(bd.approved_at, bd.rejected_at) AS created_at
                FROM bids bd
                JOIN sellers s ON s.id = bd.seller_id
                JOIN tenders t ON t.id = bd.tender_id
                WHERE s.user_id = $1
                  AND COALESCE(bd.approved_at, bd.rejected_at) >= $2

                UNION ALL

                SELECT 'new_bid',
                       'New bid from ' || s.seller_name || ' on ' || t.title,
                       bd.id,
                       bd.submission_date::timestamptz
                FROM bids bd
                JOIN tenders t ON t.id = bd.tender_id
                JOIN buyers b ON b.id = t.buyer_id
                JOIN sellers s ON s.id = bd.seller_id
                WHERE b.user_id = $1
                  AND bd.submission_date >= $2::date

                UNION ALL

                SELECT 'ticket_reply',
                       'Support replied to your ticket: ' || COALESCE(tk.issue_type, 'Other'),
                       tk.id,
                       tk.reply_date
                FROM tickets tk
                WHERE tk.user_id = $1
                  AND tk.reply_date >= $2
            ) n
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
