use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub message_text: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct MessageWithUsers {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub message: Message,
    pub sender_name: String,
    pub receiver_name: String,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Recipient {
    pub id: Uuid,
    pub name: String,
    pub user_type: String,
}

/// Something that happened to the user recently: a bid decision, a new bid
/// on one of their tenders, or a support reply.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Notification {
    pub kind: String,
    pub title: String,
    pub reference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
