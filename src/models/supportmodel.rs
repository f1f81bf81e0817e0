// src/models/supportmodel.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownVariant;

pub const ISSUE_TYPES: [&str; 7] = [
    "Technical Issue",
    "Payment Problem",
    "Account Issue",
    "Tender/Bid Related",
    "Contract Issue",
    "Feedback/Review",
    "Other",
];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl TicketStatus {
    pub fn to_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Closed => "Closed",
        }
    }
}

impl TryFrom<String> for TicketStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Open" => Ok(TicketStatus::Open),
            "In Progress" => Ok(TicketStatus::InProgress),
            "Closed" => Ok(TicketStatus::Closed),
            _ => Err(UnknownVariant::new("ticket_status", value)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub issue_type: Option<String>,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: TicketStatus,
    pub open_date: Option<NaiveDate>,
    pub closed_date: Option<NaiveDate>,
    pub cs_member_id: Option<Uuid>,
    pub reply_message: Option<String>,
    pub reply_date: Option<DateTime<Utc>>,
    pub reply_user_id: Option<Uuid>,
}

impl Ticket {
    /// Owners may only edit or withdraw a ticket nobody has picked up yet.
    pub fn is_editable_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id && self.status == TicketStatus::Open
    }

    pub fn has_reply(&self) -> bool {
        self.reply_message.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct TicketWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ticket: Ticket,
    pub user_name: String,
    pub user_email: String,
    pub cs_member_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct CustomerSupport {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct IssueTypeCount {
    pub issue_type: Option<String>,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, Default)]
pub struct TicketCounts {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub closed: i64,
    pub replied: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(owner: Uuid, status: TicketStatus) -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            user_id: owner,
            issue_type: Some("Other".to_string()),
            description: None,
            status,
            open_date: None,
            closed_date: None,
            cs_member_id: None,
            reply_message: None,
            reply_date: None,
            reply_user_id: None,
        }
    }

    #[test]
    fn in_progress_uses_spaced_label() {
        assert_eq!(TicketStatus::InProgress.to_str(), "In Progress");
        assert_eq!(
            TicketStatus::try_from("In Progress".to_string()),
            Ok(TicketStatus::InProgress)
        );
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
    }

    #[test]
    fn only_owner_of_open_ticket_can_edit() {
        let owner = Uuid::new_v4();
        assert!(ticket(owner, TicketStatus::Open).is_editable_by(owner));
        assert!(!ticket(owner, TicketStatus::InProgress).is_editable_by(owner));
        assert!(!ticket(owner, TicketStatus::Open).is_editable_by(Uuid::new_v4()));
    }
}
