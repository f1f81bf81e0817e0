// src/dtos/supportdtos.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    messagemodel::{MessageWithUsers, Recipient},
    supportmodel::{
        CustomerSupport, IssueTypeCount, Ticket, TicketCounts, TicketStatus, TicketWithUser,
        ISSUE_TYPES,
    },
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketDto {
    #[validate(
        length(min = 1, max = 100, message = "Issue type is required"),
        custom = "validate_issue_type"
    )]
    pub issue_type: String,
    #[validate(length(min = 1, max = 2000, message = "Description is required and cannot exceed 2000 characters"))]
    pub description: String,
}

fn validate_issue_type(issue_type: &str) -> Result<(), validator::ValidationError> {
    if ISSUE_TYPES.contains(&issue_type) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_issue_type"))
    }
}

#[derive(Debug, Deserialize)]
pub struct TicketStatusQueryDto {
    pub status: Option<String>,
    pub page: Option<u32>,
}

impl TicketStatusQueryDto {
    /// "all" and a missing value both mean no filter.
    pub fn status_filter(&self) -> Result<Option<TicketStatus>, String> {
        match self.status.as_deref() {
            None | Some("") | Some("all") => Ok(None),
            Some(raw) => TicketStatus::try_from(raw.to_string())
                .map(Some)
                .map_err(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignTicketDto {
    pub cs_member_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketStatusDto {
    pub status: TicketStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TicketReplyDto {
    #[validate(length(min = 1, max = 2000, message = "Reply message is required"))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageDto {
    pub receiver_id: Uuid,
    #[validate(length(min = 1, max = 1000, message = "Message is required and cannot exceed 1000 characters"))]
    pub message_text: String,
}

#[derive(Debug, Serialize)]
pub struct TicketListItemDto {
    pub id: Uuid,
    pub issue_type: Option<String>,
    pub description: String,
    pub status: TicketStatus,
    pub open_date: Option<chrono::NaiveDate>,
    pub closed_date: Option<chrono::NaiveDate>,
    pub has_reply: bool,
}

impl TicketListItemDto {
    pub fn from_ticket(ticket: &Ticket) -> Self {
        TicketListItemDto {
            id: ticket.id,
            issue_type: ticket.issue_type.clone(),
            description: crate::utils::stats::excerpt(
                ticket.description.as_deref().unwrap_or_default(),
                100,
            ),
            status: ticket.status,
            open_date: ticket.open_date,
            closed_date: ticket.closed_date,
            has_reply: ticket.has_reply(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageItemDto {
    #[serde(flatten)]
    pub message: MessageWithUsers,
    pub is_sent_by_me: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageIndexDto {
    pub messages: Vec<MessageItemDto>,
    pub recipients: Vec<Recipient>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct SupportIndexDto {
    pub tickets: Vec<TicketWithUser>,
    pub counts: TicketCounts,
    pub support_members: Vec<CustomerSupport>,
    pub selected_status: String,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Serialize)]
pub struct SupportStatisticsDto {
    pub counts: TicketCounts,
    pub by_issue_type: Vec<IssueTypeCount>,
    pub recent_tickets: Vec<TicketWithUser>,
    pub average_response_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_issue_type_is_rejected() {
        let dto = CreateTicketDto {
            issue_type: "Billing".to_string(),
            description: "Charged twice".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = CreateTicketDto {
            issue_type: "Payment Problem".to_string(),
            description: "Charged twice".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn all_status_means_no_filter() {
        let query = TicketStatusQueryDto { status: Some("all".to_string()), page: None };
        assert_eq!(query.status_filter(), Ok(None));

        let query = TicketStatusQueryDto { status: Some("In Progress".to_string()), page: None };
        assert_eq!(query.status_filter(), Ok(Some(TicketStatus::InProgress)));

        let query = TicketStatusQueryDto { status: Some("Pending".to_string()), page: None };
        assert!(query.status_filter().is_err());
    }
}
