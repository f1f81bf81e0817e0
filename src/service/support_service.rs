// service/support_service.rs
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{DBClient, SupportExt},
    dtos::{
        supportdtos::{CreateTicketDto, SupportIndexDto, TicketListItemDto},
        tenderdtos::total_pages,
    },
    models::supportmodel::{Ticket, TicketStatus, TicketWithUser},
    service::error::ServiceError,
};

pub const SUPPORT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone)]
pub struct SupportService {
    db_client: Arc<DBClient>,
}

impl SupportService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn my_tickets(&self, user_id: Uuid) -> Result<Vec<TicketListItemDto>, ServiceError> {
        let tickets = self.db_client.get_user_tickets(user_id).await?;
        Ok(tickets.iter().map(TicketListItemDto::from_ticket).collect())
    }

    pub async fn open_ticket(&self, user_id: Uuid, body: CreateTicketDto) -> Result<Ticket, ServiceError> {
        let ticket = self
            .db_client
            .create_ticket(user_id, body.issue_type, body.description, Utc::now().date_naive())
            .await?;
        tracing::info!("ticket {} opened by user {}", ticket.id, user_id);
        Ok(ticket)
    }

    /// A user's own ticket; anyone else gets `UnauthorizedAction`.
    pub async fn my_ticket(&self, user_id: Uuid, ticket_id: Uuid) -> Result<Ticket, ServiceError> {
        let ticket = self
            .db_client
            .get_ticket(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))?;
        if ticket.user_id != user_id {
            return Err(ServiceError::UnauthorizedAction);
        }
        Ok(ticket)
    }

    pub async fn edit_ticket(
        &self,
        user_id: Uuid,
        ticket_id: Uuid,
        body: CreateTicketDto,
    ) -> Result<Ticket, ServiceError> {
        let ticket = self.my_ticket(user_id, ticket_id).await?;
        if !ticket.is_editable_by(user_id) {
            return Err(ServiceError::Validation(
                "Only open tickets can be edited".to_string(),
            ));
        }

        self.db_client
            .update_open_ticket(ticket_id, user_id, body.issue_type, body.description)
            .await?
            .ok_or(ServiceError::Validation("Only open tickets can be edited".to_string()))
    }

    pub async fn withdraw_ticket(&self, user_id: Uuid, ticket_id: Uuid) -> Result<(), ServiceError> {
        let ticket = self.my_ticket(user_id, ticket_id).await?;
        if !ticket.is_editable_by(user_id) {
            return Err(ServiceError::Validation(
                "Only open tickets can be deleted".to_string(),
            ));
        }

        if !self.db_client.delete_open_ticket(ticket_id, user_id).await? {
            return Err(ServiceError::Validation(
                "Only open tickets can be deleted".to_string(),
            ));
        }
        tracing::info!("ticket {} withdrawn by user {}", ticket_id, user_id);
        Ok(())
    }

    pub async fn queue(&self, status: Option<TicketStatus>, page: u32) -> Result<SupportIndexDto, ServiceError> {
        let page = page.max(1);
        let offset = (page as i64 - 1) * SUPPORT_PAGE_SIZE;

        let tickets = self.db_client.get_tickets(status, SUPPORT_PAGE_SIZE, offset).await?;
        let total = self.db_client.count_tickets(status).await?;
        let counts = self.db_client.get_ticket_counts().await?;
        let support_members = self.db_client.get_support_members().await?;

        Ok(SupportIndexDto {
            tickets,
            counts,
            support_members,
            selected_status: status.map_or("all", |s| s.to_str()).to_string(),
            current_page: page,
            total_pages: total_pages(total, SUPPORT_PAGE_SIZE),
        })
    }

    pub async fn ticket(&self, ticket_id: Uuid) -> Result<TicketWithUser, ServiceError> {
        self.db_client
            .get_ticket_with_user(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))
    }

    pub async fn assign(&self, ticket_id: Uuid, cs_member_id: Uuid) -> Result<Ticket, ServiceError> {
        if self.db_client.get_support_member(cs_member_id).await?.is_none() {
            return Err(ServiceError::Validation(
                "Support member not found".to_string(),
            ));
        }

        let ticket = self
            .db_client
            .assign_ticket(ticket_id, cs_member_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))?;
        tracing::info!("ticket {} assigned to {}", ticket_id, cs_member_id);
        Ok(ticket)
    }

    pub async fn set_status(&self, ticket_id: Uuid, status: TicketStatus) -> Result<Ticket, ServiceError> {
        let closed_date = (status == TicketStatus::Closed).then(|| Utc::now().date_naive());
        self.db_client
            .update_ticket_status(ticket_id, status, closed_date)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))
    }

    /// Writes the ticket's single reply, replacing any earlier one.
    pub async fn reply(&self, ticket_id: Uuid, admin_id: Uuid, message: String) -> Result<Ticket, ServiceError> {
        let ticket = self.ticket(ticket_id).await?;
        let updated = if ticket.ticket.has_reply() {
            self.db_client.edit_ticket_reply(ticket_id, admin_id, message).await?
        } else {
            self.db_client.add_ticket_reply(ticket_id, admin_id, message).await?
        };
        updated.ok_or(ServiceError::TicketNotFound(ticket_id))
    }

    pub async fn remove_reply(&self, ticket_id: Uuid) -> Result<Ticket, ServiceError> {
        self.db_client
            .delete_ticket_reply(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))
    }
}
