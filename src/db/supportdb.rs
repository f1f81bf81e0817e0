// src/db/supportdb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Error;
use uuid::Uuid;

use super::DBClient;
use crate::models::supportmodel::*;

#[async_trait]
pub trait SupportExt {
    async fn create_ticket(
        &self,
        user_id: Uuid,
        issue_type: String,
        description: String,
        open_date: NaiveDate,
    ) -> Result<Ticket, Error>;

    async fn get_ticket(&self, ticket_id: Uuid) -> Result<Option<Ticket>, Error>;

    async fn get_ticket_with_user(&self, ticket_id: Uuid) -> Result<Option<TicketWithUser>, Error>;

    async fn get_user_tickets(&self, user_id: Uuid) -> Result<Vec<Ticket>, Error>;

    /// Rewrites an owner's ticket while nobody has picked it up yet.
    async fn update_open_ticket(
        &self,
        ticket_id: Uuid,
        user_id: Uuid,
        issue_type: String,
        description: String,
    ) -> Result<Option<Ticket>, Error>;

    async fn delete_open_ticket(&self, ticket_id: Uuid, user_id: Uuid) -> Result<bool, Error>;

    async fn get_tickets(
        &self,
        status: Option<TicketStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TicketWithUser>, Error>;

    async fn count_tickets(&self, status: Option<TicketStatus>) -> Result<i64, Error>;

    async fn get_ticket_counts(&self) -> Result<TicketCounts, Error>;

    async fn get_support_members(&self) -> Result<Vec<CustomerSupport>, Error>;

    async fn get_support_member(&self, member_id: Uuid) -> Result<Option<CustomerSupport>, Error>;

    async fn assign_ticket(
        &self,
        ticket_id: Uuid,
        cs_member_id: Uuid,
    ) -> Result<Option<Ticket>, Error>;

    async fn update_ticket_status(
        &self,
        ticket_id: Uuid,
        status: TicketStatus,
        closed_date: Option<NaiveDate>,
    ) -> Result<Option<Ticket>, Error>;

    async fn add_ticket_reply(
        &self,
        ticket_id: Uuid,
        reply_user_id: Uuid,
        message: String,
    ) -> Result<Option<Ticket>, Error>;

    async fn edit_ticket_reply(
        &self,
        ticket_id: Uuid,
        reply_user_id: Uuid,
        message: String,
    ) -> Result<Option<Ticket>, Error>;

    async fn delete_ticket_reply(&self, ticket_id: Uuid) -> Result<Option<Ticket>, Error>;

    async fn get_issue_type_counts(&self) -> Result<Vec<IssueTypeCount>, Error>;

    async fn get_recent_tickets(&self, limit: i64) -> Result<Vec<TicketWithUser>, Error>;

    /// Mean hours between opening and reply over replied tickets.
    async fn get_average_response_hours(&self) -> Result<Option<f64>, Error>;
}

const TICKET_WITH_USER_SELECT: &str = r#"
    SELECT tk.*,
           u.name AS user_name,
           u.email AS user_email,
           NULLIF(TRIM(CONCAT(cs.first_name, ' ', cs.last_name)), '') AS cs_member_name
    FROM tickets tk
    JOIN users u ON u.id = tk.user_id
    LEFT JOIN customer_support cs ON cs.id = tk.cs_member_id
"#;

#[async_trait]
impl SupportExt for DBClient {
    async fn create_ticket(
        &self,
        user_id: Uuid,
        issue_type: String,
        description: String,
        open_date: NaiveDate,
    ) -> Result<Ticket, Error> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (user_id, issue_type, description, status, open_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(issue_type)
        .bind(description)
        .bind(TicketStatus::Open.to_str())
        .bind(open_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn get_ticket(&self, ticket_id: Uuid) -> Result<Option<Ticket>, Error> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_ticket_with_user(&self, ticket_id: Uuid) -> Result<Option<TicketWithUser>, Error> {
        let query = format!("{} WHERE tk.id = $1", TICKET_WITH_USER_SELECT);

        sqlx::query_as::<_, TicketWithUser>(&query)
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_user_tickets(&self, user_id: Uuid) -> Result<Vec<Ticket>, Error> {
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE user_id = $1 ORDER BY open_date DESC NULLS LAST",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_open_ticket(
        &self,
        ticket_id: Uuid,
        user_id: Uuid,
        issue_type: String,
        description: String,
    ) -> Result<Option<Ticket>, Error> {
        sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET issue_type = $3, description = $4
            WHERE id = $1 AND user_id = $2 AND status = 'Open'
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(user_id)
        .bind(issue_type)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_open_ticket(&self, ticket_id: Uuid, user_id: Uuid) -> Result<bool, Error> {
        let result = sqlx::query(
            "DELETE FROM tickets WHERE id = $1 AND user_id = $2 AND status = 'Open'",
        )
        .bind(ticket_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_tickets(
        &self,
        status: Option<TicketStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TicketWithUser>, Error> {
        let query = format!(
            "{} WHERE ($1::text IS NULL OR tk.status = $1) ORDER BY tk.open_date DESC NULLS LAST LIMIT $2 OFFSET $3",
            TICKET_WITH_USER_SELECT
        );

        sqlx::query_as::<_, TicketWithUser>(&query)
            .bind(status.map(|s| s.to_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn count_tickets(&self, status: Option<TicketStatus>) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tickets WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.to_str()))
        .fetch_one(&self.pool)
        .await
    }

    async fn get_ticket_counts(&self) -> Result<TicketCounts, Error> {
        sqlx::query_as::<_, TicketCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'Open') AS open,
                COUNT(*) FILTER (WHERE status = 'In Progress') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'Closed') AS closed,
                COUNT(*) FILTER (WHERE reply_message IS NOT NULL) AS replied
            FROM tickets
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn get_support_members(&self) -> Result<Vec<CustomerSupport>, Error> {
        sqlx::query_as::<_, CustomerSupport>(
            "SELECT * FROM customer_support ORDER BY first_name, last_name",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_support_member(&self, member_id: Uuid) -> Result<Option<CustomerSupport>, Error> {
        sqlx::query_as::<_, CustomerSupport>("SELECT * FROM customer_support WHERE id = $1")
            .bind(member_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn assign_ticket(
        &self,
        ticket_id: Uuid,
        cs_member_id: Uuid,
    ) -> Result<Option<Ticket>, Error> {
        sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET cs_member_id = $2, status = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(cs_member_id)
        .bind(TicketStatus::InProgress.to_str())
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_ticket_status(
        &self,
        ticket_id: Uuid,
        status: TicketStatus,
        closed_date: Option<NaiveDate>,
    ) -> Result<Option<Ticket>, Error> {
        sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET status = $2, closed_date = COALESCE($3, closed_date)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(status.to_str())
        .bind(closed_date)
        .fetch_optional(&self.pool)
        .await
    }

    async fn add_ticket_reply(
        &self,
        ticket_id: Uuid,
        reply_user_id: Uuid,
        message: String,
    ) -> Result<Option<Ticket>, Error> {
        sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET reply_message = $3, reply_date = NOW(), reply_user_id = $2, status = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(reply_user_id)
        .bind(message)
        .bind(TicketStatus::InProgress.to_str())
        .fetch_optional(&self.pool)
        .await
    }

    async fn edit_ticket_reply(
        &self,
        ticket_id: Uuid,
        reply_user_id: Uuid,
        message: String,
    ) -> Result<Option<Ticket>, Error> {
        sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET reply_message = $3, reply_date = NOW(), reply_user_id = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(reply_user_id)
        .bind(message)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_ticket_reply(&self, ticket_id: Uuid) -> Result<Option<Ticket>, Error> {
        sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET reply_message = NULL, reply_date = NULL, reply_user_id = NULL
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_issue_type_counts(&self) -> Result<Vec<IssueTypeCount>, Error> {
        sqlx::query_as::<_, IssueTypeCount>(
            r#"
            SELECT issue_type, COUNT(*) AS count
            FROM tickets
            GROUP BY issue_type
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_recent_tickets(&self, limit: i64) -> Result<Vec<TicketWithUser>, Error> {
        let query = format!(
            "{} ORDER BY tk.open_date DESC NULLS LAST LIMIT $1",
            TICKET_WITH_USER_SELECT
        );

        sqlx::query_as::<_, TicketWithUser>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_average_response_hours(&self) -> Result<Option<f64>, Error> {
        sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT (AVG(EXTRACT(EPOCH FROM (reply_date - open_date::timestamptz))) / 3600)::float8
            FROM tickets
            WHERE reply_date IS NOT NULL AND open_date IS NOT NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }
}
