// src/db/feedbackdb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::DBClient;
use crate::models::feedbackmodel::{
    Feedback, FeedbackCounts, FeedbackFilter, FeedbackWithNames, TenderOption,
};

#[async_trait]
pub trait FeedbackExt {
    async fn get_seller_feedback(
        &self,
        seller_id: Uuid,
        filter: Option<FeedbackFilter>,
        tender_id: Option<Uuid>,
    ) -> Result<Vec<FeedbackWithNames>, sqlx::Error>;

    async fn get_feedback_tenders(&self, seller_id: Uuid) -> Result<Vec<TenderOption>, sqlx::Error>;

    async fn get_feedback_counts(
        &self,
        seller_id: Uuid,
        recent_since: NaiveDate,
    ) -> Result<FeedbackCounts, sqlx::Error>;

    async fn get_feedback_comments(&self, seller_id: Uuid) -> Result<Vec<String>, sqlx::Error>;

    async fn create_feedback(
        &self,
        seller_id: Uuid,
        buyer_id: Uuid,
        tender_id: Uuid,
        rating: i32,
        comment: Option<String>,
        feedback_date: NaiveDate,
    ) -> Result<Feedback, sqlx::Error>;
}

#[async_trait]
impl FeedbackExt for DBClient {
    async fn get_seller_feedback(
        &self,
        seller_id: Uuid,
        filter: Option<FeedbackFilter>,
        tender_id: Option<Uuid>,
    ) -> Result<Vec<FeedbackWithNames>, sqlx::Error> {
        let (with_comment, without_comment, rating) = match filter {
            Some(FeedbackFilter::WithComment) => (true, false, None),
            Some(FeedbackFilter::WithoutComment) => (false, true, None),
            Some(FeedbackFilter::Rating(value)) => (false, false, Some(value)),
            None => (false, false, None),
        };

        sqlx::query_as::<_, FeedbackWithNames>(
            r#"
            SELECT f.*,
                   t.title AS tender_title,
                   b.buyer_name
            FROM feedbacks f
            JOIN tenders t ON t.id = f.tender_id
            JOIN buyers b ON b.id = f.buyer_id
            WHERE f.seller_id = $1
              AND (NOT $2 OR COALESCE(f.comment, '') <> '')
              AND (NOT $3 OR COALESCE(f.comment, '') = '')
              AND ($4::int IS NULL OR f.rating = $4)
              AND ($5::uuid IS NULL OR f.tender_id = $5)
            ORDER BY f.feedback_date DESC NULLS LAST
            "#,
        )
        .bind(seller_id)
        .bind(with_comment)
        .bind(without_comment)
        .bind(rating)
        .bind(tender_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_feedback_tenders(&self, seller_id: Uuid) -> Result<Vec<TenderOption>, sqlx::Error> {
        sqlx::query_as::<_, TenderOption>(
            r#"
            SELECT DISTINCT t.id, t.title
            FROM tenders t
            JOIN feedbacks f ON f.tender_id = t.id
            WHERE f.seller_id = $1
            ORDER BY t.title
            "#,
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_feedback_counts(
        &self,
        seller_id: Uuid,
        recent_since: NaiveDate,
    ) -> Result<FeedbackCounts, sqlx::Error> {
        sqlx::query_as::<_, FeedbackCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE COALESCE(comment, '') <> '') AS with_comments,
                COUNT(*) FILTER (WHERE feedback_date >= $2) AS recent,
                AVG(rating)::float8 AS average_rating
            FROM feedbacks
            WHERE seller_id = $1
            "#,
        )
        .bind(seller_id)
        .bind(recent_since)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_feedback_comments(&self, seller_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT comment FROM feedbacks WHERE seller_id = $1 AND COALESCE(comment, '') <> ''",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_feedback(
        &self,
        seller_id: Uuid,
        buyer_id: Uuid,
        tender_id: Uuid,
        rating: i32,
        comment: Option<String>,
        feedback_date: NaiveDate,
    ) -> Result<Feedback, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedbacks (seller_id, buyer_id, tender_id, rating, comment, feedback_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(seller_id)
        .bind(buyer_id)
        .bind(tender_id)
        .bind(rating)
        .bind(comment)
        .bind(feedback_date)
        .fetch_one(&self.pool)
        .await
    }
}
