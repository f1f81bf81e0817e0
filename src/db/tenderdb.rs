// src/db/tenderdb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::DBClient;
use crate::models::tendermodel::{
    BuyerTenderListing, Criterion, Tender, TenderDetail, TenderListing, TenderStats, TenderStatus,
};

#[async_trait]
pub trait TenderExt {
    async fn get_tender(&self, tender_id: Uuid) -> Result<Option<Tender>, sqlx::Error>;

    async fn get_tender_detail(&self, tender_id: Uuid)
        -> Result<Option<TenderDetail>, sqlx::Error>;

    async fn get_criteria(&self, tender_id: Uuid) -> Result<Vec<Criterion>, sqlx::Error>;

    /// Open tenders still before their deadline, soonest deadline first.
    async fn get_open_tender_listings(
        &self,
        seller_id: Uuid,
        today: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TenderListing>, sqlx::Error>;

    async fn count_open_tenders(&self, today: NaiveDate) -> Result<i64, sqlx::Error>;

    async fn get_tender_stats(&self, today: NaiveDate) -> Result<TenderStats, sqlx::Error>;

    async fn get_buyer_tenders(
        &self,
        buyer_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<BuyerTenderListing>, sqlx::Error>;

    async fn update_tender_status(
        &self,
        tender_id: Uuid,
        status: TenderStatus,
    ) -> Result<Tender, sqlx::Error>;

    async fn add_criterion(
        &self,
        tender_id: Uuid,
        name: String,
        description: Option<String>,
        weight: Option<f64>,
        delivery_time: Option<String>,
    ) -> Result<Criterion, sqlx::Error>;
}

#[async_trait]
impl TenderExt for DBClient {
    async fn get_tender(&self, tender_id: Uuid) -> Result<Option<Tender>, sqlx::Error> {
        sqlx::query_as::<_, Tender>("SELECT * FROM tenders WHERE id = $1")
            .bind(tender_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_tender_detail(
        &self,
        tender_id: Uuid,
    ) -> Result<Option<TenderDetail>, sqlx::Error> {
        sqlx::query_as::<_, TenderDetail>(
            r#"
            SELECT t.*,
                   b.buyer_name,
                   u.email AS buyer_email,
                   b.contact_phone AS buyer_phone,
                   b.buyer_city,
                   b.buyer_address
            FROM tenders t
            JOIN buyers b ON b.id = t.buyer_id
            JOIN users u ON u.id = b.user_id
            WHERE t.id = $1
            "#,
        )
        .bind(tender_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_criteria(&self, tender_id: Uuid) -> Result<Vec<Criterion>, sqlx::Error> {
        sqlx::query_as::<_, Criterion>("SELECT * FROM criteria WHERE tender_id = $1 ORDER BY name")
            .bind(tender_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_open_tender_listings(
        &self,
        seller_id: Uuid,
        today: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TenderListing>, sqlx::Error> {
        sqlx::query_as::<_, TenderListing>(
            r#"
            SELECT t.*,
                   b.buyer_name,
                   b.buyer_city,
                   (SELECT COUNT(*) FROM criteria c WHERE c.tender_id = t.id) AS criteria_count,
                   (SELECT bd.id FROM bids bd
                     WHERE bd.tender_id = t.id AND bd.seller_id = $1) AS my_bid_id
            FROM tenders t
            JOIN buyers b ON b.id = t.buyer_id
            WHERE t.status = 'Open' AND t.submission_deadline >= $2
            ORDER BY t.submission_deadline ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(seller_id)
        .bind(today)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_open_tenders(&self, today: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tenders WHERE status = 'Open' AND submission_deadline >= $1",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_tender_stats(&self, today: NaiveDate) -> Result<TenderStats, sqlx::Error> {
        sqlx::query_as::<_, TenderStats>(
            r#"
            SELECT
                COUNT(*) AS total_open,
                COUNT(*) FILTER (WHERE submission_deadline <= $1 + 3) AS ending_soon,
                COUNT(*) FILTER (WHERE budget >= 100000) AS high_value
            FROM tenders
            WHERE status = 'Open' AND submission_deadline >= $1
            "#,
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_buyer_tenders(
        &self,
        buyer_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<BuyerTenderListing>, sqlx::Error> {
        sqlx::query_as::<_, BuyerTenderListing>(
            r#"
            SELECT t.*,
                   (SELECT COUNT(*) FROM bids bd WHERE bd.tender_id = t.id) AS bid_count
            FROM tenders t
            WHERE t.buyer_id = $1
            ORDER BY t.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(buyer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_tender_status(
        &self,
        tender_id: Uuid,
        status: TenderStatus,
    ) -> Result<Tender, sqlx::Error> {
        sqlx::query_as::<_, Tender>("UPDATE tenders SET status = $2 WHERE id = $1 RETURNING *")
            .bind(tender_id)
            .bind(status.to_str())
            .fetch_one(&self.pool)
            .await
    }

    async fn add_criterion(
        &self,
        tender_id: Uuid,
        name: String,
        description: Option<String>,
        weight: Option<f64>,
        delivery_time: Option<String>,
    ) -> Result<Criterion, sqlx::Error> {
        sqlx::query_as::<_, Criterion>(
            r#"
            INSERT INTO criteria (tender_id, name, description, weight, delivery_time)
            VALUES ($1, $2, $3, $4::numeric, $5)
            RETURNING *
            "#,
        )
        .bind(tender_id)
        .bind(name)
        .bind(description)
        .bind(weight)
        .bind(delivery_time)
        .fetch_one(&self.pool)
        .await
    }
}
