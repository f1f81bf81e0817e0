// src/db/biddb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::DBClient;
use crate::models::tendermodel::{Bid, BidCounts, BidListing, BidWithSeller};

#[async_trait]
pub trait BidExt {

    async fn get_bid_listing(&self, bid_id: Uuid) -> Result<Option<BidListing>, sqlx::Error>;

    async fn get_seller_bid_for_tender(
        &self,
        seller_id: Uuid,
        tender_id: Uuid,
    ) -> Result<Option<Bid>, sqlx::Error>;

    async fn get_seller_bids(
        &self,
        seller_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BidListing>, sqlx::Error>;

    async fn count_seller_bids(&self, seller_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn get_bid_counts(
        &self,
        seller_id: Uuid,
        today: NaiveDate,
    ) -> Result<BidCounts, sqlx::Error>;

    /// Prices of every other priced bid on the same tender.
    async fn get_competing_prices(
        &self,
        tender_id: Uuid,
        exclude_bid_id: Uuid,
    ) -> Result<Vec<BigDecimal>, sqlx::Error>;

    async fn get_tender_bids(&self, tender_id: Uuid) -> Result<Vec<BidWithSeller>, sqlx::Error>;

    async fn set_bid_review(&self, bid_id: Uuid, approve: bool) -> Result<Bid, sqlx::Error>;
}

const BID_LISTING_SELECT: &str = r#"
    SELECT bd.*,
           t.title AS tender_title,
           t.status AS tender_status,
           t.submission_deadline AS tender_deadline,
           t.buyer_id,
           b.buyer_name,
           EXISTS (SELECT 1 FROM contracts c WHERE c.bid_id = bd.id) AS has_contract
    FROM bids bd
    JOIN tenders t ON t.id = bd.tender_id
    JOIN buyers b ON b.id = t.buyer_id
"#;

#[async_trait]
impl BidExt for DBClient {
    async fn get_bid_listing(&self, bid_id: Uuid) -> Result<Option<BidListing>, sqlx::Error> {
        let query = format!("{} WHERE bd.id = $1", BID_LISTING_SELECT);

        sqlx::query_as::<_, BidListing>(&query)
            .bind(bid_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_seller_bid_for_tender(
        &self,
        seller_id: Uuid,
        tender_id: Uuid,
    ) -> Result<Option<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE seller_id = $1 AND tender_id = $2")
            .bind(seller_id)
            .bind(tender_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_seller_bids(
        &self,
        seller_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BidListing>, sqlx::Error> {
        let query = format!(
            "{} WHERE bd.seller_id = $1 ORDER BY bd.submission_date DESC NULLS LAST LIMIT $2 OFFSET $3",
            BID_LISTING_SELECT
        );

        sqlx::query_as::<_, BidListing>(&query)
            .bind(seller_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn count_seller_bids(&self, seller_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bids WHERE seller_id = $1")
            .bind(seller_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_bid_counts(
        &self,
        seller_id: Uuid,
        today: NaiveDate,
    ) -> Result<BidCounts, sqlx::Error> {
        sqlx::query_as::<_, BidCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (
                    WHERE NOT EXISTS (SELECT 1 FROM contracts c WHERE c.bid_id = bd.id)
                      AND t.status = 'Open'
                      AND t.submission_deadline >= $2
                ) AS active,
                COUNT(*) FILTER (
                    WHERE EXISTS (SELECT 1 FROM contracts c WHERE c.bid_id = bd.id)
                ) AS awarded
            FROM bids bd
            JOIN tenders t ON t.id = bd.tender_id
            WHERE bd.seller_id = $1
            "#,
        )
        .bind(seller_id)
        .bind(today)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_competing_prices(
        &self,
        tender_id: Uuid,
        exclude_bid_id: Uuid,
    ) -> Result<Vec<BigDecimal>, sqlx::Error> {
        sqlx::query_scalar::<_, BigDecimal>(
            r#"
            SELECT proposed_price FROM bids
            WHERE tender_id = $1 AND id <> $2 AND proposed_price IS NOT NULL
            "#,
        )
        .bind(tender_id)
        .bind(exclude_bid_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_tender_bids(&self, tender_id: Uuid) -> Result<Vec<BidWithSeller>, sqlx::Error> {
        sqlx::query_as::<_, BidWithSeller>(
            r#"
            SELECT bd.*,
                   s.seller_name,
                   s.seller_city,
                   EXISTS (SELECT 1 FROM contracts c WHERE c.bid_id = bd.id) AS has_contract
            FROM bids bd
            JOIN sellers s ON s.id = bd.seller_id
            WHERE bd.tender_id = $1
            ORDER BY bd.proposed_price ASC NULLS LAST
            "#,
        )
        .bind(tender_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn set_bid_review(&self, bid_id: Uuid, approve: bool) -> Result<Bid, sqlx::Error> {
        // Both flag pairs are written in one statement so they can never both be set.
        sqlx::query_as::<_, Bid>(
            r#"
            UPDATE bids SET
                is_approved = $2,
                approved_at = CASE WHEN $2 THEN NOW() ELSE NULL END,
                is_rejected = NOT $2,
                rejected_at = CASE WHEN $2 THEN NULL ELSE NOW() END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(bid_id)
        .bind(approve)
        .fetch_one(&self.pool)
        .await
    }
}
