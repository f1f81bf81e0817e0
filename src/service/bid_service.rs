// service/bid_service.rs
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    db::{BidExt, DBClient},
    dtos::tenderdtos::{
        total_pages, BidIndexDto, BidShowDto, BidStatsDto, RecentBidDto, SubmitBidDto,
    },
    models::tendermodel::{Bid, BidSubmission, Tender},
    service::{error::ServiceError, ownership::Ownership},
    utils::stats::{compare_bid, money, success_rate},
};

pub const BID_PAGE_SIZE: i64 = 10;
const RECENT_BIDS: usize = 3;

#[derive(Debug, Clone)]
pub struct BidService {
    db_client: Arc<DBClient>,
    ownership: Ownership,
}

impl BidService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        let ownership = Ownership::new(db_client.clone());
        Self { db_client, ownership }
    }

    /// Places a seller's bid on a tender, or rewrites the one they already have.
    pub async fn submit_or_update(
        &self,
        user_id: Uuid,
        body: &SubmitBidDto,
    ) -> Result<BidSubmission, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        let today = Utc::now().date_naive();

        let mut tx = self.db_client.pool.begin().await?;

        // Holds off a concurrent status change until the bid is written.
        let tender = sqlx::query_as::<_, Tender>("SELECT * FROM tenders WHERE id = $1 FOR SHARE")
            .bind(body.tender_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::TenderNotFound(body.tender_id))?;

        if !tender.accepts_bids(today) {
            return Err(ServiceError::TenderClosed(tender.id));
        }

        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM bids WHERE seller_id = $1 AND tender_id = $2",
        )
        .bind(seller.id)
        .bind(tender.id)
        .fetch_optional(&mut *tx)
        .await?;

        let bid = sqlx::query_as::<_, Bid>(
            r#"
            INSERT INTO bids (seller_id, tender_id, submission_date, proposed_price, proposed_timeline, description)
            VALUES ($1, $2, $3, $4::numeric, $5, $6)
            ON CONFLICT ON CONSTRAINT uq_bids_seller_tender DO UPDATE SET
                submission_date = EXCLUDED.submission_date,
                proposed_price = EXCLUDED.proposed_price,
                proposed_timeline = EXCLUDED.proposed_timeline,
                description = EXCLUDED.description
            RETURNING *
            "#,
        )
        .bind(seller.id)
        .bind(tender.id)
        .bind(today)
        .bind(body.proposed_price)
        .bind(&body.proposed_timeline)
        .bind(&body.description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "seller {} {} bid {} on tender {}",
            seller.id,
            if existing.is_some() { "updated" } else { "submitted" },
            bid.id,
            tender.id
        );

        Ok(BidSubmission {
            bid,
            created: existing.is_none(),
        })
    }

    pub async fn list(&self, user_id: Uuid, page: u32) -> Result<BidIndexDto, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        let today = Utc::now().date_naive();
        let page = page.max(1);
        let offset = (page as i64 - 1) * BID_PAGE_SIZE;

        let bids = self
            .db_client
            .get_seller_bids(seller.id, BID_PAGE_SIZE, offset)
            .await?;
        let total = self.db_client.count_seller_bids(seller.id).await?;
        let stats = self.stats_for(seller.id, today).await?;
        let pages = total_pages(total, BID_PAGE_SIZE);

        Ok(BidIndexDto {
            bids,
            stats,
            current_page: page,
            total_pages: pages,
            has_previous_page: page > 1,
            has_next_page: page < pages,
        })
    }

    pub async fn show(&self, user_id: Uuid, bid_id: Uuid) -> Result<BidShowDto, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        let bid = self.ownership.seller_bid(seller.id, bid_id).await?;

        let others: Vec<f64> = self
            .db_client
            .get_competing_prices(bid.bid.tender_id, bid.bid.id)
            .await?
            .into_iter()
            .map(|price| money(&Some(price)))
            .collect();
        let comparison = compare_bid(&others, money(&bid.bid.proposed_price));
        let review = bid.bid.review();

        Ok(BidShowDto {
            bid,
            comparison,
            review,
        })
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<BidStatsDto, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        self.stats_for(seller.id, Utc::now().date_naive()).await
    }

    async fn stats_for(&self, seller_id: Uuid, today: NaiveDate) -> Result<BidStatsDto, ServiceError> {
        let counts = self.db_client.get_bid_counts(seller_id, today).await?;
        let recent = self
            .db_client
            .get_seller_bids(seller_id, RECENT_BIDS as i64, 0)
            .await?;

        Ok(BidStatsDto {
            total_bids: counts.total,
            active_bids: counts.active,
            awarded_bids: counts.awarded,
            success_rate: success_rate(counts.awarded, counts.total),
            recent_bids: recent
                .into_iter()
                .map(|listing| RecentBidDto {
                    bid_id: listing.bid.id,
                    proposed_price: money(&listing.bid.proposed_price),
                    submission_date: listing.bid.submission_date,
                    status: listing.bid.review(),
                    tender_title: listing.tender_title,
                })
                .collect(),
        })
    }

    /// Buyer decision on a bid against one of their tenders.
    pub async fn review(
        &self,
        user_id: Uuid,
        bid_id: Uuid,
        approve: bool,
    ) -> Result<Bid, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        self.ownership.buyer_bid(buyer.id, bid_id).await?;

        let bid = self.db_client.set_bid_review(bid_id, approve).await?;
        tracing::info!(
            "buyer {} {} bid {}",
            buyer.id,
            if approve { "approved" } else { "rejected" },
            bid_id
        );
        Ok(bid)
    }

    pub async fn buyer_bid(&self, user_id: Uuid, bid_id: Uuid) -> Result<BidShowDto, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        let bid = self.ownership.buyer_bid(buyer.id, bid_id).await?;
        let others: Vec<f64> = self
            .db_client
            .get_competing_prices(bid.bid.tender_id, bid.bid.id)
            .await?
            .into_iter()
            .map(|price| money(&Some(price)))
            .collect();

        Ok(BidShowDto {
            comparison: compare_bid(&others, money(&bid.bid.proposed_price)),
            review: bid.bid.review(),
            bid,
        })
    }
}

pub fn submission_message(submission: &BidSubmission) -> &'static str {
    if submission.created {
        "Bid submitted successfully!"
    } else {
        "Bid updated successfully!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tendermodel::TenderStatus;

    fn bid() -> Bid {
        Bid {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            tender_id: Uuid::new_v4(),
            submission_date: None,
            proposed_price: None,
            proposed_timeline: None,
            description: None,
            is_approved: false,
            approved_at: None,
            is_rejected: false,
            rejected_at: None,
        }
    }

    #[test]
    fn message_tells_insert_from_update() {
        let created = BidSubmission { bid: bid(), created: true };
        let updated = BidSubmission { bid: bid(), created: false };
        assert_eq!(submission_message(&created), "Bid submitted successfully!");
        assert_eq!(submission_message(&updated), "Bid updated successfully!");
    }

    async fn seed_tender(
        pool: &sqlx::PgPool,
        status: TenderStatus,
        deadline: NaiveDate,
    ) -> (Uuid, Uuid) {
        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (name, email, password, user_type) VALUES ('S', $1, 'x', 'both') RETURNING id",
        )
        .bind(format!("{}@wasel.test", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO sellers (user_id, seller_name) VALUES ($1, 'Seller')")
            .bind(user_id)
            .execute(pool)
            .await
            .unwrap();
        let buyer_id: Uuid =
            sqlx::query_scalar("INSERT INTO buyers (user_id, buyer_name) VALUES ($1, 'Buyer') RETURNING id")
                .bind(user_id)
                .fetch_one(pool)
                .await
                .unwrap();
        let tender_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tenders (buyer_id, title, status, submission_deadline) VALUES ($1, 'T', $2, $3) RETURNING id",
        )
        .bind(buyer_id)
        .bind(status.to_str())
        .bind(deadline)
        .fetch_one(pool)
        .await
        .unwrap();
        (user_id, tender_id)
    }

    fn body(tender_id: Uuid, price: f64) -> SubmitBidDto {
        SubmitBidDto {
            tender_id,
            proposed_price: price,
            proposed_timeline: "3 weeks".to_string(),
            description: "Supply and install".to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn resubmission_updates_the_single_bid(pool: sqlx::PgPool) {
        let deadline = Utc::now().date_naive() + chrono::Duration::days(5);
        let (user_id, tender_id) = seed_tender(&pool, TenderStatus::Open, deadline).await;
        let service = BidService::new(Arc::new(DBClient::new(pool.clone())));

        let first = service.submit_or_update(user_id, &body(tender_id, 100.0)).await.unwrap();
        let second = service.submit_or_update(user_id, &body(tender_id, 90.0)).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.bid.id, second.bid.id);
        assert_eq!(money(&second.bid.proposed_price), 90.0);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bids WHERE tender_id = $1")
            .bind(tender_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn closed_tender_refuses_bids(pool: sqlx::PgPool) {
        let deadline = Utc::now().date_naive() + chrono::Duration::days(5);
        let (user_id, tender_id) = seed_tender(&pool, TenderStatus::Closed, deadline).await;
        let service = BidService::new(Arc::new(DBClient::new(pool.clone())));

        let result = service.submit_or_update(user_id, &body(tender_id, 100.0)).await;
        assert!(matches!(result, Err(ServiceError::TenderClosed(_))));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bids")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }
}
