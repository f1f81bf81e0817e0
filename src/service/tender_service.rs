// service/tender_service.rs
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{BidExt, DBClient, TenderExt},
    dtos::tenderdtos::{
        total_pages, BuyerTenderDto, CreateTenderDto, CriterionDto, TenderIndexDto,
        TenderListItemDto, TenderShowDto,
    },
    models::tendermodel::{BuyerTenderListing, Criterion, Tender, TenderListing, TenderStatus},
    service::{error::ServiceError, ownership::Ownership},
    utils::stats::{excerpt, money},
};

pub const TENDER_PAGE_SIZE: i64 = 5;
const DEADLINE_CLOSE_DAYS: i64 = 3;
const EXCERPT_LENGTH: usize = 150;

#[derive(Debug, Clone)]
pub struct TenderService {
    db_client: Arc<DBClient>,
    ownership: Ownership,
}

impl TenderService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        let ownership = Ownership::new(db_client.clone());
        Self { db_client, ownership }
    }

    /// Open tenders a seller can still bid on, five per page.
    pub async fn list_open(&self, user_id: Uuid, page: u32) -> Result<TenderIndexDto, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        let today = Utc::now().date_naive();
        let page = page.max(1);
        let offset = (page as i64 - 1) * TENDER_PAGE_SIZE;

        let listings = self
            .db_client
            .get_open_tender_listings(seller.id, today, TENDER_PAGE_SIZE, offset)
            .await?;
        let total = self.db_client.count_open_tenders(today).await?;
        let stats = self.db_client.get_tender_stats(today).await?;
        let pages = total_pages(total, TENDER_PAGE_SIZE);

        Ok(TenderIndexDto {
            tenders: listings
                .into_iter()
                .map(|listing| list_item(listing, today))
                .collect(),
            stats,
            current_page: page,
            total_pages: pages,
            has_previous_page: page > 1,
            has_next_page: page < pages,
        })
    }

    pub async fn show(&self, user_id: Uuid, tender_id: Uuid) -> Result<TenderShowDto, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        let today = Utc::now().date_naive();

        let detail = self
            .db_client
            .get_tender_detail(tender_id)
            .await?
            .ok_or(ServiceError::TenderNotFound(tender_id))?;

        if !detail.tender.accepts_bids(today) {
            return Err(ServiceError::TenderClosed(tender_id));
        }

        let criteria = self.db_client.get_criteria(tender_id).await?;
        let existing_bid = self
            .db_client
            .get_seller_bid_for_tender(seller.id, tender_id)
            .await?;
        let days_remaining = detail.tender.days_remaining(today);

        Ok(TenderShowDto {
            tender: detail,
            criteria,
            existing_bid,
            days_remaining,
            is_deadline_close: days_remaining <= DEADLINE_CLOSE_DAYS,
        })
    }

    pub async fn create(&self, user_id: Uuid, body: &CreateTenderDto) -> Result<BuyerTenderDto, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        let today = Utc::now().date_naive();

        if body.submission_deadline < today {
            return Err(ServiceError::Validation(
                "Submission deadline cannot be in the past".to_string(),
            ));
        }

        let mut tx = self.db_client.pool.begin().await?;

        let tender = sqlx::query_as::<_, Tender>(
            r#"
            INSERT INTO tenders (buyer_id, title, description, budget, status, publish_date, submission_deadline)
            VALUES ($1, $2, $3, $4::numeric, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(buyer.id)
        .bind(&body.title)
        .bind(&body.description)
        .bind(body.budget)
        .bind(TenderStatus::Open.to_str())
        .bind(today)
        .bind(body.submission_deadline)
        .fetch_one(&mut *tx)
        .await?;

        let mut criteria = Vec::with_capacity(body.criteria.len());
        for criterion in &body.criteria {
            let row = sqlx::query_as::<_, Criterion>(
                r#"
                INSERT INTO criteria (tender_id, name, description, weight, delivery_time)
                VALUES ($1, $2, $3, $4::numeric, $5)
                RETURNING *
                "#,
            )
            .bind(tender.id)
            .bind(&criterion.name)
            .bind(&criterion.description)
            .bind(criterion.weight)
            .bind(&criterion.delivery_time)
            .fetch_one(&mut *tx)
            .await?;
            criteria.push(row);
        }

        tx.commit().await?;

        tracing::info!("buyer {} published tender {}", buyer.id, tender.id);

        Ok(BuyerTenderDto {
            tender,
            criteria,
            bids: Vec::new(),
        })
    }

    pub async fn update_status(
        &self,
        user_id: Uuid,
        tender_id: Uuid,
        status: TenderStatus,
    ) -> Result<Tender, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        self.ownership.buyer_tender(buyer.id, tender_id).await?;

        let tender = self.db_client.update_tender_status(tender_id, status).await?;
        tracing::info!("tender {} moved to {}", tender_id, status.to_str());
        Ok(tender)
    }

    pub async fn add_criterion(
        &self,
        user_id: Uuid,
        tender_id: Uuid,
        body: CriterionDto,
    ) -> Result<Criterion, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        self.ownership.buyer_tender(buyer.id, tender_id).await?;

        Ok(self
            .db_client
            .add_criterion(
                tender_id,
                body.name,
                body.description,
                body.weight,
                body.delivery_time,
            )
            .await?)
    }

    pub async fn buyer_tenders(&self, user_id: Uuid) -> Result<Vec<BuyerTenderListing>, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        Ok(self.db_client.get_buyer_tenders(buyer.id, None).await?)
    }

    pub async fn buyer_tender(&self, user_id: Uuid, tender_id: Uuid) -> Result<BuyerTenderDto, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        let tender = self.ownership.buyer_tender(buyer.id, tender_id).await?;
        let criteria = self.db_client.get_criteria(tender_id).await?;
        let bids = self.db_client.get_tender_bids(tender_id).await?;

        Ok(BuyerTenderDto {
            tender,
            criteria,
            bids,
        })
    }
}

fn list_item(listing: TenderListing, today: chrono::NaiveDate) -> TenderListItemDto {
    let days_remaining = listing.tender.days_remaining(today);
    let tender = listing.tender;

    TenderListItemDto {
        id: tender.id,
        title: tender.title,
        description: excerpt(tender.description.as_deref().unwrap_or_default(), EXCERPT_LENGTH),
        budget: money(&tender.budget),
        status: tender.status,
        publish_date: tender.publish_date,
        submission_deadline: tender.submission_deadline,
        buyer_name: listing.buyer_name,
        buyer_city: listing.buyer_city,
        criteria_count: listing.criteria_count,
        has_bid: listing.my_bid_id.is_some(),
        bid_id: listing.my_bid_id,
        days_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn list_item_trims_description_and_flags_existing_bid() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let bid_id = Uuid::new_v4();
        let listing = TenderListing {
            tender: Tender {
                id: Uuid::new_v4(),
                buyer_id: Uuid::new_v4(),
                title: "School desks".to_string(),
                description: Some("x".repeat(200)),
                budget: None,
                status: TenderStatus::Open,
                publish_date: Some(today),
                submission_deadline: NaiveDate::from_ymd_opt(2025, 6, 4),
                created_at: Utc::now(),
            },
            buyer_name: "Ministry".to_string(),
            buyer_city: None,
            criteria_count: 2,
            my_bid_id: Some(bid_id),
        };

        let item = list_item(listing, today);
        assert_eq!(item.description.chars().count(), 153);
        assert!(item.description.ends_with("..."));
        assert!(item.has_bid);
        assert_eq!(item.bid_id, Some(bid_id));
        assert_eq!(item.days_remaining, 3);
        assert_eq!(item.budget, 0.0);
    }
}
