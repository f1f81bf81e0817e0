use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::tendermodel::{
        Bid, BidListing, BidReview, BidWithSeller, Criterion, Tender, TenderDetail, TenderStats,
        TenderStatus,
    },
    utils::stats::BidComparison,
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitBidDto {
    pub tender_id: Uuid,

    #[validate(range(min = 0.0, message = "Proposed price must be a positive number"))]
    pub proposed_price: f64,

    #[validate(length(min = 1, max = 100, message = "Timeline is required and cannot exceed 100 characters"))]
    pub proposed_timeline: String,

    #[validate(length(min = 1, max = 1000, message = "Description is required and cannot exceed 1000 characters"))]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CriterionDto {
    #[validate(length(min = 1, max = 100, message = "Criterion name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "Weight must be between 0 and 100"))]
    pub weight: Option<f64>,
    pub delivery_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTenderDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Budget must be a positive number"))]
    pub budget: Option<f64>,
    pub submission_deadline: NaiveDate,
    #[validate]
    #[serde(default)]
    pub criteria: Vec<CriterionDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTenderStatusDto {
    pub status: TenderStatus,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PageQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TenderListItemDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub status: TenderStatus,
    pub publish_date: Option<NaiveDate>,
    pub submission_deadline: Option<NaiveDate>,
    pub buyer_name: String,
    pub buyer_city: Option<String>,
    pub criteria_count: i64,
    pub has_bid: bool,
    pub bid_id: Option<Uuid>,
    pub days_remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct TenderIndexDto {
    pub tenders: Vec<TenderListItemDto>,
    pub stats: TenderStats,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

#[derive(Debug, Serialize)]
pub struct TenderShowDto {
    pub tender: TenderDetail,
    pub criteria: Vec<Criterion>,
    pub existing_bid: Option<Bid>,
    pub days_remaining: i64,
    pub is_deadline_close: bool,
}

#[derive(Debug, Serialize)]
pub struct BuyerTenderDto {
    pub tender: Tender,
    pub criteria: Vec<Criterion>,
    pub bids: Vec<BidWithSeller>,
}

#[derive(Debug, Serialize)]
pub struct BidIndexDto {
    pub bids: Vec<BidListing>,
    pub stats: BidStatsDto,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

#[derive(Debug, Serialize)]
pub struct RecentBidDto {
    pub bid_id: Uuid,
    pub tender_title: String,
    pub proposed_price: f64,
    pub submission_date: Option<NaiveDate>,
    pub status: BidReview,
}

#[derive(Debug, Serialize)]
pub struct BidStatsDto {
    pub total_bids: i64,
    pub active_bids: i64,
    pub awarded_bids: i64,
    pub success_rate: f64,
    pub recent_bids: Vec<RecentBidDto>,
}

#[derive(Debug, Serialize)]
pub struct BidShowDto {
    pub bid: BidListing,
    pub comparison: BidComparison,
    pub review: BidReview,
}

/// Page count for `total` rows at `page_size` rows per page.
pub fn total_pages(total: i64, page_size: i64) -> u32 {
    if total <= 0 {
        return 0;
    }
    ((total + page_size - 1) / page_size) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn bid_requires_timeline_and_description() {
        let dto = SubmitBidDto {
            tender_id: Uuid::new_v4(),
            proposed_price: 250.0,
            proposed_timeline: String::new(),
            description: "Full delivery".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let dto = SubmitBidDto {
            tender_id: Uuid::new_v4(),
            proposed_price: -1.0,
            proposed_timeline: "2 weeks".to_string(),
            description: "Full delivery".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
