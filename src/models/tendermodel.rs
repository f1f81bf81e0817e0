use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::UnknownVariant;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TenderStatus {
    Open,
    Closed,
    Cancelled,
}

impl TenderStatus {
    pub fn to_str(&self) -> &'static str {
        match self {
            TenderStatus::Open => "Open",
            TenderStatus::Closed => "Closed",
            TenderStatus::Cancelled => "Cancelled",
        }
    }
}

impl TryFrom<String> for TenderStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Open" => Ok(TenderStatus::Open),
            "Closed" => Ok(TenderStatus::Closed),
            "Cancelled" => Ok(TenderStatus::Cancelled),
            _ => Err(UnknownVariant::new("tender_status", value)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Tender {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub budget: Option<BigDecimal>,
    #[sqlx(try_from = "String")]
    pub status: TenderStatus,
    pub publish_date: Option<NaiveDate>,
    pub submission_deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Tender {
    /// A tender takes new or updated bids only while it is open and its
    /// deadline (inclusive) has not passed. A missing deadline never accepts.
    pub fn accepts_bids(&self, today: NaiveDate) -> bool {
        self.status == TenderStatus::Open
            && self.submission_deadline.map_or(false, |deadline| deadline >= today)
    }

    /// Whole days until the deadline, negative once it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        self.submission_deadline
            .map(|deadline| (deadline - today).num_days())
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Criterion {
    pub id: Uuid,
    pub tender_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub weight: Option<BigDecimal>,
    pub delivery_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Bid {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub tender_id: Uuid,
    pub submission_date: Option<NaiveDate>,
    pub proposed_price: Option<BigDecimal>,
    pub proposed_timeline: Option<String>,
    pub description: Option<String>,
    pub is_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub is_rejected: bool,
    pub rejected_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum BidReview {
    Approved,
    Rejected,
    Pending,
}

impl Bid {
    pub fn review(&self) -> BidReview {
        if self.is_approved {
            BidReview::Approved
        } else if self.is_rejected {
            BidReview::Rejected
        } else {
            BidReview::Pending
        }
    }
}

/// Outcome of a submit-or-update call, so callers can tell which one happened.
#[derive(Debug, Serialize, Clone)]
pub struct BidSubmission {
    pub bid: Bid,
    pub created: bool,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct TenderDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub tender: Tender,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: Option<String>,
    pub buyer_city: Option<String>,
    pub buyer_address: Option<String>,
}

/// Row of the seller-facing open tender list.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct TenderListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub tender: Tender,
    pub buyer_name: String,
    pub buyer_city: Option<String>,
    pub criteria_count: i64,
    pub my_bid_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct BuyerTenderListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub tender: Tender,
    pub bid_count: i64,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, Default)]
pub struct TenderStats {
    pub total_open: i64,
    pub ending_soon: i64,
    pub high_value: i64,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct BidListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub bid: Bid,
    pub tender_title: String,
    pub tender_status: String,
    pub tender_deadline: Option<NaiveDate>,
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub has_contract: bool,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct BidWithSeller {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub bid: Bid,
    pub seller_name: String,
    pub seller_city: Option<String>,
    pub has_contract: bool,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, Default)]
pub struct BidCounts {
    pub total: i64,
    pub active: i64,
    pub awarded: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tender(status: TenderStatus, deadline: Option<NaiveDate>) -> Tender {
        Tender {
            id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            title: "Office furniture".to_string(),
            description: None,
            budget: None,
            status,
            publish_date: None,
            submission_deadline: deadline,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn open_tender_accepts_bids_through_deadline_day() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert!(tender(TenderStatus::Open, Some(today)).accepts_bids(today));
        assert!(tender(TenderStatus::Open, today.succ_opt()).accepts_bids(today));
        assert!(!tender(TenderStatus::Open, today.pred_opt()).accepts_bids(today));
    }

    #[test]
    fn closed_cancelled_or_undated_tenders_reject_bids() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let later = today.succ_opt();
        assert!(!tender(TenderStatus::Closed, later).accepts_bids(today));
        assert!(!tender(TenderStatus::Cancelled, later).accepts_bids(today));
        assert!(!tender(TenderStatus::Open, None).accepts_bids(today));
    }

    #[test]
    fn review_label_prefers_approval() {
        let mut bid = Bid {
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
        };
        assert_eq!(bid.review(), BidReview::Pending);
        bid.is_rejected = true;
        assert_eq!(bid.review(), BidReview::Rejected);
        bid.is_rejected = false;
        bid.is_approved = true;
        assert_eq!(bid.review(), BidReview::Approved);
    }

    #[test]
    fn tender_status_round_trips_through_text() {
        for status in [TenderStatus::Open, TenderStatus::Closed, TenderStatus::Cancelled] {
            assert_eq!(TenderStatus::try_from(status.to_str().to_string()), Ok(status));
        }
        assert!(TenderStatus::try_from("open".to_string()).is_err());
    }
}
