use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    contractmodel::{Contract, ContractDetail, ContractStatus, Payment, PaymentListing},
    feedbackmodel::{FeedbackWithNames, TenderOption},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateContractStatusDto {
    pub status: ContractStatus,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AwardContractDto {
    #[validate(range(min = 0.0, message = "Contract value must be a positive number"))]
    pub contract_value: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub delivery_schedule: Option<String>,
    #[validate(url(message = "Document URL is invalid"))]
    pub contract_document_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordPaymentDto {
    pub payment_date: NaiveDate,
    #[validate(range(min = 0.01, message = "Amount must be greater than zero"))]
    pub amount: f64,
    #[validate(range(min = 0.0, message = "Commission cannot be negative"))]
    #[serde(default)]
    pub buyer_commission: f64,
    #[validate(range(min = 0.0, message = "Commission cannot be negative"))]
    #[serde(default)]
    pub seller_commission: f64,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateFeedbackDto {
    pub tender_id: uuid::Uuid,
    pub seller_id: uuid::Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 1000, message = "Comment cannot exceed 1000 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackQueryDto {
    pub rating: Option<String>,
    pub tender: Option<uuid::Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ContractReviewDto {
    pub contract: ContractDetail,
    pub payments: Vec<Payment>,
    pub total_payments: f64,
    pub remaining_amount: f64,
    pub completion_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct ContractStatusResultDto {
    pub contract: Contract,
    pub message: &'static str,
}

#[derive(Debug, Serialize, Default, PartialEq)]
pub struct PaymentStatsDto {
    pub total_payments: f64,
    pub pending_payments: i64,
    pub completed_payments: i64,
    pub total_commission: f64,
    pub payment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentIndexDto {
    pub payments: Vec<PaymentListing>,
    pub stats: PaymentStatsDto,
}

#[derive(Debug, Serialize, Default, PartialEq)]
pub struct FeedbackStatsDto {
    pub total: i64,
    pub with_comments: i64,
    pub recent: i64,
    pub positive_feedback: i64,
    pub average_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct FeedbackIndexDto {
    pub feedbacks: Vec<FeedbackWithNames>,
    pub stats: FeedbackStatsDto,
    pub seller_tenders: Vec<TenderOption>,
    pub selected_rating: Option<String>,
    pub selected_tender: Option<uuid::Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_rating_must_be_one_to_five() {
        let mut dto = CreateFeedbackDto {
            tender_id: uuid::Uuid::new_v4(),
            seller_id: uuid::Uuid::new_v4(),
            rating: 6,
            comment: None,
        };
        assert!(dto.validate().is_err());
        dto.rating = 5;
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn contract_status_accepts_known_labels_only() {
        let parsed: UpdateContractStatusDto =
            serde_json::from_str(r#"{"status":"Approved"}"#).unwrap();
        assert_eq!(parsed.status, ContractStatus::Approved);
        assert!(serde_json::from_str::<UpdateContractStatusDto>(r#"{"status":"Done"}"#).is_err());
    }
}
