use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Feedback {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub buyer_id: Uuid,
    pub tender_id: Uuid,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub feedback_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct FeedbackWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub feedback: Feedback,
    pub tender_title: String,
    pub buyer_name: String,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct TenderOption {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, Default)]
pub struct FeedbackCounts {
    pub total: i64,
    pub with_comments: i64,
    pub recent: i64,
    pub average_rating: Option<f64>,
}

/// Filter accepted by the seller feedback listing.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackFilter {
    WithComment,
    WithoutComment,
    Rating(i32),
}

impl FeedbackFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "with_comment" => Some(FeedbackFilter::WithComment),
            "without_comment" => Some(FeedbackFilter::WithoutComment),
            other => other.parse::<i32>().ok().map(FeedbackFilter::Rating),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comment_and_rating_filters() {
        assert_eq!(FeedbackFilter::parse("with_comment"), Some(FeedbackFilter::WithComment));
        assert_eq!(FeedbackFilter::parse("without_comment"), Some(FeedbackFilter::WithoutComment));
        assert_eq!(FeedbackFilter::parse("4"), Some(FeedbackFilter::Rating(4)));
        assert_eq!(FeedbackFilter::parse("stars"), None);
    }
}
