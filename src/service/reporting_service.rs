// service/reporting_service.rs
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    db::{
        dashboarddb::MonthlyMetric, BidExt, DBClient, DashboardExt, FeedbackExt, SupportExt,
        TenderExt,
    },
    dtos::{
        contractdtos::{FeedbackIndexDto, FeedbackQueryDto, FeedbackStatsDto},
        dashboarddtos::{BuyerDashboardDto, SellerDashboardDto},
        supportdtos::SupportStatisticsDto,
        DashboardSelectorDto,
    },
    models::{
        feedbackmodel::{FeedbackCounts, FeedbackFilter},
        reportmodel::{ChartDataset, ChartSeries},
        usermodel::{User, UserType},
    },
    service::{error::ServiceError, ownership::Ownership},
    utils::stats::{
        fill_series, is_positive_comment, response_time_label, round_to, trailing_months,
    },
};

const RECENT_ITEMS: i64 = 5;
const RECENT_TICKETS: i64 = 10;
const RECENT_FEEDBACK_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct ReportingService {
    db_client: Arc<DBClient>,
    ownership: Ownership,
}

impl ReportingService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        let ownership = Ownership::new(db_client.clone());
        Self { db_client, ownership }
    }

    pub async fn seller_dashboard(&self, user_id: Uuid) -> Result<SellerDashboardDto, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        let today = Utc::now().date_naive();

        let counts = self.db_client.get_seller_counts(seller.id).await?;
        let recent_bids = self.db_client.get_seller_bids(seller.id, RECENT_ITEMS, 0).await?;
        let open_tenders = self.db_client.count_open_tenders(today).await?;
        let chart = self
            .chart(
                seller.id,
                today,
                &[
                    ("Bids", MonthlyMetric::SellerBids),
                    ("Contracts", MonthlyMetric::SellerContracts),
                    ("Revenue (K)", MonthlyMetric::SellerRevenue),
                ],
            )
            .await?;

        Ok(SellerDashboardDto {
            seller_name: seller.seller_name,
            counts,
            open_tenders,
            recent_bids,
            chart,
        })
    }

    pub async fn buyer_dashboard(&self, user_id: Uuid) -> Result<BuyerDashboardDto, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        let today = Utc::now().date_naive();

        let counts = self.db_client.get_buyer_counts(buyer.id).await?;
        let recent_tenders = self
            .db_client
            .get_buyer_tenders(buyer.id, Some(RECENT_ITEMS))
            .await?;
        let chart = self
            .chart(
                buyer.id,
                today,
                &[
                    ("Tenders", MonthlyMetric::BuyerTenders),
                    ("Bids", MonthlyMetric::BuyerBids),
                    ("Contracts", MonthlyMetric::BuyerContracts),
                ],
            )
            .await?;

        Ok(BuyerDashboardDto {
            buyer_name: buyer.buyer_name,
            counts,
            recent_tenders,
            chart,
        })
    }

    async fn chart(
        &self,
        profile_id: Uuid,
        today: NaiveDate,
        metrics: &[(&'static str, MonthlyMetric)],
    ) -> Result<ChartSeries, ServiceError> {
        let months = trailing_months(today);
        let since = months
            .first()
            .and_then(|slot| NaiveDate::from_ymd_opt(slot.year, slot.month, 1))
            .unwrap_or(today);

        let mut datasets = Vec::with_capacity(metrics.len());
        for (name, metric) in metrics {
            let rows: Vec<(i32, i32, f64)> = self
                .db_client
                .get_monthly_values(*metric, profile_id, since)
                .await?
                .iter()
                .map(|row| row.as_tuple())
                .collect();
            datasets.push(ChartDataset {
                name: *name,
                values: fill_series(&months, &rows),
            });
        }

        Ok(ChartSeries {
            labels: months.iter().map(|slot| slot.label).collect(),
            datasets,
        })
    }

    pub async fn seller_feedback(
        &self,
        user_id: Uuid,
        query: FeedbackQueryDto,
    ) -> Result<FeedbackIndexDto, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        let recent_since = Utc::now().date_naive() - Duration::days(RECENT_FEEDBACK_DAYS);

        let filter = query.rating.as_deref().and_then(FeedbackFilter::parse);
        let feedbacks = self
            .db_client
            .get_seller_feedback(seller.id, filter, query.tender)
            .await?;
        let counts = self
            .db_client
            .get_feedback_counts(seller.id, recent_since)
            .await?;
        let comments = self.db_client.get_feedback_comments(seller.id).await?;
        let seller_tenders = self.db_client.get_feedback_tenders(seller.id).await?;

        Ok(FeedbackIndexDto {
            feedbacks,
            stats: feedback_stats(&counts, &comments),
            seller_tenders,
            selected_rating: query.rating,
            selected_tender: query.tender,
        })
    }

    pub async fn support_statistics(&self) -> Result<SupportStatisticsDto, ServiceError> {
        let counts = self.db_client.get_ticket_counts().await?;
        let by_issue_type = self.db_client.get_issue_type_counts().await?;
        let recent_tickets = self.db_client.get_recent_tickets(RECENT_TICKETS).await?;
        let average = self.db_client.get_average_response_hours().await?;

        Ok(SupportStatisticsDto {
            counts,
            by_issue_type,
            recent_tickets,
            average_response_time: response_time_label(average),
        })
    }

    /// Landing data for accounts that hold both a buyer and a seller profile.
    pub async fn dashboard_selector(&self, user: &User) -> Result<DashboardSelectorDto, ServiceError> {
        let buyer = self.ownership.buyer_for(user.id).await?;
        let seller = self.ownership.seller_for(user.id).await?;

        let buyer_counts = self.db_client.get_buyer_counts(buyer.id).await?;
        let seller_bids = self.db_client.count_seller_bids(seller.id).await?;

        Ok(DashboardSelectorDto {
            user_name: user.name.clone(),
            buyer_tenders_count: buyer_counts.total_tenders,
            seller_bids_count: seller_bids,
        })
    }
}

pub fn feedback_stats(counts: &FeedbackCounts, comments: &[String]) -> FeedbackStatsDto {
    FeedbackStatsDto {
        total: counts.total,
        with_comments: counts.with_comments,
        recent: counts.recent,
        positive_feedback: comments.iter().filter(|c| is_positive_comment(c)).count() as i64,
        average_rating: round_to(counts.average_rating.unwrap_or(0.0), 1),
    }
}

/// Where a dashboard switch request should send the user.
pub fn switch_target(user_type: UserType, requested: &str) -> Result<&'static str, ServiceError> {
    match requested {
        "buyer" if user_type.is_buyer() => Ok(UserType::Buyer.landing_path()),
        "seller" if user_type.is_seller() => Ok(UserType::Seller.landing_path()),
        "buyer" | "seller" => Err(ServiceError::UnauthorizedAction),
        other => Err(ServiceError::InvalidDashboardType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_stats_count_positive_comments() {
        let counts = FeedbackCounts {
            total: 4,
            with_comments: 3,
            recent: 2,
            average_rating: Some(4.25),
        };
        let comments = vec![
            "Great supplier".to_string(),
            "Late delivery".to_string(),
            "Would RECOMMEND".to_string(),
        ];
        let stats = feedback_stats(&counts, &comments);
        assert_eq!(stats.positive_feedback, 2);
        assert_eq!(stats.average_rating, 4.3);
        assert_eq!(stats.total, 4);
    }

    #[test]
    fn no_ratings_average_to_zero() {
        let stats = feedback_stats(&FeedbackCounts::default(), &[]);
        assert_eq!(stats, FeedbackStatsDto::default());
    }

    #[test]
    fn switch_only_accepts_known_dashboards() {
        assert_eq!(switch_target(UserType::Both, "buyer").unwrap(), "/api/buyer/dashboard");
        assert_eq!(switch_target(UserType::Both, "seller").unwrap(), "/api/seller/dashboard");
        assert!(matches!(
            switch_target(UserType::Both, "admin"),
            Err(ServiceError::InvalidDashboardType(_))
        ));
        assert!(matches!(
            switch_target(UserType::Seller, "buyer"),
            Err(ServiceError::UnauthorizedAction)
        ));
    }
}
