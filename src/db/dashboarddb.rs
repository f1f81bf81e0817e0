// src/db/dashboarddb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::DBClient;
use crate::models::reportmodel::{BuyerCounts, MonthlyValue, SellerCounts};

/// Monthly aggregates plotted on the dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyMetric {
    SellerBids,
    SellerContracts,
    SellerRevenue,
    BuyerTenders,
    BuyerBids,
    BuyerContracts,
}

impl MonthlyMetric {
    fn query(&self) -> &'static str {
        match self {
            MonthlyMetric::SellerBids => r#"
                SELECT EXTRACT(YEAR FROM submission_date)::int AS year,
                       EXTRACT(MONTH FROM submission_date)::int AS month,
                       COUNT(*)::float8 AS value
                FROM bids
                WHERE seller_id = $1 AND submission_date >= $2
                GROUP BY 1, 2
            "#,
            MonthlyMetric::SellerContracts => r#"
                SELECT EXTRACT(YEAR FROM c.start_date)::int AS year,
                       EXTRACT(MONTH FROM c.start_date)::int AS month,
                       COUNT(*)::float8 AS value
                FROM contracts c
                JOIN bids bd ON bd.id = c.bid_id
                WHERE bd.seller_id = $1 AND c.start_date >= $2
                GROUP BY 1, 2
            "#,
            MonthlyMetric::SellerRevenue => r#"
                SELECT EXTRACT(YEAR FROM p.payment_date)::int AS year,
                       EXTRACT(MONTH FROM p.payment_date)::int AS month,
                       (COALESCE(SUM(p.net_amount), 0) / 1000)::float8 AS value
                FROM payments p
                JOIN contracts c ON c.id = p.contract_id
                JOIN bids bd ON bd.id = c.bid_id
                WHERE bd.seller_id = $1 AND p.payment_date >= $2
                GROUP BY 1, 2
            "#,
            MonthlyMetric::BuyerTenders => r#"
                SELECT EXTRACT(YEAR FROM created_at)::int AS year,
                       EXTRACT(MONTH FROM created_at)::int AS month,
                       COUNT(*)::float8 AS value
                FROM tenders
                WHERE buyer_id = $1 AND created_at >= $2::date
                GROUP BY 1, 2
            "#,
            MonthlyMetric::BuyerBids => r#"
                SELECT EXTRACT(YEAR FROM bd.submission_date)::int AS year,
                       EXTRACT(MONTH FROM bd.submission_date)::int AS month,
                       COUNT(*)::float8 AS value
                FROM bids bd
                JOIN tenders t ON t.id = bd.tender_id
                WHERE t.buyer_id = $1 AND bd.submission_date >= $2
                GROUP BY 1, 2
            "#,
            MonthlyMetric::BuyerContracts => r#"
                SELECT EXTRACT(YEAR FROM c.start_date)::int AS year,
                       EXTRACT(MONTH FROM c.start_date)::int AS month,
                       COUNT(*)::float8 AS value
                FROM contracts c
                JOIN bids bd ON bd.id = c.bid_id
                JOIN tenders t ON t.id = bd.tender_id
                WHERE t.buyer_id = $1 AND c.start_date >= $2
                GROUP BY 1, 2
            "#,
        }
    }
}

#[async_trait]
pub trait DashboardExt {
    async fn get_seller_counts(&self, seller_id: Uuid) -> Result<SellerCounts, sqlx::Error>;

    async fn get_buyer_counts(&self, buyer_id: Uuid) -> Result<BuyerCounts, sqlx::Error>;

    async fn get_monthly_values(
        &self,
        metric: MonthlyMetric,
        profile_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<MonthlyValue>, sqlx::Error>;
}

#[async_trait]
impl DashboardExt for DBClient {
    async fn get_seller_counts(&self, seller_id: Uuid) -> Result<SellerCounts, sqlx::Error> {
        sqlx::query_as::<_, SellerCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM bids bd
                  WHERE bd.seller_id = $1
                    AND NOT EXISTS (SELECT 1 FROM contracts c WHERE c.bid_id = bd.id)
                ) AS active_bids,
                (SELECT COUNT(*) FROM bids WHERE seller_id = $1) AS total_bids,
                (SELECT COUNT(*) FROM contracts c
                   JOIN bids bd ON bd.id = c.bid_id
                  WHERE bd.seller_id = $1
                ) AS awarded_contracts,
                (SELECT COALESCE(SUM(p.net_amount), 0)::float8 FROM payments p
                   JOIN contracts c ON c.id = p.contract_id
                   JOIN bids bd ON bd.id = c.bid_id
                  WHERE bd.seller_id = $1
                ) AS total_revenue
            "#,
        )
        .bind(seller_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_buyer_counts(&self, buyer_id: Uuid) -> Result<BuyerCounts, sqlx::Error> {
        sqlx::query_as::<_, BuyerCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM tenders WHERE buyer_id = $1 AND status = 'Open') AS active_tenders,
                (SELECT COUNT(*) FROM bids bd
                   JOIN tenders t ON t.id = bd.tender_id
                  WHERE t.buyer_id = $1
                ) AS total_bids_received,
                (SELECT COUNT(*) FROM tenders WHERE buyer_id = $1) AS total_tenders,
                (SELECT COUNT(*) FROM tenders WHERE buyer_id = $1 AND status = 'Closed') AS closed_tenders
            "#,
        )
        .bind(buyer_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_monthly_values(
        &self,
        metric: MonthlyMetric,
        profile_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<MonthlyValue>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyValue>(metric.query())
            .bind(profile_id)
            .bind(since)
            .fetch_all(&self.pool)
            .await
    }
}
