use serde::{Deserialize, Serialize};

/// One `(year, month)` bucket of a monthly aggregate.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct MonthlyValue {
    pub year: i32,
    pub month: i32,
    pub value: f64,
}

impl MonthlyValue {
    pub fn as_tuple(&self) -> (i32, i32, f64) {
        (self.year, self.month, self.value)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, Default)]
pub struct SellerCounts {
    pub active_bids: i64,
    pub total_bids: i64,
    pub awarded_contracts: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, Default)]
pub struct BuyerCounts {
    pub active_tenders: i64,
    pub total_bids_received: i64,
    pub total_tenders: i64,
    pub closed_tenders: i64,
}

#[derive(Debug, Serialize, Clone)]
pub struct ChartSeries {
    pub labels: Vec<&'static str>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ChartDataset {
    pub name: &'static str,
    pub values: Vec<f64>,
}
