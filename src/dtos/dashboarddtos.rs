use serde::Serialize;

use crate::models::{
    reportmodel::{BuyerCounts, ChartSeries, SellerCounts},
    tendermodel::{BidListing, BuyerTenderListing},
};

#[derive(Debug, Serialize)]
pub struct SellerDashboardDto {
    pub seller_name: String,
    #[serde(flatten)]
    pub counts: SellerCounts,
    pub open_tenders: i64,
    pub recent_bids: Vec<BidListing>,
    pub chart: ChartSeries,
}

#[derive(Debug, Serialize)]
pub struct BuyerDashboardDto {
    pub buyer_name: String,
    #[serde(flatten)]
    pub counts: BuyerCounts,
    pub recent_tenders: Vec<BuyerTenderListing>,
    pub chart: ChartSeries,
}

#[derive(Debug, Serialize)]
pub struct RedirectDto {
    pub status: &'static str,
    pub redirect_to: &'static str,
}
