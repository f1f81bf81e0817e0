// src/db/contractdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::DBClient;
use crate::models::contractmodel::{Contract, ContractDetail, ContractStatus, Payment};

#[async_trait]
pub trait ContractExt {
    async fn get_contract_detail(
        &self,
        contract_id: Uuid,
    ) -> Result<Option<ContractDetail>, sqlx::Error>;

    async fn get_seller_contracts(&self, seller_id: Uuid)
        -> Result<Vec<ContractDetail>, sqlx::Error>;

    async fn get_buyer_contracts(&self, buyer_id: Uuid) -> Result<Vec<ContractDetail>, sqlx::Error>;

    async fn get_contract_by_bid(&self, bid_id: Uuid) -> Result<Option<Contract>, sqlx::Error>;

    /// Writes the status column only.
    async fn update_contract_status(
        &self,
        contract_id: Uuid,
        status: ContractStatus,
    ) -> Result<Contract, sqlx::Error>;

    async fn get_contract_payments(&self, contract_id: Uuid) -> Result<Vec<Payment>, sqlx::Error>;
}

const CONTRACT_DETAIL_SELECT: &str = r#"
    SELECT c.*,
           bd.seller_id,
           t.buyer_id,
           t.id AS tender_id,
           t.title AS tender_title,
           b.buyer_name,
           s.seller_name,
           bd.proposed_price
    FROM contracts c
    JOIN bids bd ON bd.id = c.bid_id
    JOIN tenders t ON t.id = bd.tender_id
    JOIN buyers b ON b.id = t.buyer_id
    JOIN sellers s ON s.id = bd.seller_id
"#;

#[async_trait]
impl ContractExt for DBClient {
    async fn get_contract_detail(
        &self,
        contract_id: Uuid,
    ) -> Result<Option<ContractDetail>, sqlx::Error> {
        let query = format!("{} WHERE c.id = $1", CONTRACT_DETAIL_SELECT);

        sqlx::query_as::<_, ContractDetail>(&query)
            .bind(contract_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_seller_contracts(
        &self,
        seller_id: Uuid,
    ) -> Result<Vec<ContractDetail>, sqlx::Error> {
        let query = format!(
            "{} WHERE bd.seller_id = $1 ORDER BY c.start_date DESC NULLS LAST",
            CONTRACT_DETAIL_SELECT
        );

        sqlx::query_as::<_, ContractDetail>(&query)
            .bind(seller_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_buyer_contracts(&self, buyer_id: Uuid) -> Result<Vec<ContractDetail>, sqlx::Error> {
        let query = format!(
            "{} WHERE t.buyer_id = $1 ORDER BY c.created_at DESC",
            CONTRACT_DETAIL_SELECT
        );

        sqlx::query_as::<_, ContractDetail>(&query)
            .bind(buyer_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_contract_by_bid(&self, bid_id: Uuid) -> Result<Option<Contract>, sqlx::Error> {
        sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE bid_id = $1")
            .bind(bid_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update_contract_status(
        &self,
        contract_id: Uuid,
        status: ContractStatus,
    ) -> Result<Contract, sqlx::Error> {
        sqlx::query_as::<_, Contract>("UPDATE contracts SET status = $2 WHERE id = $1 RETURNING *")
            .bind(contract_id)
            .bind(status.to_str())
            .fetch_one(&self.pool)
            .await
    }

    async fn get_contract_payments(&self, contract_id: Uuid) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE contract_id = $1 ORDER BY payment_date DESC NULLS LAST",
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
    }
}
