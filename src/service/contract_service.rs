// service/contract_service.rs
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{is_unique_violation, ContractExt, DBClient, FeedbackExt, UserExt},
    dtos::contractdtos::{
        AwardContractDto, ContractReviewDto, ContractStatusResultDto, CreateFeedbackDto,
    },
    models::{
        contractmodel::{Contract, ContractDetail, ContractStatus, Payment},
        feedbackmodel::Feedback,
    },
    service::{
        error::ServiceError,
        ownership::{Ownership, Party},
    },
    utils::stats::{completion_percentage, money, round_to},
};

#[derive(Debug, Clone)]
pub struct ContractService {
    db_client: Arc<DBClient>,
    ownership: Ownership,
}

impl ContractService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        let ownership = Ownership::new(db_client.clone());
        Self { db_client, ownership }
    }

    pub async fn seller_contracts(&self, user_id: Uuid) -> Result<Vec<ContractDetail>, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        Ok(self.db_client.get_seller_contracts(seller.id).await?)
    }

    pub async fn buyer_contracts(&self, user_id: Uuid) -> Result<Vec<ContractDetail>, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        Ok(self.db_client.get_buyer_contracts(buyer.id).await?)
    }

    pub async fn review(&self, party: Party, contract_id: Uuid) -> Result<ContractReviewDto, ServiceError> {
        let contract = self.ownership.contract(party, contract_id).await?;
        let payments = self.db_client.get_contract_payments(contract_id).await?;
        Ok(build_review(contract, payments))
    }

    pub async fn seller_review(&self, user_id: Uuid, contract_id: Uuid) -> Result<ContractReviewDto, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        self.review(Party::Seller(seller.id), contract_id).await
    }

    pub async fn buyer_review(&self, user_id: Uuid, contract_id: Uuid) -> Result<ContractReviewDto, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        self.review(Party::Buyer(buyer.id), contract_id).await
    }

    /// Seller response to a contract. Only the status changes; any of the
    /// three states may follow any other.
    pub async fn update_status(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
        status: ContractStatus,
    ) -> Result<ContractStatusResultDto, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        self.ownership
            .contract(Party::Seller(seller.id), contract_id)
            .await?;

        let contract = self
            .db_client
            .update_contract_status(contract_id, status)
            .await?;
        tracing::info!(
            "seller {} set contract {} to {}",
            seller.id,
            contract_id,
            status.to_str()
        );

        Ok(ContractStatusResultDto {
            contract,
            message: status.update_message(),
        })
    }

    /// Turns an approved bid into a pending contract.
    pub async fn award(
        &self,
        user_id: Uuid,
        bid_id: Uuid,
        body: &AwardContractDto,
    ) -> Result<Contract, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        let bid = self.ownership.buyer_bid(buyer.id, bid_id).await?;

        if !bid.bid.is_approved {
            return Err(ServiceError::BidNotApproved(bid_id));
        }
        if let Some(end) = body.end_date {
            if end < body.start_date {
                return Err(ServiceError::Validation(
                    "End date cannot be before the start date".to_string(),
                ));
            }
        }
        if self.db_client.get_contract_by_bid(bid_id).await?.is_some() {
            return Err(ServiceError::ContractAlreadyExists(bid_id));
        }

        let mut tx = self.db_client.pool.begin().await?;

        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (bid_id, contract_value, start_date, end_date, payment_terms,
                                   delivery_schedule, status, contract_document_url)
            VALUES ($1, $2::numeric, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(bid_id)
        .bind(body.contract_value)
        .bind(body.start_date)
        .bind(body.end_date)
        .bind(&body.payment_terms)
        .bind(&body.delivery_schedule)
        .bind(ContractStatus::Pending.to_str())
        .bind(&body.contract_document_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "contracts_bid_id_key") {
                ServiceError::ContractAlreadyExists(bid_id)
            } else {
                ServiceError::Database(e)
            }
        })?;

        tx.commit().await?;

        tracing::info!("buyer {} awarded contract {} for bid {}", buyer.id, contract.id, bid_id);
        Ok(contract)
    }

    /// Buyer rates a seller on one of the buyer's own tenders.
    pub async fn record_feedback(
        &self,
        user_id: Uuid,
        body: CreateFeedbackDto,
    ) -> Result<Feedback, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        self.ownership.buyer_tender(buyer.id, body.tender_id).await?;
        if self.db_client.get_seller(body.seller_id).await?.is_none() {
            return Err(ServiceError::SellerProfileNotFound(body.seller_id));
        }

        let comment = body
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let feedback = self
            .db_client
            .create_feedback(
                body.seller_id,
                buyer.id,
                body.tender_id,
                body.rating,
                comment,
                Utc::now().date_naive(),
            )
            .await?;

        tracing::info!("buyer {} left feedback {} for seller {}", buyer.id, feedback.id, body.seller_id);
        Ok(feedback)
    }
}

fn build_review(
    contract: ContractDetail,
    payments: Vec<Payment>,
) -> ContractReviewDto {
    let total_payments: f64 = payments.iter().map(|p| money(&p.amount)).sum();
    let value = money(&contract.contract.contract_value);

    ContractReviewDto {
        total_payments: round_to(total_payments, 2),
        remaining_amount: round_to(value - total_payments, 2),
        completion_percentage: completion_percentage(total_payments, value),
        contract,
        payments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::BigDecimal;
    use std::str::FromStr;

    use crate::{
        models::contractmodel::PaymentStatus,
        service::ownership::tests::seed_awarded_contract,
    };

    fn detail(value: Option<&str>) -> ContractDetail {
        ContractDetail {
            contract: Contract {
                id: Uuid::new_v4(),
                bid_id: Uuid::new_v4(),
                contract_value: value.map(|v| BigDecimal::from_str(v).unwrap()),
                start_date: None,
                end_date: None,
                payment_terms: None,
                delivery_schedule: None,
                status: ContractStatus::Approved,
                contract_document_url: None,
                created_at: Utc::now(),
            },
            seller_id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            tender_id: Uuid::new_v4(),
            tender_title: "Fleet maintenance".to_string(),
            buyer_name: "City".to_string(),
            seller_name: "Garage".to_string(),
            proposed_price: None,
        }
    }

    fn payment(contract_id: Uuid, amount: &str) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            contract_id,
            payment_date: None,
            amount: Some(BigDecimal::from_str(amount).unwrap()),
            buyer_commission: None,
            seller_commission: None,
            net_amount: None,
            payment_status: PaymentStatus::Completed,
        }
    }

    #[test]
    fn review_reports_progress_against_value() {
        let contract = detail(Some("1000"));
        let id = contract.contract.id;
        let review = build_review(contract, vec![payment(id, "250"), payment(id, "150")]);

        assert_eq!(review.total_payments, 400.0);
        assert_eq!(review.remaining_amount, 600.0);
        assert_eq!(review.completion_percentage, 40.0);
    }

    #[test]
    fn zero_value_contract_has_zero_completion() {
        let contract = detail(None);
        let id = contract.contract.id;
        let review = build_review(contract, vec![payment(id, "50")]);
        assert_eq!(review.completion_percentage, 0.0);
        assert_eq!(review.remaining_amount, -50.0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn status_update_touches_only_the_status(pool: sqlx::PgPool) {
        let fixture = seed_awarded_contract(&pool).await;
        let service = ContractService::new(Arc::new(DBClient::new(pool.clone())));
        let before = service
            .ownership
            .contract(Party::Seller(fixture.seller_id), fixture.contract_id)
            .await
            .unwrap()
            .contract;

        let result = service
            .update_status(fixture.owner_user, fixture.contract_id, ContractStatus::Approved)
            .await
            .unwrap();

        let after = result.contract;
        assert_eq!(after.status, ContractStatus::Approved);
        assert_eq!(result.message, "Contract approved successfully!");
        assert_eq!(after.bid_id, before.bid_id);
        assert_eq!(after.contract_value, before.contract_value);
        assert_eq!(after.start_date, before.start_date);
        assert_eq!(after.end_date, before.end_date);
        assert_eq!(after.payment_terms, before.payment_terms);
        assert_eq!(after.delivery_schedule, before.delivery_schedule);
        assert_eq!(after.contract_document_url, before.contract_document_url);
        assert_eq!(after.created_at, before.created_at);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn another_seller_cannot_change_the_status(pool: sqlx::PgPool) {
        let fixture = seed_awarded_contract(&pool).await;
        let service = ContractService::new(Arc::new(DBClient::new(pool.clone())));

        let result = service
            .update_status(fixture.other_user, fixture.contract_id, ContractStatus::Rejected)
            .await;
        assert!(matches!(result, Err(ServiceError::UnauthorizedAction)));

        let status: String = sqlx::query_scalar("SELECT status FROM contracts WHERE id = $1")
            .bind(fixture.contract_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "Pending");
    }
}
