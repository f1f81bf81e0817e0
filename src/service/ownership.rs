// service/ownership.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{BidExt, ContractExt, DBClient, PaymentExt, TenderExt, UserExt},
    models::{
        contractmodel::{ContractDetail, PaymentDetail},
        tendermodel::{BidListing, Tender},
        usermodel::{Buyer, Seller},
    },
    service::error::ServiceError,
};

/// The profile a request acts through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Seller(Uuid),
    Buyer(Uuid),
}

/// Records that belong to a seller profile, a buyer profile, or both.
pub trait Owned {
    fn seller_id(&self) -> Option<Uuid> {
        None
    }

    fn buyer_id(&self) -> Option<Uuid> {
        None
    }
}

impl Owned for Tender {
    fn buyer_id(&self) -> Option<Uuid> {
        Some(self.buyer_id)
    }
}

impl Owned for BidListing {
    fn seller_id(&self) -> Option<Uuid> {
        Some(self.bid.seller_id)
    }

    fn buyer_id(&self) -> Option<Uuid> {
        Some(self.buyer_id)
    }
}

impl Owned for ContractDetail {
    fn seller_id(&self) -> Option<Uuid> {
        Some(self.seller_id)
    }

    fn buyer_id(&self) -> Option<Uuid> {
        Some(self.buyer_id)
    }
}

impl Owned for PaymentDetail {
    fn seller_id(&self) -> Option<Uuid> {
        Some(self.seller_id)
    }

    fn buyer_id(&self) -> Option<Uuid> {
        Some(self.buyer_id)
    }
}

pub fn ensure_owned<T: Owned>(entity: &T, party: Party) -> Result<(), ServiceError> {
    let owner = match party {
        Party::Seller(_) => entity.seller_id(),
        Party::Buyer(_) => entity.buyer_id(),
    };
    let id = match party {
        Party::Seller(id) | Party::Buyer(id) => id,
    };

    if owner == Some(id) {
        Ok(())
    } else {
        Err(ServiceError::UnauthorizedAction)
    }
}

/// Resolves profiles for a user and loads records only on behalf of their owner.
#[derive(Debug, Clone)]
pub struct Ownership {
    db_client: Arc<DBClient>,
}

impl Ownership {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn seller_for(&self, user_id: Uuid) -> Result<Seller, ServiceError> {
        self.db_client
            .get_seller_by_user(user_id)
            .await?
            .ok_or(ServiceError::SellerProfileNotFound(user_id))
    }

    pub async fn buyer_for(&self, user_id: Uuid) -> Result<Buyer, ServiceError> {
        self.db_client
            .get_buyer_by_user(user_id)
            .await?
            .ok_or(ServiceError::BuyerProfileNotFound(user_id))
    }

    pub async fn seller_bid(&self, seller_id: Uuid, bid_id: Uuid) -> Result<BidListing, ServiceError> {
        let bid = self
            .db_client
            .get_bid_listing(bid_id)
            .await?
            .ok_or(ServiceError::BidNotFound(bid_id))?;
        ensure_owned(&bid, Party::Seller(seller_id))?;
        Ok(bid)
    }

    pub async fn buyer_bid(&self, buyer_id: Uuid, bid_id: Uuid) -> Result<BidListing, ServiceError> {
        let bid = self
            .db_client
            .get_bid_listing(bid_id)
            .await?
            .ok_or(ServiceError::BidNotFound(bid_id))?;
        ensure_owned(&bid, Party::Buyer(buyer_id))?;
        Ok(bid)
    }

    pub async fn buyer_tender(&self, buyer_id: Uuid, tender_id: Uuid) -> Result<Tender, ServiceError> {
        let tender = self
            .db_client
            .get_tender(tender_id)
            .await?
            .ok_or(ServiceError::TenderNotFound(tender_id))?;
        ensure_owned(&tender, Party::Buyer(buyer_id))?;
        Ok(tender)
    }

    pub async fn contract(
        &self,
        party: Party,
        contract_id: Uuid,
    ) -> Result<ContractDetail, ServiceError> {
        let contract = self
            .db_client
            .get_contract_detail(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;
        ensure_owned(&contract, party)?;
        Ok(contract)
    }

    pub async fn payment(&self, party: Party, payment_id: Uuid) -> Result<PaymentDetail, ServiceError> {
        let payment = self
            .db_client
            .get_payment_detail(payment_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(payment_id))?;
        ensure_owned(&payment, party)?;
        Ok(payment)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::tendermodel::TenderStatus;

    fn tender(buyer_id: Uuid) -> Tender {
        Tender {
            id: Uuid::new_v4(),
            buyer_id,
            title: "Road resurfacing".to_string(),
            description: None,
            budget: None,
            status: TenderStatus::Open,
            publish_date: None,
            submission_deadline: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn owner_passes_and_stranger_is_refused() {
        let buyer = Uuid::new_v4();
        let t = tender(buyer);
        assert!(ensure_owned(&t, Party::Buyer(buyer)).is_ok());
        assert!(matches!(
            ensure_owned(&t, Party::Buyer(Uuid::new_v4())),
            Err(ServiceError::UnauthorizedAction)
        ));
    }

    #[test]
    fn sellers_never_own_tenders() {
        let id = Uuid::new_v4();
        assert!(ensure_owned(&tender(id), Party::Seller(id)).is_err());
    }

    /// A buyer's tender with one awarded bid, its pending contract and a payment,
    /// plus a second seller with no stake in any of it.
    pub(crate) struct AwardedContract {
        pub owner_user: Uuid,
        pub other_user: Uuid,
        pub seller_id: Uuid,
        pub bid_id: Uuid,
        pub contract_id: Uuid,
        pub payment_id: Uuid,
    }

    async fn seed_seller(pool: &sqlx::PgPool, name: &str) -> (Uuid, Uuid) {
        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (name, email, password, user_type) VALUES ($1, $2, 'x', 'seller') RETURNING id",
        )
        .bind(name)
        .bind(format!("{}@wasel.test", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();
        let seller_id: Uuid =
            sqlx::query_scalar("INSERT INTO sellers (user_id, seller_name) VALUES ($1, $2) RETURNING id")
                .bind(user_id)
                .bind(name)
                .fetch_one(pool)
                .await
                .unwrap();
        (user_id, seller_id)
    }

    pub(crate) async fn seed_awarded_contract(pool: &sqlx::PgPool) -> AwardedContract {
        let buyer_user: Uuid = sqlx::query_scalar(
            "INSERT INTO users (name, email, password, user_type) VALUES ('City', $1, 'x', 'buyer') RETURNING id",
        )
        .bind(format!("{}@wasel.test", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();
        let buyer_id: Uuid =
            sqlx::query_scalar("INSERT INTO buyers (user_id, buyer_name) VALUES ($1, 'City') RETURNING id")
                .bind(buyer_user)
                .fetch_one(pool)
                .await
                .unwrap();
        let (owner_user, seller_id) = seed_seller(pool, "Garage").await;
        let (other_user, _) = seed_seller(pool, "Rival").await;

        let tender_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tenders (buyer_id, title, submission_deadline) VALUES ($1, 'Fleet maintenance', CURRENT_DATE + 10) RETURNING id",
        )
        .bind(buyer_id)
        .fetch_one(pool)
        .await
        .unwrap();
        let bid_id: Uuid = sqlx::query_scalar(
            "INSERT INTO bids (seller_id, tender_id, proposed_price, is_approved, approved_at) VALUES ($1, $2, 900, TRUE, NOW()) RETURNING id",
        )
        .bind(seller_id)
        .bind(tender_id)
        .fetch_one(pool)
        .await
        .unwrap();
        let contract_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO contracts (bid_id, contract_value, start_date, end_date, payment_terms, delivery_schedule)
            VALUES ($1, 900, DATE '2026-01-01', DATE '2026-06-30', 'Net 30', 'Monthly')
            RETURNING id
            "#,
        )
        .bind(bid_id)
        .fetch_one(pool)
        .await
        .unwrap();
        let payment_id: Uuid =
            sqlx::query_scalar("INSERT INTO payments (contract_id, amount) VALUES ($1, 300) RETURNING id")
                .bind(contract_id)
                .fetch_one(pool)
                .await
                .unwrap();

        AwardedContract {
            owner_user,
            other_user,
            seller_id,
            bid_id,
            contract_id,
            payment_id,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn another_seller_cannot_load_bid_contract_or_payment(pool: sqlx::PgPool) {
        let fixture = seed_awarded_contract(&pool).await;
        let ownership = Ownership::new(Arc::new(DBClient::new(pool)));

        let rival = ownership.seller_for(fixture.other_user).await.unwrap();
        assert_ne!(rival.id, fixture.seller_id);

        assert!(matches!(
            ownership.seller_bid(rival.id, fixture.bid_id).await,
            Err(ServiceError::UnauthorizedAction)
        ));
        assert!(matches!(
            ownership.contract(Party::Seller(rival.id), fixture.contract_id).await,
            Err(ServiceError::UnauthorizedAction)
        ));
        assert!(matches!(
            ownership.payment(Party::Seller(rival.id), fixture.payment_id).await,
            Err(ServiceError::UnauthorizedAction)
        ));

        let owner = Party::Seller(fixture.seller_id);
        assert!(ownership.seller_bid(fixture.seller_id, fixture.bid_id).await.is_ok());
        assert!(ownership.contract(owner, fixture.contract_id).await.is_ok());
        assert!(ownership.payment(owner, fixture.payment_id).await.is_ok());
    }
}
