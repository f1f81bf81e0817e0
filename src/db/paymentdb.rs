// src/db/paymentdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::DBClient;
use crate::models::contractmodel::{Invoice, PaymentDetail, PaymentListing};

#[async_trait]
pub trait PaymentExt {
    async fn get_payment_detail(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<PaymentDetail>, sqlx::Error>;

    async fn get_seller_payments(&self, seller_id: Uuid)
        -> Result<Vec<PaymentListing>, sqlx::Error>;

    async fn get_buyer_payments(&self, buyer_id: Uuid) -> Result<Vec<PaymentListing>, sqlx::Error>;

    async fn get_invoice_by_payment(&self, payment_id: Uuid)
        -> Result<Option<Invoice>, sqlx::Error>;
}

const PAYMENT_LISTING_SELECT: &str = r#"
    SELECT p.*,
           t.title AS tender_title,
           b.buyer_name,
           i.id AS invoice_id
    FROM payments p
    JOIN contracts c ON c.id = p.contract_id
    JOIN bids bd ON bd.id = c.bid_id
    JOIN tenders t ON t.id = bd.tender_id
    JOIN buyers b ON b.id = t.buyer_id
    LEFT JOIN invoices i ON i.payment_id = p.id
"#;

#[async_trait]
impl PaymentExt for DBClient {
    async fn get_payment_detail(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<PaymentDetail>, sqlx::Error> {
        sqlx::query_as::<_, PaymentDetail>(
            r#"
            SELECT p.*,
                   bd.seller_id,
                   t.buyer_id,
                   c.contract_value,
                   t.title AS tender_title,
                   t.description AS tender_description,
                   b.buyer_name,
                   b.buyer_address,
                   b.buyer_city,
                   b.contact_phone AS buyer_phone,
                   u.email AS buyer_email,
                   s.seller_name,
                   s.seller_address,
                   s.seller_city,
                   s.contact_phone AS seller_phone,
                   i.id AS invoice_id,
                   i.invoice_date,
                   i.invoice_time
            FROM payments p
            JOIN contracts c ON c.id = p.contract_id
            JOIN bids bd ON bd.id = c.bid_id
            JOIN tenders t ON t.id = bd.tender_id
            JOIN buyers b ON b.id = t.buyer_id
            JOIN users u ON u.id = b.user_id
            JOIN sellers s ON s.id = bd.seller_id
            LEFT JOIN invoices i ON i.payment_id = p.id
            WHERE p.id = $1
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_seller_payments(
        &self,
        seller_id: Uuid,
    ) -> Result<Vec<PaymentListing>, sqlx::Error> {
        let query = format!(
            "{} WHERE bd.seller_id = $1 ORDER BY p.payment_date DESC NULLS LAST",
            PAYMENT_LISTING_SELECT
        );

        sqlx::query_as::<_, PaymentListing>(&query)
            .bind(seller_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_buyer_payments(&self, buyer_id: Uuid) -> Result<Vec<PaymentListing>, sqlx::Error> {
        let query = format!(
            "{} WHERE t.buyer_id = $1 ORDER BY p.payment_date DESC NULLS LAST",
            PAYMENT_LISTING_SELECT
        );

        sqlx::query_as::<_, PaymentListing>(&query)
            .bind(buyer_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_invoice_by_payment(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE payment_id = $1")
            .bind(payment_id)
            .fetch_optional(&self.pool)
            .await
    }
}
