// service/payment_service.rs
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{is_unique_violation, DBClient, PaymentExt},
    dtos::contractdtos::{PaymentIndexDto, PaymentStatsDto, RecordPaymentDto},
    models::contractmodel::{
        ContractStatus, Invoice, Payment, PaymentDetail, PaymentListing, PaymentStatus,
    },
    service::{
        error::ServiceError,
        ownership::{Ownership, Party},
    },
    utils::stats::{money, round_to},
};

#[derive(Debug, Clone)]
pub struct PaymentService {
    db_client: Arc<DBClient>,
    ownership: Ownership,
}

impl PaymentService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        let ownership = Ownership::new(db_client.clone());
        Self { db_client, ownership }
    }

    pub async fn seller_payments(&self, user_id: Uuid) -> Result<PaymentIndexDto, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        let payments = self.db_client.get_seller_payments(seller.id).await?;
        Ok(PaymentIndexDto {
            stats: payment_stats(&payments),
            payments,
        })
    }

    pub async fn buyer_payments(&self, user_id: Uuid) -> Result<PaymentIndexDto, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        let payments = self.db_client.get_buyer_payments(buyer.id).await?;
        Ok(PaymentIndexDto {
            stats: payment_stats(&payments),
            payments,
        })
    }

    /// Invoice view of a payment, readable by either party to the contract.
    pub async fn invoice(&self, party: Party, payment_id: Uuid) -> Result<PaymentDetail, ServiceError> {
        self.ownership.payment(party, payment_id).await
    }

    pub async fn seller_invoice(&self, user_id: Uuid, payment_id: Uuid) -> Result<PaymentDetail, ServiceError> {
        let seller = self.ownership.seller_for(user_id).await?;
        self.invoice(Party::Seller(seller.id), payment_id).await
    }

    pub async fn buyer_invoice(&self, user_id: Uuid, payment_id: Uuid) -> Result<PaymentDetail, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        self.invoice(Party::Buyer(buyer.id), payment_id).await
    }

    pub async fn record(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
        body: &RecordPaymentDto,
    ) -> Result<Payment, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        let contract = self
            .ownership
            .contract(Party::Buyer(buyer.id), contract_id)
            .await?;

        if contract.contract.status != ContractStatus::Approved {
            return Err(ServiceError::ContractNotApproved(contract_id));
        }

        let net = net_amount(body.amount, body.buyer_commission, body.seller_commission);
        if net < 0.0 {
            return Err(ServiceError::Validation(
                "Commissions cannot exceed the payment amount".to_string(),
            ));
        }

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (contract_id, payment_date, amount, buyer_commission,
                                  seller_commission, net_amount, payment_status)
            VALUES ($1, $2, $3::numeric, $4::numeric, $5::numeric, $6::numeric, $7)
            RETURNING *
            "#,
        )
        .bind(contract_id)
        .bind(body.payment_date)
        .bind(body.amount)
        .bind(body.buyer_commission)
        .bind(body.seller_commission)
        .bind(net)
        .bind(PaymentStatus::Pending.to_str())
        .fetch_one(&self.db_client.pool)
        .await?;

        tracing::info!("payment {} recorded on contract {}", payment.id, contract_id);
        Ok(payment)
    }

    pub async fn complete(&self, user_id: Uuid, payment_id: Uuid) -> Result<Payment, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        let detail = self
            .ownership
            .payment(Party::Buyer(buyer.id), payment_id)
            .await?;

        if detail.payment.payment_status == PaymentStatus::Completed {
            return Err(ServiceError::PaymentAlreadyCompleted(payment_id));
        }

        let payment = sqlx::query_as::<_, Payment>(
            "UPDATE payments SET payment_status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(payment_id)
        .bind(PaymentStatus::Completed.to_str())
        .fetch_one(&self.db_client.pool)
        .await?;

        tracing::info!("payment {} completed", payment_id);
        Ok(payment)
    }

    pub async fn issue_invoice(&self, user_id: Uuid, payment_id: Uuid) -> Result<Invoice, ServiceError> {
        let buyer = self.ownership.buyer_for(user_id).await?;
        self.ownership
            .payment(Party::Buyer(buyer.id), payment_id)
            .await?;

        if self.db_client.get_invoice_by_payment(payment_id).await?.is_some() {
            return Err(ServiceError::InvoiceAlreadyIssued(payment_id));
        }

        let now = Utc::now().naive_utc();
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (payment_id, invoice_date, invoice_time)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(payment_id)
        .bind(now.date())
        .bind(now.time())
        .fetch_one(&self.db_client.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "invoices_payment_id_key") {
                ServiceError::InvoiceAlreadyIssued(payment_id)
            } else {
                ServiceError::Database(e)
            }
        })?;

        tracing::info!("invoice {} issued for payment {}", invoice.id, payment_id);
        Ok(invoice)
    }
}

pub fn net_amount(amount: f64, buyer_commission: f64, seller_commission: f64) -> f64 {
    round_to(amount - buyer_commission - seller_commission, 2)
}

pub fn payment_stats(payments: &[PaymentListing]) -> PaymentStatsDto {
    let mut stats = PaymentStatsDto::default();
    for listing in payments {
        let payment = &listing.payment;
        stats.total_payments += money(&payment.net_amount);
        stats.total_commission += money(&payment.seller_commission);
        match payment.payment_status {
            PaymentStatus::Pending => stats.pending_payments += 1,
            PaymentStatus::Completed => stats.completed_payments += 1,
        }
    }
    stats.total_payments = round_to(stats.total_payments, 2);
    stats.total_commission = round_to(stats.total_commission, 2);
    stats.payment_count = payments.len() as i64;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::BigDecimal;
    use std::str::FromStr;

    fn listing(net: &str, commission: &str, status: PaymentStatus) -> PaymentListing {
        PaymentListing {
            payment: Payment {
                id: Uuid::new_v4(),
                contract_id: Uuid::new_v4(),
                payment_date: None,
                amount: None,
                buyer_commission: None,
                seller_commission: Some(BigDecimal::from_str(commission).unwrap()),
                net_amount: Some(BigDecimal::from_str(net).unwrap()),
                payment_status: status,
            },
            tender_title: "Catering".to_string(),
            buyer_name: "Hospital".to_string(),
            invoice_id: None,
        }
    }

    #[test]
    fn net_amount_subtracts_both_commissions() {
        assert_eq!(net_amount(1000.0, 25.0, 50.5), 924.5);
    }

    #[test]
    fn stats_split_by_status() {
        let stats = payment_stats(&[
            listing("900", "50", PaymentStatus::Completed),
            listing("450.5", "25", PaymentStatus::Pending),
        ]);
        assert_eq!(
            stats,
            PaymentStatsDto {
                total_payments: 1350.5,
                pending_payments: 1,
                completed_payments: 1,
                total_commission: 75.0,
                payment_count: 2,
            }
        );
    }

    #[test]
    fn no_payments_means_empty_stats() {
        assert_eq!(payment_stats(&[]), PaymentStatsDto::default());
    }
}
