use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::UnknownVariant;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ContractStatus {
    Pending,
    Approved,
    Rejected,
}

impl ContractStatus {
    pub fn to_str(&self) -> &'static str {
        match self {
            ContractStatus::Pending => "Pending",
            ContractStatus::Approved => "Approved",
            ContractStatus::Rejected => "Rejected",
        }
    }

    pub fn update_message(&self) -> &'static str {
        match self {
            ContractStatus::Approved => "Contract approved successfully!",
            ContractStatus::Rejected => "Contract rejected.",
            ContractStatus::Pending => "Contract status updated to pending.",
        }
    }
}

impl TryFrom<String> for ContractStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Pending" => Ok(ContractStatus::Pending),
            "Approved" => Ok(ContractStatus::Approved),
            "Rejected" => Ok(ContractStatus::Rejected),
            _ => Err(UnknownVariant::new("contract_status", value)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Contract {
    pub id: Uuid,
    pub bid_id: Uuid,
    pub contract_value: Option<BigDecimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub delivery_schedule: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ContractStatus,
    pub contract_document_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl PaymentStatus {
    pub fn to_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Pending" => Ok(PaymentStatus::Pending),
            "Completed" => Ok(PaymentStatus::Completed),
            _ => Err(UnknownVariant::new("payment_status", value)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub payment_date: Option<NaiveDate>,
    pub amount: Option<BigDecimal>,
    pub buyer_commission: Option<BigDecimal>,
    pub seller_commission: Option<BigDecimal>,
    pub net_amount: Option<BigDecimal>,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Invoice {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub invoice_date: Option<NaiveDate>,
    pub invoice_time: Option<NaiveTime>,
}

/// A contract together with the profiles on both sides of it.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ContractDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub contract: Contract,
    pub seller_id: Uuid,
    pub buyer_id: Uuid,
    pub tender_id: Uuid,
    pub tender_title: String,
    pub buyer_name: String,
    pub seller_name: String,
    pub proposed_price: Option<BigDecimal>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct PaymentListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payment: Payment,
    pub tender_title: String,
    pub buyer_name: String,
    pub invoice_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct PaymentDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payment: Payment,
    pub seller_id: Uuid,
    pub buyer_id: Uuid,
    pub contract_value: Option<BigDecimal>,
    pub tender_title: String,
    pub tender_description: Option<String>,
    pub buyer_name: String,
    pub buyer_address: Option<String>,
    pub buyer_city: Option<String>,
    pub buyer_phone: Option<String>,
    pub buyer_email: String,
    pub seller_name: String,
    pub seller_address: Option<String>,
    pub seller_city: Option<String>,
    pub seller_phone: Option<String>,
    pub invoice_id: Option<Uuid>,
    pub invoice_date: Option<NaiveDate>,
    pub invoice_time: Option<NaiveTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_status_text_matches_storage_values() {
        assert_eq!(ContractStatus::Approved.to_str(), "Approved");
        assert_eq!(
            ContractStatus::try_from("Rejected".to_string()),
            Ok(ContractStatus::Rejected)
        );
        assert!(ContractStatus::try_from("approved".to_string()).is_err());
    }

    #[test]
    fn payment_status_rejects_unknown_text() {
        assert_eq!(
            PaymentStatus::try_from("Completed".to_string()),
            Ok(PaymentStatus::Completed)
        );
        assert!(PaymentStatus::try_from("Refunded".to_string()).is_err());
    }
}
