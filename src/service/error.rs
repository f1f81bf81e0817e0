use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::error::{ErrorMessage, HttpError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Seller profile not found.")]
    SellerProfileNotFound(Uuid),

    #[error("Buyer profile not found.")]
    BuyerProfileNotFound(Uuid),

    #[error("Tender {0} not found")]
    TenderNotFound(Uuid),

    #[error("Bid {0} not found")]
    BidNotFound(Uuid),

    #[error("Contract {0} not found")]
    ContractNotFound(Uuid),

    #[error("Payment {0} not found")]
    PaymentNotFound(Uuid),

    #[error("Ticket {0} not found")]
    TicketNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("This tender is no longer accepting bids.")]
    TenderClosed(Uuid),

    #[error("Unauthorized action.")]
    UnauthorizedAction,

    #[error("This email is already taken.")]
    EmailTaken(String),

    #[error("This email is already registered.")]
    EmailRegistered(String),

    #[error("Bid {0} must be approved before a contract can be awarded")]
    BidNotApproved(Uuid),

    #[error("A contract already exists for bid {0}")]
    ContractAlreadyExists(Uuid),

    #[error("Contract {0} must be approved before payments are recorded")]
    ContractNotApproved(Uuid),

    #[error("An invoice has already been issued for payment {0}")]
    InvoiceAlreadyIssued(Uuid),

    #[error("Payment {0} is already completed")]
    PaymentAlreadyCompleted(Uuid),

    #[error("Invalid dashboard type.")]
    InvalidDashboardType(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        if status.is_server_error() {
            return HttpError::server_error(ErrorMessage::ServerError.to_string());
        }
        HttpError::new(error.to_string(), status)
    }
}

impl From<String> for ServiceError {
    fn from(err: String) -> Self {
        ServiceError::Other(err)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::SellerProfileNotFound(_)
            | ServiceError::BuyerProfileNotFound(_)
            | ServiceError::TenderNotFound(_)
            | ServiceError::BidNotFound(_)
            | ServiceError::ContractNotFound(_)
            | ServiceError::PaymentNotFound(_)
            | ServiceError::TicketNotFound(_)
            | ServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::TenderClosed(_)
            | ServiceError::BidNotApproved(_)
            | ServiceError::ContractNotApproved(_)
            | ServiceError::PaymentAlreadyCompleted(_)
            | ServiceError::InvalidDashboardType(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::UnauthorizedAction => StatusCode::FORBIDDEN,

            ServiceError::EmailTaken(_)
            | ServiceError::EmailRegistered(_)
            | ServiceError::ContractAlreadyExists(_)
            | ServiceError::InvoiceAlreadyIssued(_) => StatusCode::CONFLICT,

            ServiceError::Database(_) | ServiceError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_profile_maps_to_not_found() {
        let err: HttpError = ServiceError::SellerProfileNotFound(Uuid::new_v4()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Seller profile not found.");
    }

    #[test]
    fn closed_tender_is_a_bad_request() {
        let err: HttpError = ServiceError::TenderClosed(Uuid::new_v4()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "This tender is no longer accepting bids.");
    }

    #[test]
    fn ownership_failure_is_forbidden() {
        let err: HttpError = ServiceError::UnauthorizedAction.into();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Unauthorized action.");
    }

    #[test]
    fn internal_failures_hide_details() {
        let err: HttpError = ServiceError::Other("pool timed out".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, ErrorMessage::ServerError.to_string());
    }
}
