pub mod account_service;
pub mod bid_service;
pub mod contract_service;
pub mod error;
pub mod error_log_service;
pub mod notification_service;
pub mod ownership;
pub mod payment_service;
pub mod reporting_service;
pub mod support_service;
pub mod tender_service;
