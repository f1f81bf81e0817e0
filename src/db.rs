// db.rs
use sqlx::{Pool, Postgres};

pub mod biddb;
pub mod contractdb;
pub mod dashboarddb;
pub mod errorlogdb;
pub mod feedbackdb;
pub mod messagedb;
pub mod paymentdb;
pub mod sessiondb;
pub mod supportdb;
pub mod tenderdb;
pub mod userdb;

pub use biddb::BidExt;
pub use contractdb::ContractExt;
pub use dashboarddb::DashboardExt;
pub use errorlogdb::ErrorLogExt;
pub use feedbackdb::FeedbackExt;
pub use messagedb::MessageExt;
pub use paymentdb::PaymentExt;
pub use sessiondb::SessionExt;
pub use supportdb::SupportExt;
pub use tenderdb::TenderExt;
pub use userdb::UserExt;

#[derive(Debug, Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }
}

/// True when `err` is a unique violation on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
