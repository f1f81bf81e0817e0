// service/error_log_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DBClient, ErrorLogExt},
    error::HttpError,
    service::error::ServiceError,
};

/// Turns service failures into responses, recording the unexpected ones.
#[derive(Debug, Clone)]
pub struct ErrorLogService {
    db_client: Arc<DBClient>,
}

impl ErrorLogService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub fn capture(&self, err: ServiceError, context: &'static str, user_id: Option<Uuid>) -> HttpError {
        let status = err.status_code();

        if status.is_server_error() {
            let message = err.to_string();
            tracing::error!("{} failed for user {:?}: {}", context, user_id, message);

            // Best effort; the response does not wait on the log row.
            let db_client = self.db_client.clone();
            tokio::spawn(async move {
                if let Err(e) = db_client.insert_error_log(&message, context, user_id).await {
                    tracing::warn!("could not persist error log: {}", e);
                }
            });
        } else {
            tracing::debug!("{} rejected for user {:?}: {}", context, user_id, err);
        }

        err.into()
    }
}
