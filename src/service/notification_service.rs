// service/notification_service.rs
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{DBClient, MessageExt},
    models::messagemodel::Notification,
    service::error::ServiceError,
};

const NOTIFICATION_WINDOW_DAYS: i64 = 7;
const NOTIFICATION_LIMIT: i64 = 10;

/// Per-request chrome shown next to every authenticated response.
#[derive(Debug, Clone, Serialize, Default)]
pub struct RequestContext {
    pub unread_messages: i64,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, ServiceError> {
        Ok(self.db_client.count_unread_messages(user_id).await?)
    }

    pub async fn notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, ServiceError> {
        let since = Utc::now() - Duration::days(NOTIFICATION_WINDOW_DAYS);
        Ok(self
            .db_client
            .get_notifications(user_id, since, NOTIFICATION_LIMIT)
            .await?)
    }

    pub async fn request_context(&self, user_id: Uuid) -> Result<RequestContext, ServiceError> {
        Ok(RequestContext {
            unread_messages: self.unread_count(user_id).await?,
            notifications: self.notifications(user_id).await?,
        })
    }
}
