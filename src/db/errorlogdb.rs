use async_trait::async_trait;
use uuid::Uuid;

use super::DBClient;

#[async_trait]
pub trait ErrorLogExt {
    async fn insert_error_log(
        &self,
        message: &str,
        context: &str,
        user_id: Option<Uuid>,
    ) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl ErrorLogExt for DBClient {
    async fn insert_error_log(
        &self,
        message: &str,
        context: &str,
        user_id: Option<Uuid>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO error_logs (message, context, user_id) VALUES ($1, $2, $3)")
            .bind(message)
            .bind(context)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
