// src/db/sessiondb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::DBClient;
use crate::models::usermodel::UserSession;

#[async_trait]
pub trait SessionExt {
    async fn create_session(&self, user_id: Uuid) -> Result<UserSession, sqlx::Error>;

    async fn get_session(&self, session_id: Uuid) -> Result<Option<UserSession>, sqlx::Error>;

    async fn touch_session(&self, session_id: Uuid) -> Result<(), sqlx::Error>;

    async fn delete_session(&self, session_id: Uuid) -> Result<(), sqlx::Error>;

    async fn purge_idle_sessions(&self, idle_minutes: i64) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl SessionExt for DBClient {
    async fn create_session(&self, user_id: Uuid) -> Result<UserSession, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(
            r#"
            INSERT INTO user_sessions (user_id)
            VALUES ($1)
            RETURNING id, user_id, created_at, last_activity_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_session(&self, session_id: Uuid) -> Result<Option<UserSession>, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(
            "SELECT id, user_id, created_at, last_activity_at FROM user_sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn touch_session(&self, session_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE user_sessions SET last_activity_at = NOW() WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Drops every session idle for longer than `idle_minutes`.
    async fn purge_idle_sessions(&self, idle_minutes: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_sessions WHERE last_activity_at < NOW() - make_interval(mins => $1)",
        )
        .bind(idle_minutes as i32)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(pool: &sqlx::PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO users (name, email, password, user_type) VALUES ('U', $1, 'x', 'buyer') RETURNING id",
        )
        .bind(format!("{}@wasel.test", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn purge_removes_only_idle_sessions(pool: sqlx::PgPool) {
        let db = DBClient::new(pool.clone());
        let user_id = seed_user(&pool).await;

        let abandoned = db.create_session(user_id).await.unwrap();
        let active = db.create_session(user_id).await.unwrap();
        sqlx::query(
            "UPDATE user_sessions SET last_activity_at = NOW() - INTERVAL '3 hours' WHERE id = $1",
        )
        .bind(abandoned.id)
        .execute(&pool)
        .await
        .unwrap();

        let purged = db.purge_idle_sessions(120).await.unwrap();

        assert_eq!(purged, 1);
        assert!(db.get_session(abandoned.id).await.unwrap().is_none());
        assert!(db.get_session(active.id).await.unwrap().is_some());
    }
}
