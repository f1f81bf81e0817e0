// src/db/userdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::DBClient;
use crate::models::usermodel::{Buyer, Seller, User};

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_buyer_by_user(&self, user_id: Uuid) -> Result<Option<Buyer>, sqlx::Error>;

    async fn get_seller_by_user(&self, user_id: Uuid) -> Result<Option<Seller>, sqlx::Error>;

    async fn get_seller(&self, seller_id: Uuid) -> Result<Option<Seller>, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT id, name, email, password, user_type, created_at, updated_at
                FROM users WHERE id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT id, name, email, password, user_type, created_at, updated_at
                FROM users WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_buyer_by_user(&self, user_id: Uuid) -> Result<Option<Buyer>, sqlx::Error> {
        sqlx::query_as::<_, Buyer>("SELECT * FROM buyers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_seller_by_user(&self, user_id: Uuid) -> Result<Option<Seller>, sqlx::Error> {
        sqlx::query_as::<_, Seller>("SELECT * FROM sellers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_seller(&self, seller_id: Uuid) -> Result<Option<Seller>, sqlx::Error> {
        sqlx::query_as::<_, Seller>("SELECT * FROM sellers WHERE id = $1")
            .bind(seller_id)
            .fetch_optional(&self.pool)
            .await
    }
}
