// service/account_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DBClient, UserExt},
    dtos::{FilterUserDto, ProfileDto, ProfileUpdateDto, RegisterUserDto},
    models::usermodel::User,
    service::error::ServiceError,
    utils::password,
};

/// Profile fields for one side of an account, after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFields {
    pub name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
}

impl ProfileFields {
    /// Falls back to the account name and the general phone when the
    /// role-specific values are blank.
    pub fn resolve(
        account_name: &str,
        general_phone: Option<&String>,
        name: Option<&String>,
        phone: Option<&String>,
        city: Option<&String>,
        address: Option<&String>,
    ) -> Self {
        ProfileFields {
            name: non_blank(name).unwrap_or_else(|| account_name.to_string()),
            phone: non_blank(phone).or_else(|| non_blank(general_phone)),
            city: non_blank(city),
            address: non_blank(address),
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone)]
pub struct AccountService {
    db_client: Arc<DBClient>,
}

impl AccountService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Creates the user and whichever buyer/seller profiles its type calls for.
    pub async fn register(&self, body: RegisterUserDto) -> Result<User, ServiceError> {
        let email = body.email.trim().to_lowercase();

        if self.db_client.get_user(None, Some(&email)).await?.is_some() {
            return Err(ServiceError::EmailRegistered(email));
        }

        let hashed_password =
            password::hash(&body.password).map_err(|e| ServiceError::Other(e.to_string()))?;

        let mut tx = self.db_client.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, user_type)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&body.name)
        .bind(&email)
        .bind(&hashed_password)
        .bind(body.user_type.to_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if crate::db::is_unique_violation(&e, "users_email_key") {
                ServiceError::EmailRegistered(email.clone())
            } else {
                ServiceError::Database(e)
            }
        })?;

        if body.user_type.is_buyer() {
            let buyer = ProfileFields::resolve(
                &body.name,
                body.phone.as_ref(),
                body.buyer_name.as_ref(),
                body.buyer_phone.as_ref(),
                body.buyer_city.as_ref(),
                body.buyer_address.as_ref(),
            );
            sqlx::query(
                r#"
                INSERT INTO buyers (user_id, buyer_name, contact_phone, buyer_city, buyer_address)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(user.id)
            .bind(buyer.name)
            .bind(buyer.phone)
            .bind(buyer.city)
            .bind(buyer.address)
            .execute(&mut *tx)
            .await?;
        }

        if body.user_type.is_seller() {
            let seller = ProfileFields::resolve(
                &body.name,
                body.phone.as_ref(),
                body.seller_name.as_ref(),
                body.seller_phone.as_ref(),
                body.seller_city.as_ref(),
                body.seller_address.as_ref(),
            );
            sqlx::query(
                r#"
                INSERT INTO sellers (user_id, seller_name, contact_phone, seller_city, seller_address)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(user.id)
            .bind(seller.name)
            .bind(seller.phone)
            .bind(seller.city)
            .bind(seller.address)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("registered {} account {}", user.user_type.to_str(), user.id);
        Ok(user)
    }

    pub async fn profile(&self, user: &User) -> Result<ProfileDto, ServiceError> {
        let buyer = if user.user_type.is_buyer() {
            self.db_client.get_buyer_by_user(user.id).await?
        } else {
            None
        };
        let seller = if user.user_type.is_seller() {
            self.db_client.get_seller_by_user(user.id).await?
        } else {
            None
        };

        Ok(ProfileDto {
            user: FilterUserDto::filter_user(user),
            buyer,
            seller,
        })
    }

    /// Rewrites the account and the profiles its type owns in one transaction.
    pub async fn update_profile(
        &self,
        user: &User,
        body: ProfileUpdateDto,
    ) -> Result<ProfileDto, ServiceError> {
        let email = body.email.trim().to_lowercase();

        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(&email)
        .bind(user.id)
        .fetch_one(&self.db_client.pool)
        .await?;
        if taken {
            return Err(ServiceError::EmailTaken(email));
        }

        let mut tx = self.db_client.pool.begin().await?;

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&body.name)
        .bind(&email)
        .fetch_one(&mut *tx)
        .await?;

        if user.user_type.is_buyer() {
            let buyer = ProfileFields::resolve(
                &body.name,
                None,
                body.buyer_name.as_ref(),
                body.buyer_phone.as_ref(),
                body.buyer_city.as_ref(),
                body.buyer_address.as_ref(),
            );
            sqlx::query(
                r#"
                UPDATE buyers SET buyer_name = $2, contact_phone = $3, buyer_city = $4, buyer_address = $5
                WHERE user_id = $1
                "#,
            )
            .bind(user.id)
            .bind(buyer.name)
            .bind(buyer.phone)
            .bind(buyer.city)
            .bind(buyer.address)
            .execute(&mut *tx)
            .await?;
        }

        if user.user_type.is_seller() {
            let seller = ProfileFields::resolve(
                &body.name,
                None,
                body.seller_name.as_ref(),
                body.seller_phone.as_ref(),
                body.seller_city.as_ref(),
                body.seller_address.as_ref(),
            );
            sqlx::query(
                r#"
                UPDATE sellers SET seller_name = $2, contact_phone = $3, seller_city = $4, seller_address = $5
                WHERE user_id = $1
                "#,
            )
            .bind(user.id)
            .bind(seller.name)
            .bind(seller.phone)
            .bind(seller.city)
            .bind(seller.address)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("profile updated for user {}", user.id);
        self.profile(&updated).await
    }

    /// Removes the profiles and then the user; owned rows cascade.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        sqlx::query("DELETE FROM buyers WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM sellers WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ServiceError::UserNotFound(user_id));
        }

        tx.commit().await?;

        tracing::info!("account {} deleted", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::usermodel::UserType;

    #[test]
    fn blank_profile_fields_fall_back_to_account_values() {
        let phone = "0500000000".to_string();
        let blank = "  ".to_string();
        let fields = ProfileFields::resolve("Layla", Some(&phone), Some(&blank), None, None, None);
        assert_eq!(
            fields,
            ProfileFields {
                name: "Layla".to_string(),
                phone: Some(phone.clone()),
                city: None,
                address: None,
            }
        );
    }

    #[test]
    fn specific_profile_values_win() {
        let general = "0500000000".to_string();
        let name = "Layla Trading".to_string();
        let phone = "0511111111".to_string();
        let city = "Riyadh".to_string();
        let fields =
            ProfileFields::resolve("Layla", Some(&general), Some(&name), Some(&phone), Some(&city), None);
        assert_eq!(fields.name, name);
        assert_eq!(fields.phone, Some(phone));
        assert_eq!(fields.city, Some(city));
    }

    fn registration(email: &str) -> RegisterUserDto {
        RegisterUserDto {
            name: "Layla".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret1".to_string(),
            user_type: UserType::Both,
            phone: Some("0500000000".to_string()),
            buyer_name: None,
            buyer_phone: None,
            buyer_city: None,
            buyer_address: None,
            seller_name: None,
            seller_phone: None,
            seller_city: None,
            seller_address: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn deleting_account_removes_profiles(pool: sqlx::PgPool) {
        let service = AccountService::new(Arc::new(DBClient::new(pool.clone())));
        let user = service.register(registration("layla@wasel.test")).await.unwrap();

        let profiles: i64 = sqlx::query_scalar(
            "SELECT (SELECT COUNT(*) FROM buyers) + (SELECT COUNT(*) FROM sellers)",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(profiles, 2);

        service.delete_account(user.id).await.unwrap();

        let remaining: i64 = sqlx::query_scalar(
            "SELECT (SELECT COUNT(*) FROM users) + (SELECT COUNT(*) FROM buyers) + (SELECT COUNT(*) FROM sellers)",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(remaining, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn duplicate_email_is_refused(pool: sqlx::PgPool) {
        let service = AccountService::new(Arc::new(DBClient::new(pool)));
        service.register(registration("dup@wasel.test")).await.unwrap();
        let second = service.register(registration("DUP@wasel.test")).await;
        assert!(matches!(second, Err(ServiceError::EmailRegistered(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn failed_user_delete_keeps_the_profiles(pool: sqlx::PgPool) {
        let service = AccountService::new(Arc::new(DBClient::new(pool.clone())));
        let user = service.register(registration("keep@wasel.test")).await.unwrap();

        sqlx::query(
            r#"
            CREATE FUNCTION refuse_user_delete() RETURNS trigger AS $$
            BEGIN
                RAISE EXCEPTION 'user rows are locked';
            END;
            $$ LANGUAGE plpgsql
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TRIGGER users_refuse_delete BEFORE DELETE ON users FOR EACH ROW EXECUTE FUNCTION refuse_user_delete()",
        )
        .execute(&pool)
        .await
        .unwrap();

        assert!(service.delete_account(user.id).await.is_err());

        let remaining: i64 = sqlx::query_scalar(
            "SELECT (SELECT COUNT(*) FROM users) + (SELECT COUNT(*) FROM buyers) + (SELECT COUNT(*) FROM sellers)",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(remaining, 3);
    }
}
