use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownVariant;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Buyer,
    Seller,
    Both,
}

impl UserType {
    pub fn to_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Buyer => "buyer",
            UserType::Seller => "seller",
            UserType::Both => "both",
        }
    }

    pub fn is_buyer(&self) -> bool {
        matches!(self, UserType::Buyer | UserType::Both)
    }

    pub fn is_seller(&self) -> bool {
        matches!(self, UserType::Seller | UserType::Both)
    }

    /// Where a freshly signed-in user of this type lands.
    pub fn landing_path(&self) -> &'static str {
        match self {
            UserType::Admin => "/api/support/tickets",
            UserType::Buyer => "/api/buyer/dashboard",
            UserType::Seller => "/api/seller/dashboard",
            UserType::Both => "/api/auth/dashboard-selector",
        }
    }
}

impl TryFrom<String> for UserType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "admin" => Ok(UserType::Admin),
            "buyer" => Ok(UserType::Buyer),
            "seller" => Ok(UserType::Seller),
            "both" => Ok(UserType::Both),
            _ => Err(UnknownVariant::new("user_type", value)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[sqlx(try_from = "String")]
    pub user_type: UserType,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Buyer {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub buyer_name: String,
    pub contact_phone: Option<String>,
    pub buyer_city: Option<String>,
    pub buyer_address: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Seller {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub seller_name: String,
    pub contact_phone: Option<String>,
    pub seller_city: Option<String>,
    pub seller_address: Option<String>,
}

/// Server-side half of an authenticated session; drives the idle timeout.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct UserSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl UserSession {
    pub fn is_idle_expired(&self, now: DateTime<Utc>, idle_minutes: i64) -> bool {
        now.signed_duration_since(self.last_activity_at) > chrono::Duration::minutes(idle_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_parses_case_insensitively() {
        assert_eq!(UserType::try_from("Admin".to_string()), Ok(UserType::Admin));
        assert_eq!(UserType::try_from("both".to_string()), Ok(UserType::Both));
        assert!(UserType::try_from("normal".to_string()).is_err());
    }

    #[test]
    fn both_counts_as_buyer_and_seller() {
        assert!(UserType::Both.is_buyer());
        assert!(UserType::Both.is_seller());
        assert!(!UserType::Admin.is_seller());
        assert!(!UserType::Seller.is_buyer());
    }

    #[test]
    fn dual_role_users_land_on_selector() {
        assert_eq!(UserType::Both.landing_path(), "/api/auth/dashboard-selector");
        assert_eq!(UserType::Admin.landing_path(), "/api/support/tickets");
    }

    #[test]
    fn session_expires_after_idle_window() {
        let now = Utc::now();
        let session = UserSession {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: now - chrono::Duration::hours(5),
            last_activity_at: now - chrono::Duration::minutes(121),
        };
        assert!(session.is_idle_expired(now, 120));

        let fresh = UserSession {
            last_activity_at: now - chrono::Duration::minutes(119),
            ..session
        };
        assert!(!fresh.is_idle_expired(now, 120));
    }
}
