use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::usermodel::{Buyer, Seller, User, UserType};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,

    #[validate(custom = "validate_registrable_type")]
    pub user_type: UserType,

    pub phone: Option<String>,

    pub buyer_name: Option<String>,
    pub buyer_phone: Option<String>,
    pub buyer_city: Option<String>,
    pub buyer_address: Option<String>,

    pub seller_name: Option<String>,
    pub seller_phone: Option<String>,
    pub seller_city: Option<String>,
    pub seller_address: Option<String>,
}

fn validate_registrable_type(user_type: &UserType) -> Result<(), validator::ValidationError> {
    match user_type {
        UserType::Buyer | UserType::Seller | UserType::Both => Ok(()),
        UserType::Admin => Err(validator::ValidationError::new("invalid_user_type")),
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    pub buyer_name: Option<String>,
    pub buyer_phone: Option<String>,
    pub buyer_city: Option<String>,
    pub buyer_address: Option<String>,

    pub seller_name: Option<String>,
    pub seller_phone: Option<String>,
    pub seller_city: Option<String>,
    pub seller_address: Option<String>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SwitchDashboardDto {
    #[validate(length(min = 1, message = "Dashboard type is required"))]
    pub dashboard_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub user_type: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: user.email.to_owned(),
            user_type: user.user_type.to_str().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
    pub redirect_to: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub user: FilterUserDto,
    pub buyer: Option<Buyer>,
    pub seller: Option<Seller>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSelectorDto {
    pub user_name: String,
    pub buyer_tenders_count: i64,
    pub seller_bids_count: i64,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(user_type: UserType) -> RegisterUserDto {
        RegisterUserDto {
            name: "Omar".to_string(),
            email: "omar@wasel.test".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret1".to_string(),
            user_type,
            phone: None,
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

    #[test]
    fn admin_accounts_cannot_self_register() {
        assert!(register(UserType::Both).validate().is_ok());
        assert!(register(UserType::Admin).validate().is_err());
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let mut dto = register(UserType::Seller);
        dto.password_confirm = "other".to_string();
        assert!(dto.validate().is_err());
    }
}
