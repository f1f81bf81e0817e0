use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ErrorMessage, HttpError},
    models::usermodel::User,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub user_type: String,
    pub sid: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn create_token(
    user: &User,
    session_id: Uuid,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::minutes(expires_in_minutes)).timestamp() as usize;
    let claims = TokenClaims {
        sub: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        user_type: user.user_type.to_str().to_string(),
        sid: session_id.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<TokenClaims, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    );

    match decoded {
        Ok(token) => Ok(token.claims),
        Err(_) => Err(HttpError::unauthorized(ErrorMessage::InvalidToken.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::usermodel::UserType;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Huda".to_string(),
            email: "huda@wasel.test".to_string(),
            password: String::new(),
            user_type: UserType::Both,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn claims_survive_round_trip() {
        let user = user();
        let sid = Uuid::new_v4();
        let token = create_token(&user, sid, b"secret", 60).unwrap();
        let claims = decode_token(token, b"secret").unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.user_type, "both");
        assert_eq!(claims.sid, sid.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(&user(), Uuid::new_v4(), b"secret", 60).unwrap();
        assert!(decode_token(token, b"other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = create_token(&user(), Uuid::new_v4(), b"secret", -10).unwrap();
        assert!(decode_token(token, b"secret").is_err());
    }
}
