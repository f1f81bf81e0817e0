use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{SessionExt, UserExt},
    error::{ErrorMessage, HttpError},
    models::usermodel::{User, UserType},
    service::notification_service::RequestContext,
    utils::token,
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JWTAuthMiddeware {
    pub user: User,
    pub session_id: Uuid,
}

/// Pulls the token from the `token` cookie, falling back to a bearer header.
fn extract_token(cookie_jar: &CookieJar, req: &Request) -> Option<String> {
    cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
                .map(|token| token.to_owned())
        })
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = extract_token(&cookie_jar, &req).ok_or_else(|| {
        HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string())
    })?;

    let claims = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;
    let session_id = Uuid::parse_str(&claims.sid)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let session = app_state
        .db_client
        .get_session(session_id)
        .await
        .map_err(|e| {
            tracing::error!("session lookup failed: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .filter(|session| session.user_id == user_id)
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::SessionExpired.to_string()))?;

    if session.is_idle_expired(Utc::now(), app_state.env.session_idle_minutes) {
        tracing::info!("session {} for user {} expired after inactivity", session.id, user_id);
        if let Err(e) = app_state.db_client.delete_session(session.id).await {
            tracing::warn!("could not delete expired session {}: {}", session.id, e);
        }
        return Err(HttpError::unauthorized(ErrorMessage::SessionExpired.to_string()));
    }

    app_state
        .db_client
        .touch_session(session.id)
        .await
        .map_err(|e| {
            tracing::error!("session refresh failed: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|_| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    req.extensions_mut().insert(JWTAuthMiddeware {
        user,
        session_id: session.id,
    });

    Ok(next.run(req).await)
}

pub async fn role_check(
    Extension(_app_state): Extension<Arc<AppState>>,
    req: Request,
    next: Next,
    required_roles: Vec<UserType>,
) -> Result<impl IntoResponse, HttpError> {
    let user = req
        .extensions()
        .get::<JWTAuthMiddeware>()
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNotAuthenticated.to_string()))?;

    if !required_roles.contains(&user.user.user_type) {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    Ok(next.run(req).await)
}

pub fn admin_only() -> Vec<UserType> {
    vec![UserType::Admin]
}

pub fn seller_only() -> Vec<UserType> {
    vec![UserType::Seller, UserType::Both]
}

pub fn buyer_only() -> Vec<UserType> {
    vec![UserType::Buyer, UserType::Both]
}

/// Attaches the unread count and recent notifications for the signed-in user.
/// Runs after `auth`; a failed lookup degrades to an empty context.
pub async fn request_context(
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> impl IntoResponse {
    let user_id = req.extensions().get::<JWTAuthMiddeware>().map(|auth| auth.user.id);

    let context = match user_id {
        Some(user_id) => app_state
            .notification_service
            .request_context(user_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("request context unavailable for user {}: {}", user_id, e);
                RequestContext::default()
            }),
        None => RequestContext::default(),
    };

    req.extensions_mut().insert(context);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum_extra::extract::cookie::Cookie;

    #[test]
    fn token_prefers_cookie_over_header() {
        let jar = CookieJar::new().add(Cookie::new("token", "from-cookie"));
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Bearer from-header")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_token(&jar, &req).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn bearer_header_is_accepted() {
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_token(&CookieJar::new(), &req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        assert!(extract_token(&CookieJar::new(), &req).is_none());
    }

    #[test]
    fn role_policies_cover_dual_accounts() {
        assert!(seller_only().contains(&UserType::Both));
        assert!(buyer_only().contains(&UserType::Both));
        assert!(!buyer_only().contains(&UserType::Seller));
        assert_eq!(admin_only(), vec![UserType::Admin]);
    }
}
