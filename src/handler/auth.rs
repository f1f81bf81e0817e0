use std::sync::Arc;

use axum::{
    http::{header, HeaderMap},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::{SessionExt, UserExt},
    dtos::{
        dashboarddtos::RedirectDto, FilterUserDto, LoginUserDto, RegisterUserDto, Response,
        SwitchDashboardDto, UserData, UserLoginResponseDto, UserResponseDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::{auth, JWTAuthMiddeware},
    models::usermodel::UserType,
    service::reporting_service::switch_target,
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout).layer(middleware::from_fn(auth)))
        .route(
            "/dashboard-selector",
            get(dashboard_selector).layer(middleware::from_fn(auth)),
        )
        .route(
            "/switch-dashboard",
            post(switch_dashboard).layer(middleware::from_fn(auth)),
        )
}

fn token_cookie(value: String, max_age: time::Duration) -> Result<HeaderMap, HttpError> {
    let cookie = Cookie::build(("token", value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error(ErrorMessage::ServerError.to_string()))?,
    );
    Ok(headers)
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .account_service
        .register(body)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "register", None))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let email = body.email.trim().to_lowercase();
    let result = app_state
        .db_client
        .get_user(None, Some(&email))
        .await
        .map_err(|e| app_state.error_log_service.capture(e.into(), "login", None))?;

    let user = result.ok_or(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        tracing::info!("failed login for {}", email);
        return Err(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()));
    }

    match app_state
        .db_client
        .purge_idle_sessions(app_state.env.session_idle_minutes)
        .await
    {
        Ok(0) => {}
        Ok(purged) => tracing::debug!("purged {} idle sessions", purged),
        Err(e) => tracing::warn!("failed to purge idle sessions: {}", e),
    }

    let session = app_state
        .db_client
        .create_session(user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e.into(), "login", Some(user.id)))?;

    let lifetime = app_state.env.token_lifetime_minutes(body.remember_me);
    let token = token::create_token(
        &user,
        session.id,
        app_state.env.jwt_secret.as_bytes(),
        lifetime,
    )
    .map_err(token_error)?;

    let headers = token_cookie(token.clone(), time::Duration::minutes(lifetime))?;

    tracing::info!("user {} signed in as {}", user.id, user.user_type.to_str());

    let mut response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
        redirect_to: user.user_type.landing_path().to_string(),
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn logout(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .delete_session(auth.session_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e.into(), "logout", Some(auth.user.id)))?;

    let headers = token_cookie(String::new(), time::Duration::ZERO)?;

    let mut response = Json(Response {
        status: "success",
        message: "Logged out successfully".to_string(),
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

/// Only dual-role accounts get the selector; everyone else is pointed home.
pub async fn dashboard_selector(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    if auth.user.user_type != UserType::Both {
        return Ok(Json(RedirectDto {
            status: "redirect",
            redirect_to: auth.user.user_type.landing_path(),
        })
        .into_response());
    }

    let selector = app_state
        .reporting_service
        .dashboard_selector(&auth.user)
        .await
        .map_err(|e| {
            app_state
                .error_log_service
                .capture(e, "dashboard_selector", Some(auth.user.id))
        })?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": selector,
    }))
    .into_response())
}

pub async fn switch_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<SwitchDashboardDto>,
) -> Result<impl IntoResponse, HttpError> {
    let target = switch_target(auth.user.user_type, body.dashboard_type.trim())
        .map_err(|e| {
            app_state
                .error_log_service
                .capture(e, "switch_dashboard", Some(auth.user.id))
        })?;

    Ok(Json(RedirectDto {
        status: "success",
        redirect_to: target,
    }))
}

fn token_error(e: jsonwebtoken::errors::Error) -> HttpError {
    tracing::error!("failed to sign token: {}", e);
    HttpError::server_error(ErrorMessage::ServerError.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_failures_do_not_leak_details() {
        let error = token_error(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into());
        assert_eq!(error.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message, ErrorMessage::ServerError.to_string());
        assert!(!error.message.contains("InvalidKeyFormat"));
    }

    #[test]
    fn token_cookie_is_http_only() {
        let headers = token_cookie("abc".to_string(), time::Duration::minutes(120)).unwrap();
        let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("token=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=7200"));
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let headers = token_cookie(String::new(), time::Duration::ZERO).unwrap();
        let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
    }
}
