use std::sync::Arc;

use axum::{
    http::header,
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    dtos::{FilterUserDto, ProfileUpdateDto, Response, UserData, UserResponseDto},
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    service::notification_service::RequestContext,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/account", delete(delete_account))
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddeware>,
    Extension(context): Extension<RequestContext>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(serde_json::json!({
        "status": "success",
        "data": UserData {
            user: FilterUserDto::filter_user(&user.user),
        },
        "context": context,
    })))
}

pub async fn get_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .account_service
        .profile(&user.user)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "get_profile", Some(user.user.id)))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": profile,
    })))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<ProfileUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let profile = app_state
        .account_service
        .update_profile(&user.user, body)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "update_profile", Some(user.user.id)))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData { user: profile.user },
    }))
}

/// Deletes the account, its profiles and every session, then clears the cookie.
pub async fn delete_account(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .account_service
        .delete_account(user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "delete_account", Some(user.user.id)))?;

    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    let mut response = Json(Response {
        status: "success",
        message: "Your account has been deleted.".to_string(),
    })
    .into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error(ErrorMessage::ServerError.to_string()))?,
    );

    Ok(response)
}
