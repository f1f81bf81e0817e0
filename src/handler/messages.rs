use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{MessageExt, UserExt},
    dtos::supportdtos::{MessageIndexDto, MessageItemDto, SendMessageDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    service::notification_service::RequestContext,
    AppState,
};

pub fn messages_handler() -> Router {
    Router::new()
        .route("/", get(list_messages).post(send_message))
        .route("/:message_id/read", post(mark_read))
        .route("/unread-count", get(unread_count))
        .route("/notifications", get(notifications))
}

pub async fn list_messages(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Extension(context): Extension<RequestContext>,
) -> Result<impl IntoResponse, HttpError> {
    let user_id = user.user.id;
    let capture = |e: sqlx::Error| app_state.error_log_service.capture(e.into(), "list_messages", Some(user_id));

    let messages = app_state.db_client.get_user_messages(user_id).await.map_err(capture)?;
    let recipients = app_state.db_client.get_recipients(user_id).await.map_err(capture)?;

    let messages = messages
        .into_iter()
        .map(|message| MessageItemDto {
            is_sent_by_me: message.message.sender_id == user_id,
            message,
        })
        .collect();

    Ok(Json(json!({
        "status": "success",
        "data": MessageIndexDto {
            messages,
            recipients,
            unread_count: context.unread_messages,
        },
    })))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user_id = user.user.id;
    if body.receiver_id == user_id {
        return Err(HttpError::bad_request("You cannot message yourself."));
    }

    let receiver = app_state
        .db_client
        .get_user(Some(body.receiver_id), None)
        .await
        .map_err(|e| app_state.error_log_service.capture(e.into(), "send_message", Some(user_id)))?;
    if receiver.is_none() {
        return Err(HttpError::not_found("Recipient not found."));
    }

    let message = app_state
        .db_client
        .send_message(user_id, body.receiver_id, body.message_text.trim().to_string())
        .await
        .map_err(|e| app_state.error_log_service.capture(e.into(), "send_message", Some(user_id)))?;

    tracing::debug!("message {} sent from {} to {}", message.id, user_id, body.receiver_id);

    Ok(Json(json!({
        "status": "success",
        "message": "Message sent successfully!",
        "data": message,
    })))
}

/// Only the receiver can mark a message as read.
pub async fn mark_read(
    Path(message_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let message = app_state
        .db_client
        .mark_message_read(message_id, user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e.into(), "mark_read", Some(user.user.id)))?
        .ok_or_else(|| HttpError::not_found("Message not found."))?;

    Ok(Json(json!({ "status": "success", "data": message })))
}

pub async fn unread_count(
    Extension(context): Extension<RequestContext>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(json!({
        "status": "success",
        "data": { "count": context.unread_messages },
    })))
}

pub async fn notifications(
    Extension(context): Extension<RequestContext>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(json!({
        "status": "success",
        "data": context.notifications,
    })))
}
