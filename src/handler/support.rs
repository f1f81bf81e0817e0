use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::supportdtos::{
        AssignTicketDto, TicketReplyDto, TicketStatusQueryDto, UpdateTicketStatusDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn support_handler() -> Router {
    Router::new()
        .route("/tickets", get(ticket_queue))
        .route("/tickets/:ticket_id", get(show_ticket))
        .route("/tickets/:ticket_id/assign", put(assign_ticket))
        .route("/tickets/:ticket_id/status", put(update_status))
        .route(
            "/tickets/:ticket_id/reply",
            put(reply).post(reply).delete(delete_reply),
        )
        .route("/statistics", get(statistics))
}

pub async fn ticket_queue(
    Query(query): Query<TicketStatusQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let status = query.status_filter().map_err(HttpError::bad_request)?;

    let queue = app_state
        .support_service
        .queue(status, query.page.unwrap_or(1))
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "ticket_queue", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": queue })))
}

pub async fn show_ticket(
    Path(ticket_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .support_service
        .ticket(ticket_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "support_ticket", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": ticket })))
}

pub async fn assign_ticket(
    Path(ticket_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<AssignTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .support_service
        .assign(ticket_id, body.cs_member_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "assign_ticket", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Ticket assigned.",
        "data": ticket,
    })))
}

pub async fn update_status(
    Path(ticket_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateTicketStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .support_service
        .set_status(ticket_id, body.status)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "ticket_status", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": format!("Ticket marked as {}.", body.status.to_str()),
        "data": ticket,
    })))
}

pub async fn reply(
    Path(ticket_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<TicketReplyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let ticket = app_state
        .support_service
        .reply(ticket_id, user.user.id, body.message.trim().to_string())
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "ticket_reply", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Reply saved.",
        "data": ticket,
    })))
}

pub async fn delete_reply(
    Path(ticket_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .support_service
        .remove_reply(ticket_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "delete_reply", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Reply deleted.",
        "data": ticket,
    })))
}

pub async fn statistics(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state
        .reporting_service
        .support_statistics()
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "support_statistics", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": stats })))
}
