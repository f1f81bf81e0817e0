use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{supportdtos::CreateTicketDto, Response},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::supportmodel::ISSUE_TYPES,
    service::notification_service::RequestContext,
    AppState,
};

pub fn tickets_handler() -> Router {
    Router::new()
        .route("/", get(my_tickets).post(open_ticket))
        .route("/issue-types", get(issue_types))
        .route(
            "/:ticket_id",
            get(show_ticket).put(edit_ticket).delete(withdraw_ticket),
        )
}

pub async fn my_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Extension(context): Extension<RequestContext>,
) -> Result<impl IntoResponse, HttpError> {
    let tickets = app_state
        .support_service
        .my_tickets(user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "my_tickets", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "data": tickets,
        "context": context,
    })))
}

pub async fn issue_types() -> impl IntoResponse {
    Json(json!({ "status": "success", "data": ISSUE_TYPES }))
}

pub async fn open_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let ticket = app_state
        .support_service
        .open_ticket(user.user.id, body)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "open_ticket", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Your ticket has been submitted.",
        "data": ticket,
    })))
}

pub async fn show_ticket(
    Path(ticket_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .support_service
        .my_ticket(user.user.id, ticket_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "show_ticket", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": ticket })))
}

pub async fn edit_ticket(
    Path(ticket_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let ticket = app_state
        .support_service
        .edit_ticket(user.user.id, ticket_id, body)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "edit_ticket", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Ticket updated.",
        "data": ticket,
    })))
}

pub async fn withdraw_ticket(
    Path(ticket_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .support_service
        .withdraw_ticket(user.user.id, ticket_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "withdraw_ticket", Some(user.user.id)))?;

    Ok(Json(Response {
        status: "success",
        message: "Ticket deleted.".to_string(),
    }))
}
