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
    dtos::{
        contractdtos::{FeedbackQueryDto, UpdateContractStatusDto},
        tenderdtos::{PageQueryDto, SubmitBidDto},
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    service::{bid_service::submission_message, notification_service::RequestContext},
    AppState,
};

pub fn seller_handler() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/tenders", get(list_tenders))
        .route("/tenders/:tender_id", get(show_tender))
        .route("/bids", get(list_bids).post(submit_bid))
        .route("/bids/stats", get(bid_stats))
        .route("/bids/:bid_id", get(show_bid))
        .route("/contracts", get(list_contracts))
        .route("/contracts/:contract_id", get(review_contract))
        .route("/contracts/:contract_id/status", put(update_contract_status))
        .route("/payments", get(list_payments))
        .route("/payments/:payment_id/invoice", get(view_invoice))
        .route("/feedback", get(list_feedback))
}

pub async fn dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Extension(context): Extension<RequestContext>,
) -> Result<impl IntoResponse, HttpError> {
    let dashboard = app_state
        .reporting_service
        .seller_dashboard(user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "seller_dashboard", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "data": dashboard,
        "context": context,
    })))
}

pub async fn list_tenders(
    Query(query): Query<PageQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let tenders = app_state
        .tender_service
        .list_open(user.user.id, query.page.unwrap_or(1))
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "list_tenders", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": tenders })))
}

pub async fn show_tender(
    Path(tender_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let tender = app_state
        .tender_service
        .show(user.user.id, tender_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "show_tender", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": tender })))
}

pub async fn submit_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<SubmitBidDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let submission = app_state
        .bid_service
        .submit_or_update(user.user.id, &body)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "submit_bid", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": submission_message(&submission),
        "data": submission.bid,
    })))
}

pub async fn list_bids(
    Query(query): Query<PageQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let bids = app_state
        .bid_service
        .list(user.user.id, query.page.unwrap_or(1))
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "list_bids", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": bids })))
}

pub async fn show_bid(
    Path(bid_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let bid = app_state
        .bid_service
        .show(user.user.id, bid_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "show_bid", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": bid })))
}

pub async fn bid_stats(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state
        .bid_service
        .stats(user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "bid_stats", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": stats })))
}

pub async fn list_contracts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let contracts = app_state
        .contract_service
        .seller_contracts(user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "seller_contracts", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": contracts })))
}

pub async fn review_contract(
    Path(contract_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let review = app_state
        .contract_service
        .seller_review(user.user.id, contract_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "review_contract", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": review })))
}

pub async fn update_contract_status(
    Path(contract_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateContractStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let result = app_state
        .contract_service
        .update_status(user.user.id, contract_id, body.status)
        .await
        .map_err(|e| {
            app_state
                .error_log_service
                .capture(e, "update_contract_status", Some(user.user.id))
        })?;

    Ok(Json(json!({
        "status": "success",
        "message": result.message,
        "data": result.contract,
    })))
}

pub async fn list_payments(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let payments = app_state
        .payment_service
        .seller_payments(user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "seller_payments", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": payments })))
}

pub async fn view_invoice(
    Path(payment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state
        .payment_service
        .seller_invoice(user.user.id, payment_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "seller_invoice", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": payment })))
}

pub async fn list_feedback(
    Query(query): Query<FeedbackQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let feedback = app_state
        .reporting_service
        .seller_feedback(user.user.id, query)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "seller_feedback", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": feedback })))
}
