use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        contractdtos::{AwardContractDto, CreateFeedbackDto, RecordPaymentDto},
        tenderdtos::{CreateTenderDto, CriterionDto, UpdateTenderStatusDto},
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    service::notification_service::RequestContext,
    AppState,
};

pub fn buyer_handler() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/tenders", get(list_tenders).post(create_tender))
        .route("/tenders/:tender_id", get(show_tender))
        .route("/tenders/:tender_id/status", put(update_tender_status))
        .route("/tenders/:tender_id/criteria", post(add_criterion))
        .route("/bids/:bid_id", get(show_bid))
        .route("/bids/:bid_id/approve", post(approve_bid))
        .route("/bids/:bid_id/reject", post(reject_bid))
        .route("/bids/:bid_id/contract", post(award_contract))
        .route("/contracts", get(list_contracts))
        .route("/contracts/:contract_id", get(review_contract))
        .route("/contracts/:contract_id/payments", post(record_payment))
        .route("/payments", get(list_payments))
        .route("/payments/:payment_id/complete", post(complete_payment))
        .route(
            "/payments/:payment_id/invoice",
            get(view_invoice).post(issue_invoice),
        )
        .route("/feedback", post(leave_feedback))
}

pub async fn dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Extension(context): Extension<RequestContext>,
) -> Result<impl IntoResponse, HttpError> {
    let dashboard = app_state
        .reporting_service
        .buyer_dashboard(user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "buyer_dashboard", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "data": dashboard,
        "context": context,
    })))
}

pub async fn list_tenders(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let tenders = app_state
        .tender_service
        .buyer_tenders(user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "buyer_tenders", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": tenders })))
}

pub async fn create_tender(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateTenderDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let tender = app_state
        .tender_service
        .create(user.user.id, &body)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "create_tender", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Tender published successfully!",
        "data": tender,
    })))
}

pub async fn show_tender(
    Path(tender_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let tender = app_state
        .tender_service
        .buyer_tender(user.user.id, tender_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "buyer_tender", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": tender })))
}

pub async fn update_tender_status(
    Path(tender_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateTenderStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let tender = app_state
        .tender_service
        .update_status(user.user.id, tender_id, body.status)
        .await
        .map_err(|e| {
            app_state
                .error_log_service
                .capture(e, "update_tender_status", Some(user.user.id))
        })?;

    Ok(Json(json!({ "status": "success", "data": tender })))
}

pub async fn add_criterion(
    Path(tender_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CriterionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let criterion = app_state
        .tender_service
        .add_criterion(user.user.id, tender_id, body)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "add_criterion", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": criterion })))
}

pub async fn show_bid(
    Path(bid_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let bid = app_state
        .bid_service
        .buyer_bid(user.user.id, bid_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "buyer_bid", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": bid })))
}

pub async fn approve_bid(
    Path(bid_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let bid = app_state
        .bid_service
        .review(user.user.id, bid_id, true)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "approve_bid", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Bid approved.",
        "data": bid,
    })))
}

pub async fn reject_bid(
    Path(bid_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let bid = app_state
        .bid_service
        .review(user.user.id, bid_id, false)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "reject_bid", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Bid rejected.",
        "data": bid,
    })))
}

pub async fn award_contract(
    Path(bid_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<AwardContractDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let contract = app_state
        .contract_service
        .award(user.user.id, bid_id, &body)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "award_contract", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Contract awarded successfully!",
        "data": contract,
    })))
}

pub async fn list_contracts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let contracts = app_state
        .contract_service
        .buyer_contracts(user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "buyer_contracts", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": contracts })))
}

pub async fn review_contract(
    Path(contract_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let review = app_state
        .contract_service
        .buyer_review(user.user.id, contract_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "buyer_review", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": review })))
}

pub async fn record_payment(
    Path(contract_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<RecordPaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let payment = app_state
        .payment_service
        .record(user.user.id, contract_id, &body)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "record_payment", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Payment recorded.",
        "data": payment,
    })))
}

pub async fn list_payments(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let payments = app_state
        .payment_service
        .buyer_payments(user.user.id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "buyer_payments", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": payments })))
}

pub async fn complete_payment(
    Path(payment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state
        .payment_service
        .complete(user.user.id, payment_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "complete_payment", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Payment marked as completed.",
        "data": payment,
    })))
}

pub async fn view_invoice(
    Path(payment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state
        .payment_service
        .buyer_invoice(user.user.id, payment_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "buyer_invoice", Some(user.user.id)))?;

    Ok(Json(json!({ "status": "success", "data": payment })))
}

pub async fn issue_invoice(
    Path(payment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let invoice = app_state
        .payment_service
        .issue_invoice(user.user.id, payment_id)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "issue_invoice", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Invoice issued.",
        "data": invoice,
    })))
}

pub async fn leave_feedback(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateFeedbackDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let feedback = app_state
        .contract_service
        .record_feedback(user.user.id, body)
        .await
        .map_err(|e| app_state.error_log_service.capture(e, "leave_feedback", Some(user.user.id)))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Thank you for your feedback.",
        "data": feedback,
    })))
}
