mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use db::DBClient;
use dotenv::dotenv;
use routes::create_router;
use service::{
    account_service::AccountService, bid_service::BidService,
    contract_service::ContractService, error_log_service::ErrorLogService,
    notification_service::NotificationService, payment_service::PaymentService,
    reporting_service::ReportingService, support_service::SupportService,
    tender_service::TenderService,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub account_service: Arc<AccountService>,
    pub tender_service: Arc<TenderService>,
    pub bid_service: Arc<BidService>,
    pub contract_service: Arc<ContractService>,
    pub payment_service: Arc<PaymentService>,
    pub reporting_service: Arc<ReportingService>,
    pub support_service: Arc<SupportService>,
    pub notification_service: Arc<NotificationService>,
    pub error_log_service: Arc<ErrorLogService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        AppState {
            env: config,
            account_service: Arc::new(AccountService::new(db_client_arc.clone())),
            tender_service: Arc::new(TenderService::new(db_client_arc.clone())),
            bid_service: Arc::new(BidService::new(db_client_arc.clone())),
            contract_service: Arc::new(ContractService::new(db_client_arc.clone())),
            payment_service: Arc::new(PaymentService::new(db_client_arc.clone())),
            reporting_service: Arc::new(ReportingService::new(db_client_arc.clone())),
            support_service: Arc::new(SupportService::new(db_client_arc.clone())),
            notification_service: Arc::new(NotificationService::new(db_client_arc.clone())),
            error_log_service: Arc::new(ErrorLogService::new(db_client_arc.clone())),
            db_client: db_client_arc,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = Config::init();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app_state = AppState::new(DBClient::new(pool), config.clone());

    let app = create_router(Arc::new(app_state)).layer(cors);

    tracing::info!("Server is running on http://localhost:{}", config.port);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind port {}: {}", config.port, err);
            std::process::exit(1);
        }
    };

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
    }
}
