use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler, buyer::buyer_handler, messages::messages_handler,
        seller::seller_handler, support::support_handler, tickets::tickets_handler,
        users::users_handler,
    },
    middleware::{admin_only, auth, buyer_only, request_context, role_check, seller_only},
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest(
            "/users",
            users_handler()
                .layer(middleware::from_fn(request_context))
                .layer(middleware::from_fn(auth)),
        )
        .nest(
            "/seller",
            seller_handler()
                .layer(middleware::from_fn(request_context))
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, seller_only())
                }))
                .layer(middleware::from_fn(auth)),
        )
        .nest(
            "/buyer",
            buyer_handler()
                .layer(middleware::from_fn(request_context))
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, buyer_only())
                }))
                .layer(middleware::from_fn(auth)),
        )
        .nest(
            "/messages",
            messages_handler()
                .layer(middleware::from_fn(request_context))
                .layer(middleware::from_fn(auth)),
        )
        .nest(
            "/tickets",
            tickets_handler()
                .layer(middleware::from_fn(request_context))
                .layer(middleware::from_fn(auth)),
        )
        .nest(
            "/support",
            support_handler()
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, admin_only())
                }))
                .layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tracing_subscriber::filter::LevelFilter;
    use uuid::Uuid;

    use crate::{config::Config, db::DBClient, utils::password};

    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/wasel_test")
            .unwrap();
        app_with(pool)
    }

    fn app_with(pool: sqlx::PgPool) -> Router {
        let config = Config {
            database_url: "postgres://localhost/wasel_test".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_maxage: 120,
            port: 8000,
            session_idle_minutes: 120,
            remember_me_days: 30,
            log_level: LevelFilter::INFO,
            allowed_origins: vec![],
        };
        create_router(Arc::new(AppState::new(DBClient::new(pool), config)))
    }

    #[tokio::test]
    async fn health_check_responds() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        for uri in ["/api/seller/dashboard", "/api/buyer/tenders", "/api/support/tickets", "/api/users/me"] {
            let response = app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn forged_tokens_are_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/seller/bids")
                    .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn seller_routes_carry_request_context(pool: sqlx::PgPool) {
        let hashed = password::hash("secret1").unwrap();
        let seller_user: Uuid = sqlx::query_scalar(
            "INSERT INTO users (name, email, password, user_type) VALUES ('Omar', 'omar@wasel.test', $1, 'seller') RETURNING id",
        )
        .bind(&hashed)
        .fetch_one(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO sellers (user_id, seller_name) VALUES ($1, 'Omar Supplies')")
            .bind(seller_user)
            .execute(&pool)
            .await
            .unwrap();
        let sender: Uuid = sqlx::query_scalar(
            "INSERT INTO users (name, email, password, user_type) VALUES ('Hind', 'hind@wasel.test', $1, 'buyer') RETURNING id",
        )
        .bind(&hashed)
        .fetch_one(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO messages (sender_id, receiver_id, message_text) VALUES ($1, $2, 'Hello')")
            .bind(sender)
            .bind(seller_user)
            .execute(&pool)
            .await
            .unwrap();

        let app = app_with(pool);
        let login = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "email": "omar@wasel.test", "password": "secret1" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
        let token = json_body(login).await["token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/seller/dashboard")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["context"]["unread_messages"], 1);
    }
}
