use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::tracing::observability_middleware,
    modules::{booking::routes::booking_routes, schedule::routes::schedule_routes},
};

pub fn create_router(state: AppState) -> Router {
    // The booking UI is served elsewhere; it talks to this API
    // cross-origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .nest("/bookings", booking_routes())
        .nest("/schedule", schedule_routes())
        .layer(cors)
        .layer(middleware::from_fn(observability_middleware))
        .with_state(state)
}

async fn hello() -> &'static str {
    "Salon Backend says hello!\n"
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_result = sqlx::query("SELECT 1").execute(&state.db).await;

    let db_status = match db_result {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    let telemetry_health = crate::telemetry::telemetry_health_check();

    Json(json!({
        "status": "ok",
        "timestamp": OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
            "telemetry": telemetry_health
        }
    }))
}
