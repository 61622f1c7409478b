use axum::{
    routing::{delete, get, put},
    Router,
};

use super::handlers::{
    create_override, delete_override, list_overrides, list_work_hours, upsert_work_hours,
};
use crate::app_state::AppState;

pub fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/:master_id/work-hours", get(list_work_hours))
        .route("/:master_id/work-hours/:weekday", put(upsert_work_hours))
        .route(
            "/:master_id/overrides",
            get(list_overrides).post(create_override),
        )
        .route("/:master_id/overrides/:override_id", delete(delete_override))
}
