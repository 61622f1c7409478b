use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{book_appointment, get_appointment, list_day_slots, month_availability};
use crate::app_state::AppState;

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/:master_id/days/:month", get(month_availability))
        .route("/:master_id/slots/:service_id/:date", get(list_day_slots))
        .route("/appointments", post(book_appointment))
        .route("/appointments/:appointment_id", get(get_appointment))
}
