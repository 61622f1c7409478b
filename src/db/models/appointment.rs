use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    // Only pending and confirmed appointments occupy time for
    // availability purposes.
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub master_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub status: AppointmentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A `[start_at, end_at)` pair of an active appointment, fetched as
/// busy-interval input for the availability query.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct BusySpan {
    pub start_at: OffsetDateTime,
    pub end_at: OffsetDateTime,
}

/// Booking request as received over HTTP. The effective duration is
/// resolved server-side from the service, never trusted from the
/// client.
#[derive(Debug, Deserialize, Validate)]
pub struct BookAppointmentPayload {
    pub master_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_at: OffsetDateTime,
}

/// Fully resolved appointment ready for the transactional insert.
#[derive(Debug)]
pub struct NewAppointment {
    pub master_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub start_at: OffsetDateTime,
    pub end_at: OffsetDateTime,
}
