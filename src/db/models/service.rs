use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

/// A bookable service with its base duration and price.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_minor: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Duration and price after resolving the per-master customization
/// (the `master_services` table) against the service defaults. Either
/// customized field may be absent, in which case the base value
/// applies.
#[derive(Debug, Clone, Copy, sqlx::FromRow, Serialize)]
pub struct EffectiveService {
    pub duration_minutes: i32,
    pub price_minor: i64,
}
