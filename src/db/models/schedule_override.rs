use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

/// One-off exception to the weekly template. `Close` marks extra busy
/// time (vacation, lunch). `Open` is accepted and stored for future
/// "open despite a closed template" use but currently has no effect on
/// computed availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "override_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    Close,
    Open,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub id: Uuid,
    pub master_id: Uuid,
    pub kind: OverrideKind,
    #[serde(with = "time::serde::rfc3339")]
    pub start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewScheduleOverride {
    pub kind: OverrideKind,
    #[serde(with = "time::serde::rfc3339")]
    pub start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_at: OffsetDateTime,
}
