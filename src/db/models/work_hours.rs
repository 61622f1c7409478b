use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

use crate::availability::DayTemplate;

/// Recurring weekly working window for one master and one weekday
/// (0 = Monday .. 6 = Sunday). At most one row per (master, weekday);
/// absence means the master is closed that day.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct WorkHoursTemplate {
    pub id: Uuid,
    pub master_id: Uuid,
    pub weekday: i16,
    pub start_minute: i16,
    pub end_minute: i16,
    pub step_minutes: i16,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl WorkHoursTemplate {
    pub fn day_template(&self) -> DayTemplate {
        DayTemplate {
            start_minute: i64::from(self.start_minute),
            end_minute: i64::from(self.end_minute),
            step_minutes: i64::from(self.step_minutes),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertWorkHours {
    #[validate(range(min = 0, max = 1439, message = "start_minute must be within the day"))]
    pub start_minute: i16,
    #[validate(range(min = 1, max = 1440, message = "end_minute must be within the day"))]
    pub end_minute: i16,
    #[validate(range(min = 1, message = "step_minutes must be at least 1"))]
    pub step_minutes: i16,
}
