use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{
    BusySpan, NewScheduleOverride, ScheduleOverride, UpsertWorkHours, WorkHoursTemplate,
};
use crate::db::DatabaseError;

/// Read/write access to the inputs of the availability query: weekly
/// work-hours templates, one-off overrides, and the busy spans of
/// active appointments. Every query fetches fresh; there is no cache.
pub struct ScheduleRepository;

impl ScheduleRepository {
    pub async fn week_template(
        pool: &PgPool,
        master_id: Uuid,
    ) -> Result<Vec<WorkHoursTemplate>, DatabaseError> {
        let rows = sqlx::query_as::<_, WorkHoursTemplate>(
            r#"
            SELECT id, master_id, weekday, start_minute, end_minute, step_minutes,
                   created_at, updated_at
            FROM work_hours_templates
            WHERE master_id = $1
            ORDER BY weekday
            "#,
        )
        .bind(master_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn upsert_work_hours(
        pool: &PgPool,
        master_id: Uuid,
        weekday: i16,
        data: &UpsertWorkHours,
    ) -> Result<WorkHoursTemplate, DatabaseError> {
        let row = sqlx::query_as::<_, WorkHoursTemplate>(
            r#"
            INSERT INTO work_hours_templates (master_id, weekday, start_minute, end_minute, step_minutes)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (master_id, weekday) DO UPDATE
            SET start_minute = EXCLUDED.start_minute,
                end_minute = EXCLUDED.end_minute,
                step_minutes = EXCLUDED.step_minutes,
                updated_at = NOW()
            RETURNING id, master_id, weekday, start_minute, end_minute, step_minutes,
                      created_at, updated_at
            "#,
        )
        .bind(master_id)
        .bind(weekday)
        .bind(data.start_minute)
        .bind(data.end_minute)
        .bind(data.step_minutes)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    /// Overrides intersecting `[from, to)`, half-open on both sides of
    /// the comparison.
    pub async fn overrides_in_window(
        pool: &PgPool,
        master_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<ScheduleOverride>, DatabaseError> {
        let rows = sqlx::query_as::<_, ScheduleOverride>(
            r#"
            SELECT id, master_id, kind, start_at, end_at, created_at
            FROM schedule_overrides
            WHERE master_id = $1 AND start_at < $3 AND $2 < end_at
            ORDER BY start_at
            "#,
        )
        .bind(master_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn create_override(
        pool: &PgPool,
        master_id: Uuid,
        data: &NewScheduleOverride,
    ) -> Result<ScheduleOverride, DatabaseError> {
        let row = sqlx::query_as::<_, ScheduleOverride>(
            r#"
            INSERT INTO schedule_overrides (master_id, kind, start_at, end_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, master_id, kind, start_at, end_at, created_at
            "#,
        )
        .bind(master_id)
        .bind(data.kind)
        .bind(data.start_at)
        .bind(data.end_at)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn delete_override(
        pool: &PgPool,
        master_id: Uuid,
        override_id: Uuid,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM schedule_overrides WHERE id = $1 AND master_id = $2",
        )
        .bind(override_id)
        .bind(master_id)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    /// Busy spans of pending/confirmed appointments whose start falls
    /// inside `[from, to)`. Cancelled and completed appointments never
    /// block new bookings.
    pub async fn busy_appointments(
        pool: &PgPool,
        master_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<BusySpan>, DatabaseError> {
        let rows = sqlx::query_as::<_, BusySpan>(
            r#"
            SELECT start_at, end_at
            FROM appointments
            WHERE master_id = $1
              AND status IN ('pending', 'confirmed')
              AND start_at >= $2 AND start_at < $3
            ORDER BY start_at
            "#,
        )
        .bind(master_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
