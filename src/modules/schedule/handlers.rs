use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{
    BookingRepository, NewScheduleOverride, ScheduleOverride, ScheduleRepository, UpsertWorkHours,
    WorkHoursTemplate,
};
use crate::error::{AppError, AppResult};

pub async fn list_work_hours(
    State(state): State<AppState>,
    Path(master_id): Path<Uuid>,
) -> AppResult<Json<Vec<WorkHoursTemplate>>> {
    BookingRepository::get_master(&state.db, master_id).await?;
    let templates = ScheduleRepository::week_template(&state.db, master_id).await?;
    Ok(Json(templates))
}

/// Create or replace the template for one weekday (0 = Monday).
pub async fn upsert_work_hours(
    State(state): State<AppState>,
    Path((master_id, weekday)): Path<(Uuid, i16)>,
    Json(payload): Json<UpsertWorkHours>,
) -> AppResult<Json<WorkHoursTemplate>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if !(0..=6).contains(&weekday) {
        return Err(AppError::Validation(
            "weekday must be 0 (Monday) through 6 (Sunday)".to_string(),
        ));
    }
    if payload.end_minute <= payload.start_minute {
        return Err(AppError::Validation(
            "end_minute must be after start_minute".to_string(),
        ));
    }

    BookingRepository::get_master(&state.db, master_id).await?;
    let template =
        ScheduleRepository::upsert_work_hours(&state.db, master_id, weekday, &payload).await?;
    Ok(Json(template))
}

#[derive(Debug, Deserialize)]
pub struct OverrideListQuery {
    #[serde(with = "time::serde::rfc3339")]
    pub from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub to: OffsetDateTime,
}

pub async fn list_overrides(
    State(state): State<AppState>,
    Path(master_id): Path<Uuid>,
    Query(window): Query<OverrideListQuery>,
) -> AppResult<Json<Vec<ScheduleOverride>>> {
    BookingRepository::get_master(&state.db, master_id).await?;
    let overrides =
        ScheduleRepository::overrides_in_window(&state.db, master_id, window.from, window.to)
            .await?;
    Ok(Json(overrides))
}

pub async fn create_override(
    State(state): State<AppState>,
    Path(master_id): Path<Uuid>,
    Json(payload): Json<NewScheduleOverride>,
) -> AppResult<(StatusCode, Json<ScheduleOverride>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if payload.end_at <= payload.start_at {
        return Err(AppError::Validation(
            "end_at must be after start_at".to_string(),
        ));
    }

    BookingRepository::get_master(&state.db, master_id).await?;
    let created = ScheduleRepository::create_override(&state.db, master_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_override(
    State(state): State<AppState>,
    Path((master_id, override_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    ScheduleRepository::delete_override(&state.db, master_id, override_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
