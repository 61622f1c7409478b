use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::util::days_in_year_month;
use time::{Date, Duration, Month};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::availability::{
    available_days, day_bounds, day_slots, weekday_index, Interval, OverrideWindow, WeekTemplate,
};
use crate::db::{
    Appointment, BookAppointmentPayload, BookingRepository, BusySpan, DatabaseError,
    NewAppointment, ScheduleOverride, ScheduleRepository,
};
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct MonthAvailability {
    pub month: String,
    pub available_days: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct DaySlots {
    pub date: String,
    pub step_min: i64,
    pub duration_min: i64,
    pub slots: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BookedAppointment {
    pub id: Uuid,
}

/// Month view: which days of the month still have any opening at all.
/// Coarse signal, not duration-aware.
pub async fn month_availability(
    State(state): State<AppState>,
    Path((master_id, month)): Path<(Uuid, String)>,
) -> AppResult<Json<MonthAvailability>> {
    let (year, month) = parse_month_param(&month)?;
    ensure_master(&state, master_id).await?;

    let templates = ScheduleRepository::week_template(&state.db, master_id).await?;
    let week: WeekTemplate = templates
        .iter()
        .map(|t| (t.weekday as u8, t.day_template()))
        .collect();

    let first = Date::from_calendar_date(year, month, 1)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let from = first.midnight().assume_utc();
    let to = from + Duration::days(i64::from(days_in_year_month(year, month)));

    let appointments =
        busy_intervals(ScheduleRepository::busy_appointments(&state.db, master_id, from, to).await?)?;
    let overrides = override_windows(
        ScheduleRepository::overrides_in_window(&state.db, master_id, from, to).await?,
    )?;

    let days = available_days(year, month, &week, &appointments, &overrides)?;

    Ok(Json(MonthAvailability {
        month: format!("{:04}-{:02}", year, month as u8),
        available_days: days,
    }))
}

/// Day view: exact bookable start times for one master, service and
/// date. A weekday without a work-hours template yields an empty slot
/// list, not an error.
pub async fn list_day_slots(
    State(state): State<AppState>,
    Path((master_id, service_id, date)): Path<(Uuid, Uuid, String)>,
) -> AppResult<Json<DaySlots>> {
    let day = parse_date_param(&date)?;
    ensure_master(&state, master_id).await?;
    let service = BookingRepository::resolve_service(&state.db, master_id, service_id).await?;
    let duration_min = i64::from(service.duration_minutes);

    let templates = ScheduleRepository::week_template(&state.db, master_id).await?;
    let weekday = weekday_index(day);
    let Some(template_row) = templates.iter().find(|t| t.weekday as u8 == weekday) else {
        return Ok(Json(DaySlots {
            date,
            step_min: 0,
            duration_min,
            slots: Vec::new(),
        }));
    };
    let template = template_row.day_template();

    let (from, to) = day_bounds(day);
    let appointments =
        busy_intervals(ScheduleRepository::busy_appointments(&state.db, master_id, from, to).await?)?;
    let overrides = override_windows(
        ScheduleRepository::overrides_in_window(&state.db, master_id, from, to).await?,
    )?;

    let starts = day_slots(day, &template, &appointments, &overrides, duration_min)?;
    let slots = starts
        .iter()
        .map(|t| t.format(&Rfc3339))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(DaySlots {
        date,
        step_min: template.step_minutes,
        duration_min,
        slots,
    }))
}

/// Create an appointment. The overlap check inside `try_book` is
/// authoritative; whatever the client fetched as available may be
/// stale by now, and a clash comes back as 409.
pub async fn book_appointment(
    State(state): State<AppState>,
    Json(payload): Json<BookAppointmentPayload>,
) -> AppResult<(StatusCode, Json<BookedAppointment>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    ensure_master(&state, payload.master_id).await?;
    let service =
        BookingRepository::resolve_service(&state.db, payload.master_id, payload.service_id)
            .await?;

    let end_at = payload.start_at + Duration::minutes(i64::from(service.duration_minutes));
    let new = NewAppointment {
        master_id: payload.master_id,
        service_id: payload.service_id,
        client_id: payload.client_id,
        start_at: payload.start_at,
        end_at,
    };

    let id = BookingRepository::try_book(&state.db, &new).await?;
    tracing::info!(appointment_id = %id, master_id = %new.master_id, "appointment booked");

    Ok((StatusCode::CREATED, Json(BookedAppointment { id })))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    let appointment = BookingRepository::get_appointment(&state.db, appointment_id).await?;
    Ok(Json(appointment))
}

async fn ensure_master(state: &AppState, master_id: Uuid) -> AppResult<()> {
    BookingRepository::get_master(&state.db, master_id)
        .await
        .map_err(|err| match err {
            DatabaseError::NotFound => {
                AppError::NotFound(format!("master {} does not exist", master_id))
            }
            other => AppError::Database(other),
        })?;
    Ok(())
}

fn parse_month_param(raw: &str) -> Result<(i32, Month), AppError> {
    let invalid = || AppError::BadRequest(format!("expected month as YYYY-MM, got '{}'", raw));
    let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    let month = Month::try_from(month).map_err(|_| invalid())?;
    Ok((year, month))
}

fn parse_date_param(raw: &str) -> Result<Date, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &format)
        .map_err(|_| AppError::BadRequest(format!("expected date as YYYY-MM-DD, got '{}'", raw)))
}

fn busy_intervals(spans: Vec<BusySpan>) -> AppResult<Vec<Interval>> {
    spans
        .into_iter()
        .map(|b| {
            Interval::new(b.start_at, b.end_at)
                .map_err(|e| AppError::InternalServerError(e.to_string()))
        })
        .collect()
}

fn override_windows(rows: Vec<ScheduleOverride>) -> AppResult<Vec<OverrideWindow>> {
    rows.into_iter()
        .map(|o| {
            Interval::new(o.start_at, o.end_at)
                .map(|span| OverrideWindow { span, kind: o.kind })
                .map_err(|e| AppError::InternalServerError(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn month_param_parses_year_and_month() {
        let (year, month) = parse_month_param("2026-03").unwrap();
        assert_eq!(year, 2026);
        assert_eq!(month, Month::March);
    }

    #[test]
    fn month_param_rejects_garbage() {
        assert!(parse_month_param("2026").is_err());
        assert!(parse_month_param("2026-13").is_err());
        assert!(parse_month_param("march-2026").is_err());
    }

    #[test]
    fn date_param_round_trips() {
        assert_eq!(parse_date_param("2026-03-02").unwrap(), date!(2026-03-02));
        assert!(parse_date_param("02.03.2026").is_err());
        assert!(parse_date_param("2026-02-30").is_err());
    }
}
