use std::collections::HashMap;

use time::util::days_in_year_month;
use time::{Date, Duration, Month, OffsetDateTime};

use crate::db::OverrideKind;

use super::interval::{
    glue_continuous, starts_for_duration, step_slots, subtract, Interval, IntervalError,
};

/// One weekday's working window from a master's work-hours template.
#[derive(Debug, Clone, Copy)]
pub struct DayTemplate {
    pub start_minute: i64,
    pub end_minute: i64,
    pub step_minutes: i64,
}

/// Weekly template keyed by weekday index, Monday = 0 .. Sunday = 6.
/// A missing key means the master is closed that day.
pub type WeekTemplate = HashMap<u8, DayTemplate>;

/// A schedule override as stored: the raw span plus its kind. Only
/// `Close` overrides block slots; `Open` overrides are accepted and
/// stored but contribute no busy time.
#[derive(Debug, Clone, Copy)]
pub struct OverrideWindow {
    pub span: Interval,
    pub kind: OverrideKind,
}

/// UTC midnight boundaries `[start, end)` of a calendar day.
pub fn day_bounds(day: Date) -> (OffsetDateTime, OffsetDateTime) {
    let start = day.midnight().assume_utc();
    (start, start + Duration::days(1))
}

/// ISO-style weekday index with Monday = 0, remapped explicitly rather
/// than relying on a calendar library's day-of-week default.
pub fn weekday_index(day: Date) -> u8 {
    day.weekday().number_days_from_monday()
}

/// Collect the busy intervals for one day: active appointments whose
/// start falls inside the day's UTC boundaries, plus closing overrides
/// clipped to those boundaries. Opening overrides are ignored.
pub fn busy_for_day(
    day: Date,
    appointments: &[Interval],
    overrides: &[OverrideWindow],
) -> Vec<Interval> {
    let (from, to) = day_bounds(day);

    let mut busy: Vec<Interval> = appointments
        .iter()
        .filter(|a| a.start() >= from && a.start() < to)
        .copied()
        .collect();

    for o in overrides {
        if o.kind == OverrideKind::Open {
            continue;
        }
        if let Some(clipped) = o.span.clip(from, to) {
            busy.push(clipped);
        }
    }

    busy
}

/// Maximal free spans for one day: step slots from the template, minus
/// busy time, glued back into contiguous runs.
pub fn free_spans_for_day(
    day: Date,
    template: &DayTemplate,
    appointments: &[Interval],
    overrides: &[OverrideWindow],
) -> Result<Vec<Interval>, IntervalError> {
    let slots = step_slots(
        day,
        template.step_minutes,
        template.start_minute,
        template.end_minute,
    )?;
    let busy = busy_for_day(day, appointments, overrides);
    Ok(glue_continuous(&subtract(&slots, &busy)))
}

/// Month view: days of the month with at least one free span. A
/// weekday absent from the template is skipped outright, not treated
/// as fully busy. Duration-agnostic: any free span marks the day.
pub fn available_days(
    year: i32,
    month: Month,
    week: &WeekTemplate,
    appointments: &[Interval],
    overrides: &[OverrideWindow],
) -> Result<Vec<u8>, IntervalError> {
    let mut days = Vec::new();
    for day_of_month in 1..=days_in_year_month(year, month) {
        let Ok(day) = Date::from_calendar_date(year, month, day_of_month) else {
            continue;
        };
        let Some(template) = week.get(&weekday_index(day)) else {
            continue;
        };
        if !free_spans_for_day(day, template, appointments, overrides)?.is_empty() {
            days.push(day_of_month);
        }
    }
    Ok(days)
}

/// Day view: exact bookable start times for a service of
/// `duration_minutes`, quantized to the template's step.
pub fn day_slots(
    day: Date,
    template: &DayTemplate,
    appointments: &[Interval],
    overrides: &[OverrideWindow],
    duration_minutes: i64,
) -> Result<Vec<OffsetDateTime>, IntervalError> {
    let spans = free_spans_for_day(day, template, appointments, overrides)?;
    starts_for_duration(&spans, duration_minutes, template.step_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn ival(start: OffsetDateTime, end: OffsetDateTime) -> Interval {
        Interval::new(start, end).unwrap()
    }

    fn nine_to_five() -> DayTemplate {
        DayTemplate {
            start_minute: 9 * 60,
            end_minute: 17 * 60,
            step_minutes: 30,
        }
    }

    #[test]
    fn weekday_index_is_monday_zero() {
        assert_eq!(weekday_index(date!(2026-03-02)), 0); // Monday
        assert_eq!(weekday_index(date!(2026-03-08)), 6); // Sunday
    }

    #[test]
    fn appointment_counts_only_when_starting_within_the_day() {
        // Starts the previous evening, runs past midnight: keyed to
        // the previous day, so it is not busy time here.
        let overnight = ival(
            datetime!(2026-03-01 23:00 UTC),
            datetime!(2026-03-02 01:00 UTC),
        );
        let same_day = ival(
            datetime!(2026-03-02 09:00 UTC),
            datetime!(2026-03-02 09:30 UTC),
        );
        let busy = busy_for_day(date!(2026-03-02), &[overnight, same_day], &[]);
        assert_eq!(busy, vec![same_day]);
    }

    #[test]
    fn close_override_spanning_days_is_clipped() {
        // Vacation: Sunday noon through Tuesday noon.
        let vacation = OverrideWindow {
            span: ival(
                datetime!(2026-03-01 12:00 UTC),
                datetime!(2026-03-03 12:00 UTC),
            ),
            kind: OverrideKind::Close,
        };
        let busy = busy_for_day(date!(2026-03-02), &[], &[vacation]);
        assert_eq!(
            busy,
            vec![ival(
                datetime!(2026-03-02 00:00 UTC),
                datetime!(2026-03-03 00:00 UTC)
            )]
        );
    }

    #[test]
    fn close_override_removes_slots_without_any_appointment() {
        let lunch = OverrideWindow {
            span: ival(
                datetime!(2026-03-02 12:00 UTC),
                datetime!(2026-03-02 13:00 UTC),
            ),
            kind: OverrideKind::Close,
        };
        let spans = free_spans_for_day(date!(2026-03-02), &nine_to_five(), &[], &[lunch]).unwrap();
        assert_eq!(
            spans,
            vec![
                ival(datetime!(2026-03-02 09:00 UTC), datetime!(2026-03-02 12:00 UTC)),
                ival(datetime!(2026-03-02 13:00 UTC), datetime!(2026-03-02 17:00 UTC)),
            ]
        );
    }

    #[test]
    fn open_override_contributes_no_busy_time() {
        let extra = OverrideWindow {
            span: ival(
                datetime!(2026-03-02 09:00 UTC),
                datetime!(2026-03-02 17:00 UTC),
            ),
            kind: OverrideKind::Open,
        };
        let with_open =
            free_spans_for_day(date!(2026-03-02), &nine_to_five(), &[], &[extra]).unwrap();
        let without = free_spans_for_day(date!(2026-03-02), &nine_to_five(), &[], &[]).unwrap();
        assert_eq!(with_open, without);
    }

    #[test]
    fn fully_booked_day_has_no_free_spans() {
        let all_day = ival(
            datetime!(2026-03-02 09:00 UTC),
            datetime!(2026-03-02 17:00 UTC),
        );
        let spans =
            free_spans_for_day(date!(2026-03-02), &nine_to_five(), &[all_day], &[]).unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn available_days_skips_weekdays_without_template() {
        // Open Mondays only; March 2026 has Mondays on 2, 9, 16, 23, 30.
        let mut week = WeekTemplate::new();
        week.insert(0, nine_to_five());
        let days = available_days(2026, Month::March, &week, &[], &[]).unwrap();
        assert_eq!(days, vec![2, 9, 16, 23, 30]);
    }

    #[test]
    fn available_days_excludes_fully_blocked_day() {
        let mut week = WeekTemplate::new();
        week.insert(0, nine_to_five());
        let blocked = OverrideWindow {
            span: ival(
                datetime!(2026-03-09 00:00 UTC),
                datetime!(2026-03-10 00:00 UTC),
            ),
            kind: OverrideKind::Close,
        };
        let days = available_days(2026, Month::March, &week, &[], &[blocked]).unwrap();
        assert_eq!(days, vec![2, 16, 23, 30]);
    }

    #[test]
    fn month_view_ignores_duration_single_slot_is_enough() {
        let mut week = WeekTemplate::new();
        week.insert(0, nine_to_five());
        // Everything booked except the last half-hour step.
        let nearly_all = ival(
            datetime!(2026-03-02 09:00 UTC),
            datetime!(2026-03-02 16:30 UTC),
        );
        let days = available_days(2026, Month::March, &week, &[nearly_all], &[]).unwrap();
        assert!(days.contains(&2));
    }

    #[test]
    fn day_slots_are_duration_aware() {
        // One appointment mid-day; a 60 minute service must fit whole.
        let booked = ival(
            datetime!(2026-03-02 10:00 UTC),
            datetime!(2026-03-02 10:30 UTC),
        );
        let template = DayTemplate {
            start_minute: 9 * 60,
            end_minute: 11 * 60,
            step_minutes: 30,
        };
        let slots = day_slots(date!(2026-03-02), &template, &[booked], &[], 60).unwrap();
        // Free spans are 09:00-10:00 and 10:30-11:00; only the first
        // fits 60 minutes, and only from its start.
        assert_eq!(slots, vec![datetime!(2026-03-02 09:00 UTC)]);
    }

    #[test]
    fn day_slots_span_glued_across_original_steps() {
        let template = DayTemplate {
            start_minute: 9 * 60,
            end_minute: 10 * 60,
            step_minutes: 30,
        };
        // 45 minutes only fits because gluing joined the two 30 minute
        // steps into one hour-long span.
        let slots = day_slots(date!(2026-03-02), &template, &[], &[], 45).unwrap();
        assert_eq!(slots, vec![datetime!(2026-03-02 09:00 UTC)]);
    }
}
