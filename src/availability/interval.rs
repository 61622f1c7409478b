use thiserror::Error;
use time::{Date, Duration, OffsetDateTime};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("interval end must be after start: {start} .. {end}")]
    EmptyInterval {
        start: OffsetDateTime,
        end: OffsetDateTime,
    },

    #[error("step must be a positive number of minutes, got {0}")]
    NonPositiveStep(i64),

    #[error("duration must be a positive number of minutes, got {0}")]
    NonPositiveDuration(i64),

    #[error("work window must satisfy 0 <= start < end <= 1440, got {start}..{end}")]
    InvalidWorkWindow { start: i64, end: i64 },
}

/// Half-open time range `[start, end)`. All computation is in UTC.
///
/// The constructor refuses zero- and negative-length ranges, so any
/// `Interval` value in the system satisfies `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: OffsetDateTime,
    end: OffsetDateTime,
}

impl Interval {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, IntervalError> {
        if end <= start {
            return Err(IntervalError::EmptyInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> OffsetDateTime {
        self.start
    }

    pub fn end(&self) -> OffsetDateTime {
        self.end
    }

    /// Strict half-open overlap test: `[a, b)` and `[c, d)` overlap
    /// iff `a < d && c < b`. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection with `[window_start, window_end)`, or `None` when
    /// the interval lies entirely outside the window.
    pub fn clip(
        &self,
        window_start: OffsetDateTime,
        window_end: OffsetDateTime,
    ) -> Option<Interval> {
        let start = self.start.max(window_start);
        let end = self.end.min(window_end);
        if start < end {
            Some(Interval { start, end })
        } else {
            None
        }
    }
}

/// Divide a day's working window into consecutive whole steps of
/// `step_minutes`, anchored at UTC midnight of `day`.
///
/// A trailing partial step that would run past `work_end_minute` is
/// dropped. Returns an empty vector when the window is shorter than a
/// single step.
pub fn step_slots(
    day: Date,
    step_minutes: i64,
    work_start_minute: i64,
    work_end_minute: i64,
) -> Result<Vec<Interval>, IntervalError> {
    if step_minutes <= 0 {
        return Err(IntervalError::NonPositiveStep(step_minutes));
    }
    if work_start_minute < 0
        || work_start_minute >= work_end_minute
        || work_end_minute > MINUTES_PER_DAY
    {
        return Err(IntervalError::InvalidWorkWindow {
            start: work_start_minute,
            end: work_end_minute,
        });
    }

    let midnight = day.midnight().assume_utc();
    let mut slots = Vec::new();
    let mut minute = work_start_minute;
    while minute + step_minutes <= work_end_minute {
        slots.push(Interval {
            start: midnight + Duration::minutes(minute),
            end: midnight + Duration::minutes(minute + step_minutes),
        });
        minute += step_minutes;
    }
    Ok(slots)
}

/// Keep only the `free` intervals that touch no `busy` interval at all.
///
/// A free interval overlapping any busy interval even partially is
/// dropped in its entirety; slots are never split. Input order of
/// `free` is preserved; neither input needs to be sorted.
pub fn subtract(free: &[Interval], busy: &[Interval]) -> Vec<Interval> {
    free.iter()
        .filter(|slot| !busy.iter().any(|b| slot.overlaps(b)))
        .copied()
        .collect()
}

/// Merge runs of exactly adjacent intervals (one's end equals the
/// next's start) into maximal contiguous spans.
///
/// The input must already be sorted ascending by start; this function
/// does not sort. Idempotent.
pub fn glue_continuous(free: &[Interval]) -> Vec<Interval> {
    let mut spans: Vec<Interval> = Vec::new();
    for slot in free {
        match spans.last_mut() {
            Some(last) if last.end == slot.start => last.end = slot.end,
            _ => spans.push(*slot),
        }
    }
    spans
}

/// Enumerate every bookable start time for an appointment of
/// `duration_minutes` inside the given free spans.
///
/// Candidates are quantized: each span yields `span.start + k * step`
/// for every non-negative `k` with `start + k * step + duration <=
/// span.end`. Spans are processed in input order.
pub fn starts_for_duration(
    spans: &[Interval],
    duration_minutes: i64,
    step_minutes: i64,
) -> Result<Vec<OffsetDateTime>, IntervalError> {
    if duration_minutes <= 0 {
        return Err(IntervalError::NonPositiveDuration(duration_minutes));
    }
    if step_minutes <= 0 {
        return Err(IntervalError::NonPositiveStep(step_minutes));
    }

    let duration = Duration::minutes(duration_minutes);
    let step = Duration::minutes(step_minutes);
    let mut starts = Vec::new();
    for span in spans {
        let mut t = span.start();
        while t + duration <= span.end() {
            starts.push(t);
            t += step;
        }
    }
    Ok(starts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn ival(start: OffsetDateTime, end: OffsetDateTime) -> Interval {
        Interval::new(start, end).unwrap()
    }

    #[test]
    fn interval_refuses_empty_and_inverted_ranges() {
        let t = datetime!(2026-03-02 09:00 UTC);
        assert!(matches!(
            Interval::new(t, t),
            Err(IntervalError::EmptyInterval { .. })
        ));
        assert!(Interval::new(t, t - Duration::minutes(1)).is_err());
    }

    #[test]
    fn overlap_is_strict_half_open() {
        let a = ival(datetime!(2026-03-02 09:00 UTC), datetime!(2026-03-02 09:30 UTC));
        let b = ival(datetime!(2026-03-02 09:30 UTC), datetime!(2026-03-02 10:00 UTC));
        let c = ival(datetime!(2026-03-02 09:15 UTC), datetime!(2026-03-02 09:45 UTC));
        // Touching endpoints do not overlap.
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn step_slots_emits_whole_steps_only() {
        // 09:00-10:00 with a 30 minute step: exactly two slots.
        let slots = step_slots(date!(2026-03-02), 30, 540, 600).unwrap();
        assert_eq!(
            slots,
            vec![
                ival(datetime!(2026-03-02 09:00 UTC), datetime!(2026-03-02 09:30 UTC)),
                ival(datetime!(2026-03-02 09:30 UTC), datetime!(2026-03-02 10:00 UTC)),
            ]
        );

        // 09:00-09:50 with a 30 minute step: the trailing 20 minutes
        // do not fit a whole step.
        let slots = step_slots(date!(2026-03-02), 30, 540, 590).unwrap();
        assert_eq!(slots.len(), 1);

        // Window shorter than a single step.
        assert!(step_slots(date!(2026-03-02), 30, 540, 560).unwrap().is_empty());
    }

    #[test]
    fn step_slots_count_and_shape() {
        let slots = step_slots(date!(2026-03-02), 45, 600, 1080).unwrap();
        assert_eq!(slots.len() as i64, (1080 - 600) / 45);
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        for slot in &slots {
            assert_eq!(slot.end() - slot.start(), Duration::minutes(45));
        }
        assert!(slots.last().unwrap().end() <= date!(2026-03-02).midnight().assume_utc() + Duration::minutes(1080));
    }

    #[test]
    fn step_slots_rejects_bad_inputs() {
        assert_eq!(
            step_slots(date!(2026-03-02), 0, 540, 600),
            Err(IntervalError::NonPositiveStep(0))
        );
        assert_eq!(
            step_slots(date!(2026-03-02), 30, 600, 600),
            Err(IntervalError::InvalidWorkWindow { start: 600, end: 600 })
        );
        assert!(step_slots(date!(2026-03-02), 30, -10, 600).is_err());
        assert!(step_slots(date!(2026-03-02), 30, 540, 1441).is_err());
    }

    #[test]
    fn subtract_drops_whole_slot_on_partial_overlap() {
        let free = vec![ival(
            datetime!(2026-03-02 09:00 UTC),
            datetime!(2026-03-02 09:30 UTC),
        )];
        let busy = vec![ival(
            datetime!(2026-03-02 09:15 UTC),
            datetime!(2026-03-02 09:45 UTC),
        )];
        assert!(subtract(&free, &busy).is_empty());
    }

    #[test]
    fn subtract_keeps_untouched_slots_in_order() {
        let free = vec![
            ival(datetime!(2026-03-02 09:00 UTC), datetime!(2026-03-02 09:30 UTC)),
            ival(datetime!(2026-03-02 09:30 UTC), datetime!(2026-03-02 10:00 UTC)),
            ival(datetime!(2026-03-02 10:00 UTC), datetime!(2026-03-02 10:30 UTC)),
        ];
        let busy = vec![ival(
            datetime!(2026-03-02 09:30 UTC),
            datetime!(2026-03-02 10:00 UTC),
        )];
        let out = subtract(&free, &busy);
        assert_eq!(out, vec![free[0], free[2]]);
    }

    #[test]
    fn subtract_with_no_busy_is_identity() {
        let free = vec![
            ival(datetime!(2026-03-02 09:00 UTC), datetime!(2026-03-02 09:30 UTC)),
            ival(datetime!(2026-03-02 11:00 UTC), datetime!(2026-03-02 11:30 UTC)),
        ];
        assert_eq!(subtract(&free, &[]), free);
    }

    #[test]
    fn glue_merges_exactly_adjacent_intervals() {
        let free = vec![
            ival(datetime!(2026-03-02 09:00 UTC), datetime!(2026-03-02 09:30 UTC)),
            ival(datetime!(2026-03-02 09:30 UTC), datetime!(2026-03-02 10:00 UTC)),
            ival(datetime!(2026-03-02 11:00 UTC), datetime!(2026-03-02 11:30 UTC)),
        ];
        let glued = glue_continuous(&free);
        assert_eq!(
            glued,
            vec![
                ival(datetime!(2026-03-02 09:00 UTC), datetime!(2026-03-02 10:00 UTC)),
                ival(datetime!(2026-03-02 11:00 UTC), datetime!(2026-03-02 11:30 UTC)),
            ]
        );
    }

    #[test]
    fn glue_is_idempotent() {
        let free = vec![
            ival(datetime!(2026-03-02 09:00 UTC), datetime!(2026-03-02 09:30 UTC)),
            ival(datetime!(2026-03-02 09:30 UTC), datetime!(2026-03-02 10:00 UTC)),
            ival(datetime!(2026-03-02 12:00 UTC), datetime!(2026-03-02 12:30 UTC)),
        ];
        let once = glue_continuous(&free);
        let twice = glue_continuous(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn starts_respect_duration_bound() {
        // 45 minutes in a one hour span with a 30 minute step: only
        // 09:00 fits; 09:30 + 45 would end at 10:15.
        let spans = vec![ival(
            datetime!(2026-03-02 09:00 UTC),
            datetime!(2026-03-02 10:00 UTC),
        )];
        let starts = starts_for_duration(&spans, 45, 30).unwrap();
        assert_eq!(starts, vec![datetime!(2026-03-02 09:00 UTC)]);
    }

    #[test]
    fn starts_enumerate_every_step_that_fits() {
        let spans = vec![ival(
            datetime!(2026-03-02 09:00 UTC),
            datetime!(2026-03-02 11:00 UTC),
        )];
        let starts = starts_for_duration(&spans, 30, 30).unwrap();
        assert_eq!(
            starts,
            vec![
                datetime!(2026-03-02 09:00 UTC),
                datetime!(2026-03-02 09:30 UTC),
                datetime!(2026-03-02 10:00 UTC),
                datetime!(2026-03-02 10:30 UTC),
            ]
        );
    }

    #[test]
    fn starts_process_spans_in_order() {
        let spans = vec![
            ival(datetime!(2026-03-02 14:00 UTC), datetime!(2026-03-02 15:00 UTC)),
            ival(datetime!(2026-03-02 09:00 UTC), datetime!(2026-03-02 09:30 UTC)),
        ];
        let starts = starts_for_duration(&spans, 30, 30).unwrap();
        assert_eq!(starts.first(), Some(&datetime!(2026-03-02 14:00 UTC)));
        assert_eq!(starts.last(), Some(&datetime!(2026-03-02 09:00 UTC)));
    }

    #[test]
    fn starts_reject_bad_inputs() {
        let spans = vec![ival(
            datetime!(2026-03-02 09:00 UTC),
            datetime!(2026-03-02 10:00 UTC),
        )];
        assert_eq!(
            starts_for_duration(&spans, 0, 30),
            Err(IntervalError::NonPositiveDuration(0))
        );
        assert_eq!(
            starts_for_duration(&spans, 30, -5),
            Err(IntervalError::NonPositiveStep(-5))
        );
    }
}
