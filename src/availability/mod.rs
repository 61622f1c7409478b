//! Availability computation: the interval algebra kernel and the
//! calendar-aware queries built on top of it. Everything here is pure;
//! repositories fetch the inputs and handlers translate the outputs.

mod interval;
mod query;

pub use interval::{
    glue_continuous, starts_for_duration, step_slots, subtract, Interval, IntervalError,
};
pub use query::{
    available_days, busy_for_day, day_bounds, day_slots, free_spans_for_day, weekday_index,
    DayTemplate, OverrideWindow, WeekTemplate,
};
