use chrono::{TimeZone, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    DayMonth,        // Jan 5
    WeekdayDayMonth, // Sat, Jan 5
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            Self::DayMonth => "%b %-d",
            Self::WeekdayDayMonth => "%a, %b %-d",
        }
    }
}

/// Formats a millisecond timestamp in UTC. Values outside chrono's range fall
/// back to the plain number.
pub fn format_timestamp(millis: f64, format: DateFormat) -> String {
    let seconds = millis / 1000.0;
    if !seconds.is_finite() {
        return format!("{:.2}", millis);
    }

    let dt = match Utc.timestamp_opt(seconds.floor() as i64, 0) {
        chrono::LocalResult::Single(d) => d,
        chrono::LocalResult::Ambiguous(d, _) => d,
        chrono::LocalResult::None => return format!("{:.2}", millis),
    };
    dt.format(format.pattern()).to_string()
}

/// Default x-axis label: `Jan 5`.
pub fn x_axis_label(value: f64) -> String {
    format_timestamp(value, DateFormat::DayMonth)
}

/// Default tooltip title: `Sat, Jan 5`.
pub fn tooltip_label(value: f64) -> String {
    format_timestamp(value, DateFormat::WeekdayDayMonth)
}

/// Default y-axis label: the value rounded to an integer.
pub fn y_axis_label(value: f64) -> String {
    format!("{:.0}", value)
}
