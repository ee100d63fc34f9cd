pub mod date_formatter;
pub mod throttle;
