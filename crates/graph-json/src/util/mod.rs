//! Utility modules for graph JSON.

pub mod datetime;

pub use datetime::{
    format_timestamp_rfc3339, parse_timestamp_rfc3339, DateTimeParseError, RFC3339_MAX_MILLIS,
    RFC3339_MIN_MILLIS,
};
