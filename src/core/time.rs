//! Shared id and timestamp helpers.
//!
//! Timestamps are persisted as text. Writers always emit RFC 3339 UTC with
//! second precision; readers also accept the two older layouts that earlier
//! databases contain.

use crate::core::error::KanbanError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use ulid::Ulid;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

pub fn new_id() -> String {
    Ulid::new().to_string()
}

/// Current UTC time truncated to whole seconds, so values survive a round trip
/// through the stored text unchanged.
pub fn now_utc() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, KanbanError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT) {
        return Ok(ts.and_utc());
    }
    NaiveDate::parse_from_str(s, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
        .ok_or_else(|| KanbanError::Timestamp(format!("unrecognized timestamp '{}'", s)))
}
