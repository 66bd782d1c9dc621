//! Timestamp handling for space-time dataset selection.

use chrono::NaiveDateTime;

use crate::error::{GeostatError, GeostatResult};

/// Accepted timestamp layout for STRDS selection, e.g. `2001-03-16T12:30:15`.
pub const STRDS_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse an STRDS selection timestamp.
///
/// Only the exact `YYYY-MM-DDTHH:MM:SS` layout is accepted. Anything else is
/// a client error that must never reach the processing engine.
pub fn parse_strds_timestamp(value: &str) -> GeostatResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, STRDS_TIMESTAMP_FORMAT).map_err(|_| {
        GeostatError::InvalidTimestamp {
            value: value.to_string(),
        }
    })
}
