//! Date resolution for grouping files
//!
//! Picks the single authoritative date for a file from the candidate
//! timestamps in its metadata plus the file's own modification time.

use crate::metadata::MetadataRecord;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Which candidate timestamp won the resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// EXIF DateTimeOriginal
    Capture,
    /// Generic EXIF DateTime
    DateTime,
    /// EXIF DateTimeDigitized
    Digitized,
    /// Combined GPS date and time stamps
    Gps,
    /// File system modification time
    FileModified,
}

/// The date chosen for organizing a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    /// The chosen instant, as a naive local wall time
    pub value: NaiveDateTime,
    /// Source of the chosen instant
    pub source: DateSource,
}

/// Resolve the grouping date for a file.
///
/// Candidates are gathered in priority order (capture, generic date/time,
/// digitized, GPS pair, file modification time) and the earliest instant
/// wins. Camera clocks and copy operations can push a "taken" tag later than
/// the true origin moment recorded elsewhere, so the minimum is the
/// conservative choice. Ties keep the higher-priority source tag.
///
/// Never fails: the modification time is always a valid candidate.
pub fn resolve(metadata: &MetadataRecord, file_modified_ms: i64) -> ResolvedDate {
    let mut candidates: Vec<ResolvedDate> = Vec::with_capacity(5);

    let mut push = |value: Option<NaiveDateTime>, source: DateSource| {
        if let Some(value) = value {
            candidates.push(ResolvedDate { value, source });
        }
    };

    push(
        metadata.date_taken.as_deref().and_then(parse_datetime),
        DateSource::Capture,
    );
    push(
        metadata.date_time.as_deref().and_then(parse_datetime),
        DateSource::DateTime,
    );
    push(
        metadata.date_digitized.as_deref().and_then(parse_datetime),
        DateSource::Digitized,
    );
    // GPS stamps are only usable as a pair
    if let (Some(date), Some(time)) = (
        metadata.gps_date_stamp.as_deref(),
        metadata.gps_time_stamp.as_deref(),
    ) {
        push(parse_gps_pair(date, time), DateSource::Gps);
    }
    push(Some(modified_instant(file_modified_ms)), DateSource::FileModified);

    // Strict comparison keeps the first (highest-priority) candidate on ties
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.value < best.value {
            best = *candidate;
        }
    }
    best
}

/// Convert an epoch-milliseconds modification time into the local calendar.
///
/// EXIF datetimes are naive local wall times, so the fallback instant is
/// expressed in the same calendar before comparison.
pub fn modified_instant(epoch_ms: i64) -> NaiveDateTime {
    let utc = DateTime::from_timestamp_millis(epoch_ms).unwrap_or(DateTime::UNIX_EPOCH);
    utc.with_timezone(&Local).naive_local()
}

/// Parse a metadata datetime string, returning None for anything malformed.
///
/// Accepts the EXIF colon format plus the ISO-like variants seen in the wild.
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"');

    const FORMATS: &[&str] = &[
        "%Y:%m:%d %H:%M:%S",
        "%Y:%m:%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S",
    ];

    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    // Date-only values resolve to midnight
    for format in ["%Y:%m:%d", "%Y-%m-%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Combine GPS date and time stamps into one instant.
fn parse_gps_pair(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = date.trim().trim_matches('"');
    let time = time.trim().trim_matches('"');

    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y:%m:%d"))
        .ok()?;
    let t = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S%.f"))
        .ok()?;

    Some(d.and_time(t))
}
