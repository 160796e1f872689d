// Casetrail - core/normalize.rs
//
// Heuristic multi-format timestamp normalisation.
//
// Investigators paste timestamps from wildly different sources (Windows
// event logs, proxy logs, chat exports, hand-typed notes). Normalisation is
// an ordered list of parse attempts rather than a single flexible parser so
// that ambiguous-format precedence (day-first vs month-first) stays
// deterministic and testable: each candidate format is tried in turn and
// the first exact full-string match wins.
//
// Normalisation is total: it never fails outward. When nothing matches, the
// current wall-clock instant is substituted and the result is flagged
// `degraded` so callers can warn the investigator that the entry's position
// in the timeline cannot be trusted.

use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

use crate::util::constants;

/// Candidate formats, tried in order. Order matters only for strings that
/// could match more than one pattern: a day value <= 12 in a slash date is
/// ambiguous, and the day-first form wins because it is listed first.
const CANDIDATE_FORMATS: &[&str] = &[
    "%Y-%m-%d-%H-%M-%S",      // 2024-01-15-14-30-25 (hyphenated entry form)
    "%Y-%m-%d %H:%M:%S",      // 2024-01-15 14:30:25
    "%Y/%m/%d %H:%M:%S",      // 2024/01/15 14:30:25
    "%d/%m/%Y %H:%M:%S",      // 15/01/2024 14:30:25
    "%m/%d/%Y %H:%M:%S",      // 01/15/2024 14:30:25
    "%Y-%m-%d %H:%M:%S%.f",   // 2024-01-15 14:30:25.123456
    "%Y-%m-%dT%H:%M",         // 2024-01-15T14:30 (datetime-local inputs)
    "%Y-%m-%dT%H:%M:%S",      // 2024-01-15T14:30:25
    "%Y-%m-%dT%H:%M:%S%.fZ",  // 2024-01-15T14:30:25.123456Z
    "%d-%m-%Y %H:%M:%S",      // 15-01-2024 14:30:25
];

/// Outcome of normalising one raw timestamp string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    /// The canonical instant. A naive local date-time: timezone offsets are
    /// discarded, never applied, so two timestamps differing only by offset
    /// annotation compare as equal local instants.
    pub time: NaiveDateTime,

    /// True when no format matched and `time` is the wall-clock fallback.
    pub degraded: bool,
}

/// Normalise a raw timestamp string into a canonical instant.
///
/// The input is expected to be non-blank (callers validate first).
///
/// Strategy:
///   1. Try each candidate format in order against the full trimmed string;
///      commit to the first exact match.
///   2. Strip a trailing timezone offset (`+HH:MM`, `-HH:MM`, `+HHMM`, or
///      literal `Z`) and retry a generic ISO-8601-like parse with `T` or
///      space as the date/time separator.
///   3. Fall back to the current wall-clock instant with `degraded = true`.
pub fn normalize(raw: &str) -> Normalized {
    let trimmed = raw.trim();

    for format in CANDIDATE_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Normalized {
                time,
                degraded: false,
            };
        }
    }

    if let Some(time) = parse_iso_like(trimmed) {
        return Normalized {
            time,
            degraded: false,
        };
    }

    tracing::warn!(
        raw = trimmed,
        "could not parse timestamp, substituting current time"
    );
    Normalized {
        time: Local::now().naive_local(),
        degraded: true,
    }
}

/// Generic ISO-8601-like retry: discard a trailing offset annotation, then
/// accept date and time separated by `T` or space, with optional seconds
/// and fractional seconds, or a bare date (treated as midnight).
fn parse_iso_like(trimmed: &str) -> Option<NaiveDateTime> {
    static OFFSET_SUFFIX: OnceLock<Regex> = OnceLock::new();
    let offset = OFFSET_SUFFIX
        .get_or_init(|| Regex::new(r"(?:[+-]\d{2}:?\d{2}|Z)$").expect("offset regex is valid"));

    let stripped = offset.replace(trimmed, "");
    let unified = stripped.trim().replacen('T', " ", 1);

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(&unified, format) {
            return Some(time);
        }
    }

    // Bare date: midnight.
    NaiveDate::parse_from_str(&unified, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Render the current instant in the hyphenated entry form
/// (`YYYY-MM-DD-HH-MM-SS`), the convenience offered to hosts for
/// "record this observation now" input fields.
pub fn now_raw() -> String {
    Local::now()
        .naive_local()
        .format(constants::RAW_TIME_ENTRY_FORMAT)
        .to_string()
}
