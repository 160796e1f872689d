// Casetrail - core/model.rs
//
// Core data model types. Pure data definitions with no I/O
// (core layer depends on std + chrono/serde only).
//
// These types are the shared vocabulary across all layers.

use crate::core::timeline::Timeline;
use crate::util::constants;
use crate::util::error::TimelineError;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

// =============================================================================
// Entry identity
// =============================================================================

/// Opaque stable identifier for a log entry.
///
/// Assigned once at insertion and never reused within a timeline. Ordering
/// of ids matches insertion order, which is what makes it usable as the
/// tie-break key for entries with identical canonical instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntryId(pub(crate) u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Log Entry
// =============================================================================

/// A single recorded observation in an investigation timeline.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Stable identity, immutable after creation.
    pub id: EntryId,

    /// The exact timestamp string the investigator supplied. Preserved
    /// verbatim for display and re-export even after normalisation.
    pub raw_timestamp: String,

    /// Normalised instant used exclusively for ordering. Always defined:
    /// normalisation never fails outward (see `core::normalize`).
    pub canonical_time: NaiveDateTime,

    /// Free-text observation. Non-empty.
    pub description: String,

    /// Severity classification.
    pub severity: Severity,

    /// True when `canonical_time` is a fallback instant substituted because
    /// no format matched `raw_timestamp`. Such entries cannot be trusted
    /// for ordering claims and hosts should warn the investigator.
    pub degraded: bool,

    /// Instant this entry object was constructed. Bookkeeping only,
    /// never used for ordering.
    pub created_at: NaiveDateTime,
}

// =============================================================================
// Severity
// =============================================================================

/// Severity levels, ordered from most to least severe.
///
/// Unrecognised or absent severity strings default to `Info`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, serde::Deserialize, Default,
)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Info,
}

impl Severity {
    /// Returns all variants in display order (most severe first).
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::Info,
        ]
    }

    /// Human-readable label for display and CSV columns.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        }
    }

    /// Parse a severity string case-insensitively.
    ///
    /// `"information"` is accepted as an alias for `Info`. Anything
    /// unrecognised (including the empty string) maps to `Info` -- severity
    /// is advisory metadata and a bad value must never reject an entry.
    pub fn parse(raw: &str) -> Severity {
        match raw.trim().to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            "info" | "information" => Severity::Info,
            _ => Severity::Info,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Investigation
// =============================================================================

/// An investigation: a named timeline of observations.
///
/// The timeline is exclusively owned by its investigation. Hosting layers
/// hold one handle per active investigation and are responsible for
/// serialising access to it; opening a new investigation discards the
/// previous one's in-memory entries.
#[derive(Debug)]
pub struct Investigation {
    /// User-chosen label. Preserved as typed; only the on-disk directory
    /// name is sanitised (see `store`).
    pub name: String,

    /// The ordered entry set.
    pub entries: Timeline,

    /// Instant the investigation was opened.
    pub created_at: NaiveDateTime,
}

impl Investigation {
    /// Create a new, empty investigation.
    ///
    /// The name must be non-blank and at least
    /// `MIN_INVESTIGATION_NAME_LEN` characters after trimming.
    pub fn new(name: &str) -> Result<Self, TimelineError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TimelineError::InvalidName {
                name: name.to_string(),
                reason: "name must not be blank",
            });
        }
        if trimmed.chars().count() < constants::MIN_INVESTIGATION_NAME_LEN {
            return Err(TimelineError::InvalidName {
                name: name.to_string(),
                reason: "name must be at least 3 characters",
            });
        }

        Ok(Self {
            name: trimmed.to_string(),
            entries: Timeline::new(),
            created_at: Local::now().naive_local(),
        })
    }
}
