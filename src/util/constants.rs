// Casetrail - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Casetrail";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Store layout
// =============================================================================

/// Fixed name of the per-investigation timeline snapshot.
/// Overwritten in full on every mutation; deleted when the timeline is empty.
pub const SNAPSHOT_FILE_NAME: &str = "investigation_logs.csv";

/// Prefix for analysis report files. The full name is
/// `ai_analysis_<YYYYMMDD_HHMMSS>.txt`.
pub const REPORT_FILE_PREFIX: &str = "ai_analysis_";

/// Timestamp format embedded in report file names.
pub const REPORT_FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Width of the `=` banner lines framing report files.
pub const REPORT_BANNER_WIDTH: usize = 80;

/// Characters that are replaced with `_` when an investigation name is used
/// as a directory name. The display name itself is never altered.
pub const RESERVED_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Minimum length of an investigation name.
pub const MIN_INVESTIGATION_NAME_LEN: usize = 3;

// =============================================================================
// Timeline limits
// =============================================================================

/// Hard upper bound on rows accepted from a single CSV import.
/// Entries are operator-supplied observations, not machine log volumes;
/// anything beyond this indicates the wrong file was selected.
pub const MAX_IMPORT_ROWS: usize = 100_000;

// =============================================================================
// Display formats
// =============================================================================

/// Rendering of a canonical instant in exports and report headers.
pub const CANONICAL_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The hyphenated raw form offered by the "insert current time" helper.
pub const RAW_TIME_ENTRY_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
