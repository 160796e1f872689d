// Casetrail - store/mod.rs
//
// File-system persistence, keyed by investigation name: one directory per
// investigation under a storage root, one authoritative CSV snapshot of the
// timeline (overwritten in full on every mutation), and a sequence of
// timestamped analysis-report files.
//
// Design points:
// - Snapshots are written atomically (write temp, rename) so a crash during
//   save never leaves a truncated CSV behind.
// - Persistence is write-only: `open` never loads a prior snapshot into
//   memory. The in-memory timeline is the single source of truth for the
//   session, and a failed disk write is retried implicitly by the next
//   mutation's snapshot.
// - Single writer per investigation is assumed; there is no file locking.
//   Two processes writing the same investigation name is undefined.

use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::export;
use crate::core::model::Investigation;
use crate::util::constants;
use crate::util::error::{ExportError, Result, StoreError};

/// Replace filesystem-reserved characters in an investigation name with
/// `_` so the name is usable as a directory on every platform. Only the
/// directory name is sanitised; the display name stays as typed.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if constants::RESERVED_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Durable persistence for investigations under a single storage root.
///
/// The store is a pure mapping from investigation name to directory -- it
/// holds no registry and no entry state, so independent hosting sessions
/// can each hold their own store value for different investigations.
#[derive(Debug, Clone)]
pub struct InvestigationStore {
    root: PathBuf,
}

impl InvestigationStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for an investigation name (not created by this call).
    pub fn investigation_dir(&self, name: &str) -> PathBuf {
        self.root.join(sanitize_name(name))
    }

    /// Path of the snapshot file for an investigation name.
    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.investigation_dir(name)
            .join(constants::SNAPSHOT_FILE_NAME)
    }

    /// Open (create or reuse) an investigation: validates the name, ensures
    /// its directory exists, and returns a handle with an empty in-memory
    /// timeline. Prior snapshot contents are NOT loaded -- persistence is
    /// write-only snapshotting, not state recovery. A host that wants
    /// restore can feed the snapshot file through `core::import`.
    pub fn open(&self, name: &str) -> Result<Investigation> {
        let investigation = Investigation::new(name)?;
        let dir = self.investigation_dir(&investigation.name);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;

        tracing::info!(
            name = %investigation.name,
            dir = %dir.display(),
            "investigation opened"
        );
        Ok(investigation)
    }

    /// Write the entire current timeline, ascending by canonical instant,
    /// to the fixed-name snapshot CSV, overwriting any prior snapshot.
    ///
    /// An empty timeline deletes the snapshot instead of writing an empty
    /// file. Returns the path written, or `None` when the snapshot was
    /// deleted or absent.
    pub fn save_snapshot(&self, investigation: &Investigation) -> Result<Option<PathBuf>> {
        let dir = self.investigation_dir(&investigation.name);
        let path = dir.join(constants::SNAPSHOT_FILE_NAME);

        if investigation.entries.is_empty() {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "snapshot deleted (timeline empty)");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::Delete { path, source: e }.into()),
            }
            return Ok(None);
        }

        std::fs::create_dir_all(&dir).map_err(|e| StoreError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;

        // Serialise in memory first so a CSV failure never touches disk.
        let mut buf = Vec::new();
        export::write_csv(&investigation.entries.ascending_view(), &mut buf).map_err(
            |e| match e {
                ExportError::Csv { source } => StoreError::Csv {
                    path: path.clone(),
                    source,
                },
                ExportError::Io { source } => StoreError::Write {
                    path: path.clone(),
                    source,
                },
                ExportError::Json { source } => StoreError::Write {
                    path: path.clone(),
                    source: std::io::Error::other(source),
                },
            },
        )?;

        // Atomic whole-file write: temp sibling, then rename.
        let tmp = path.with_extension("csv.tmp");
        std::fs::write(&tmp, &buf).map_err(|e| StoreError::Write {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            StoreError::Finalise {
                path: path.clone(),
                source: e,
            }
        })?;

        tracing::debug!(
            path = %path.display(),
            entries = investigation.entries.len(),
            "snapshot written"
        );
        Ok(Some(path))
    }

    /// Write analysis text verbatim, framed by the report banner, to a new
    /// timestamped file in the investigation's directory. Never overwrites
    /// a prior report: a same-second collision gets a numeric suffix.
    pub fn append_report(&self, investigation: &Investigation, text: &str) -> Result<PathBuf> {
        let dir = self.investigation_dir(&investigation.name);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;

        let now = Local::now();
        let stamp = now.format(constants::REPORT_FILE_TIMESTAMP_FORMAT);
        let banner = "=".repeat(constants::REPORT_BANNER_WIDTH);
        let content = format!(
            "{banner}\nAI Security Analysis: {name}\n{banner}\n\
             Generated: {generated}\n{banner}\n\n{text}\n\n\
             {banner}\nEnd of AI Analysis\n{banner}\n",
            name = investigation.name,
            generated = now.format(constants::CANONICAL_DISPLAY_FORMAT),
        );

        // create_new keeps prior reports intact; bump a suffix on collision.
        for attempt in 0u32..1_000 {
            let file_name = if attempt == 0 {
                format!("{}{stamp}.txt", constants::REPORT_FILE_PREFIX)
            } else {
                format!("{}{stamp}_{attempt}.txt", constants::REPORT_FILE_PREFIX)
            };
            let path = dir.join(file_name);

            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())
                        .map_err(|e| StoreError::Write {
                            path: path.clone(),
                            source: e,
                        })?;
                    tracing::info!(path = %path.display(), "analysis report written");
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(StoreError::Write { path, source: e }.into()),
            }
        }

        Err(StoreError::Write {
            path: dir.join(format!("{}{stamp}.txt", constants::REPORT_FILE_PREFIX)),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "exhausted report filename suffixes",
            ),
        }
        .into())
    }
}
