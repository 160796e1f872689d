// Casetrail - main.rs
//
// Thin CLI host around the core. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation (debug mode support)
// 3. One investigation handle per invocation, with all access serialised
//    by the single-threaded command flow.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use casetrail::core::{export, import, normalize, timeline::Direction};
use casetrail::store::InvestigationStore;
use casetrail::util;
use casetrail::util::error::Result;

/// Casetrail - incident timeline recorder.
///
/// Normalises raw observation timestamps, keeps a stable chronological
/// timeline per investigation, and persists CSV snapshots and analysis
/// reports under a storage root.
#[derive(Parser, Debug)]
#[command(name = "casetrail", version, about)]
struct Cli {
    /// Storage root holding one directory per investigation.
    #[arg(short, long, default_value = "logs")]
    root: PathBuf,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import entries from a CSV file, sort them, and write the snapshot.
    Import {
        /// Investigation name (directory is derived from it).
        investigation: String,

        /// CSV file with a Timestamp,Severity,Description header.
        file: PathBuf,

        /// Also write a numbered plain-text timeline to this path.
        #[arg(long)]
        txt: Option<PathBuf>,

        /// Also write a JSON export to this path.
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Print an investigation's snapshot as the analysis hand-off block.
    Show {
        /// Investigation name.
        investigation: String,
    },

    /// Append an analysis report (from a file, or stdin when omitted).
    Report {
        /// Investigation name.
        investigation: String,

        /// File containing the analysis text.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the current instant in the raw entry form (YYYY-MM-DD-HH-MM-SS).
    Now,
}

fn main() {
    let cli = Cli::parse();

    util::logging::init(cli.debug);
    tracing::info!(
        version = util::constants::APP_VERSION,
        root = %cli.root.display(),
        "Casetrail starting"
    );

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = InvestigationStore::new(&cli.root);

    match cli.command {
        Command::Import {
            investigation,
            file,
            txt,
            json,
        } => {
            let mut inv = store.open(&investigation)?;

            let reader = std::fs::File::open(&file).map_err(|e| {
                util::error::CasetrailError::Io {
                    path: file.clone(),
                    operation: "open import file",
                    source: e,
                }
            })?;
            let summary = import::import_csv(reader, &mut inv.entries)?;
            inv.entries.sort(Direction::Ascending);

            let degraded = inv.entries.entries().iter().filter(|e| e.degraded).count();
            if degraded > 0 {
                eprintln!(
                    "Warning: {degraded} entries had unparseable timestamps; \
                     their ordering uses a substituted current instant."
                );
            }

            store.save_snapshot(&inv)?;

            if let Some(path) = txt {
                write_export(&path, "txt export", |w| export::write_txt(&inv, w))?;
            }
            if let Some(path) = json {
                write_export(&path, "json export", |w| export::write_json(&inv.entries, w))?;
            }

            println!(
                "Imported {} entries ({} skipped) into '{}'",
                summary.imported, summary.skipped, inv.name
            );
            println!("{}", export::analysis_block(&inv.entries));
        }

        Command::Show { investigation } => {
            let mut inv = store.open(&investigation)?;
            let snapshot = store.snapshot_path(&inv.name);
            match std::fs::File::open(&snapshot) {
                Ok(reader) => {
                    import::import_csv(reader, &mut inv.entries)?;
                    inv.entries.sort(Direction::Ascending);
                    println!("{}", export::analysis_block(&inv.entries));
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    println!("(no snapshot for '{}')", inv.name);
                }
                Err(e) => {
                    return Err(util::error::CasetrailError::Io {
                        path: snapshot,
                        operation: "open snapshot",
                        source: e,
                    });
                }
            }
        }

        Command::Report {
            investigation,
            file,
        } => {
            let inv = store.open(&investigation)?;
            let text = match file {
                Some(path) => std::fs::read_to_string(&path).map_err(|e| {
                    util::error::CasetrailError::Io {
                        path: path.clone(),
                        operation: "read report text",
                        source: e,
                    }
                })?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf).map_err(|e| {
                        util::error::CasetrailError::Io {
                            path: PathBuf::from("<stdin>"),
                            operation: "read report text",
                            source: e,
                        }
                    })?;
                    buf
                }
            };
            let path = store.append_report(&inv, &text)?;
            println!("Report written to {}", path.display());
        }

        Command::Now => {
            println!("{}", normalize::now_raw());
        }
    }

    Ok(())
}

/// Write one optional export file, mapping serialisation errors with the
/// destination path for the user-facing message.
fn write_export<F>(path: &PathBuf, operation: &'static str, serialise: F) -> Result<()>
where
    F: FnOnce(&mut Vec<u8>) -> std::result::Result<usize, util::error::ExportError>,
{
    let mut buf = Vec::new();
    serialise(&mut buf)?;
    std::fs::write(path, &buf).map_err(|e| util::error::CasetrailError::Io {
        path: path.clone(),
        operation,
        source: e,
    })?;
    println!("Wrote {}", path.display());
    Ok(())
}
