use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use csvload_ingest::{
    ingest_with, is_csv_file_name, table_name_from_file_name, IngestError, IngestOptions,
};
use duckdb::Connection;
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Completed,
    DirectoryMissing,
    DirectoryUnreadable,
    NoCsvFiles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    PermissionDenied { message: String },
    Failed { message: String },
    InvalidName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Loaded {
        rows_written: usize,
        batches_written: usize,
    },
    Skipped {
        #[serde(flatten)]
        reason: SkipReason,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file_name: String,
    pub table: Option<String>,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Result of one directory load. Loading never fails as a whole; problems are
/// reported per file or through `status`.
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub data_dir: PathBuf,
    pub status: LoadStatus,
    pub files: Vec<FileReport>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl LoadSummary {
    fn empty(data_dir: &Path, status: LoadStatus, started: Instant) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            status,
            files: Vec::new(),
            elapsed: started.elapsed(),
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.files
            .iter()
            .filter(|file| matches!(file.outcome, FileOutcome::Loaded { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.files.len() - self.loaded_count()
    }

    pub fn rows_written(&self) -> usize {
        self.files
            .iter()
            .map(|file| match file.outcome {
                FileOutcome::Loaded { rows_written, .. } => rows_written,
                FileOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed.as_secs_f64() / 60.0
    }
}

/// Ingest every `.csv` file directly inside `data_dir`, one table per file,
/// named after the file without its extension.
///
/// Files are processed one at a time in name order. A file that fails is
/// logged and skipped; the remaining files are still loaded.
pub fn load_directory(data_dir: &Path, conn: &Connection, options: &IngestOptions) -> LoadSummary {
    let started = Instant::now();
    info!("Scanning data directory '{}' for CSV files...", data_dir.display());

    if !data_dir.is_dir() {
        error!(
            "Directory '{}' does not exist. Fix the data directory setting or create the folder.",
            data_dir.display()
        );
        return LoadSummary::empty(data_dir, LoadStatus::DirectoryMissing, started);
    }

    let file_names = match list_file_names(data_dir) {
        Ok(names) => names,
        Err(err) => {
            error!(error = %err, "Could not list directory '{}'", data_dir.display());
            return LoadSummary::empty(data_dir, LoadStatus::DirectoryUnreadable, started);
        }
    };
    info!("All files in '{}': {:?}", data_dir.display(), file_names);

    let csv_files: Vec<&String> = file_names
        .iter()
        .filter(|name| is_csv_file_name(name))
        .collect();
    if csv_files.is_empty() {
        warn!("No CSV files found to process. Check filenames and filters.");
        return LoadSummary::empty(data_dir, LoadStatus::NoCsvFiles, started);
    }

    let files = csv_files
        .into_iter()
        .map(|file_name| load_file(data_dir, file_name, conn, options))
        .collect();

    let summary = LoadSummary {
        data_dir: data_dir.to_path_buf(),
        status: LoadStatus::Completed,
        files,
        elapsed: started.elapsed(),
    };
    info!("-- Ingestion Complete --");
    info!(
        loaded = summary.loaded_count(),
        skipped = summary.skipped_count(),
        rows = summary.rows_written(),
        "Total Time Taken: {:.2} minutes",
        summary.elapsed_minutes()
    );
    summary
}

fn load_file(
    data_dir: &Path,
    file_name: &str,
    conn: &Connection,
    options: &IngestOptions,
) -> FileReport {
    let csv_path = data_dir.join(file_name);
    let Some(table) = table_name_from_file_name(file_name) else {
        warn!("Skipping '{}': no usable table name", csv_path.display());
        return FileReport {
            file_name: file_name.to_string(),
            table: None,
            outcome: FileOutcome::Skipped {
                reason: SkipReason::InvalidName,
            },
        };
    };

    info!("Ingesting '{}' into db as table '{}'...", file_name, table);
    let outcome = match ingest_with(&csv_path, &table, conn, options) {
        Ok(report) => {
            if !report.table_written() {
                warn!(
                    "'{}' has a header but no data rows; table '{}' left unchanged",
                    file_name, table
                );
            }
            FileOutcome::Loaded {
                rows_written: report.rows_written,
                batches_written: report.batches_written,
            }
        }
        Err(err) => FileOutcome::Skipped {
            reason: skip_reason(&csv_path, &err),
        },
    };

    FileReport {
        file_name: file_name.to_string(),
        table: Some(table),
        outcome,
    }
}

fn skip_reason(csv_path: &Path, err: &IngestError) -> SkipReason {
    if err.is_permission_denied() {
        warn!(
            "Permission error while accessing '{}': {}. Tip: close this file in any other program and rerun.",
            csv_path.display(),
            err
        );
        SkipReason::PermissionDenied {
            message: err.to_string(),
        }
    } else {
        error!(detail = ?err, "Error while ingesting '{}': {}", csv_path.display(), err);
        SkipReason::Failed {
            message: err.to_string(),
        }
    }
}

fn list_file_names(data_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(data_dir)? {
        let entry = entry?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
