use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while ingesting one CSV file into one table.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("permission denied reading {path}: {source}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} has no header row")]
    EmptySource { path: PathBuf },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} line {line}: expected {expected} fields, saw {found}")]
    FieldCount {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("database error writing table '{table}': {source}")]
    Database {
        table: String,
        #[source]
        source: duckdb::Error,
    },
    #[error("invalid ingest options: {0}")]
    InvalidOptions(String),
    #[error("invalid table name: {0}")]
    InvalidTableName(String),
}

/// Windows reports a file held open by another program as a sharing or lock
/// violation rather than as access denied.
#[cfg(windows)]
const LOCKED_FILE_ERRORS: &[i32] = &[32, 33];
#[cfg(not(windows))]
const LOCKED_FILE_ERRORS: &[i32] = &[];

fn is_access_refused(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
        || err
            .raw_os_error()
            .is_some_and(|code| LOCKED_FILE_ERRORS.contains(&code))
}

impl IngestError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if is_access_refused(&source) {
            Self::PermissionDenied { path, source }
        } else {
            Self::Open { path, source }
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        let path = path.into();
        match source.kind() {
            csv::ErrorKind::Io(err) if is_access_refused(err) => Self::PermissionDenied {
                path,
                source: match err.raw_os_error() {
                    Some(code) => io::Error::from_raw_os_error(code),
                    None => io::Error::new(err.kind(), err.to_string()),
                },
            },
            _ => Self::Csv { path, source },
        }
    }

    pub(crate) fn database(table: &str, source: duckdb::Error) -> Self {
        Self::Database {
            table: table.to_string(),
            source,
        }
    }

    /// True when the failure came from the OS refusing access to the source,
    /// typically because another program holds a lock on it.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::IngestError;
    use std::io;

    #[test]
    fn open_classifies_permission_denied() {
        let err = IngestError::open(
            "data/locked.csv",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("data/locked.csv"));
    }

    #[test]
    fn open_keeps_other_io_errors() {
        let err = IngestError::open("data/gone.csv", io::Error::from(io::ErrorKind::NotFound));
        assert!(!err.is_permission_denied());
        assert!(matches!(err, IngestError::Open { .. }));
    }

    #[test]
    fn csv_io_permission_error_is_classified() {
        let source = csv::Error::from(io::Error::from(io::ErrorKind::PermissionDenied));
        let err = IngestError::csv("data/locked.csv", source);
        assert!(err.is_permission_denied());
    }

    #[cfg(windows)]
    #[test]
    fn windows_sharing_and_lock_violations_count_as_locked() {
        for code in [32, 33] {
            let err = IngestError::open("data/sales.csv", io::Error::from_raw_os_error(code));
            assert!(err.is_permission_denied(), "os error {code}");

            let source = csv::Error::from(io::Error::from_raw_os_error(code));
            assert!(IngestError::csv("data/sales.csv", source).is_permission_denied());
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn raw_os_codes_only_matter_on_windows() {
        // 32 is EPIPE here.
        let err = IngestError::open("data/sales.csv", io::Error::from_raw_os_error(32));
        assert!(!err.is_permission_denied());
    }
}
