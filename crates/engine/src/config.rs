use std::path::PathBuf;

use csvload_ingest::{IngestOptions, DEFAULT_MAX_SQL_VARIABLES, DEFAULT_READ_CHUNKSIZE};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DB_PATH: &str = "inventory.duckdb";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "ingestion_db.log";
pub const DEFAULT_LOG_FILTER: &str = "debug";

/// Runtime settings for a load. Relative paths resolve against the working
/// directory.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_file: String,
    pub log_filter: String,
    pub ingest: IngestOptions,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_file: DEFAULT_LOG_FILE.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            ingest: IngestOptions::default(),
        }
    }
}

impl LoaderConfig {
    /// Read `CSVLOAD_*` environment variables. Unset, empty or unparsable
    /// values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let positive = |key: &str, default: usize| {
            text(key)
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(default)
        };

        let defaults = Self::default();
        Self {
            data_dir: text("CSVLOAD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            db_path: text("CSVLOAD_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_dir: text("CSVLOAD_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_file: text("CSVLOAD_LOG_FILE").unwrap_or(defaults.log_file),
            log_filter: text("CSVLOAD_LOG").unwrap_or(defaults.log_filter),
            ingest: IngestOptions {
                read_chunksize: positive("CSVLOAD_READ_CHUNKSIZE", DEFAULT_READ_CHUNKSIZE),
                max_sql_variables: positive("CSVLOAD_MAX_SQL_VARIABLES", DEFAULT_MAX_SQL_VARIABLES),
            },
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_file)
    }
}
