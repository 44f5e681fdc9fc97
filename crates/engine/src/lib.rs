mod config;
mod db_manager;
mod executor;
mod ingest;
mod loader;
mod schema;
mod types;

pub use config::{
    LoaderConfig, DEFAULT_DATA_DIR, DEFAULT_DB_PATH, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE,
    DEFAULT_LOG_FILTER,
};
pub use csvload_ingest::{IngestError, IngestOptions, IngestReport};
pub use db_manager::DbManager;
pub use executor::execute_command;
pub use ingest::ingest_csv_to_table;
pub use loader::{load_directory, FileOutcome, FileReport, LoadStatus, LoadSummary, SkipReason};
pub use schema::{row_count, table_exists, table_schema, TableColumn};
pub use types::EngineResult;
