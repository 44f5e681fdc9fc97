use std::path::Path;

use csvload_ingest::{ingest_with, table_name_from_file_name, IngestOptions, IngestReport};

use crate::db_manager::DbManager;
use crate::EngineResult;

/// Ingest one CSV into the database file at `db_path`. Without an explicit
/// `table_name` the table is named after the file.
pub fn ingest_csv_to_table(
    db_path: &str,
    csv_path: &str,
    table_name: Option<&str>,
    options: &IngestOptions,
) -> EngineResult<IngestReport> {
    let table = match table_name {
        Some(name) => name.to_string(),
        None => default_table_name(csv_path)?,
    };
    let db = DbManager::open_file(db_path)?;
    let report = ingest_with(Path::new(csv_path), &table, db.connection(), options)?;
    Ok(report)
}

fn default_table_name(csv_path: &str) -> EngineResult<String> {
    Path::new(csv_path)
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(table_name_from_file_name)
        .ok_or_else(|| {
            format!("cannot derive a table name from '{csv_path}'; pass one explicitly").into()
        })
}
