//! Loads every `.csv` file in a data directory into a DuckDB database, one
//! table per file.

mod logging;

use std::env;
use std::fs;
use std::path::Path;

use csvload_engine::{load_directory, DbManager, EngineResult, LoadSummary, LoaderConfig};
use tracing::info;

pub use logging::init_file_logging;

/// Configure from the environment (and `.env`), then run one load.
///
/// Per-file failures are logged and reported in the summary; only a logging
/// or database open failure is returned as an error.
pub fn run() -> EngineResult<LoadSummary> {
    dotenvy::dotenv().ok();
    let config = LoaderConfig::from_env();
    let _guard = init_file_logging(&config.log_dir, &config.log_file, &config.log_filter)?;

    print_startup(&config);
    info!(
        db = %config.db_path.display(),
        data_dir = %config.data_dir.display(),
        read_chunksize = config.ingest.read_chunksize,
        max_sql_variables = config.ingest.max_sql_variables,
        "starting load"
    );

    let db = DbManager::open_file(&config.db_path)?;
    println!("Database opened at {}", config.db_path.display());

    Ok(load_directory(&config.data_dir, db.connection(), &config.ingest))
}

fn print_startup(config: &LoaderConfig) {
    match env::current_dir() {
        Ok(cwd) => println!("Current working directory: {}", cwd.display()),
        Err(err) => println!("Current working directory: unavailable ({err})"),
    }
    println!("Data directory set to: {}", config.data_dir.display());
    match list_contents(&config.data_dir) {
        Some(names) => println!("Contents of '{}': {names:?}", config.data_dir.display()),
        None => println!(
            "WARNING: Directory '{}' does NOT exist!",
            config.data_dir.display()
        ),
    }
}

fn list_contents(dir: &Path) -> Option<Vec<String>> {
    let entries = fs::read_dir(dir).ok()?;
    let mut names = entries
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    Some(names)
}

#[cfg(test)]
mod tests {
    use super::list_contents;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_directory_contents_sorted() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("vendors.csv"), "a\n1\n").expect("write");
        fs::write(dir.path().join("notes.txt"), "hi").expect("write");

        let names = list_contents(dir.path()).expect("listing");
        assert_eq!(names, vec!["notes.txt".to_string(), "vendors.csv".to_string()]);
    }

    #[test]
    fn missing_directory_has_no_listing() {
        let dir = TempDir::new().expect("tempdir");
        assert!(list_contents(&dir.path().join("absent")).is_none());
    }
}
