use std::path::Path;

use duckdb::Connection;
use tracing::info;

use crate::EngineResult;

/// Owns the single database connection shared by every ingest of a run.
pub struct DbManager {
    conn: Connection,
}

impl DbManager {
    pub fn open_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened database");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::DbManager;
    use tempfile::TempDir;

    #[test]
    fn file_database_persists_between_opens() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("inventory.duckdb");

        {
            let db = DbManager::open_file(&path).expect("open");
            db.connection()
                .execute_batch("CREATE TABLE stores (id BIGINT); INSERT INTO stores VALUES (1);")
                .expect("seed");
        }

        let db = DbManager::open_file(&path).expect("reopen");
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM stores", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn in_memory_database_starts_empty() {
        let db = DbManager::open_in_memory().expect("open");
        let tables: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM information_schema.tables", [], |row| {
                row.get(0)
            })
            .expect("count");
        assert_eq!(tables, 0);
    }
}
