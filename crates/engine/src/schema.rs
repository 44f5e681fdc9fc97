use serde::Serialize;

use csvload_ingest::{quote_identifier, validate_table_name};
use duckdb::Connection;

use crate::EngineResult;

#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    pub cid: i64,
    pub name: String,
    pub data_type: String,
    pub notnull: bool,
    pub default_value: Option<String>,
}

pub fn table_schema(conn: &Connection, table_name: &str) -> EngineResult<Vec<TableColumn>> {
    validate_table_name(table_name)?;
    let mut stmt = conn.prepare(
        "SELECT ordinal_position, column_name, data_type, is_nullable, column_default
         FROM information_schema.columns
         WHERE table_name = ?
         ORDER BY ordinal_position",
    )?;
    let rows = stmt.query_map([table_name], |row| {
        let position: i64 = row.get(0)?;
        let nullable: String = row.get(3)?;
        Ok(TableColumn {
            cid: position - 1,
            name: row.get(1)?,
            data_type: row.get(2)?,
            notnull: nullable == "NO",
            default_value: row.get(4)?,
        })
    })?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

pub fn table_exists(conn: &Connection, table_name: &str) -> EngineResult<bool> {
    let found: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(found > 0)
}

pub fn row_count(conn: &Connection, table_name: &str) -> EngineResult<i64> {
    validate_table_name(table_name)?;
    let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table_name));
    let count = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count)
}
