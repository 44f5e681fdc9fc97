use std::ops::Range;

use duckdb::{params_from_iter, Connection};
use tracing::debug;

use crate::batch::WriteMode;
use crate::column::ColumnType;
use crate::identifiers::{quote_identifier, validate_table_name};
use crate::reader::Chunk;
use crate::{IngestError, IngestResult};

/// Writes batches of one source into one table. The first batch written
/// through a writer replaces the table; every later batch appends, widening
/// column types first when a chunk carries values the table cannot hold.
pub struct TableWriter<'conn> {
    conn: &'conn Connection,
    table: String,
    quoted_table: String,
    /// Declared column types once the table exists. `None` marks a column that
    /// has only held NULLs so far; it is declared `VARCHAR` until a value
    /// arrives.
    schema: Option<Vec<Option<ColumnType>>>,
    batches_written: usize,
    rows_written: usize,
}

impl<'conn> TableWriter<'conn> {
    pub fn new(conn: &'conn Connection, table: &str) -> IngestResult<Self> {
        validate_table_name(table)?;
        Ok(Self {
            conn,
            table: table.to_string(),
            quoted_table: quote_identifier(table),
            schema: None,
            batches_written: 0,
            rows_written: 0,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn next_mode(&self) -> WriteMode {
        if self.schema.is_none() {
            WriteMode::Replace
        } else {
            WriteMode::Append
        }
    }

    pub fn batches_written(&self) -> usize {
        self.batches_written
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Write `chunk.rows[rows]`. `types` are the chunk's inferred column
    /// types: on a replace they become the table schema, on an append any
    /// wider type is applied to the table before inserting.
    pub fn write_batch(
        &mut self,
        chunk: &Chunk,
        types: &[Option<ColumnType>],
        rows: Range<usize>,
    ) -> IngestResult<WriteMode> {
        let mode = self.next_mode();
        let batch = &chunk.rows[rows.clone()];
        if batch.is_empty() {
            return Ok(mode);
        }

        match mode {
            WriteMode::Replace => self.recreate_table(&chunk.columns, types)?,
            WriteMode::Append => self.widen_columns(&chunk.columns, types)?,
        }
        let bound = self.declared_types();

        let sql = insert_sql(&self.quoted_table, &chunk.columns, batch.len());
        let values = batch.iter().flat_map(|row| {
            row.iter()
                .zip(&bound)
                .map(|(cell, ty)| ty.to_value(cell.as_deref()))
        });
        self.conn
            .prepare_cached(&sql)
            .and_then(|mut stmt| stmt.execute(params_from_iter(values)))
            .map_err(|err| IngestError::database(&self.table, err))?;

        debug!(
            table = %self.table,
            mode = mode.as_str(),
            start = rows.start,
            end = rows.end,
            rows = batch.len(),
            "wrote batch"
        );
        self.batches_written += 1;
        self.rows_written += batch.len();
        Ok(mode)
    }

    fn declared_types(&self) -> Vec<ColumnType> {
        self.schema
            .iter()
            .flatten()
            .map(|ty| ty.unwrap_or(ColumnType::Varchar))
            .collect()
    }

    fn recreate_table(
        &mut self,
        columns: &[String],
        types: &[Option<ColumnType>],
    ) -> IngestResult<()> {
        let declared: Vec<ColumnType> = types
            .iter()
            .map(|ty| ty.unwrap_or(ColumnType::Varchar))
            .collect();
        let sql = format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({columns});",
            table = self.quoted_table,
            columns = column_definitions(columns, &declared)
        );
        self.run_ddl(&sql)?;
        self.schema = Some(types.to_vec());
        Ok(())
    }

    fn widen_columns(
        &mut self,
        columns: &[String],
        types: &[Option<ColumnType>],
    ) -> IngestResult<()> {
        let Some(schema) = self.schema.as_mut() else {
            return Ok(());
        };

        let mut alters = Vec::new();
        for ((name, current), incoming) in columns.iter().zip(schema.iter_mut()).zip(types) {
            let Some(incoming) = *incoming else {
                continue;
            };
            let target = current.map_or(incoming, |existing| existing.widen(incoming));
            if *current == Some(target) {
                continue;
            }
            if current.unwrap_or(ColumnType::Varchar) != target {
                alters.push((name.as_str(), target));
            }
            *current = Some(target);
        }

        for (name, target) in alters {
            debug!(
                table = %self.table,
                column = name,
                to = target.sql_name(),
                "widening column"
            );
            let sql = format!(
                "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
                self.quoted_table,
                quote_identifier(name),
                target.sql_name()
            );
            self.run_ddl(&sql)?;
        }
        Ok(())
    }

    /// Cached inserts must not outlive the table shape they were planned for.
    fn run_ddl(&self, sql: &str) -> IngestResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|err| IngestError::database(&self.table, err))?;
        self.conn.flush_prepared_statement_cache();
        Ok(())
    }
}

fn column_definitions(columns: &[String], types: &[ColumnType]) -> String {
    columns
        .iter()
        .zip(types)
        .map(|(name, ty)| format!("{} {}", quote_identifier(name), ty.sql_name()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Multi-row insert with `row_count * columns.len()` positional parameters.
fn insert_sql(quoted_table: &str, columns: &[String], row_count: usize) -> String {
    let column_list = columns
        .iter()
        .map(|name| quote_identifier(name))
        .collect::<Vec<_>>()
        .join(", ");
    let row = format!("({})", vec!["?"; columns.len()].join(", "));
    let rows = vec![row.as_str(); row_count].join(", ");
    format!("INSERT INTO {quoted_table} ({column_list}) VALUES {rows}")
}
