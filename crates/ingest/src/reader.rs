use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};

use crate::column::ColumnType;
use crate::{IngestError, IngestResult};

/// Tokens read as a missing value rather than as text.
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "NULL", "null", "None", "#N/A", "<NA>",
];

/// Upper bound on the rows preallocated per chunk.
const MAX_PREALLOCATED_ROWS: usize = 8_192;

/// A bounded run of consecutive rows read from one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub columns: Vec<String>,
    /// `None` marks a missing value.
    pub rows: Vec<Vec<Option<String>>>,
}

impl Chunk {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Inferred type per column; `None` for a column with no values in this
    /// chunk.
    pub fn column_types(&self) -> Vec<Option<ColumnType>> {
        (0..self.columns.len())
            .map(|index| ColumnType::infer(self.rows.iter().map(|row| row[index].as_deref())))
            .collect()
    }
}

/// Lazily splits a CSV source into [`Chunk`]s of at most `chunk_size` rows.
///
/// The iterator is finite and cannot be restarted. After it yields an error it
/// yields nothing further.
pub struct ChunkReader<R> {
    reader: csv::Reader<R>,
    path: PathBuf,
    columns: Vec<String>,
    chunk_size: usize,
    record: StringRecord,
    finished: bool,
}

impl ChunkReader<File> {
    pub fn from_path(path: &Path, chunk_size: usize) -> IngestResult<Self> {
        let file = File::open(path).map_err(|err| IngestError::open(path, err))?;
        Self::from_reader(file, path, chunk_size)
    }
}

impl<R: Read> ChunkReader<R> {
    /// `path` only labels errors; the data comes from `source`.
    pub fn from_reader(
        source: R,
        path: impl Into<PathBuf>,
        chunk_size: usize,
    ) -> IngestResult<Self> {
        let path = path.into();
        if chunk_size == 0 {
            return Err(IngestError::InvalidOptions(
                "read_chunksize must be at least 1".into(),
            ));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);
        let headers = reader
            .headers()
            .map_err(|err| IngestError::csv(&path, err))?
            .clone();
        if headers.is_empty() {
            return Err(IngestError::EmptySource { path });
        }

        Ok(Self {
            reader,
            path,
            columns: normalize_headers(headers.iter()),
            chunk_size,
            record: StringRecord::new(),
            finished: false,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn current_row(&self) -> IngestResult<Vec<Option<String>>> {
        let expected = self.columns.len();
        if self.record.len() > expected {
            return Err(IngestError::FieldCount {
                path: self.path.clone(),
                line: self.record.position().map_or(0, |pos| pos.line()),
                expected,
                found: self.record.len(),
            });
        }

        let mut row: Vec<Option<String>> = self
            .record
            .iter()
            .map(|field| (!is_missing(field)).then(|| field.to_string()))
            .collect();
        row.resize(expected, None);
        Ok(row)
    }

    fn fail(&mut self, err: IngestError) -> Option<IngestResult<Chunk>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = IngestResult<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut rows = Vec::with_capacity(self.chunk_size.min(MAX_PREALLOCATED_ROWS));
        while rows.len() < self.chunk_size {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => match self.current_row() {
                    Ok(row) => rows.push(row),
                    Err(err) => return self.fail(err),
                },
                Ok(false) => {
                    self.finished = true;
                    break;
                }
                Err(err) => {
                    let err = IngestError::csv(&self.path, err);
                    return self.fail(err);
                }
            }
        }

        if rows.is_empty() {
            return None;
        }
        Some(Ok(Chunk {
            columns: self.columns.clone(),
            rows,
        }))
    }
}

fn is_missing(field: &str) -> bool {
    MISSING_TOKENS.contains(&field)
}

/// Name blank headers `Unnamed: <index>` and suffix repeats with `.1`, `.2`, ...
/// Repeats are detected case-insensitively because the database folds
/// identifier case.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for (index, name) in raw.enumerate() {
        let name = if index == 0 {
            name.trim_start_matches('\u{feff}')
        } else {
            name
        };
        let base = if name.trim().is_empty() {
            format!("Unnamed: {index}")
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 0;
        while columns
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(&candidate))
        {
            suffix += 1;
            candidate = format!("{base}.{suffix}");
        }
        columns.push(candidate);
    }
    columns
}
