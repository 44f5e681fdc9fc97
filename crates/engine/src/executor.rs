use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::{
    ingest_csv_to_table, load_directory, table_schema, DbManager, EngineResult, LoaderConfig,
};

const LOAD_USAGE: &str = "Usage: load <db_path> [data_dir]";
const INGEST_USAGE: &str = "Usage: ingest <db_path> <csv_path> [table_name]";
const SCHEMA_USAGE: &str = "Usage: schema <db_path> <table_name>";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Load {
        db_path: String,
        data_dir: Option<PathBuf>,
    },
    Ingest {
        db_path: String,
        csv_path: String,
        table: Option<String>,
    },
    Schema {
        db_path: String,
        table: String,
    },
}

/// Run one text command and return its JSON result. Chunk size and parameter
/// cap come from the `CSVLOAD_*` environment.
pub fn execute_command(command: &str) -> EngineResult<String> {
    let config = LoaderConfig::from_env();
    match Command::parse(command)? {
        Command::Load { db_path, data_dir } => {
            let data_dir = data_dir.unwrap_or(config.data_dir);
            let db = DbManager::open_file(&db_path)?;
            let summary = load_directory(&data_dir, db.connection(), &config.ingest);
            Ok(serde_json::to_string(&summary)?)
        }
        Command::Ingest {
            db_path,
            csv_path,
            table,
        } => {
            let report = ingest_csv_to_table(&db_path, &csv_path, table.as_deref(), &config.ingest)?;
            Ok(serde_json::to_string(&report)?)
        }
        Command::Schema { db_path, table } => {
            let db = DbManager::open_file(&db_path)?;
            let columns = table_schema(db.connection(), &table)?;
            Ok(serde_json::to_string(&columns)?)
        }
    }
}

impl Command {
    fn parse(input: &str) -> EngineResult<Self> {
        let words = split_words(input)?;
        let (name, args) = words
            .split_first()
            .ok_or("Command cannot be empty")?;

        match name.as_str() {
            "load" => {
                let args = arguments(args, 1..=2, LOAD_USAGE)?;
                Ok(Self::Load {
                    db_path: args[0].clone(),
                    data_dir: args.get(1).map(PathBuf::from),
                })
            }
            "ingest" => {
                let args = arguments(args, 2..=3, INGEST_USAGE)?;
                Ok(Self::Ingest {
                    db_path: args[0].clone(),
                    csv_path: args[1].clone(),
                    table: args.get(2).cloned(),
                })
            }
            "schema" => {
                let args = arguments(args, 2..=2, SCHEMA_USAGE)?;
                Ok(Self::Schema {
                    db_path: args[0].clone(),
                    table: args[1].clone(),
                })
            }
            other => Err(format!("Unknown command: {other}").into()),
        }
    }
}

fn arguments<'a>(
    args: &'a [String],
    allowed: RangeInclusive<usize>,
    usage: &str,
) -> EngineResult<&'a [String]> {
    if allowed.contains(&args.len()) {
        Ok(args)
    } else {
        Err(usage.into())
    }
}

/// Whitespace-separated words. Single or double quotes group a word that
/// contains spaces; a backslash escapes the next character outside single
/// quotes.
fn split_words(input: &str) -> EngineResult<Vec<String>> {
    let mut words = Vec::new();
    let mut word: Option<String> = None;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(open), c) if c == open => quote = None,
            (Some('"') | None, '\\') => {
                let escaped = chars.next().ok_or("Dangling escape at end of command")?;
                word.get_or_insert_with(String::new).push(escaped);
            }
            (Some(_), c) => word.get_or_insert_with(String::new).push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                word.get_or_insert_with(String::new);
            }
            (None, c) if c.is_whitespace() => words.extend(word.take()),
            (None, c) => word.get_or_insert_with(String::new).push(c),
        }
    }

    if quote.is_some() {
        return Err("Unterminated quoted string".into());
    }
    words.extend(word);
    Ok(words)
}
