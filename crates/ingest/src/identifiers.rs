use crate::{IngestError, IngestResult};

const CSV_EXTENSION: &str = ".csv";

/// Table names are quoted on every use, so any non-empty name without NUL or
/// control characters is accepted.
pub fn validate_table_name(table_name: &str) -> IngestResult<()> {
    if table_name.is_empty() {
        return Err(IngestError::InvalidTableName("table name is empty".into()));
    }
    if table_name.chars().any(char::is_control) {
        return Err(IngestError::InvalidTableName(format!(
            "table name {table_name:?} contains control characters"
        )));
    }
    Ok(())
}

/// Double-quote an identifier, doubling any embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn is_csv_file_name(file_name: &str) -> bool {
    let Some(split) = file_name.len().checked_sub(CSV_EXTENSION.len()) else {
        return false;
    };
    file_name.is_char_boundary(split) && file_name[split..].eq_ignore_ascii_case(CSV_EXTENSION)
}

/// Derive the target table for a source file by stripping its `.csv`
/// extension, whatever its casing. Returns `None` when the file is not a CSV
/// or nothing would be left of the name.
pub fn table_name_from_file_name(file_name: &str) -> Option<String> {
    if !is_csv_file_name(file_name) {
        return None;
    }
    let stem = &file_name[..file_name.len() - CSV_EXTENSION.len()];
    if validate_table_name(stem).is_err() {
        return None;
    }
    Some(stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::{is_csv_file_name, quote_identifier, table_name_from_file_name, validate_table_name};

    #[test]
    fn strips_extension_in_any_case() {
        assert_eq!(table_name_from_file_name("sales.csv").as_deref(), Some("sales"));
        assert_eq!(table_name_from_file_name("Sales.CSV").as_deref(), Some("Sales"));
        assert_eq!(
            table_name_from_file_name("begin_inventory.Csv").as_deref(),
            Some("begin_inventory")
        );
    }

    #[test]
    fn keeps_inner_dots_and_spaces() {
        assert_eq!(
            table_name_from_file_name("2024.q1 sales.csv").as_deref(),
            Some("2024.q1 sales")
        );
    }

    #[test]
    fn rejects_non_csv_and_bare_extension() {
        assert_eq!(table_name_from_file_name("notes.txt"), None);
        assert_eq!(table_name_from_file_name("sales.csv.bak"), None);
        assert_eq!(table_name_from_file_name(".csv"), None);
    }

    #[test]
    fn csv_filter_is_case_insensitive() {
        assert!(is_csv_file_name("a.csv"));
        assert!(is_csv_file_name("A.CSV"));
        assert!(!is_csv_file_name("a.tsv"));
    }

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quote_identifier("sales"), "\"sales\"");
        assert_eq!(quote_identifier("my \"best\" table"), "\"my \"\"best\"\" table\"");
    }

    #[test]
    fn validate_rejects_empty_and_control_chars() {
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("bad\nname").is_err());
        assert!(validate_table_name("vendor invoices").is_ok());
    }
}
