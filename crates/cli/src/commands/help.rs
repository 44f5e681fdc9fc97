pub fn is_help_request(args: &[String]) -> bool {
    matches!(
        args.first().map(String::as_str),
        Some("help" | "-h" | "--help")
    )
}

pub fn print_help() {
    println!("csvload_cli - load CSV files into a DuckDB database");
    println!();
    println!("usage:");
    println!("  csvload_cli load <db_path> [data_dir]");
    println!("  csvload_cli ingest <db_path> <csv_path> [table_name]");
    println!("  csvload_cli schema <db_path> <table_name>");
    println!("  csvload_cli help");
    println!();
    println!("environment:");
    println!("  CSVLOAD_READ_CHUNKSIZE     rows read per chunk (default 50000)");
    println!("  CSVLOAD_MAX_SQL_VARIABLES  bound parameters per insert (default 900)");
    println!("  CSVLOAD_LOG                log filter written to stderr (default info)");
    println!();
    println!("example:");
    println!("  csvload_cli load ./inventory.duckdb ./data");
    println!("  csvload_cli schema ./inventory.duckdb sales");
}
