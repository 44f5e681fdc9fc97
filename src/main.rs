fn main() {
    match csvload_lib::run() {
        Ok(summary) => println!(
            "Loaded {} file(s), skipped {} ({} rows) in {:.2} minutes",
            summary.loaded_count(),
            summary.skipped_count(),
            summary.rows_written(),
            summary.elapsed_minutes()
        ),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
