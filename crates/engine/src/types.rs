use std::error::Error;

/// Error type for the engine surface: command parsing, database opening and
/// anything bubbled up from ingestion.
pub type EngineResult<T> = Result<T, Box<dyn Error + Send + Sync>>;
