use thiserror::Error;

/// Structured error type for the tracker.
///
/// Upstream price API failures never appear here: the fetcher absorbs them
/// and substitutes a fallback snapshot. Only configuration problems and
/// persistence problems are fatal for an invocation.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Configuration error: {0}")] Config(String),

    #[error("Store error: {0}")] Store(String),

    #[error("CSV error: {0}")] Csv(#[from] csv::Error),

    #[error("IO error: {0}")] Io(#[from] std::io::Error),
}
