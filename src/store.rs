//! Append-only CSV record store
//!
//! One row per gated invocation, never rewritten or compacted. The header is
//! written exactly once, when the file is empty. Deliberately not
//! idempotent: repeated runs with unchanged prices still append, because the
//! store is a time series of attempts, not a deduplicated table.
use std::fs::OpenOptions;
use std::path::Path;

use chrono::Utc;
use csv::WriterBuilder;

use crate::config::Config;
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};
use crate::prices::{FetchOutcome, PRICE_UNAVAILABLE};

/// Timestamp format of the first CSV column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Three-column header, labels taken from the configured assets
pub fn csv_header(cfg: &Config) -> [String; 3] {
    let quote = cfg.quote_currency.to_uppercase();
    [
        "Timestamp (UTC)".to_string(),
        format!("{} ({})", cfg.primary.label, quote),
        format!("{} ({})", cfg.secondary.label, quote),
    ]
}

/// Renders a price cell, substituting the sentinel when absent
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => p.to_string(),
        None => PRICE_UNAVAILABLE.to_string(),
    }
}

/// Appends exactly one data row, creating the file with a header first if it
/// does not exist yet.
///
/// The open handle holds an exclusive advisory lock for the duration of the
/// header check, write and flush, so overlapping invocations serialize
/// instead of interleaving partial rows. The row is buffered and flushed as
/// one write: it is either fully on disk or not there at all.
pub fn append_row(
    path: &Path,
    timestamp: &str,
    primary: &str,
    secondary: &str,
    header: &[String; 3],
) -> Result<(), TrackerError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TrackerError::Store(format!("open {}: {}", path.display(), e)))?;

    file.lock()
        .map_err(|e| TrackerError::Store(format!("lock {}: {}", path.display(), e)))?;

    // Checked under the lock: a competing invocation may have just created
    // the header
    let need_header = file
        .metadata()
        .map_err(|e| TrackerError::Store(format!("stat {}: {}", path.display(), e)))?
        .len() == 0;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    if need_header {
        writer.write_record(header)?;
    }
    writer.write_record([timestamp, primary, secondary])?;
    writer.flush()?;

    // Dropping the writer closes the file and releases the lock
    Ok(())
}

/// Stamps the current UTC time and appends the outcome's prices (real or
/// sentinel) to the configured store.
pub fn record_outcome(outcome: &FetchOutcome, cfg: &Config) -> Result<(), TrackerError> {
    let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
    let primary = format_price(outcome.price(&cfg.primary.id, &cfg.quote_currency));
    let secondary = format_price(outcome.price(&cfg.secondary.id, &cfg.quote_currency));

    logger::debug(
        LogTag::Store,
        &format!("Appending row: {}, {}, {}", timestamp, primary, secondary),
    );

    append_row(
        Path::new(&cfg.csv_path),
        &timestamp,
        &primary,
        &secondary,
        &csv_header(cfg),
    )
}
