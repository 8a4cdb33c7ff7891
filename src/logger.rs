//! Tagged console logging for the price tracker
//!
//! Colored, timestamped output with one tag per module. Debug lines are
//! gated by per-module `--debug-<module>` flags so the hourly cron output
//! stays short: normally one plan line plus one outcome line.

use chrono::Utc;
use colored::*;
use std::io::{self, Write};

use crate::arguments;

/// Source module of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Schedule,
    Api,
    Store,
}

impl LogTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Schedule => "SCHEDULE",
            LogTag::Api => "API",
            LogTag::Store => "STORE",
        }
    }

    /// Whether --debug-<module> was passed for this tag
    fn debug_enabled(&self) -> bool {
        match self {
            LogTag::Schedule => arguments::is_debug_schedule_enabled(),
            LogTag::Api => arguments::is_debug_api_enabled(),
            LogTag::Store => arguments::is_debug_store_enabled(),
            // No dedicated flag; any debug flag turns system debug on
            LogTag::System => {
                arguments::is_debug_schedule_enabled()
                    || arguments::is_debug_api_enabled()
                    || arguments::is_debug_store_enabled()
            }
        }
    }
}

fn get_timestamp() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

fn write_line(marker: ColoredString, tag: LogTag, message: &str) {
    println!(
        "{} {} {} {}",
        marker,
        tag.as_str().bold(),
        format!("[{}]", get_timestamp()).dimmed(),
        message
    );
    io::stdout().flush().ok();
}

/// Standard operational messages, always shown
pub fn info(tag: LogTag, message: &str) {
    write_line("ℹ".blue().bold(), tag, message);
}

/// Completed-action messages, always shown
pub fn success(tag: LogTag, message: &str) {
    write_line("✅".green().bold(), tag, &message.green().to_string());
}

/// Recoverable problems (fetch fallback), always shown
pub fn warning(tag: LogTag, message: &str) {
    write_line("⚠".yellow().bold(), tag, &message.yellow().to_string());
}

/// Fatal problems (config, store), always shown
pub fn error(tag: LogTag, message: &str) {
    write_line("❌".red().bold(), tag, &message.red().to_string());
}

/// Detailed diagnostics, only with the matching --debug-<module> flag
pub fn debug(tag: LogTag, message: &str) {
    if tag.debug_enabled() {
        write_line("🐛".purple().bold(), tag, &message.dimmed().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names() {
        assert_eq!(LogTag::System.as_str(), "SYSTEM");
        assert_eq!(LogTag::Schedule.as_str(), "SCHEDULE");
        assert_eq!(LogTag::Api.as_str(), "API");
        assert_eq!(LogTag::Store.as_str(), "STORE");
    }
}
