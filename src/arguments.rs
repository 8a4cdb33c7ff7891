//! Centralized argument handling for the price tracker
//!
//! The main binary takes no required arguments (the hourly trigger invokes it
//! bare). Everything here is optional: debug flags, a config path override
//! and the --print-plan diagnostic mode.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
/// Thread-safe singleton so flag checks work from any module
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => {
            // Fallback to env::args if mutex is poisoned
            env::args().collect()
        }
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args()
        .iter()
        .any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

/// Schedule module debug mode (seed, plan derivation details)
pub fn is_debug_schedule_enabled() -> bool {
    has_arg("--debug-schedule")
}

/// API calls debug mode (request URL, response body size)
pub fn is_debug_api_enabled() -> bool {
    has_arg("--debug-api")
}

/// Store module debug mode (row content before append)
pub fn is_debug_store_enabled() -> bool {
    has_arg("--debug-store")
}

// =============================================================================
// MODE FLAGS
// =============================================================================

/// Print today's plan and exit without fetching or writing
pub fn is_print_plan_enabled() -> bool {
    has_arg("--print-plan")
}

/// Config file path override (--config <path>)
pub fn get_config_path_override() -> Option<String> {
    get_arg_value("--config")
}

/// Help requested via -h / --help
pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Prints usage information for the main binary
pub fn print_help() {
    println!("pricetracker - deterministic hourly crypto price logger");
    println!();
    println!("USAGE:");
    println!("  pricetracker [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  --config <path>     Config file path (default: config.json)");
    println!("  --print-plan        Print today's plan and exit");
    println!("  --debug-schedule    Verbose plan derivation logging");
    println!("  --debug-api         Verbose price API logging");
    println!("  --debug-store       Verbose CSV append logging");
    println!("  -h, --help          Show this help");
    println!();
    println!("Exit status is 0 both when a record was written and when the");
    println!("current hour is not in today's plan. Non-zero only on config");
    println!("or store failures.");
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because CMD_ARGS is a process-wide singleton and the test
    // harness runs tests concurrently.
    #[test]
    fn test_cmd_args_roundtrip_and_lookup() {
        set_cmd_args(vec!["pricetracker".to_string(), "--print-plan".to_string()]);
        assert!(has_arg("--print-plan"));
        assert!(!has_arg("--debug-api"));

        set_cmd_args(vec![
            "pricetracker".to_string(),
            "--config".to_string(),
            "/tmp/alt.json".to_string(),
        ]);
        assert_eq!(get_arg_value("--config").as_deref(), Some("/tmp/alt.json"));
        assert_eq!(get_arg_value("--missing"), None);
        assert_eq!(get_config_path_override().as_deref(), Some("/tmp/alt.json"));

        // Trailing flag with no value after it
        set_cmd_args(vec!["pricetracker".to_string(), "--config".to_string()]);
        assert_eq!(get_arg_value("--config"), None);

        set_cmd_args(vec!["pricetracker".to_string()]);
    }
}
