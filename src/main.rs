use chrono::{Timelike, Utc};

use pricetracker::{
    arguments,
    config::{Config, DEFAULT_CONFIG_PATH},
    logger::{self, LogTag},
    prices::PriceFetcher,
    schedule::{plan_for_date, should_run},
    store,
};

/// Main entry point for the price tracker
///
/// Designed to be invoked once per hour by an external trigger with no
/// arguments. Exit status contract:
/// - 0: a record was written, or the current hour is not in today's plan
/// - 1: configuration failure (before any fetch) or store failure
///
/// Upstream price API failures never change the exit status; the fetcher
/// falls back to sentinel prices and the row is written anyway.
#[tokio::main]
async fn main() {
    if arguments::is_help_requested() {
        arguments::print_help();
        std::process::exit(0);
    }

    // Configuration errors are fatal before any fetch is attempted
    let config_path = arguments::get_config_path_override()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            logger::error(LogTag::System, &format!("Failed to load config: {:#}", e));
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        logger::error(LogTag::System, &e.to_string());
        std::process::exit(1);
    }

    let now_utc = Utc::now();
    let plan = plan_for_date(now_utc.date_naive(), &config.schedule);

    logger::info(
        LogTag::Schedule,
        &format!(
            "Plan for {} UTC: {} run(s) at hours {}. Current hour: {:02}",
            now_utc.date_naive(),
            plan.runs,
            plan.hours_display(),
            now_utc.hour()
        ),
    );

    if arguments::is_print_plan_enabled() {
        std::process::exit(0);
    }

    if !should_run(now_utc, Some(&plan), &config.schedule) {
        logger::info(LogTag::Schedule, "This hour is not in the plan. No changes.");
        std::process::exit(0);
    }

    let outcome = PriceFetcher::new(&config).fetch().await;

    match store::record_outcome(&outcome, &config) {
        Ok(()) => {
            logger::success(
                LogTag::Store,
                &format!("Appended record to {}", config.csv_path),
            );
        }
        Err(e) => {
            logger::error(LogTag::Store, &format!("Failed to append record: {}", e));
            std::process::exit(1);
        }
    }
}
