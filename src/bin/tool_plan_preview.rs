use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::{Arg, Command};

use pricetracker::config::ScheduleConfig;
use pricetracker::schedule::{plan_for_date, seed_for_date};

/// Preview the deterministic daily plans for a range of dates.
/// This is a read-only diagnostic tool. It never fetches prices or touches
/// the CSV store.
fn main() -> Result<()> {
    let matches = Command::new("Plan Preview")
        .about("Print the deterministic run plan for one or more UTC dates")
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("YYYY-MM-DD")
                .help("First date to preview (default: today, UTC)")
                .required(false)
        )
        .arg(
            Arg::new("days")
                .long("days")
                .value_name("N")
                .help("Number of consecutive days to preview")
                .required(false)
                .default_value("1")
        )
        .arg(
            Arg::new("salt")
                .long("salt")
                .value_name("SALT")
                .help("Override the schedule salt")
                .required(false)
                .default_value("crypto-price-tracker-v1")
        )
        .arg(
            Arg::new("min-runs")
                .long("min-runs")
                .value_name("N")
                .help("Lower bound of the run-count range")
                .required(false)
                .default_value("1")
        )
        .arg(
            Arg::new("max-runs")
                .long("max-runs")
                .value_name("N")
                .help("Upper bound of the run-count range")
                .required(false)
                .default_value("5")
        )
        .arg(
            Arg::new("seeds")
                .long("seeds")
                .help("Also print the derived u32 seed per date")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    let start: NaiveDate = match matches.get_one::<String>("date") {
        Some(s) => s.parse()?,
        None => Utc::now().date_naive(),
    };
    let days: u32 = matches.get_one::<String>("days").unwrap().parse()?;
    if days == 0 {
        bail!("--days must be at least 1");
    }
    let show_seeds = matches.get_flag("seeds");

    let cfg = ScheduleConfig {
        salt: matches.get_one::<String>("salt").unwrap().clone(),
        min_runs: matches.get_one::<String>("min-runs").unwrap().parse()?,
        max_runs: matches.get_one::<String>("max-runs").unwrap().parse()?,
    };
    cfg.validate()?;

    println!(
        "Plans for salt {:?}, run range [{}, {}]:",
        cfg.salt, cfg.min_runs, cfg.max_runs
    );

    let mut date = start;
    for _ in 0..days {
        let plan = plan_for_date(date, &cfg);
        if show_seeds {
            println!(
                "{}  seed={:>10}  {} run(s) at {:?}",
                date,
                seed_for_date(&cfg.salt, date),
                plan.runs,
                plan.hours
            );
        } else {
            println!("{}  {} run(s) at {:?}", date, plan.runs, plan.hours);
        }
        date = date
            .succ_opt()
            .ok_or_else(|| anyhow::anyhow!("date range overflow"))?;
    }

    Ok(())
}
