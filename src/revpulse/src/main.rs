//! RevPulse — small-business performance dashboard computations.
//!
//! Loads an account dataset from a JSON file, runs the aggregation engine,
//! and prints the resulting dashboard snapshot as JSON. All formatting of
//! money and percentages for humans happens downstream of this output.

use std::path::PathBuf;

use chrono::{Datelike, Utc};
use clap::Parser;
use revpulse_core::types::AccountData;
use revpulse_core::{AppConfig, MonthIndex};
use revpulse_engine::{build_snapshot, RangeSelector};
use revpulse_store::AccountStore;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "revpulse")]
#[command(about = "Aggregates business activity records into dashboard metrics")]
#[command(version)]
struct Cli {
    /// Path to a JSON account dataset
    #[arg(long, env = "REVPULSE__DATA")]
    data: PathBuf,

    /// Range key, e.g. current_year, past_6_months, year:2023, all_time
    #[arg(long)]
    range: Option<String>,

    /// Forecast horizon in months (overrides config)
    #[arg(long)]
    horizon: Option<u32>,

    /// Annual revenue goal in minor currency units (overrides config)
    #[arg(long)]
    goal: Option<i64>,

    /// Anchor month as YYYY-MM; defaults to the current calendar month
    #[arg(long)]
    now: Option<String>,

    /// Pretty-print the snapshot JSON
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revpulse=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(horizon) = cli.horizon {
        config.forecast.horizon_months = horizon;
    }
    if let Some(goal) = cli.goal {
        config.goal.annual_revenue_target = goal;
    }

    let raw = std::fs::read_to_string(&cli.data)?;
    let dataset: AccountData = serde_json::from_str(&raw)?;

    let store = AccountStore::new();
    let account = store.create_account();
    store.insert_account(account, dataset);
    let data = store.account(&account)?;

    info!(
        account = %account,
        funnel_records = data.funnel_records.len(),
        bookings = data.bookings.len(),
        payments = data.payments.len(),
        "Dataset loaded"
    );

    let now = match cli.now.as_deref() {
        Some(raw) => parse_month(raw)
            .ok_or_else(|| anyhow::anyhow!("invalid --now value {raw:?}, expected YYYY-MM"))?,
        None => {
            let today = Utc::now().date_naive();
            MonthIndex::from_ym(today.year(), today.month())
        }
    };

    let key = cli.range.unwrap_or_else(|| config.default_range.clone());
    let selector = RangeSelector::parse(&key);
    info!(range = ?selector, "Building snapshot");

    let snapshot = build_snapshot(&data, &selector, now, &config);

    let output = if cli.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{output}");

    Ok(())
}

fn parse_month(raw: &str) -> Option<MonthIndex> {
    let (year, month) = raw.split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    (1..=12).contains(&month).then(|| MonthIndex::from_ym(year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-03"), Some(MonthIndex::from_ym(2025, 3)));
        assert_eq!(parse_month("2025-13"), None);
        assert_eq!(parse_month("march"), None);
    }
}
