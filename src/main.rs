use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use together_time::{
    Clock, MockClock, ScheduleEngine, StatusCard, StatusMonitor, SystemClock, TodayAgenda,
    config::AppConfig,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "together-time")]
#[command(about = "When are we both free? Shared free-time status from our weekly schedule")]
struct Args {
    /// Load this config file instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluate at a fixed local time ("YYYY-MM-DD HH:MM") instead of now
    #[arg(long, global = true, value_parser = parse_local_time)]
    at: Option<NaiveDateTime>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default)]
enum Command {
    /// Show the current free-time card
    #[default]
    Status,
    /// List today's slots, marking the active one
    Today,
    /// List the whole weekly schedule
    Week,
    /// Re-check on the configured interval and print every status change
    Watch,
}

fn parse_local_time(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {}", e))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (stderr, so stdout stays clean for --json)
    let directives =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "together_time=info".to_string());
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
        .parse_lossy(directives);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    let engine = Arc::new(config.schedule.build_engine()?);
    tracing::debug!(
        "Schedule ready: {} days, day-over rule {:?}",
        engine.schedule().iter().count(),
        engine.day_over_rule()
    );

    let clock: Arc<dyn Clock> = match args.at {
        Some(at) => Arc::new(MockClock::new(at)),
        None => Arc::new(SystemClock),
    };

    match args.command.unwrap_or_default() {
        Command::Status => print_status(&engine, clock.as_ref(), &config, args.json),
        Command::Today => print_today(&engine, clock.as_ref(), args.json),
        Command::Week => print_week(&engine, args.json),
        Command::Watch => run_watch(engine, clock, &config, args.json),
    }
}

fn print_status(
    engine: &ScheduleEngine,
    clock: &dyn Clock,
    config: &AppConfig,
    json: bool,
) -> Result<()> {
    let now = clock.now_local();
    let status = engine.current_status(&now);

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!(
            "{}",
            StatusCard::new(&status, now.date(), &config.display.date_format)
        );
    }
    Ok(())
}

fn print_today(engine: &ScheduleEngine, clock: &dyn Clock, json: bool) -> Result<()> {
    let agenda = TodayAgenda::new(engine, &clock.now_local());

    if json {
        println!("{}", serde_json::to_string_pretty(&agenda)?);
    } else {
        print!("{}", agenda);
    }
    Ok(())
}

fn print_week(engine: &ScheduleEngine, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(engine.schedule())?);
        return Ok(());
    }

    // Monday first
    for number in [2u8, 3, 4, 5, 6, 7, 1] {
        let Some(day) = engine.schedule().day(number) else {
            continue;
        };
        println!("{}", day.day_name);
        if day.slots.is_empty() {
            println!("   (no free time)");
        }
        for slot in &day.slots {
            println!("   {}", slot);
        }
    }
    Ok(())
}

/// Poll the engine until Ctrl-C, printing each status change.
fn run_watch(
    engine: Arc<ScheduleEngine>,
    clock: Arc<dyn Clock>,
    config: &AppConfig,
    json: bool,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let interval_secs = config.refresh.poll_interval_secs;
    let date_format = config.display.date_format.clone();

    rt.block_on(async move {
        tracing::info!("Watching free-time status every {} seconds", interval_secs);

        let mut monitor = StatusMonitor::new(engine, clock.clone());
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut shutdown => {
                    tracing::info!("Stopping watch");
                    return Ok::<(), anyhow::Error>(());
                }
            }

            let update = monitor.refresh();
            if !update.changed {
                continue;
            }

            if json {
                println!("{}", serde_json::to_string(&update.status)?);
            } else {
                let today = clock.now_local().date();
                println!("{}", StatusCard::new(&update.status, today, &date_format));
            }
        }
    })
}
