use chrono::{DateTime, FixedOffset, Local};
use clap::{Parser, Subcommand};
use nada_core::calendar::format_countdown;
use nada_core::refresh::{next_refresh_at, time_until_refresh};
use nada_core::*;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "nada")]
#[command(about = "A log for days spent doing nothing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat this RFC 3339 instant as the current time
    #[arg(long, global = true, hide = true, value_parser = parse_now)]
    now: Option<DateTime<FixedOffset>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mark today as a day of doing nothing
    Mark {
        /// Optional note to keep with the mark
        #[arg(long)]
        note: Option<String>,
    },

    /// Show current and longest streak (default)
    Status,

    /// Show entry counts per week or month
    History {
        /// Bucket size (weekly, monthly)
        #[arg(long, default_value = "weekly", value_parser = parse_granularity)]
        granularity: Granularity,
    },

    /// List all entries, newest first
    List,

    /// Delete an entry by id
    Delete {
        /// Entry id as shown by `list`
        id: String,
    },

    /// Export entries (or history buckets) to CSV
    Export {
        /// Destination CSV file
        #[arg(long)]
        output: PathBuf,

        /// Export buckets of this size instead of raw entries
        #[arg(long, value_parser = parse_granularity)]
        buckets: Option<Granularity>,
    },

    /// Fill the log with a 30-day sample streak
    Seed {
        /// Replace existing entries
        #[arg(long)]
        force: bool,
    },

    /// Recompute and print statistics at every local midnight
    Watch {
        /// Stop after this many refreshes
        #[arg(long)]
        cycles: Option<u32>,
    },
}

fn parse_now(s: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("invalid RFC 3339 time: {}", e))
}

fn parse_granularity(s: &str) -> std::result::Result<Granularity, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn main() -> Result<()> {
    // Initialize logging
    nada_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store = JsonlStore::in_dir(&data_dir);
    let fixed_now = cli.now.map(|t| t.with_timezone(&Local));
    let now = fixed_now.unwrap_or_else(Local::now);

    tracing::debug!("Using store {:?} at {}", store.path(), now);

    match cli.command {
        Some(Commands::Mark { note }) => cmd_mark(store, note, &now, &config),
        Some(Commands::Status) | None => cmd_status(&store, &now, &config),
        Some(Commands::History { granularity }) => cmd_history(&store, granularity, &now, &config),
        Some(Commands::List) => cmd_list(&store),
        Some(Commands::Delete { id }) => cmd_delete(&store, &id),
        Some(Commands::Export { output, buckets }) => {
            cmd_export(&store, &output, buckets, &config)
        }
        Some(Commands::Seed { force }) => cmd_seed(&store, force, &now),
        Some(Commands::Watch { cycles }) => cmd_watch(&store, cycles, fixed_now, &config),
    }
}

fn cmd_mark(
    mut store: JsonlStore,
    note: Option<String>,
    now: &DateTime<Local>,
    config: &Config,
) -> Result<()> {
    let log = store.load()?;
    if !can_mark_today(&log, now) {
        println!("Already marked today. Come back tomorrow!");
        return Ok(());
    }

    let note = note.filter(|n| !n.trim().is_empty());
    let entry = Entry::new(now.with_timezone(&chrono::Utc), note);
    store.append(&entry)?;

    let log = store.load()?;
    let result = config.streak_calculator().calculate(&log, now);

    println!("✓ Marked today as done nothing");
    print_streaks(&result);

    if let Some(achievement) = Achievement::check(&result) {
        println!();
        println!("🎉 Achievement unlocked! {}", achievement.message());
    }

    Ok(())
}

fn cmd_status(store: &JsonlStore, now: &DateTime<Local>, config: &Config) -> Result<()> {
    let snapshot = recompute(
        store,
        &config.streak_calculator(),
        &config.history_aggregator(),
        now,
    )?;
    print_snapshot(&snapshot, now);
    Ok(())
}

fn cmd_history(
    store: &JsonlStore,
    granularity: Granularity,
    now: &DateTime<Local>,
    config: &Config,
) -> Result<()> {
    let log = store.load()?;
    if log.is_empty() {
        println!("No history yet. Start marking your nothing-doing days!");
        return Ok(());
    }

    let aggregator = config.history_aggregator();
    let buckets = aggregator.aggregate(&log, granularity, &Local);
    let summary = aggregator.summary(&log, now);

    match granularity {
        Granularity::Weekly => println!(
            "Weekly activity (last {} weeks, weeks start {})",
            config.history.weekly_limit,
            aggregator.first_weekday()
        ),
        Granularity::Monthly => println!("Monthly overview"),
    }
    println!();

    for bucket in &buckets {
        println!(
            "  {}  {:>3}  {}",
            bucket.start.with_timezone(&Local).date_naive(),
            bucket.count,
            "#".repeat(bucket.count)
        );
    }

    println!();
    println!("Total days: {}", summary.total_entries);
    println!("This month: {}", summary.this_month);
    Ok(())
}

fn cmd_list(store: &JsonlStore) -> Result<()> {
    let log = store.load()?;
    if log.is_empty() {
        println!("No history yet. Start marking your nothing-doing days!");
        return Ok(());
    }

    for entry in log.entries() {
        let date = entry
            .timestamp
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "(no date)".into());
        match &entry.note {
            Some(note) => println!("{}  {}  {}", entry.id, date, note),
            None => println!("{}  {}", entry.id, date),
        }
    }
    Ok(())
}

fn cmd_delete(store: &JsonlStore, id: &str) -> Result<()> {
    let id = Uuid::parse_str(id).map_err(|e| Error::Other(format!("Invalid entry id: {}", e)))?;

    if store.delete(id)? {
        println!("✓ Deleted entry {}", id);
        Ok(())
    } else {
        Err(Error::Store(format!("No entry with id {}", id)))
    }
}

fn cmd_export(
    store: &JsonlStore,
    output: &Path,
    buckets: Option<Granularity>,
    config: &Config,
) -> Result<()> {
    let log = store.load()?;

    match buckets {
        Some(granularity) => {
            let rows = config.history_aggregator().aggregate(&log, granularity, &Local);
            let count = nada_core::export::export_buckets(&rows, output)?;
            println!("✓ Exported {} {} buckets to {}", count, granularity, output.display());
        }
        None => {
            let count = nada_core::export::export_entries(&log, output)?;
            println!("✓ Exported {} entries to {}", count, output.display());
        }
    }
    Ok(())
}

fn cmd_seed(store: &JsonlStore, force: bool, now: &DateTime<Local>) -> Result<()> {
    let existing = store.load()?;
    if !existing.is_empty() && !force {
        println!(
            "Store already has {} entries; use --force to replace them.",
            existing.len()
        );
        return Ok(());
    }

    let entries = nada_core::seed::one_month_streak(now.date_naive(), &Local);
    store.replace_all(&entries)?;
    println!("✓ Seeded {} days of doing nothing", entries.len());
    Ok(())
}

/// With `--now` the clock is simulated: each cycle jumps straight to the next
/// midnight instead of sleeping.
fn cmd_watch(
    store: &JsonlStore,
    cycles: Option<u32>,
    fixed_now: Option<DateTime<Local>>,
    config: &Config,
) -> Result<()> {
    let calculator = config.streak_calculator();
    let aggregator = config.history_aggregator();
    let mut simulated = fixed_now;
    let mut done = 0u32;

    loop {
        let now = simulated.unwrap_or_else(Local::now);
        let snapshot = recompute(store, &calculator, &aggregator, &now)?;
        println!(
            "[{}] current={} longest={} this_month={} total={}",
            now.format("%Y-%m-%d %H:%M"),
            snapshot.streaks.current,
            snapshot.streaks.longest,
            snapshot.summary.this_month,
            snapshot.summary.total_entries
        );

        done += 1;
        if cycles.is_some_and(|limit| done >= limit) {
            return Ok(());
        }

        match simulated {
            Some(_) => simulated = Some(next_refresh_at(&now).with_timezone(&Local)),
            None => {
                let wait = time_until_refresh(&now).to_std().unwrap_or_default();
                tracing::debug!("Sleeping {:?} until the next day boundary", wait);
                std::thread::sleep(wait);
            }
        }
    }
}

fn print_streaks(result: &StreakResult) {
    println!("  Current streak: {} day(s)", result.current);
    println!("  Longest streak: {} day(s)", result.longest);
}

fn print_snapshot(snapshot: &Snapshot, now: &DateTime<Local>) {
    println!("Nothing to Do");
    println!();
    print_streaks(&snapshot.streaks);
    println!("  {}", StreakTier::for_streak(snapshot.streaks.current).message());
    println!();
    if snapshot.can_mark_today {
        println!("Today is not marked yet. Run `nada mark` to mark it.");
    } else {
        println!("Already marked today.");
    }
    println!("Next day starts in {}", format_countdown(time_until_refresh(now)));
}
