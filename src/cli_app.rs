//! Top-level CLI definition and dispatch.

use std::io;
use std::path::PathBuf;

use chrono::Local;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};

use disk_maintenance_helper::catalog::build_catalog;
use disk_maintenance_helper::cleaner::{CleanReport, Orchestrator};
use disk_maintenance_helper::core::config::{Config, PathsConfig};
use disk_maintenance_helper::core::errors::{DmhError, Result};
use disk_maintenance_helper::history::{CleanStatus, HistoryRecord, HistoryStore};
use disk_maintenance_helper::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};
use disk_maintenance_helper::pkg::manager::PackageManager;
use disk_maintenance_helper::scanner::{ScanResult, scan};
use disk_maintenance_helper::sched::{Scheduler, Trigger};

/// Disk Maintenance Helper — safe disk-space reclamation for Linux desktops.
#[derive(Debug, Parser)]
#[command(
    name = "dmh",
    author,
    version,
    about = "Disk Maintenance Helper - safe disk-space reclamation",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Scan every catalog category for reclaimable space.
    Scan,
    /// Clean categories (user-space ones unless --system is given).
    Clean(CleanArgs),
    /// Evaluate the maintenance policy and run one unattended pass if due.
    Auto(AutoArgs),
    /// Show past cleaning runs.
    History(HistoryArgs),
    /// Show the active configuration.
    Config,
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct CleanArgs {
    /// Category labels to clean. Empty means every eligible category.
    #[arg(value_name = "LABEL")]
    labels: Vec<String>,
    /// Include privileged system categories in the selection.
    #[arg(long)]
    system: bool,
    /// Confirm cleaning system categories without prompting.
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Debug, Clone, Args, Default)]
struct AutoArgs {
    /// Treat this tick as a disk-pressure evaluation.
    #[arg(long)]
    disk_check: bool,
}

#[derive(Debug, Clone, Args)]
struct HistoryArgs {
    /// Maximum records to show.
    #[arg(long, default_value_t = 10, value_name = "N")]
    limit: usize,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: CompletionShell,
}

/// Dispatch a parsed command line.
pub fn run(cli: &Cli) -> Result<()> {
    if cli.no_color {
        control::set_override(false);
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathsConfig::default().config_file);
    let config = Config::load(&config_path)?;
    let mut activity = JsonlWriter::new(&config.paths.activity_log);

    match &cli.command {
        Command::Scan => cmd_scan(cli, &mut activity),
        Command::Clean(args) => cmd_clean(cli, &config, args, &mut activity),
        Command::Auto(args) => cmd_auto(cli, config, &config_path, args, &mut activity),
        Command::History(args) => cmd_history(cli, &config, args),
        Command::Config => cmd_config(cli, &config),
        Command::Completions(args) => {
            generate(args.shell, &mut Cli::command(), "dmh", &mut io::stdout());
            Ok(())
        }
    }
}

// ──────────────────── scan ────────────────────

fn cmd_scan(cli: &Cli, activity: &mut JsonlWriter) -> Result<()> {
    let manager = PackageManager::detect();
    let catalog = build_catalog(manager);
    let results = scan(&catalog);

    let mut entry = LogEntry::new(EventType::ScanCompleted, Severity::Info);
    entry.details = Some(format!("{} candidates, manager {manager}", results.len()));
    activity.append(&entry);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("Nothing to clean: every candidate location is empty.");
        return Ok(());
    }

    println!("{:<18} {:>11}  {:<6}  PATH", "CATEGORY", "SIZE", "SCOPE");
    for item in &results {
        let scope = if item.is_system {
            "system".red()
        } else {
            "user".green()
        };
        println!(
            "{:<18} {:>11}  {:<6}  {}",
            item.label,
            item.size_display,
            scope,
            item.path.display()
        );
    }
    Ok(())
}

// ──────────────────── clean ────────────────────

fn cmd_clean(
    cli: &Cli,
    config: &Config,
    args: &CleanArgs,
    activity: &mut JsonlWriter,
) -> Result<()> {
    let manager = PackageManager::detect();
    let catalog = build_catalog(manager);
    let results = scan(&catalog);
    let selection = select_items(&results, &args.labels, args.system);

    if selection.is_empty() {
        println!("Nothing selected to clean.");
        return Ok(());
    }
    if selection.iter().any(|item| item.is_system) && !args.yes {
        return Err(DmhError::Runtime {
            details: "cleaning system categories needs --yes (privileged commands will run)"
                .to_string(),
        });
    }

    let orchestrator = Orchestrator::new(manager);
    let report = orchestrator.clean(&selection);
    log_report(&report, activity);

    let history = HistoryStore::new(&config.paths.history_file);
    let cleaned: Vec<String> = report
        .outcomes
        .iter()
        .filter(|o| o.succeeded)
        .map(|o| o.label.to_string())
        .collect();
    history.append(HistoryRecord {
        timestamp: Local::now(),
        categories: cleaned,
        freed_display: disk_maintenance_helper::catalog::sizing::format_size(report.bytes_freed),
        status: CleanStatus::from_counts(report.succeeded, report.failed),
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let freed = disk_maintenance_helper::catalog::sizing::format_size(report.bytes_freed);
    if report.is_full_success() {
        println!(
            "{} {} categories cleaned, {} freed",
            "ok:".green(),
            report.succeeded,
            freed
        );
    } else {
        println!(
            "{} {} cleaned ({} freed), {} failed",
            "partial:".yellow(),
            report.succeeded,
            freed,
            report.failed
        );
        for error in &report.errors {
            eprintln!("  {} {error}", "error:".red());
        }
    }
    Ok(())
}

/// Pick the items to clean. With no labels, every user-space candidate is
/// selected, plus system candidates when `include_system` is set. With
/// labels, only matching candidates are selected (still honoring
/// `include_system` for system ones).
fn select_items(
    results: &[ScanResult],
    labels: &[String],
    include_system: bool,
) -> Vec<ScanResult> {
    results
        .iter()
        .filter(|item| include_system || !item.is_system)
        .filter(|item| {
            labels.is_empty()
                || labels
                    .iter()
                    .any(|label| label.eq_ignore_ascii_case(item.label))
        })
        .cloned()
        .collect()
}

fn log_report(report: &CleanReport, activity: &mut JsonlWriter) {
    for outcome in &report.outcomes {
        let mut entry = if outcome.succeeded {
            LogEntry::new(EventType::ItemCleaned, Severity::Info)
        } else {
            LogEntry::new(EventType::ItemCleanFailed, Severity::Warning)
        };
        entry.label = Some(outcome.label.to_string());
        entry.path = Some(outcome.path.display().to_string());
        entry.error_code.clone_from(&outcome.error_code);
        entry.error_message.clone_from(&outcome.error_message);
        activity.append(&entry);
    }
}

// ──────────────────── auto ────────────────────

fn cmd_auto(
    cli: &Cli,
    mut config: Config,
    config_path: &std::path::Path,
    args: &AutoArgs,
    activity: &mut JsonlWriter,
) -> Result<()> {
    let trigger = if args.disk_check {
        Trigger::DiskPressure
    } else {
        Trigger::Interval
    };

    let scheduler = Scheduler::new();
    if !scheduler.may_run_now(&config.maintenance, trigger) {
        if !cli.json {
            println!("Maintenance is not due.");
        }
        return Ok(());
    }

    let manager = PackageManager::detect();
    let catalog = build_catalog(manager);
    let orchestrator = Orchestrator::new(manager);

    let Some(summary) = scheduler.run_once(&catalog, &orchestrator) else {
        if !cli.json {
            println!("Maintenance ran: nothing to do.");
        }
        return Ok(());
    };

    let mut entry = LogEntry::new(EventType::MaintenanceRun, Severity::Info);
    entry.freed_bytes = Some(summary.bytes_freed);
    entry.succeeded = Some(summary.report.succeeded);
    entry.failed = Some(summary.report.failed);
    activity.append(&entry);

    let history = HistoryStore::new(&config.paths.history_file);
    history.append(HistoryRecord {
        timestamp: summary.timestamp,
        categories: summary.categories.iter().map(ToString::to_string).collect(),
        freed_display: summary.freed_display.clone(),
        status: CleanStatus::from_counts(summary.report.succeeded, summary.report.failed),
    })?;

    // Both interval- and pressure-triggered runs reset the same clock.
    config.maintenance.last_run = Some(summary.timestamp);
    config.save(config_path)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} unattended maintenance freed {} across {} categories",
            "ok:".green(),
            summary.freed_display,
            summary.categories.len()
        );
    }
    Ok(())
}

// ──────────────────── history / config ────────────────────

fn cmd_history(cli: &Cli, config: &Config, args: &HistoryArgs) -> Result<()> {
    let records = HistoryStore::new(&config.paths.history_file).load();
    let shown: Vec<_> = records.into_iter().take(args.limit).collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }
    if shown.is_empty() {
        println!("No cleaning history yet.");
        return Ok(());
    }
    for record in &shown {
        println!(
            "{}  {:<8} {:>11}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.status.to_string(),
            record.freed_display,
            record.categories.join(", ")
        );
    }
    Ok(())
}

fn cmd_config(cli: &Cli, config: &Config) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        let rendered = toml::to_string_pretty(config).map_err(|err| DmhError::Serialization {
            context: "toml",
            details: err.to_string(),
        })?;
        print!("{rendered}");
    }
    Ok(())
}
