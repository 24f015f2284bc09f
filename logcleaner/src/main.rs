//! # logcleaner
//!
//! A CLI tool for stripping debugging statements from source files and pruning
//! old entries from log files.
//!
//! ## Overview
//!
//! logcleaner is built on top of logcleanerlib and provides a command-line
//! interface for cleaning JavaScript, TypeScript and Python sources of their
//! `console.*`, `logging` and `logger` statements, and for keeping log files
//! from growing without bound.
//!
//! ## Features
//!
//! - **Statement stripping**: `console.log` and friends, `import logging`,
//!   `logger.info(...)` and the like
//! - **Backups**: modified files are copied to `lc-cleaned-assets/backups/`
//! - **Log pruning**: drop log lines older than a date or an age
//! - **Scheduling**: install a daily prune job in the user's crontab
//! - **Multiple output formats**: Text (default), JSON
//!
//! ## Usage
//!
//! ```bash
//! # Strip statements from every supported file below the current directory
//! logcleaner strip
//!
//! # Only TypeScript, with backups, skipping vendored code
//! logcleaner strip ./web --ext .ts,.tsx --exclude "**/vendor/**" --backup
//!
//! # Specific files, without touching them
//! logcleaner strip src/app.js tools/run.py --dry-run
//!
//! # Drop log entries older than two weeks
//! logcleaner prune /var/log/myapp --older-than 2w
//!
//! # Run that every night at 02:30
//! logcleaner schedule add /var/log/myapp --hour 2 --minute 30
//! ```

mod render;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use logcleanerlib::assets::session_stamp_now;
use logcleanerlib::source::SUPPORTED_EXTENSIONS;
use logcleanerlib::{
    clean, find_log_files, prune, AssetsLayout, CleanOptions, CrontabStore, Cutoff, FileCategory,
    FileCrontab, FilterConfig, PruneOptions, Scheduler, SourceSelection, Summary, SystemCrontab,
};
use serde_json::json;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Copy)]
struct Globals {
    json: bool,
    verbose: bool,
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("logcleaner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Remove debugging statements from source files and prune old log entries")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .global(true)
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Show debug logging on stderr (RUST_LOG overrides)"),
        )
        .subcommand(
            Command::new("strip")
                .about("Remove logging and console statements from source files")
                .after_help(supported_types())
                .arg(
                    Arg::new("paths")
                        .action(ArgAction::Append)
                        .help("A directory to scan, or the files to clean (defaults to .)"),
                )
                .arg(
                    Arg::new("ext")
                        .long("ext")
                        .value_delimiter(',')
                        .help("Extensions to clean in a directory (comma-separated: .js,.py)"),
                )
                .arg(
                    Arg::new("include")
                        .short('i')
                        .long("include")
                        .action(ArgAction::Append)
                        .help("Include files matching glob pattern"),
                )
                .arg(
                    Arg::new("exclude")
                        .short('e')
                        .long("exclude")
                        .action(ArgAction::Append)
                        .help("Exclude files matching glob pattern"),
                )
                .arg(
                    Arg::new("backup")
                        .short('b')
                        .long("backup")
                        .action(ArgAction::SetTrue)
                        .help("Back up modified files and write a session log"),
                )
                .arg(
                    Arg::new("dry-run")
                        .short('n')
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Report what would be removed without changing files"),
                ),
        )
        .subcommand(
            Command::new("prune")
                .about("Remove log entries older than a cutoff")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .help("A log file, or a directory to search for log files"),
                )
                .arg(
                    Arg::new("before")
                        .long("before")
                        .conflicts_with("older-than")
                        .help("Drop entries before this date (YYYY-MM-DD)"),
                )
                .arg(
                    Arg::new("older-than")
                        .long("older-than")
                        .help("Drop entries older than this age: 48h, 15d, 2w, 3m (default 30d)"),
                )
                .arg(
                    Arg::new("dry-run")
                        .short('n')
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Report what would be removed without changing files"),
                ),
        )
        .subcommand(
            Command::new("schedule")
                .about("Manage daily log pruning jobs in the crontab")
                .subcommand_required(true)
                .arg(
                    Arg::new("crontab-file")
                        .long("crontab-file")
                        .global(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Edit this crontab file instead of the user's crontab"),
                )
                .subcommand(
                    Command::new("add")
                        .about("Add a daily prune job for a log directory")
                        .arg(
                            Arg::new("dir")
                                .required(true)
                                .help("Directory whose log files are pruned"),
                        )
                        .arg(
                            Arg::new("hour")
                                .long("hour")
                                .value_parser(value_parser!(u32))
                                .default_value("0")
                                .help("Hour of day (0-23)"),
                        )
                        .arg(
                            Arg::new("minute")
                                .long("minute")
                                .value_parser(value_parser!(u32))
                                .default_value("0")
                                .help("Minute of hour (0-59)"),
                        ),
                )
                .subcommand(Command::new("list").about("List scheduled prune jobs"))
                .subcommand(
                    Command::new("remove")
                        .about("Remove a scheduled prune job")
                        .arg(
                            Arg::new("comment")
                                .required_unless_present("all")
                                .help("Comment identifying the job (see `schedule list`)"),
                        )
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("comment")
                                .help("Remove every prune job"),
                        ),
                ),
        )
}

/// Install the tracing subscriber.
///
/// Diagnostics go to stderr, filtered by `RUST_LOG` or `-v`. A session log,
/// when given, receives every `info` event without ANSI styling.
fn init_tracing(verbose: bool, session_log: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "logcleaner=debug,logcleanerlib=debug"
        } else {
            "warn"
        })
    });
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let file_layer = match session_log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create session log {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::INFO),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("cannot install the tracing subscriber")?;
    Ok(())
}

/// Supported extensions with their descriptions, one per line.
fn supported_types() -> String {
    let mut text = String::from("Supported file types:");
    for (ext, desc) in SUPPORTED_EXTENSIONS {
        text.push_str(&format!("\n  {ext:<5} {desc}"));
    }
    text
}

/// Build filter config from matches
fn build_filter(matches: &ArgMatches) -> anyhow::Result<FilterConfig> {
    let mut filter = FilterConfig::new();

    if let Some(exts) = matches.get_many::<String>("ext") {
        for ext in exts {
            if !FileCategory::from_extension(ext).is_supported() {
                bail!("unsupported extension '{ext}'\n\n{}", supported_types());
            }
            filter = filter.extension(ext);
        }
    }

    if let Some(includes) = matches.get_many::<String>("include") {
        for pattern in includes {
            filter = filter.include(pattern)?;
        }
    }

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            filter = filter.exclude(pattern)?;
        }
    }

    Ok(filter)
}

/// Resolve the positional paths into a selection.
///
/// A single directory selects directory mode; anything else is a file list.
fn build_selection(
    matches: &ArgMatches,
    globals: Globals,
) -> anyhow::Result<(SourceSelection, Vec<logcleanerlib::RejectedFile>)> {
    let paths: Vec<PathBuf> = matches
        .get_many::<String>("paths")
        .map(|v| v.map(PathBuf::from).collect())
        .unwrap_or_else(|| vec![PathBuf::from(".")]);

    if let [only] = paths.as_slice() {
        if only.is_dir() {
            return Ok((SourceSelection::directory(only)?, Vec::new()));
        }
    }

    let (selection, rejected) = SourceSelection::files(&paths);
    if !globals.json {
        for file in &rejected {
            eprintln!("{}", render::rejected_line(file));
        }
    }
    if selection.is_empty() {
        bail!("no valid files to process");
    }
    Ok((selection, rejected))
}

/// Handler for strip command
fn strip_handler(matches: &ArgMatches, globals: Globals) -> anyhow::Result<()> {
    let (selection, rejected) = build_selection(matches, globals)?;
    let filter = build_filter(matches)?;
    let backup = matches.get_flag("backup");
    let dry_run = matches.get_flag("dry-run");
    let stamp = session_stamp_now();

    let session_log = if backup && !dry_run {
        let layout = AssetsLayout::new(selection.base_dir());
        Some(layout.prepare_session_log(&stamp)?)
    } else {
        None
    };
    init_tracing(globals.verbose, session_log.as_deref())?;

    if let SourceSelection::Directory(dir) = &selection {
        tracing::info!(dir = %dir.display(), "starting cleanup");
    }

    let options = CleanOptions::new()
        .filter(filter)
        .backup(backup)
        .dry_run(dry_run)
        .stamp(stamp);
    let report = clean(&selection, options)?;
    let summary = Summary::from_clean(&report, &selection);

    if globals.json {
        let value = json!({
            "report": report,
            "rejected": rejected,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print!("{}", render::clean_files(&report));
    print!("{}", render::summary(&summary));
    println!("{}", render::clean_outcome(&report));
    Ok(())
}

/// Handler for prune command
fn prune_handler(matches: &ArgMatches, globals: Globals) -> anyhow::Result<()> {
    init_tracing(globals.verbose, None)?;

    let path = matches
        .get_one::<String>("path")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("a log path is required"))?;
    let cutoff = Cutoff::from_args(
        matches.get_one::<String>("before").map(String::as_str),
        matches.get_one::<String>("older-than").map(String::as_str),
    )?
    .resolve();

    let files = if path.is_file() {
        vec![path]
    } else {
        find_log_files(&path)?
    };
    tracing::info!(count = files.len(), %cutoff, "pruning log files");

    let options = PruneOptions::new().dry_run(matches.get_flag("dry-run"));
    let report = prune(&files, cutoff, options);
    let summary = Summary::from_prune(&report);

    if globals.json {
        let value = json!({ "report": report, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if files.is_empty() {
        println!("{}", render::note("No log files found"));
        return Ok(());
    }

    print!("{}", render::prune_files(&report));
    print!("{}", render::summary(&summary));
    Ok(())
}

/// Handler for schedule command
fn schedule_handler(matches: &ArgMatches, globals: Globals) -> anyhow::Result<()> {
    init_tracing(globals.verbose, None)?;

    match matches.get_one::<PathBuf>("crontab-file") {
        Some(path) => run_schedule(Scheduler::new(FileCrontab::new(path)), matches, globals),
        None => run_schedule(Scheduler::new(SystemCrontab), matches, globals),
    }
}

fn run_schedule<S: CrontabStore>(
    mut scheduler: Scheduler<S>,
    matches: &ArgMatches,
    globals: Globals,
) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("add", sub)) => {
            let dir = sub
                .get_one::<String>("dir")
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("a log directory is required"))?;
            if !dir.is_dir() {
                bail!("not a directory: {}", dir.display());
            }
            let dir = dir.canonicalize()?;
            let hour = sub.get_one::<u32>("hour").copied().unwrap_or(0);
            let minute = sub.get_one::<u32>("minute").copied().unwrap_or(0);
            let exe = std::env::current_exe().context("cannot locate the logcleaner executable")?;

            let job = scheduler.add_job(&exe, &dir, hour, minute)?;
            if globals.json {
                println!("{}", serde_json::to_string_pretty(&job)?);
            } else {
                println!("{}", render::success(&format!("Scheduled {}", job.comment)));
                print!("{}", render::jobs(std::slice::from_ref(&job)));
            }
        }
        Some(("list", _)) => {
            let jobs = scheduler.jobs()?;
            if globals.json {
                println!("{}", serde_json::to_string_pretty(&jobs)?);
            } else if jobs.is_empty() {
                println!("{}", render::note("No scheduled prune jobs"));
            } else {
                print!("{}", render::jobs(&jobs));
            }
        }
        Some(("remove", sub)) => {
            let removed = if sub.get_flag("all") {
                scheduler.remove_all()?
            } else {
                let comment = sub
                    .get_one::<String>("comment")
                    .ok_or_else(|| anyhow!("a job comment or --all is required"))?;
                if !scheduler.remove_job(comment)? {
                    bail!("no scheduled job with comment '{comment}'");
                }
                1
            };
            if globals.json {
                println!("{}", json!({ "removed": removed }));
            } else {
                println!("{}", render::success(&format!("Removed {removed} job(s)")));
            }
        }
        _ => bail!("unknown schedule command"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    let globals = Globals {
        json: matches
            .get_one::<String>("output")
            .is_some_and(|s| s == "json"),
        verbose: matches.get_flag("verbose"),
    };

    let result = match matches.subcommand() {
        Some(("strip", sub)) => strip_handler(sub, globals),
        Some(("prune", sub)) => prune_handler(sub, globals),
        Some(("schedule", sub)) => schedule_handler(sub, globals),
        _ => Err(anyhow!("unknown command")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
