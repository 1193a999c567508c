// crates/launch-ledger-cli/src/main.rs
// ============================================================================
// Module: Launch Ledger CLI Entry Point
// Description: Command dispatcher for ingestion, scheduling, and queries.
// Purpose: Bootstrap the store, source, and event sink from config.
// Dependencies: clap, launch-ledger-config, launch-ledger-core,
//               launch-ledger-source, launch-ledger-store-sqlite, tokio
// ============================================================================

//! ## Overview
//! The `launch-ledger` binary owns the process lifecycle: it loads
//! configuration, opens the `SQLite` store, selects the event sink, and then
//! runs one ingestion, a scheduled ingestion loop, or a single query. Results
//! are written to stdout as JSON; failures go to stderr with a non-zero exit.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::ArgGroup;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use launch_ledger_config::LedgerConfig;
use launch_ledger_config::LogSink;
use launch_ledger_config::LoggingConfig;
use launch_ledger_config::validate_interval_secs;
use launch_ledger_core::FileEventSink;
use launch_ledger_core::FilterCriteria;
use launch_ledger_core::IngestError;
use launch_ledger_core::IngestionPipeline;
use launch_ledger_core::IngestionSummary;
use launch_ledger_core::LaunchId;
use launch_ledger_core::LaunchSource;
use launch_ledger_core::LaunchStatus;
use launch_ledger_core::LedgerEventSink;
use launch_ledger_core::NoopEventSink;
use launch_ledger_core::PaginationCursor;
use launch_ledger_core::QueryError;
use launch_ledger_core::QueryService;
use launch_ledger_core::StderrEventSink;
use launch_ledger_core::core::time::now_rfc3339;
use launch_ledger_source::FileLaunchSource;
use launch_ledger_source::HttpLaunchSource;
use launch_ledger_store_sqlite::SqliteLaunchStore;
use serde::Serialize;
use thiserror::Error;
use tokio::time::MissedTickBehavior;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code for a `launches get` miss.
const EXIT_NOT_FOUND: u8 = 2;
/// Envelope message for a completed ingestion run.
const INGEST_OK_MESSAGE: &str = "Launch data processed successfully";
/// Envelope message for a failed ingestion run.
const INGEST_FAILED_MESSAGE: &str = "Failed to process launch data";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "launch-ledger", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (overrides `LAUNCH_LEDGER_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one ingestion.
    Ingest(IngestCommand),
    /// Run ingestion on a fixed interval until interrupted.
    Schedule(ScheduleCommand),
    /// Query stored launches.
    Launches {
        /// Selected query subcommand.
        #[command(subcommand)]
        command: LaunchesCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `ingest`.
#[derive(Args, Debug)]
struct IngestCommand {
    /// Replay a saved upstream response instead of calling the upstream.
    #[arg(long, value_name = "PATH")]
    from_file: Option<PathBuf>,
}

/// Arguments for `schedule`.
#[derive(Args, Debug)]
struct ScheduleCommand {
    /// Seconds between runs (overrides `schedule.interval_secs`).
    #[arg(long, value_name = "SECS")]
    interval_secs: Option<u64>,
    /// Stop after this many runs.
    #[arg(long, value_name = "N")]
    max_runs: Option<u64>,
}

/// Query subcommands.
#[derive(Subcommand, Debug)]
enum LaunchesCommand {
    /// List one page of launches in key order.
    List(ListCommand),
    /// Fetch one launch by id.
    Get(GetCommand),
    /// Filter launches by status or rocket.
    Filter(FilterCommand),
    /// List upcoming launches.
    Upcoming(LimitArgs),
    /// Search mission names.
    Search(SearchCommand),
    /// List the most recent launches.
    Recent(LimitArgs),
    /// Aggregate statistics over a bounded sample.
    Stats,
}

/// Shared `--limit` argument.
#[derive(Args, Debug)]
struct LimitArgs {
    /// Maximum items to return.
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

/// Arguments for `launches list`.
#[derive(Args, Debug)]
struct ListCommand {
    /// Page size.
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
    /// Continuation cursor from a previous page.
    #[arg(long, value_name = "CURSOR")]
    cursor: Option<String>,
}

/// Arguments for `launches get`.
#[derive(Args, Debug)]
struct GetCommand {
    /// Launch identifier.
    id: String,
}

/// Arguments for `launches filter`.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("criteria").required(true).args(["status", "rocket"])))]
struct FilterCommand {
    /// Status to match.
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    /// Rocket name to match exactly.
    #[arg(long)]
    rocket: Option<String>,
    /// Maximum items to return.
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

/// Arguments for `launches search`.
#[derive(Args, Debug)]
struct SearchCommand {
    /// Case-insensitive mission name fragment.
    query: String,
    /// Maximum items to return.
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the config, then print the effective settings.
    Validate,
}

/// Launch status accepted on the command line.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum StatusArg {
    /// Successful launches.
    Success,
    /// Failed launches.
    Failed,
    /// Launches that have not happened yet.
    Upcoming,
    /// Launches with no reported outcome.
    Unknown,
}

impl From<StatusArg> for LaunchStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Success => Self::Success,
            StatusArg::Failed => Self::Failed,
            StatusArg::Upcoming => Self::Upcoming,
            StatusArg::Unknown => Self::Unknown,
        }
    }
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Envelope for a completed ingestion run.
#[derive(Debug, Serialize)]
struct IngestEnvelope<'a> {
    /// Fixed success message.
    message: &'static str,
    /// Run counts.
    result: &'a IngestionSummary,
    /// RFC 3339 emission time.
    timestamp: String,
}

/// Envelope for a failed command.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    /// Short error label.
    error: String,
    /// Underlying failure detail.
    details: String,
}

/// Effective settings printed by `config validate`.
#[derive(Debug, Serialize)]
struct ConfigReport {
    /// Always true; invalid configs exit before reporting.
    valid: bool,
    /// Upstream URL.
    source_url: String,
    /// Store database path.
    store_path: String,
    /// Scheduled ingestion interval.
    interval_secs: u64,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

impl From<QueryError> for CliError {
    fn from(error: QueryError) -> Self {
        Self::new(format!("{}: {error}", error.kind()))
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Ingest(command) => command_ingest(&config, &command),
        Commands::Schedule(command) => command_schedule(&config, &command),
        Commands::Launches {
            command,
        } => command_launches(&config, command),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(&config),
    }
}

// ============================================================================
// SECTION: Bootstrap
// ============================================================================

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<LedgerConfig> {
    LedgerConfig::load(path).map_err(|err| CliError::new(err.to_string()))
}

/// Builds the event sink selected by `[logging]`.
fn build_event_sink(logging: &LoggingConfig) -> CliResult<Arc<dyn LedgerEventSink>> {
    match (logging.sink, logging.path.as_deref()) {
        (LogSink::File, Some(path)) => {
            let sink = FileEventSink::new(path).map_err(|err| {
                CliError::new(format!("cannot open log file {}: {err}", path.display()))
            })?;
            Ok(Arc::new(sink))
        }
        (LogSink::File, None) => {
            Err(CliError::new("file logging requires logging.path".to_string()))
        }
        (LogSink::Stderr, _) => Ok(Arc::new(StderrEventSink)),
        (LogSink::None, _) => Ok(Arc::new(NoopEventSink)),
    }
}

/// Opens the configured `SQLite` store.
fn open_store(config: &LedgerConfig) -> CliResult<SqliteLaunchStore> {
    SqliteLaunchStore::new(&config.sqlite_config())
        .map_err(|err| CliError::new(format!("cannot open store: {err}")))
}

/// Builds the HTTP source from config.
fn http_source(config: &LedgerConfig) -> CliResult<HttpLaunchSource> {
    HttpLaunchSource::new(config.http_source_config())
        .map_err(|err| CliError::new(format!("invalid source config: {err}")))
}

/// Builds a query service over the configured store.
fn query_service(config: &LedgerConfig) -> CliResult<QueryService<SqliteLaunchStore>> {
    let events = build_event_sink(&config.logging)?;
    let store = open_store(config)?;
    Ok(QueryService::new(store, config.query_config()).with_event_sink(events))
}

// ============================================================================
// SECTION: Ingestion Commands
// ============================================================================

/// Executes `ingest`.
fn command_ingest(config: &LedgerConfig, command: &IngestCommand) -> CliResult<ExitCode> {
    let events = build_event_sink(&config.logging)?;
    let store = open_store(config)?;
    let outcome = match &command.from_file {
        Some(path) => {
            let source =
                FileLaunchSource::new(path).with_max_bytes(config.source.max_response_bytes);
            run_ingest(source, store, events)
        }
        None => run_ingest(http_source(config)?, store, events),
    };
    emit_ingest_outcome(&outcome)
}

/// Executes `schedule` on a single-threaded runtime.
fn command_schedule(config: &LedgerConfig, command: &ScheduleCommand) -> CliResult<ExitCode> {
    let interval_secs = command.interval_secs.unwrap_or(config.schedule.interval_secs);
    validate_interval_secs(interval_secs).map_err(|err| CliError::new(err.to_string()))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(format!("failed to start runtime: {err}")))?;
    runtime.block_on(schedule_loop(
        config.clone(),
        Duration::from_secs(interval_secs),
        command.max_runs,
    ))
}

/// Runs ingestion on every tick until `max_runs` or Ctrl-C.
///
/// The first tick fires immediately. Each run executes on the blocking pool
/// and is awaited, so runs never overlap within the process. Ctrl-C is only
/// observed while waiting for the next tick; a run already in progress
/// finishes and reports its summary before the loop exits.
async fn schedule_loop(
    config: LedgerConfig,
    period: Duration,
    max_runs: Option<u64>,
) -> CliResult<ExitCode> {
    let events = build_event_sink(&config.logging)?;
    let store = open_store(&config)?;
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut runs: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }
        let run_config = config.clone();
        let run_store = store.clone();
        let run_events = Arc::clone(&events);
        let outcome = tokio::task::spawn_blocking(move || {
            http_source(&run_config).map(|source| run_ingest(source, run_store, run_events))
        })
        .await
        .map_err(|err| CliError::new(format!("ingestion task failed: {err}")))??;
        emit_ingest_outcome(&outcome)?;
        runs = runs.saturating_add(1);
        if max_runs.is_some_and(|max| runs >= max) {
            break;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Runs one ingestion with the given source.
fn run_ingest<F: LaunchSource>(
    source: F,
    store: SqliteLaunchStore,
    events: Arc<dyn LedgerEventSink>,
) -> Result<IngestionSummary, IngestError> {
    IngestionPipeline::new(source, store).with_event_sink(events).run()
}

/// Writes the ingestion envelope and maps the outcome to an exit code.
fn emit_ingest_outcome(outcome: &Result<IngestionSummary, IngestError>) -> CliResult<ExitCode> {
    match outcome {
        Ok(summary) => {
            write_json(&IngestEnvelope {
                message: INGEST_OK_MESSAGE,
                result: summary,
                timestamp: now_rfc3339(),
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            write_json(&ErrorEnvelope {
                error: INGEST_FAILED_MESSAGE.to_string(),
                details: err.to_string(),
            })?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// ============================================================================
// SECTION: Query Commands
// ============================================================================

/// Executes a `launches` subcommand.
fn command_launches(config: &LedgerConfig, command: LaunchesCommand) -> CliResult<ExitCode> {
    let service = query_service(config)?;
    match command {
        LaunchesCommand::List(command) => {
            let cursor = command.cursor.map(PaginationCursor::new);
            write_json(&service.list(command.limit, cursor.as_ref())?)?;
        }
        LaunchesCommand::Get(command) => {
            let Some(record) = service.get(&LaunchId::new(command.id.clone()))? else {
                write_json(&ErrorEnvelope {
                    error: "launch not found".to_string(),
                    details: command.id,
                })?;
                return Ok(ExitCode::from(EXIT_NOT_FOUND));
            };
            write_json(&record)?;
        }
        LaunchesCommand::Filter(command) => {
            let criteria = FilterCriteria {
                status: command.status.map(LaunchStatus::from),
                rocket: command.rocket,
            };
            write_json(&service.filter(&criteria, command.limit)?)?;
        }
        LaunchesCommand::Upcoming(args) => write_json(&service.upcoming(args.limit)?)?,
        LaunchesCommand::Search(command) => {
            write_json(&service.search(&command.query, command.limit)?)?;
        }
        LaunchesCommand::Recent(args) => write_json(&service.recent(args.limit)?)?,
        LaunchesCommand::Stats => write_json(&service.statistics()?)?,
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Executes `config validate`.
fn command_config_validate(config: &LedgerConfig) -> CliResult<ExitCode> {
    write_json(&ConfigReport {
        valid: true,
        source_url: config.source.url.clone(),
        store_path: config.store.path.display().to_string(),
        interval_secs: config.schedule.interval_secs,
    })?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Serializes a value as pretty JSON on stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))?;
    write_stdout_line(&payload)
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
