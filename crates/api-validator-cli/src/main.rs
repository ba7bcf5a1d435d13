// crates/api-validator-cli/src/main.rs
// ============================================================================
// Module: API Validator CLI Entry Point
// Description: Command dispatcher for conformance runs and the mock server.
// Purpose: Run the accounts suite and map its result to an exit status.
// Dependencies: clap, tokio, api-validator-cli, api-validator-config, api-validator-mock
// ============================================================================

//! ## Overview
//! `api-validator run` validates a live accounts implementation and exits 0
//! when every selected check passes, 1 when any check fails, and 2 when the
//! run could not be set up. `serve-mock` starts the reference server and
//! `config validate` checks a configuration file without contacting a server.
//! Security posture: configuration and server responses are untrusted; bearer
//! tokens are never printed.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use api_validator_cli::runner::run_accounts;
use api_validator_cli::t;
use api_validator_config::EventLogTarget;
use api_validator_config::ValidatorConfig;
use api_validator_conformance::CheckFilter;
use api_validator_mock::MockConfig;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;
use tokio::net::TcpListener;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit status for configuration and setup failures.
const EXIT_SETUP_FAILURE: u8 = 2;
/// Default bind address for the mock server.
const DEFAULT_MOCK_BIND: &str = "127.0.0.1:8080";
/// Default number of seeded mock accounts.
const DEFAULT_MOCK_ACCOUNTS: usize = 3;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "api-validator", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the accounts conformance suite against a server.
    Run(RunCommand),
    /// Start the reference accounts server.
    ServeMock(ServeMockCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `run`.
#[derive(Args, Debug, Default)]
struct RunCommand {
    /// Path to the config file (defaults to `API_VALIDATOR_CONFIG` or `api-validator.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Base URL of the implementation under test.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Case-insensitive substring selecting checks by full path.
    #[arg(long, value_name = "TEXT")]
    filter: Option<String>,
    /// Write the canonical JSON report to this path.
    #[arg(long, value_name = "PATH")]
    report_json: Option<PathBuf>,
    /// Write the Markdown report to this path.
    #[arg(long, value_name = "PATH")]
    report_md: Option<PathBuf>,
    /// Event log target: a file path, `-` for stderr, or `none`.
    #[arg(long, value_name = "PATH|-")]
    event_log: Option<String>,
}

/// Arguments for `serve-mock`.
#[derive(Args, Debug)]
struct ServeMockCommand {
    /// Socket address to bind.
    #[arg(long, value_name = "ADDR", default_value = DEFAULT_MOCK_BIND)]
    bind: String,
    /// Number of accounts to seed.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MOCK_ACCOUNTS)]
    seed: usize,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Path to the config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a rendered message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(command) => command_run(command).await,
        Commands::ServeMock(command) => command_serve_mock(command).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = load_run_config(&command)?;
    write_stdout_line(&t!("run.target", base_url = config.server.base_url))?;
    let filter = CheckFilter::new(command.filter.as_deref());
    let report =
        run_accounts(&config, filter).await.map_err(|err| CliError::new(err.to_string()))?;

    write_stdout_bytes(report.to_summary_text().as_bytes())?;
    for path in [&config.report.json_path, &config.report.markdown_path].into_iter().flatten() {
        write_stdout_line(&t!("run.report_written", path = path.display()))?;
    }
    if report.is_success() {
        write_stdout_line(&t!("run.result.pass"))?;
    } else {
        write_stdout_line(&t!("run.result.fail"))?;
    }
    Ok(ExitCode::from(report.exit_code()))
}

/// Loads configuration and applies `run` flag overrides.
fn load_run_config(command: &RunCommand) -> CliResult<ValidatorConfig> {
    let mut config = ValidatorConfig::load_unvalidated(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    apply_run_overrides(&mut config, command);
    config.validate().map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    Ok(config)
}

/// Applies command-line overrides; flags win over file and environment.
fn apply_run_overrides(config: &mut ValidatorConfig, command: &RunCommand) {
    if let Some(base_url) = &command.base_url {
        config.server.base_url.clone_from(base_url);
    }
    if let Some(path) = &command.report_json {
        config.report.json_path = Some(path.clone());
    }
    if let Some(path) = &command.report_md {
        config.report.markdown_path = Some(path.clone());
    }
    if let Some(target) = &command.event_log {
        config.report.event_log = EventLogTarget::parse(target);
    }
}

// ============================================================================
// SECTION: Serve Mock Command
// ============================================================================

/// Executes the `serve-mock` command until interrupted.
async fn command_serve_mock(command: ServeMockCommand) -> CliResult<ExitCode> {
    let listener = TcpListener::bind(&command.bind).await.map_err(|err| {
        CliError::new(t!("mock.bind_failed", bind = command.bind, error = err))
    })?;
    let addr = listener
        .local_addr()
        .map_err(|err| CliError::new(t!("mock.bind_failed", bind = command.bind, error = err)))?;
    write_stdout_line(&t!("mock.listening", addr = addr, count = command.seed))?;
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    api_validator_mock::serve(listener, MockConfig::seeded(command.seed), shutdown)
        .await
        .map_err(|err| CliError::new(t!("mock.failed", error = err)))?;
    write_stdout_line(&t!("mock.stopped"))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = ValidatorConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!(
        "config.valid",
        base_url = config.server.base_url,
        timeout_ms = config.server.timeout_ms
    ))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|err| output_error("stdout", &err))
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes).map_err(|err| output_error("stdout", &err))
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output failure.
fn output_error(stream: &str, error: &std::io::Error) -> CliError {
    CliError::new(t!("output.write_failed", stream = stream, error = error))
}

/// Emits an error message to stderr and returns the setup failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_SETUP_FAILURE)
}
