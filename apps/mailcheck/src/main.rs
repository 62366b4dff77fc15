//! mailcheck - Bulk email verification
//!
//! This is the main CLI application that drives verification, history and
//! export through the ops crate.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod source;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use crate::source::AddressSource;
use clap::Parser;
use mailcheck_config::Config;
use mailcheck_errors::OpsError;
use mailcheck_events::{EventEmitter, EventReceiver, EventSender};
use mailcheck_history::SqliteHistoryStore;
use mailcheck_net::HttpOracle;
use mailcheck_ops::{OperationResult, OpsContextBuilder, OpsCtx};
use mailcheck_types::{ColorChoice, OutputFormat};
use std::io::IsTerminal;
use std::process;
use std::sync::Arc;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    match run(cli).await {
        Ok(true) => {}
        // Completed, but the run could not be recorded
        Ok(false) => process::exit(2),
        Err(e) => {
            error!("Application error: {}", e);
            if !json_mode {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<bool, CliError> {
    info!("Starting mailcheck v{}", env!("CARGO_PKG_VERSION"));

    // 1. File config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    // 2. Environment variables
    config.merge_env()?;
    // 3. CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global);
    config.validate()?;

    let (event_sender, event_receiver) = mailcheck_events::channel();
    let ops_ctx = build_ops_context(event_sender, config.clone()).await?;

    let json_output = cli.global.json || config.general.default_output == OutputFormat::Json;
    let color = match (cli.global.color, config.general.default_output) {
        (Some(color), _) => color,
        (None, OutputFormat::Plain) => ColorChoice::Never,
        (None, _) => config.general.color,
    };
    let renderer = OutputRenderer::new(json_output, color);
    let colors_enabled = match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, json_output);

    let result =
        execute_command_with_events(cli.command, ops_ctx, event_receiver, &mut event_handler)
            .await?;

    renderer.render_result(&result)?;

    info!("Command completed");
    Ok(result.is_success())
}

/// Apply command-line overrides on top of file and environment values
fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if let Some(batch_size) = global.batch_size {
        config.general.batch_size = batch_size;
    }
    if let Some(url) = &global.oracle_url {
        config.oracle.base_url.clone_from(url);
    }
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ops_ctx));

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        Commands::Verify { email } => {
            let verdict = mailcheck_ops::verify_single(&ctx, &email).await?;
            Ok(OperationResult::Verdict(verdict))
        }

        Commands::Bulk {
            addresses,
            file,
            name,
            export,
            filter,
        } => {
            let source = AddressSource::from_args(addresses, file);
            if matches!(source, AddressSource::Stdin) && std::io::stdin().is_terminal() {
                return Err(mailcheck_errors::Error::from(OpsError::NoAddresses).into());
            }
            let addresses = source.read(ctx.config.input.max_file_bytes).await?;
            if addresses.is_empty() {
                ctx.emit_warning("no addresses found in input");
            }

            let report = mailcheck_ops::verify_bulk(
                &ctx,
                name.or_else(|| source.suggested_name()),
                &addresses,
            )
            .await;

            if let Some(path) = export {
                let written = mailcheck_ops::export_to(&ctx, &report.run, filter, Some(path)).await?;
                ctx.emit_debug(format!(
                    "exported {} row(s) to {}",
                    written.rows,
                    written.path.display()
                ));
            }
            Ok(OperationResult::Bulk(report))
        }

        Commands::History => {
            let runs = mailcheck_ops::history(&ctx).await?;
            Ok(OperationResult::History(runs))
        }

        Commands::Export { id, filter, output } => {
            let report = mailcheck_ops::export_run(&ctx, &id, filter, output).await?;
            Ok(OperationResult::Export(report))
        }
    }
}

/// Build operations context with all required components
async fn build_ops_context(event_sender: EventSender, config: Config) -> Result<OpsCtx, CliError> {
    let oracle = HttpOracle::new(&config.oracle)?;
    let history = SqliteHistoryStore::from_config(&config).await?;
    info!(
        oracle = %oracle.verify_url(),
        history = %history.db_path().display(),
        "Components ready"
    );

    let ctx = OpsContextBuilder::new()
        .with_oracle(Arc::new(oracle))
        .with_history(Arc::new(history))
        .with_event_sender(event_sender)
        .with_config(config)
        .build()?;
    Ok(ctx)
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let debug_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("info,mailcheck=debug,mailcheck_batch=debug")
        })
    };

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = Config::default().logs_path();
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }
        let log_file = log_dir.join(format!(
            "mailcheck-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));
        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(debug_filter())
                    .init();
                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,mailcheck=warn,mailcheck_ops=warn")
                }),
            )
            .init();
    }
}
