mod action;
mod app;
mod catalog;
mod command;
mod config;
mod conversation;
mod error;
mod event;
mod headless;
mod markdown;
mod matcher;
mod orchestrator;
mod panels;
mod router;
mod sequencer;
mod tour;
mod ui;
mod ui_state;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use catalog::Catalog;
use config::{Config, LayoutProfile};
use router::PanelRegistry;
use sequencer::Pacing;

/// Scripted MambaHR conversation demo for the terminal.
#[derive(Parser)]
#[command(name = "mamba-demo")]
#[command(about = "MambaHR demo conversation", version)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug logging to ~/.mamba-demo/logs
    #[arg(long, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full-screen demo (default)
    Tui {
        /// Shell arrangement, overrides the config file
        #[arg(long, value_enum)]
        layout: Option<LayoutProfile>,

        /// Start without the guided tour
        #[arg(long, default_value_t = false)]
        no_tour: bool,
    },
    /// Answer queries without a terminal and print the transcript as JSON
    Ask {
        /// Queries, answered in order
        #[arg(required = true)]
        queries: Vec<String>,

        /// Skip the simulated tool-call delays
        #[arg(long, default_value_t = false)]
        instant: bool,
    },
    /// Print the response catalog as JSON
    Catalog,
}

fn init_tracing(cli: &Cli, is_tui: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    // Console output would corrupt the display in TUI mode.
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let (file_layer, guard) = if cli.debug {
        let log_dir = config::home_dir().join(".mamba-demo").join("logs");
        std::fs::create_dir_all(&log_dir).ok();
        let appender = tracing_appender::rolling::daily(&log_dir, "debug.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .with_filter(EnvFilter::new("debug"));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    if is_tui {
        let console = fmt::layer()
            .with_writer(std::io::sink)
            .with_target(false)
            .with_filter(console_filter);
        tracing_subscriber::registry().with(file_layer).with(console).init();
    } else {
        // stdout carries the JSON
        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_filter);
        tracing_subscriber::registry().with(file_layer).with(console).init();
    }

    guard
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Commands::Tui {
        layout: None,
        no_tour: false,
    });
    let is_tui = matches!(command, Commands::Tui { .. });

    // WorkerGuard must outlive main() so buffered file writes are flushed on exit.
    let _file_guard = init_tracing(&cli, is_tui);

    if cli.debug {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            log_level = %cli.log_level,
            "========== mamba-demo session start =========="
        );
    }

    let mut config = Config::load(cli.config.as_deref())?;

    let catalog = Arc::new(Catalog::builtin()?);
    let panels = PanelRegistry::builtin();
    panels.validate(&catalog)?;

    match command {
        Commands::Tui { layout, no_tour } => {
            if let Some(layout) = layout {
                config.layout = layout;
            }
            if no_tour {
                config.tour_enabled = false;
            }
            event::run_tui(config, catalog, panels).await?;
        }
        Commands::Ask { queries, instant } => {
            let pacing = if instant { Pacing::instant() } else { Pacing::from(&config.timing) };
            let transcript = headless::ask(catalog, pacing, &queries).await;
            println!("{}", headless::to_json(&transcript)?);
        }
        Commands::Catalog => {
            println!("{}", headless::to_json(&*catalog)?);
        }
    }

    Ok(())
}
