use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use countup_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "countup")]
#[command(author, version, about = "Animated statistic counters on a scrollable terminal page")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of ~/.config/countup/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the page (default)
    Run {
        /// Skip all animations
        #[arg(long)]
        reduced_motion: bool,
    },
    /// Run the counters without a terminal page and print every frame
    Simulate {
        /// One JSON object per frame
        #[arg(long)]
        json: bool,
        /// Skip the ramp and print only the final values
        #[arg(long)]
        reduced_motion: bool,
        /// Time before the stats become visible
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Override the animation duration
        #[arg(long)]
        duration_ms: Option<u64>,
    },
    /// Format numbers the way the counters display them
    Format {
        #[arg(required = true)]
        numbers: Vec<u64>,
        /// Group separator
        #[arg(short, long, default_value_t = ' ')]
        separator: char,
    },
    /// Show the step size each configured stat counts by
    Steps,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let command = cli.command.unwrap_or(Commands::Run {
        reduced_motion: false,
    });

    // The page owns the terminal, so its logs go to a file
    init_logging(&config, matches!(command, Commands::Run { .. }))?;

    match command {
        Commands::Run { reduced_motion } => commands::run::run(config, reduced_motion),
        Commands::Simulate {
            json,
            reduced_motion,
            delay_ms,
            duration_ms,
        } => {
            let options = commands::simulate::SimulateOptions {
                json,
                reduced_motion,
                delay_ms,
                duration_ms,
            };
            commands::simulate::run(&config, options).await
        }
        Commands::Format { numbers, separator } => {
            commands::format::run(&numbers, separator);
            Ok(())
        }
        Commands::Steps => {
            commands::steps::run(&config);
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(&config_path, force),
        },
    }
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
