// Entry point: check once, or keep checking on a cron schedule.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use spot_checker::domains::availability::{run_and_log, SpotChecker};
use spot_checker::kernel::{start_scheduler, SpotCheckerDeps};
use spot_checker::Config;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spot-checker")]
#[command(about = "Check if there are some openings for swimming lessons")]
struct Cli {
    /// Don't send notifications, just log the result
    #[arg(long)]
    skip_notifications: bool,

    /// Run a single check even if a schedule is configured
    #[arg(long)]
    once: bool,

    /// Cron expression (overrides SPOT_SCHEDULE)
    #[arg(long, value_name = "CRON")]
    schedule: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a shell completion script (bash, zsh, fish)
    Completion { shell: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completion { shell }) = &cli.command {
        return print_completion(shell.as_deref().unwrap_or("zsh"));
    }

    // Initialize logging (stderr, so stdout stays clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spot_checker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(url = %config.url, "Configuration loaded");

    let deps = SpotCheckerDeps::from_config(&config, cli.skip_notifications)
        .context("Failed to initialize dependencies")?;
    let checker = Arc::new(SpotChecker::new(config.checker_settings(), deps));

    let schedule = cli.schedule.or(config.schedule);
    match schedule.filter(|_| !cli.once) {
        Some(expression) => {
            let mut scheduler = start_scheduler(checker, &expression)
                .await
                .context("Failed to start scheduler")?;

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutting down scheduler");
            scheduler.shutdown().await?;
        }
        None => {
            run_and_log(&checker).await?;
        }
    }

    Ok(())
}

fn print_completion(shell: &str) -> Result<()> {
    let mut command = Cli::command();
    let shell = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => {
            command.print_help()?;
            return Ok(());
        }
    };

    clap_complete::generate(shell, &mut command, "spot-checker", &mut std::io::stdout());
    Ok(())
}
