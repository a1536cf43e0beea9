use anyhow::Result;
use clap::Parser;
use rt_testkit::cli::{emit_bind, run_cases, Cli, Commands};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; child stdout carries trace events
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, filter } => {
            let summary = run_cases(&config, filter.as_deref()).await?;
            if summary.all_passed() {
                info!("All {} cases passed", summary.total());
            } else {
                for (name, e) in &summary.failed {
                    error!("{}: {}", name, e);
                }
                error!(
                    "{} of {} cases failed",
                    summary.failed.len(),
                    summary.total()
                );
                std::process::exit(1);
            }
        }
        Commands::EmitBind {
            assembly,
            count,
            delay_ms,
            exit_code,
        } => {
            emit_bind(&assembly, count, Duration::from_millis(delay_ms)).await?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
