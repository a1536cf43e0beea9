use crate::runner::{BindEvent, BindRunner, RunSummary, RunnerConfig};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Load a case file and run it; returns the summary for the caller to report
pub async fn run_cases(config_path: &Path, filter: Option<&str>) -> Result<RunSummary> {
    let config = RunnerConfig::load(config_path)?;
    info!(
        "Loaded {} cases from {}",
        config.cases.len(),
        config_path.display()
    );

    let runner = BindRunner::new(config).context("Failed to resolve the default child program")?;
    Ok(runner.run_all(filter).await)
}

/// Fixture child: report `count` binds of `assembly` on stdout
pub async fn emit_bind(assembly: &str, count: usize, delay: Duration) -> Result<()> {
    if !delay.is_zero() {
        debug!("Delaying bind output by {:?}", delay);
        tokio::time::sleep(delay).await;
    }

    let line = BindEvent::new(assembly)
        .to_line()
        .context("Failed to serialize bind event")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for _ in 0..count {
        writeln!(out, "{}", line).context("Failed to write bind event")?;
    }
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}
