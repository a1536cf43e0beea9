use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rt-testkit")]
#[command(about = "Runs out-of-process assembly bind checks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the cases from a case file, each in its own child process
    ///
    /// Every case must exit with the configured success code and report
    /// exactly one bind event for its expected assembly.
    ///
    /// Examples:
    ///   rt-testkit run --config cases.toml
    ///   rt-testkit run --config cases.toml --filter plugin
    Run {
        /// Path to the TOML case file
        #[arg(short, long)]
        config: PathBuf,
        /// Only run cases whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Print bind events for an assembly, then exit (fixture child)
    EmitBind {
        /// Assembly name to report
        #[arg(short, long)]
        assembly: String,
        /// Number of bind events to print
        #[arg(short, long, default_value_t = 1)]
        count: usize,
        /// Milliseconds to wait before printing anything
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Exit code to finish with
        #[arg(long, default_value_t = 0)]
        exit_code: i32,
    },
}
