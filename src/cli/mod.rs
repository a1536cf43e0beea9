pub mod app;
pub mod commands;

pub use app::{emit_bind, run_cases};
pub use commands::{Cli, Commands};
