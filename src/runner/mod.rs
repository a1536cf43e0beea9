//! Out-of-process bind checker
//!
//! Each configured case runs as a child process that reports assembly-bind
//! trace events on stdout. A case passes when the child exits with the
//! expected code and bound its expected assembly exactly once.

pub mod config;
pub mod events;
pub mod process;

pub use config::{RunnerConfig, TestCase};
pub use events::{BindEvent, BindEventLog, TraceEvent};
pub use process::{BindRunner, CaseReport, ExitDescription, RunSummary, RunnerError};
