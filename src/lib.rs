pub mod cli;
pub mod runner;
pub mod stream;

// Re-export key types for easy testing
pub use runner::{BindRunner, RunnerConfig, RunnerError};
pub use stream::{ByteStream, SeekOrigin, StreamBehaviors, StreamDouble, StreamDoubleError};
