//! Configurable stream double for exercising code against scripted stream behavior

pub mod behaviors;
pub mod double;
pub mod error;
pub mod surface;

pub use behaviors::StreamBehaviors;
pub use double::StreamDouble;
pub use error::{is_unsupported, Operation, StreamDoubleError};
pub use surface::{ByteStream, SeekOrigin};
