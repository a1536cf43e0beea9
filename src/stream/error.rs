use std::fmt;
use std::io;
use thiserror::Error;

/// Every operation a stream double can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CanRead,
    CanSeek,
    CanWrite,
    Flush,
    FlushAsync,
    Length,
    GetPosition,
    SetPosition,
    Read,
    ReadAsync,
    Seek,
    SetLength,
    Write,
    WriteAsync,
    Dispose,
}

impl Operation {
    pub const ALL: [Operation; 15] = [
        Operation::CanRead,
        Operation::CanSeek,
        Operation::CanWrite,
        Operation::Flush,
        Operation::FlushAsync,
        Operation::Length,
        Operation::GetPosition,
        Operation::SetPosition,
        Operation::Read,
        Operation::ReadAsync,
        Operation::Seek,
        Operation::SetLength,
        Operation::Write,
        Operation::WriteAsync,
        Operation::Dispose,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::CanRead => "can_read",
            Operation::CanSeek => "can_seek",
            Operation::CanWrite => "can_write",
            Operation::Flush => "flush",
            Operation::FlushAsync => "flush_async",
            Operation::Length => "length",
            Operation::GetPosition => "get_position",
            Operation::SetPosition => "set_position",
            Operation::Read => "read",
            Operation::ReadAsync => "read_async",
            Operation::Seek => "seek",
            Operation::SetLength => "set_length",
            Operation::Write => "write",
            Operation::WriteAsync => "write_async",
            Operation::Dispose => "dispose",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by the stream double itself.
///
/// Errors produced by supplied behaviors are never converted into this type;
/// they reach the caller exactly as the behavior returned them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamDoubleError {
    #[error("Operation not supported: no behavior configured for {operation}")]
    Unsupported { operation: Operation },

    #[error("Operation canceled before {operation} started")]
    Canceled { operation: Operation },
}

impl StreamDoubleError {
    pub fn unsupported(operation: Operation) -> io::Error {
        StreamDoubleError::Unsupported { operation }.into()
    }

    pub fn canceled(operation: Operation) -> io::Error {
        StreamDoubleError::Canceled { operation }.into()
    }

    /// Recover the typed error from an `io::Error` raised by a stream double
    pub fn from_io(error: &io::Error) -> Option<&StreamDoubleError> {
        error.get_ref()?.downcast_ref::<StreamDoubleError>()
    }

    pub fn operation(&self) -> Operation {
        match self {
            StreamDoubleError::Unsupported { operation } => *operation,
            StreamDoubleError::Canceled { operation } => *operation,
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        match self {
            StreamDoubleError::Unsupported { .. } => io::ErrorKind::Unsupported,
            StreamDoubleError::Canceled { .. } => io::ErrorKind::Interrupted,
        }
    }
}

impl From<StreamDoubleError> for io::Error {
    fn from(error: StreamDoubleError) -> Self {
        io::Error::new(error.kind(), error)
    }
}

/// True when `error` is the double's "no behavior configured" failure
pub fn is_unsupported(error: &io::Error) -> bool {
    matches!(
        StreamDoubleError::from_io(error),
        Some(StreamDoubleError::Unsupported { .. })
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_round_trips_through_io_error() {
        let error = StreamDoubleError::unsupported(Operation::Seek);
        assert_eq!(error.kind(), io::ErrorKind::Unsupported);
        assert!(is_unsupported(&error));
        assert_eq!(
            StreamDoubleError::from_io(&error).map(|e| e.operation()),
            Some(Operation::Seek)
        );
    }

    #[test]
    fn test_canceled_is_not_unsupported() {
        let error = StreamDoubleError::canceled(Operation::ReadAsync);
        assert_eq!(error.kind(), io::ErrorKind::Interrupted);
        assert!(!is_unsupported(&error));
    }

    #[test]
    fn test_foreign_io_error_is_not_recognized() {
        let error = io::Error::new(io::ErrorKind::Unsupported, "from somewhere else");
        assert!(StreamDoubleError::from_io(&error).is_none());
        assert!(!is_unsupported(&error));
    }

    #[test]
    fn test_operation_display_uses_snake_case_names() {
        assert_eq!(Operation::SetLength.to_string(), "set_length");
        assert_eq!(Operation::WriteAsync.to_string(), "write_async");
        assert_eq!(Operation::ALL.len(), 15);
    }
}
