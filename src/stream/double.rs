use crate::stream::behaviors::StreamBehaviors;
use crate::stream::error::{Operation, StreamDoubleError};
use crate::stream::surface::{
    base_flush_async, base_read_async, base_write_async, ByteStream, SeekOrigin,
};
use futures::future::BoxFuture;
use std::fmt;
use std::io::{self, SeekFrom};
use tokio::runtime::{Builder, Handle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// A byte stream whose every operation is supplied by the test that builds it.
///
/// The double keeps no state of its own: no position, no buffer, no disposed
/// flag. Each call is forwarded to the configured behavior, or, when none was
/// configured, to a fixed default:
///
/// | operation | default |
/// |---|---|
/// | `can_read`, `can_seek`, `can_write` | `false` |
/// | `flush` | no-op |
/// | `flush_async`, `read_async`, `write_async` | base stream behavior, see [`ByteStream`] |
/// | `read`, `write` | drive the suspending behavior if one was supplied, else unsupported |
/// | `length`, `position`, `set_position`, `seek`, `set_length` | unsupported |
/// | `dispose` | no-op |
///
/// Unsupported operations fail with [`StreamDoubleError::Unsupported`] wrapped
/// in an `io::Error` of kind `Unsupported`. Errors returned by supplied
/// behaviors are passed through untouched.
pub struct StreamDouble {
    behaviors: StreamBehaviors,
}

impl StreamDouble {
    pub fn new(behaviors: StreamBehaviors) -> Self {
        debug!(configured = ?behaviors.configured(), "Creating stream double");
        Self { behaviors }
    }

    /// A double with no behaviors at all
    pub fn unconfigured() -> Self {
        Self::new(StreamBehaviors::new())
    }

    pub fn configured(&self) -> Vec<Operation> {
        self.behaviors.configured()
    }

    /// Full disposal, same as `dispose(true)`
    pub fn close(&self) {
        self.dispose(true);
    }

    fn unsupported(operation: Operation) -> io::Error {
        debug!(%operation, "No behavior configured, reporting unsupported operation");
        StreamDoubleError::unsupported(operation)
    }
}

impl Default for StreamDouble {
    fn default() -> Self {
        Self::unconfigured()
    }
}

impl From<StreamBehaviors> for StreamDouble {
    fn from(behaviors: StreamBehaviors) -> Self {
        Self::new(behaviors)
    }
}

impl fmt::Debug for StreamDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamDouble")
            .field("configured", &self.behaviors.configured())
            .finish()
    }
}

impl ByteStream for StreamDouble {
    fn can_read(&self) -> bool {
        self.behaviors.can_read.as_ref().is_some_and(|f| f())
    }

    fn can_seek(&self) -> bool {
        self.behaviors.can_seek.as_ref().is_some_and(|f| f())
    }

    fn can_write(&self) -> bool {
        self.behaviors.can_write.as_ref().is_some_and(|f| f())
    }

    fn flush(&self) -> io::Result<()> {
        match &self.behaviors.flush {
            Some(f) => f(),
            None => Ok(()),
        }
    }

    fn flush_async(&self, cancel: CancellationToken) -> BoxFuture<'_, io::Result<()>> {
        match &self.behaviors.flush_async {
            Some(f) => f(cancel),
            None => base_flush_async(self, cancel),
        }
    }

    fn length(&self) -> io::Result<u64> {
        match &self.behaviors.length {
            Some(f) => f(),
            None => Err(Self::unsupported(Operation::Length)),
        }
    }

    fn position(&self) -> io::Result<u64> {
        match &self.behaviors.get_position {
            Some(f) => f(),
            None => Err(Self::unsupported(Operation::GetPosition)),
        }
    }

    fn set_position(&self, position: u64) -> io::Result<()> {
        match &self.behaviors.set_position {
            Some(f) => f(position),
            None => Err(Self::unsupported(Operation::SetPosition)),
        }
    }

    fn read(&self, buffer: &mut [u8], offset: usize, count: usize) -> io::Result<usize> {
        if let Some(f) = &self.behaviors.read {
            return f(buffer, offset, count);
        }
        match &self.behaviors.read_async {
            Some(f) => {
                trace!(offset, count, "Driving read_async behavior synchronously");
                drive_blocking(f(buffer, offset, count, CancellationToken::new()))
            }
            None => Err(Self::unsupported(Operation::Read)),
        }
    }

    fn read_async<'a>(
        &'a self,
        buffer: &'a mut [u8],
        offset: usize,
        count: usize,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, io::Result<usize>> {
        match &self.behaviors.read_async {
            Some(f) => f(buffer, offset, count, cancel),
            None => base_read_async(self, buffer, offset, count, cancel),
        }
    }

    fn seek(&self, offset: i64, origin: SeekOrigin) -> io::Result<u64> {
        match &self.behaviors.seek {
            Some(f) => f(offset, origin),
            None => Err(Self::unsupported(Operation::Seek)),
        }
    }

    fn set_length(&self, length: u64) -> io::Result<()> {
        match &self.behaviors.set_length {
            Some(f) => f(length),
            None => Err(Self::unsupported(Operation::SetLength)),
        }
    }

    fn write(&self, buffer: &[u8], offset: usize, count: usize) -> io::Result<()> {
        if let Some(f) = &self.behaviors.write {
            return f(buffer, offset, count);
        }
        match &self.behaviors.write_async {
            Some(f) => {
                trace!(offset, count, "Driving write_async behavior synchronously");
                drive_blocking(f(buffer, offset, count, CancellationToken::new()))
            }
            None => Err(Self::unsupported(Operation::Write)),
        }
    }

    fn write_async<'a>(
        &'a self,
        buffer: &'a [u8],
        offset: usize,
        count: usize,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, io::Result<()>> {
        match &self.behaviors.write_async {
            Some(f) => f(buffer, offset, count, cancel),
            None => base_write_async(self, buffer, offset, count, cancel),
        }
    }

    fn dispose(&self, disposing: bool) {
        if let Some(f) = &self.behaviors.dispose {
            trace!(disposing, "Running dispose hook");
            f(disposing);
        }
    }
}

/// Run a suspending behavior to completion from blocking code.
///
/// The future gets its own current-thread runtime so timers and yields resolve.
/// Inside a tokio runtime that runtime lives on a scoped helper thread, as the
/// calling thread may be the only one driving the outer scheduler.
fn drive_blocking<T: Send>(future: BoxFuture<'_, io::Result<T>>) -> io::Result<T> {
    let run = move || -> io::Result<T> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(future)
    };

    if Handle::try_current().is_err() {
        return run();
    }

    trace!("Inside a tokio runtime, driving behavior on a helper thread");
    std::thread::scope(|scope| match scope.spawn(run).join() {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    })
}

impl io::Read for StreamDouble {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = buf.len();
        ByteStream::read(&*self, buf, 0, count)
    }
}

impl io::Write for StreamDouble {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        ByteStream::write(&*self, buf, 0, buf.len())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        ByteStream::flush(&*self)
    }
}

impl io::Seek for StreamDouble {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, origin) = SeekOrigin::split(pos)?;
        ByteStream::seek(&*self, offset, origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_debug_lists_configured_operations() {
        let stream = StreamDouble::new(StreamBehaviors::new().can_read(|| true).seek(|_, _| Ok(0)));
        let debug = format!("{:?}", stream);
        assert!(debug.contains("CanRead"));
        assert!(debug.contains("Seek"));
        assert!(!debug.contains("Write"));
    }

    #[test]
    fn test_blocking_read_prefers_blocking_behavior() {
        let async_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&async_calls);
        let stream = StreamDouble::new(
            StreamBehaviors::new()
                .read(|_, _, _| Ok(1))
                .read_async(move |_, _, _, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Box::pin(async { Ok(2) })
                }),
        );

        let mut buffer = [0u8; 4];
        assert_eq!(stream.read(&mut buffer, 0, 4).unwrap(), 1);
        assert_eq!(async_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_close_disposes_fully() {
        let flags = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = Arc::clone(&flags);
        let stream = StreamDouble::new(
            StreamBehaviors::new().dispose(move |disposing| seen.lock().unwrap().push(disposing)),
        );

        stream.close();
        stream.dispose(false);

        assert_eq!(*flags.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_std_seek_splits_seek_from() {
        let stream = StreamDouble::new(StreamBehaviors::new().seek(|offset, origin| {
            assert_eq!(origin, SeekOrigin::End);
            Ok((100 + offset) as u64)
        }));
        let mut stream = stream;
        assert_eq!(io::Seek::seek(&mut stream, SeekFrom::End(-10)).unwrap(), 90);
    }

    #[test]
    fn test_std_seek_rejects_huge_start_before_dispatch() {
        let mut stream = StreamDouble::new(StreamBehaviors::new().seek(|_, _| {
            panic!("seek behavior must not run");
        }));
        let error = io::Seek::seek(&mut stream, SeekFrom::Start(u64::MAX)).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }
}
