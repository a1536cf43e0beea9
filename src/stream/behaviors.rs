use crate::stream::error::Operation;
use crate::stream::surface::SeekOrigin;
use futures::future::BoxFuture;
use std::io;
use tokio_util::sync::CancellationToken;

pub type PredicateFn = dyn Fn() -> bool + Send + Sync;
pub type FlushFn = dyn Fn() -> io::Result<()> + Send + Sync;
pub type FlushAsyncFn = dyn Fn(CancellationToken) -> BoxFuture<'static, io::Result<()>> + Send + Sync;
pub type GetU64Fn = dyn Fn() -> io::Result<u64> + Send + Sync;
pub type SetU64Fn = dyn Fn(u64) -> io::Result<()> + Send + Sync;
pub type ReadFn = dyn Fn(&mut [u8], usize, usize) -> io::Result<usize> + Send + Sync;
pub type ReadAsyncFn = dyn for<'a> Fn(&'a mut [u8], usize, usize, CancellationToken) -> BoxFuture<'a, io::Result<usize>>
    + Send
    + Sync;
pub type SeekFn = dyn Fn(i64, SeekOrigin) -> io::Result<u64> + Send + Sync;
pub type WriteFn = dyn Fn(&[u8], usize, usize) -> io::Result<()> + Send + Sync;
pub type WriteAsyncFn = dyn for<'a> Fn(&'a [u8], usize, usize, CancellationToken) -> BoxFuture<'a, io::Result<()>>
    + Send
    + Sync;
pub type DisposeFn = dyn Fn(bool) + Send + Sync;

/// Construction-time configuration for a [`StreamDouble`](crate::stream::StreamDouble).
///
/// Each operation is independently optional; an operation left unset falls
/// back to the fixed default documented on `StreamDouble`.
///
/// ```
/// use rt_testkit::stream::{ByteStream, StreamBehaviors, StreamDouble};
///
/// let stream = StreamDouble::new(
///     StreamBehaviors::new()
///         .can_read(|| true)
///         .read(|_buffer, _offset, _count| Ok(5)),
/// );
/// let mut buffer = [0u8; 10];
/// assert_eq!(stream.read(&mut buffer, 0, 10).unwrap(), 5);
/// assert!(!stream.can_write());
/// ```
#[derive(Default)]
pub struct StreamBehaviors {
    pub(crate) can_read: Option<Box<PredicateFn>>,
    pub(crate) can_seek: Option<Box<PredicateFn>>,
    pub(crate) can_write: Option<Box<PredicateFn>>,
    pub(crate) flush: Option<Box<FlushFn>>,
    pub(crate) flush_async: Option<Box<FlushAsyncFn>>,
    pub(crate) length: Option<Box<GetU64Fn>>,
    pub(crate) get_position: Option<Box<GetU64Fn>>,
    pub(crate) set_position: Option<Box<SetU64Fn>>,
    pub(crate) read: Option<Box<ReadFn>>,
    pub(crate) read_async: Option<Box<ReadAsyncFn>>,
    pub(crate) seek: Option<Box<SeekFn>>,
    pub(crate) set_length: Option<Box<SetU64Fn>>,
    pub(crate) write: Option<Box<WriteFn>>,
    pub(crate) write_async: Option<Box<WriteAsyncFn>>,
    pub(crate) dispose: Option<Box<DisposeFn>>,
}

impl StreamBehaviors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_read<F>(mut self, behavior: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.can_read = Some(Box::new(behavior));
        self
    }

    pub fn can_seek<F>(mut self, behavior: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.can_seek = Some(Box::new(behavior));
        self
    }

    pub fn can_write<F>(mut self, behavior: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.can_write = Some(Box::new(behavior));
        self
    }

    pub fn flush<F>(mut self, behavior: F) -> Self
    where
        F: Fn() -> io::Result<()> + Send + Sync + 'static,
    {
        self.flush = Some(Box::new(behavior));
        self
    }

    pub fn flush_async<F>(mut self, behavior: F) -> Self
    where
        F: Fn(CancellationToken) -> BoxFuture<'static, io::Result<()>> + Send + Sync + 'static,
    {
        self.flush_async = Some(Box::new(behavior));
        self
    }

    pub fn length<F>(mut self, behavior: F) -> Self
    where
        F: Fn() -> io::Result<u64> + Send + Sync + 'static,
    {
        self.length = Some(Box::new(behavior));
        self
    }

    pub fn get_position<F>(mut self, behavior: F) -> Self
    where
        F: Fn() -> io::Result<u64> + Send + Sync + 'static,
    {
        self.get_position = Some(Box::new(behavior));
        self
    }

    pub fn set_position<F>(mut self, behavior: F) -> Self
    where
        F: Fn(u64) -> io::Result<()> + Send + Sync + 'static,
    {
        self.set_position = Some(Box::new(behavior));
        self
    }

    pub fn read<F>(mut self, behavior: F) -> Self
    where
        F: Fn(&mut [u8], usize, usize) -> io::Result<usize> + Send + Sync + 'static,
    {
        self.read = Some(Box::new(behavior));
        self
    }

    /// Suspending read. Also backs the blocking `read` when no blocking behavior is set.
    pub fn read_async<F>(mut self, behavior: F) -> Self
    where
        F: for<'a> Fn(&'a mut [u8], usize, usize, CancellationToken) -> BoxFuture<'a, io::Result<usize>>
            + Send
            + Sync
            + 'static,
    {
        self.read_async = Some(Box::new(behavior));
        self
    }

    pub fn seek<F>(mut self, behavior: F) -> Self
    where
        F: Fn(i64, SeekOrigin) -> io::Result<u64> + Send + Sync + 'static,
    {
        self.seek = Some(Box::new(behavior));
        self
    }

    pub fn set_length<F>(mut self, behavior: F) -> Self
    where
        F: Fn(u64) -> io::Result<()> + Send + Sync + 'static,
    {
        self.set_length = Some(Box::new(behavior));
        self
    }

    pub fn write<F>(mut self, behavior: F) -> Self
    where
        F: Fn(&[u8], usize, usize) -> io::Result<()> + Send + Sync + 'static,
    {
        self.write = Some(Box::new(behavior));
        self
    }

    /// Suspending write. Also backs the blocking `write` when no blocking behavior is set.
    pub fn write_async<F>(mut self, behavior: F) -> Self
    where
        F: for<'a> Fn(&'a [u8], usize, usize, CancellationToken) -> BoxFuture<'a, io::Result<()>>
            + Send
            + Sync
            + 'static,
    {
        self.write_async = Some(Box::new(behavior));
        self
    }

    /// Hook run on every dispose call with the `disposing` flag
    pub fn dispose<F>(mut self, behavior: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.dispose = Some(Box::new(behavior));
        self
    }

    /// Operations that carry a supplied behavior, in declaration order
    pub fn configured(&self) -> Vec<Operation> {
        Operation::ALL
            .iter()
            .copied()
            .filter(|operation| self.is_configured(*operation))
            .collect()
    }

    pub fn is_configured(&self, operation: Operation) -> bool {
        match operation {
            Operation::CanRead => self.can_read.is_some(),
            Operation::CanSeek => self.can_seek.is_some(),
            Operation::CanWrite => self.can_write.is_some(),
            Operation::Flush => self.flush.is_some(),
            Operation::FlushAsync => self.flush_async.is_some(),
            Operation::Length => self.length.is_some(),
            Operation::GetPosition => self.get_position.is_some(),
            Operation::SetPosition => self.set_position.is_some(),
            Operation::Read => self.read.is_some(),
            Operation::ReadAsync => self.read_async.is_some(),
            Operation::Seek => self.seek.is_some(),
            Operation::SetLength => self.set_length.is_some(),
            Operation::Write => self.write.is_some(),
            Operation::WriteAsync => self.write_async.is_some(),
            Operation::Dispose => self.dispose.is_some(),
        }
    }
}
