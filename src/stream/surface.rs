use crate::stream::error::{Operation, StreamDoubleError};
use futures::future::BoxFuture;
use std::io::{self, SeekFrom};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Reference point for a seek offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    Begin,
    Current,
    End,
}

impl SeekOrigin {
    /// Split a `SeekFrom` into a signed offset and its origin.
    ///
    /// Fails with `InvalidInput` when a `Start` offset does not fit in an `i64`.
    pub fn split(from: SeekFrom) -> io::Result<(i64, SeekOrigin)> {
        match from {
            SeekFrom::Start(offset) => {
                let offset = i64::try_from(offset).map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("seek offset {} exceeds i64::MAX", offset),
                    )
                })?;
                Ok((offset, SeekOrigin::Begin))
            }
            SeekFrom::Current(offset) => Ok((offset, SeekOrigin::Current)),
            SeekFrom::End(offset) => Ok((offset, SeekOrigin::End)),
        }
    }
}

/// The conventional byte-stream surface.
///
/// Buffers are addressed with an explicit `offset` and `count`, so an
/// implementation reads into or writes from `buffer[offset..offset + count]`.
/// The provided suspending methods behave like a plain base stream: they
/// refuse to start once `cancel` has fired and otherwise run the blocking
/// operation of the same stream.
pub trait ByteStream: Send + Sync {
    fn can_read(&self) -> bool;

    fn can_seek(&self) -> bool;

    fn can_write(&self) -> bool;

    fn flush(&self) -> io::Result<()>;

    fn flush_async(&self, cancel: CancellationToken) -> BoxFuture<'_, io::Result<()>> {
        base_flush_async(self, cancel)
    }

    fn length(&self) -> io::Result<u64>;

    fn position(&self) -> io::Result<u64>;

    fn set_position(&self, position: u64) -> io::Result<()>;

    /// Read up to `count` bytes into `buffer` starting at `offset`, returning the number read
    fn read(&self, buffer: &mut [u8], offset: usize, count: usize) -> io::Result<usize>;

    fn read_async<'a>(
        &'a self,
        buffer: &'a mut [u8],
        offset: usize,
        count: usize,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, io::Result<usize>> {
        base_read_async(self, buffer, offset, count, cancel)
    }

    /// Move to `offset` relative to `origin`, returning the new position
    fn seek(&self, offset: i64, origin: SeekOrigin) -> io::Result<u64>;

    fn set_length(&self, length: u64) -> io::Result<()>;

    /// Write `count` bytes from `buffer` starting at `offset`
    fn write(&self, buffer: &[u8], offset: usize, count: usize) -> io::Result<()>;

    fn write_async<'a>(
        &'a self,
        buffer: &'a [u8],
        offset: usize,
        count: usize,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, io::Result<()>> {
        base_write_async(self, buffer, offset, count, cancel)
    }

    /// Release resources; `disposing` is false when called from a finalizer path
    fn dispose(&self, disposing: bool);
}

/// Base suspending flush: runs the blocking `flush` unless already canceled
pub fn base_flush_async<S>(stream: &S, cancel: CancellationToken) -> BoxFuture<'_, io::Result<()>>
where
    S: ByteStream + ?Sized,
{
    Box::pin(async move {
        if cancel.is_cancelled() {
            trace!("flush_async canceled before start");
            return Err(StreamDoubleError::canceled(Operation::FlushAsync));
        }
        stream.flush()
    })
}

/// Base suspending read: runs the blocking `read` unless already canceled
pub fn base_read_async<'a, S>(
    stream: &'a S,
    buffer: &'a mut [u8],
    offset: usize,
    count: usize,
    cancel: CancellationToken,
) -> BoxFuture<'a, io::Result<usize>>
where
    S: ByteStream + ?Sized,
{
    Box::pin(async move {
        if cancel.is_cancelled() {
            trace!("read_async canceled before start");
            return Err(StreamDoubleError::canceled(Operation::ReadAsync));
        }
        stream.read(buffer, offset, count)
    })
}

/// Base suspending write: runs the blocking `write` unless already canceled
pub fn base_write_async<'a, S>(
    stream: &'a S,
    buffer: &'a [u8],
    offset: usize,
    count: usize,
    cancel: CancellationToken,
) -> BoxFuture<'a, io::Result<()>>
where
    S: ByteStream + ?Sized,
{
    Box::pin(async move {
        if cancel.is_cancelled() {
            trace!("write_async canceled before start");
            return Err(StreamDoubleError::canceled(Operation::WriteAsync));
        }
        stream.write(buffer, offset, count)
    })
}
