//! Abstraction over a seekable, sized byte stream.
//!
//! Opening the underlying file (or network stream, or in-memory buffer) is
//! left entirely to the caller; this crate only needs the operations below.
//! See `geozero_shp::Reader<T: Read>` for the teacher's analogous choice to
//! stay generic over the stream type rather than own file-opening logic.

use crate::error::{Error, Result};
use std::io::{Read, Seek, SeekFrom};

/// A seekable, sized byte stream.
///
/// `read` must return exactly `n` bytes or fail; there is no short-read
/// contract here, unlike `std::io::Read::read`.
pub trait ByteSource {
    /// Total size of the stream, in bytes.
    fn size(&mut self) -> Result<u64>;

    /// Seek to an absolute byte offset from the start of the stream.
    fn seek(&mut self, absolute: u64) -> Result<()>;

    /// Seek by a relative byte offset from the current position.
    fn skip(&mut self, relative: i64) -> Result<()>;

    /// Current byte offset from the start of the stream.
    fn tell(&mut self) -> Result<u64>;

    /// Read exactly `n` bytes, advancing the stream position by `n`.
    fn read(&mut self, n: usize) -> Result<Vec<u8>>;
}

/// Adapts any `Read + Seek` stream (a file, a `Cursor<Vec<u8>>`, ...) into a
/// [`ByteSource`].
pub struct StreamSource<T: Read + Seek> {
    inner: T,
}

impl<T: Read + Seek> StreamSource<T> {
    pub fn new(inner: T) -> Self {
        StreamSource { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Seek> ByteSource for StreamSource<T> {
    fn size(&mut self) -> Result<u64> {
        let current = self.inner.stream_position().map_err(Error::FileOpen)?;
        let end = self.inner.seek(SeekFrom::End(0)).map_err(Error::FileOpen)?;
        self.inner
            .seek(SeekFrom::Start(current))
            .map_err(Error::FileOpen)?;
        Ok(end)
    }

    fn seek(&mut self, absolute: u64) -> Result<()> {
        self.inner
            .seek(SeekFrom::Start(absolute))
            .map_err(Error::FileOpen)?;
        Ok(())
    }

    fn skip(&mut self, relative: i64) -> Result<()> {
        self.inner
            .seek(SeekFrom::Current(relative))
            .map_err(Error::FileOpen)?;
        Ok(())
    }

    fn tell(&mut self) -> Result<u64> {
        self.inner.stream_position().map_err(Error::FileOpen)
    }

    fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf).map_err(Error::FileOpen)?;
        Ok(buf)
    }
}
