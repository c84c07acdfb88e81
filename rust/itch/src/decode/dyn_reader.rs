//! Runtime polymorphism over plain and gzip-compressed input streams.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;

use crate::{Error, Result};

/// Type for runtime polymorphism over whether the input byte stream is plain
/// or gzip-compressed. Implements [`std::io::Read`].
///
/// Gzip files produced by appending (each append starts a new gzip member)
/// decompress as one continuous stream.
pub struct DynReader<R>(DynReaderImpl<R>)
where
    R: io::BufRead;

enum DynReaderImpl<R>
where
    R: io::BufRead,
{
    Plain(R),
    Gzip(MultiGzDecoder<R>),
}

impl<R> DynReader<R>
where
    R: io::BufRead,
{
    /// Creates a new [`DynReader`] from a buffered reader, decompressing if
    /// `gzip` is `true`.
    pub fn with_buffer(reader: R, gzip: bool) -> Self {
        if gzip {
            Self(DynReaderImpl::Gzip(MultiGzDecoder::new(reader)))
        } else {
            Self(DynReaderImpl::Plain(reader))
        }
    }

    /// Returns a mutable reference to the inner reader.
    pub fn get_mut(&mut self) -> &mut R {
        match &mut self.0 {
            DynReaderImpl::Plain(reader) => reader,
            DynReaderImpl::Gzip(reader) => reader.get_mut(),
        }
    }

    /// Returns a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        match &self.0 {
            DynReaderImpl::Plain(reader) => reader,
            DynReaderImpl::Gzip(reader) => reader.get_ref(),
        }
    }
}

impl<R> DynReader<BufReader<R>>
where
    R: io::Read,
{
    /// Creates a new [`DynReader`] from a reader, decompressing if `gzip` is
    /// `true`. If `reader` also implements [`BufRead`](io::BufRead), it's
    /// better to use [`with_buffer()`](Self::with_buffer).
    pub fn new(reader: R, gzip: bool) -> Self {
        Self::with_buffer(BufReader::new(reader), gzip)
    }
}

impl DynReader<BufReader<File>> {
    /// Creates a new [`DynReader`] from the file at `path`. A `.gz` filename
    /// suffix selects the gzip backend.
    ///
    /// # Errors
    /// This function returns an error if it fails to open the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::io(
                e,
                format!("opening file to decode at path '{}'", path.display()),
            )
        })?;
        Ok(DynReader::new(file, path_is_gzip(path)))
    }
}

impl<R> io::Read for DynReader<R>
where
    R: io::BufRead,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.0 {
            DynReaderImpl::Plain(r) => r.read(buf),
            DynReaderImpl::Gzip(r) => r.read(buf),
        }
    }
}

/// Returns `true` if the filename suffix selects the gzip backend.
pub(crate) fn path_is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}
