//! Runtime polymorphism over plain and gzip-compressed output streams.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::{Error, Result};

/// Type for runtime polymorphism over whether the output byte stream is plain
/// or gzip-compressed. Implements [`std::io::Write`].
pub struct DynWriter<W>(DynWriterImpl<W>)
where
    W: io::Write;

enum DynWriterImpl<W>
where
    W: io::Write,
{
    Plain(W),
    Gzip(GzEncoder<W>),
}

impl<W> DynWriter<W>
where
    W: io::Write,
{
    /// Creates a new [`DynWriter`] which will wrap `writer`, compressing if
    /// `gzip` is `true`.
    pub fn new(writer: W, gzip: bool) -> Self {
        if gzip {
            Self(DynWriterImpl::Gzip(GzEncoder::new(
                writer,
                Compression::default(),
            )))
        } else {
            Self(DynWriterImpl::Plain(writer))
        }
    }

    /// Returns a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        match &mut self.0 {
            DynWriterImpl::Plain(writer) => writer,
            DynWriterImpl::Gzip(enc) => enc.get_mut(),
        }
    }

    /// Finishes the stream, writing the gzip trailer if compressing, and
    /// flushes the underlying writer.
    ///
    /// # Errors
    /// This function returns an error if the trailer or buffered bytes cannot
    /// be written.
    pub fn finish(self) -> Result<()> {
        let finish_err = |e| Error::io(e, "finishing output");
        match self.0 {
            DynWriterImpl::Plain(mut writer) => writer.flush().map_err(finish_err),
            DynWriterImpl::Gzip(enc) => enc
                .finish()
                .and_then(|mut writer| writer.flush())
                .map_err(finish_err),
        }
    }
}

impl DynWriter<BufWriter<File>> {
    /// Creates a new [`DynWriter`] writing to the file at `path` with an
    /// output buffer of `buffer_size` bytes. The file is truncated unless
    /// `append` is set. Appending to a gzip file starts a new gzip member,
    /// which [`DynReader`](crate::decode::DynReader) reads back as one
    /// continuous stream.
    ///
    /// # Errors
    /// This function returns an error if it fails to open the file.
    pub fn from_file(
        path: impl AsRef<Path>,
        append: bool,
        gzip: bool,
        buffer_size: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = if append {
            OpenOptions::new().create(true).append(true).open(path)
        } else {
            File::create(path)
        }
        .map_err(|e| {
            Error::io(
                e,
                format!("opening file to encode at path '{}'", path.display()),
            )
        })?;
        Ok(Self::new(BufWriter::with_capacity(buffer_size, file), gzip))
    }
}

impl<W> io::Write for DynWriter<W>
where
    W: io::Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.0 {
            DynWriterImpl::Plain(writer) => writer.write(buf),
            DynWriterImpl::Gzip(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.0 {
            DynWriterImpl::Plain(writer) => writer.flush(),
            DynWriterImpl::Gzip(writer) => writer.flush(),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match &mut self.0 {
            DynWriterImpl::Plain(writer) => writer.write_all(buf),
            DynWriterImpl::Gzip(writer) => writer.write_all(buf),
        }
    }
}
