//! Record framing over a bounded in-memory window.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::catalog::{record_len, FRAME_PREFIX_LEN, MIN_BUFFER_SIZE};
use crate::{Error, Result};

/// Walks a byte stream one framed record at a time through a bounded buffer.
///
/// The window is refilled whenever the next record no longer fits completely;
/// the partial tail is carried to the front of the buffer so a record never
/// has to be reassembled across reads. The buffer floor guarantees any single
/// framed record fits.
pub(crate) struct Framer<R> {
    reader: R,
    buf: Vec<u8>,
    /// Parse position within `buf`.
    pos: usize,
    /// One past the last valid byte in `buf`.
    end: usize,
    /// Absolute stream offset of `buf[0]`.
    base_offset: u64,
    eof: bool,
    interrupt: Option<Arc<AtomicBool>>,
    context: &'static str,
}

impl<R: Read> Framer<R> {
    /// Creates a framer with a window of `buffer_size` bytes.
    ///
    /// # Errors
    /// This function returns [`Error::BufferTooSmall`] if `buffer_size`
    /// cannot hold the longest framed record.
    pub(crate) fn new(
        reader: R,
        buffer_size: usize,
        interrupt: Option<Arc<AtomicBool>>,
        context: &'static str,
    ) -> Result<Self> {
        if buffer_size < MIN_BUFFER_SIZE {
            return Err(Error::BufferTooSmall {
                required: MIN_BUFFER_SIZE,
                actual: buffer_size,
            });
        }
        Ok(Self {
            reader,
            buf: vec![0; buffer_size],
            pos: 0,
            end: 0,
            base_offset: 0,
            eof: false,
            interrupt,
            context,
        })
    }

    /// The absolute stream offset of the next frame.
    pub(crate) fn offset(&self) -> u64 {
        self.base_offset + self.pos as u64
    }

    fn refill(&mut self) -> Result<()> {
        if let Some(flag) = &self.interrupt {
            if flag.load(Ordering::Relaxed) {
                return Err(Error::Cancelled(self.context.to_owned()));
            }
        }
        self.buf.copy_within(self.pos..self.end, 0);
        self.base_offset += self.pos as u64;
        self.end -= self.pos;
        self.pos = 0;
        while self.end < self.buf.len() {
            let n = self
                .reader
                .read(&mut self.buf[self.end..])
                .map_err(|e| Error::io(e, self.context))?;
            if n == 0 {
                self.eof = true;
                break;
            }
            self.end += n;
        }
        Ok(())
    }

    /// Returns the next frame (2-byte prefix plus record), or `None` at end
    /// of stream. A partial trailing record ends the stream; only the fully
    /// framed prefix of the input is consumed.
    ///
    /// # Errors
    /// This function returns [`Error::Framing`] when the byte at a record
    /// boundary is not a valid message type, and [`Error::Cancelled`] when
    /// the interrupt flag is raised at a refill boundary.
    pub(crate) fn next_frame(&mut self) -> Result<Option<&[u8]>> {
        loop {
            let avail = self.end - self.pos;
            if avail > FRAME_PREFIX_LEN {
                let msg_type = self.buf[self.pos + FRAME_PREFIX_LEN];
                let len = record_len(msg_type);
                if len == 0 {
                    return Err(Error::Framing {
                        msg_type,
                        offset: self.offset() + FRAME_PREFIX_LEN as u64,
                    });
                }
                let frame_len = FRAME_PREFIX_LEN + len;
                if avail >= frame_len {
                    let start = self.pos;
                    self.pos += frame_len;
                    return Ok(Some(&self.buf[start..start + frame_len]));
                }
            }
            if self.eof {
                return Ok(None);
            }
            self.refill()?;
        }
    }
}
