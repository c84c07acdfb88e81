//! Types for errors that can occur while reading, decoding, encoding, or
//! writing ITCH data.

use thiserror::Error;

/// An error that can occur with ITCH data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error from the operating system or a compression stream.
    #[error("I/O error: {source} while {context}")]
    Io {
        /// The original error.
        source: std::io::Error,
        /// The context in which the error occurred.
        context: String,
    },
    /// An unknown message type byte was found at a record boundary. The stream
    /// is presumed corrupt from this offset onwards.
    #[error("framing error: unknown message type {msg_type:#04x} at byte offset {offset}")]
    Framing {
        /// The byte that is not a valid message type.
        msg_type: u8,
        /// The absolute offset of the bad byte in the uncompressed stream.
        offset: u64,
    },
    /// The supplied buffer size cannot hold the longest framed record.
    #[error("buffer of {actual} bytes is too small: the longest framed record is {required} bytes")]
    BufferTooSmall {
        /// The minimum usable buffer size in bytes.
        required: usize,
        /// The buffer size that was supplied.
        actual: usize,
    },
    /// An error while decoding an ITCH record.
    #[error("decoding error: {0}")]
    Decode(String),
    /// An error while encoding an ITCH record.
    #[error("encoding error: {0}")]
    Encode(String),
    /// An invalid argument was passed.
    #[error("bad argument `{param_name}`: {desc}")]
    BadArgument {
        /// The name of the invalid argument.
        param_name: String,
        /// The description of why it was invalid.
        desc: String,
    },
    /// The operation was interrupted at a buffer boundary.
    #[error("cancelled while {0}")]
    Cancelled(String),
}

/// An alias for a `Result` with [`enum@Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new I/O [`enum@Error`] with the given `context`.
    pub fn io(source: std::io::Error, context: impl ToString) -> Self {
        Self::Io {
            source,
            context: context.to_string(),
        }
    }

    /// Creates a new decode [`enum@Error`].
    pub fn decode(msg: impl ToString) -> Self {
        Self::Decode(msg.to_string())
    }

    /// Creates a new encode [`enum@Error`].
    pub fn encode(msg: impl ToString) -> Self {
        Self::Encode(msg.to_string())
    }

    /// Creates a new bad-argument [`enum@Error`].
    pub fn bad_argument(param_name: impl ToString, desc: impl ToString) -> Self {
        Self::BadArgument {
            param_name: param_name.to_string(),
            desc: desc.to_string(),
        }
    }
}
