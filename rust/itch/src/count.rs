//! Counting messages by type without decoding them.

use std::io::Read;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::catalog::{MsgClass, ACTIVE_TYPES, ALPHABET_LEN, FRAME_PREFIX_LEN};
use crate::decode::framer::Framer;
use crate::decode::DynReader;
use crate::Result;

/// Per-type message counts over the full 40-symbol type alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCounts {
    counts: [u64; ALPHABET_LEN],
}

impl Default for MessageCounts {
    fn default() -> Self {
        Self {
            counts: [0; ALPHABET_LEN],
        }
    }
}

impl MessageCounts {
    /// A synthetic count of `n` for every type, used in place of a counting
    /// pass when a window limit already bounds the rows to materialize.
    pub(crate) fn uniform(n: u64) -> Self {
        Self {
            counts: [n; ALPHABET_LEN],
        }
    }

    #[inline]
    fn slot(msg_type: u8) -> Option<usize> {
        let idx = msg_type.wrapping_sub(b'A') as usize;
        (idx < ALPHABET_LEN).then_some(idx)
    }

    #[inline]
    pub(crate) fn add(&mut self, msg_type: u8) {
        if let Some(idx) = Self::slot(msg_type) {
            self.counts[idx] += 1;
        }
    }

    /// The number of messages of the given type.
    pub fn get(&self, msg_type: u8) -> u64 {
        Self::slot(msg_type).map_or(0, |idx| self.counts[idx])
    }

    /// The counts of the 22 active message types, in canonical order.
    pub fn active(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        ACTIVE_TYPES.iter().map(|&t| (t as char, self.get(t)))
    }

    /// The total number of messages counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// The number of messages belonging to the given class.
    pub fn class_total(&self, class: MsgClass) -> u64 {
        class.types().iter().map(|&t| self.get(t)).sum()
    }
}

/// Counts the messages in the file at `path` without decoding them. A `.gz`
/// filename suffix selects the gzip backend.
///
/// # Errors
/// This function returns an error if it fails to open or read the file, if
/// an unknown message type is found at a record boundary, or if `buffer_size`
/// cannot hold the longest framed record.
pub fn count(
    path: impl AsRef<Path>,
    buffer_size: usize,
    interrupt: Option<Arc<AtomicBool>>,
) -> Result<MessageCounts> {
    let reader = DynReader::from_file(path)?;
    count_reader(reader, buffer_size, interrupt)
}

/// Counts the messages in an ITCH byte stream without decoding them.
///
/// # Errors
/// This function returns an error under the same conditions as [`count`].
pub fn count_reader<R: Read>(
    reader: R,
    buffer_size: usize,
    interrupt: Option<Arc<AtomicBool>>,
) -> Result<MessageCounts> {
    let mut framer = Framer::new(reader, buffer_size, interrupt, "counting messages")?;
    let mut counts = MessageCounts::default();
    while let Some(frame) = framer.next_frame()? {
        counts.add(frame[FRAME_PREFIX_LEN]);
    }
    Ok(counts)
}
