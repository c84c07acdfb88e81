//! Decoding ITCH files and streams into columnar tables.

pub(crate) mod dyn_reader;
pub(crate) mod framer;

use std::io::Read;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{debug, info};

pub use dyn_reader::DynReader;

use crate::catalog::{MsgClass, DEFAULT_BUFFER_SIZE, FRAME_PREFIX_LEN};
use crate::count::{count, MessageCounts};
use crate::tables::ClassTable;
use crate::wire::{read_u16, read_u48};
use crate::{Error, Result};

use framer::Framer;

/// Rows reserved up front are capped when no counting pass bounds them.
const MAX_CAPACITY_HINT: usize = 1 << 23;

/// Conjunctive record predicates, evaluated on raw header bytes before any
/// per-field decoding. Empty predicate sets accept everything.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Accepted message types.
    pub msg_types: Vec<char>,
    /// Accepted stock locate codes.
    pub stock_locates: Vec<u16>,
    /// A union of inclusive `(min, max)` timestamp ranges in nanoseconds
    /// since midnight. A pair with `min > max` is an empty interval.
    pub timestamps: Vec<(i64, i64)>,
}

impl Filters {
    /// Returns `true` if no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.msg_types.is_empty() && self.stock_locates.is_empty() && self.timestamps.is_empty()
    }

    /// Evaluates all predicates against the raw record bytes (frame prefix
    /// stripped).
    pub(crate) fn accepts(&self, rec: &[u8]) -> bool {
        if !self.msg_types.is_empty() && !self.msg_types.contains(&(rec[0] as char)) {
            return false;
        }
        if !self.stock_locates.is_empty() && !self.stock_locates.contains(&read_u16(&rec[1..])) {
            return false;
        }
        if !self.timestamps.is_empty() {
            let ts = read_u48(&rec[5..]);
            return self.timestamps.iter().any(|&(lo, hi)| ts >= lo && ts <= hi);
        }
        true
    }

    /// The largest upper bound across all timestamp ranges. Messages beyond
    /// it can never match, so the scan stops there.
    pub(crate) fn max_timestamp(&self) -> i64 {
        self.timestamps
            .iter()
            .map(|&(_, hi)| hi)
            .max()
            .unwrap_or(i64::MAX)
    }
}

/// Parameters for [`read`].
#[derive(Debug, Clone)]
pub struct ReadParams {
    /// The first class-local ordinal to materialize.
    pub skip: u64,
    /// The last class-local ordinal to materialize (inclusive); `None` means
    /// no end. Ordinals count only messages that passed the class and
    /// predicate checks.
    pub limit: Option<u64>,
    /// Record predicates.
    pub filters: Filters,
    /// The streaming window size in bytes.
    pub buffer_size: usize,
    /// Checked at every buffer refill; raising it cancels the read without
    /// returning a partial table.
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl Default for ReadParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: None,
            filters: Filters::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            interrupt: None,
        }
    }
}

/// Per-class decode state: the table under construction and the window
/// bookkeeping.
struct ClassSink {
    table: ClassTable,
    /// Class-local ordinal of the next matching message.
    matched: u64,
    active: bool,
}

/// Reads the selected classes of the file at `path` into columnar tables,
/// returned in request order. A `.gz` filename suffix selects the gzip
/// backend.
///
/// Row capacity is reserved from a counting pass over the file; when
/// `params.limit` is set the counting pass is skipped and the window bounds
/// the reservation instead.
///
/// # Errors
/// This function returns an error if the file cannot be opened or read, if a
/// class is requested twice, on a framing error, or when the read is
/// cancelled through the interrupt flag.
pub fn read(
    path: impl AsRef<Path>,
    classes: &[MsgClass],
    params: &ReadParams,
) -> Result<Vec<ClassTable>> {
    let path = path.as_ref();
    let counts = match params.limit {
        Some(limit) => {
            MessageCounts::uniform(limit.saturating_sub(params.skip).saturating_add(1))
        }
        None => {
            let counts = count(path, params.buffer_size, params.interrupt.clone())?;
            info!(messages = counts.total(), "counted messages");
            for &class in classes {
                let n = counts.class_total(class);
                if n != 0 {
                    info!(class = %class, messages = n, "counted class messages");
                }
            }
            counts
        }
    };
    let reader = DynReader::from_file(path)?;
    read_reader(reader, classes, params, &counts)
}

/// Reads the selected classes of an ITCH byte stream into columnar tables,
/// with row capacity reserved from `counts`.
///
/// # Errors
/// This function returns an error under the same conditions as [`read`].
pub fn read_reader<R: Read>(
    reader: R,
    classes: &[MsgClass],
    params: &ReadParams,
    counts: &MessageCounts,
) -> Result<Vec<ClassTable>> {
    const NO_SLOT: usize = usize::MAX;

    let mut router = [NO_SLOT; 256];
    let mut sinks = Vec::with_capacity(classes.len());
    for (slot, &class) in classes.iter().enumerate() {
        let hint = usize::try_from(counts.class_total(class))
            .unwrap_or(usize::MAX)
            .min(MAX_CAPACITY_HINT);
        debug!(class = %class, capacity = hint, "initialized class sink");
        sinks.push(ClassSink {
            table: ClassTable::with_capacity(class, hint),
            matched: 0,
            active: true,
        });
        for &t in class.types() {
            if router[t as usize] != NO_SLOT {
                return Err(Error::bad_argument(
                    "classes",
                    format!("class '{class}' was requested more than once"),
                ));
            }
            router[t as usize] = slot;
        }
    }

    let mut framer = Framer::new(
        reader,
        params.buffer_size,
        params.interrupt.clone(),
        "reading messages",
    )?;
    let max_ts = params.filters.max_timestamp();
    let end_ordinal = params.limit.unwrap_or(u64::MAX);
    let mut active_count = sinks.len();

    while active_count > 0 {
        let Some(frame) = framer.next_frame()? else {
            break;
        };
        let rec = &frame[FRAME_PREFIX_LEN..];
        // timestamps are non-decreasing, so nothing past the largest upper
        // bound can match
        if read_u48(&rec[5..]) > max_ts {
            break;
        }
        let slot = router[rec[0] as usize];
        if slot == NO_SLOT {
            continue;
        }
        let sink = &mut sinks[slot];
        if !sink.active {
            continue;
        }
        if !params.filters.accepts(rec) {
            continue;
        }
        let ordinal = sink.matched;
        sink.matched += 1;
        if ordinal < params.skip {
            continue;
        }
        if ordinal > end_ordinal {
            sink.active = false;
            active_count -= 1;
            continue;
        }
        sink.table.push_record(rec);
    }

    Ok(sinks.into_iter().map(|sink| sink.table).collect())
}
