//! Encoding columnar tables back into the ITCH wire format, merged into one
//! stream in timestamp order.

pub(crate) mod record;

mod dyn_writer;

use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

pub use dyn_writer::DynWriter;

use crate::catalog::{message_size, MAX_WRITE_BUFFER_SIZE, MIN_BUFFER_SIZE};
use crate::tables::ClassTable;
use crate::{Error, Result};

use record::EncodeRow;

/// Parameters for [`write`].
#[derive(Debug, Clone)]
pub struct WriteParams {
    /// Appends to the output file instead of truncating it.
    pub append: bool,
    /// Gzip-compresses the output.
    pub gzip: bool,
    /// The output buffer size in bytes, clamped to
    /// `[MIN_BUFFER_SIZE, MAX_WRITE_BUFFER_SIZE]`.
    pub buffer_size: usize,
}

impl Default for WriteParams {
    fn default() -> Self {
        Self {
            append: false,
            gzip: false,
            buffer_size: crate::catalog::DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Returns the index of the smallest element, ties to the smallest index.
fn min_pos(timestamps: &[i64]) -> usize {
    let mut best = 0;
    for (idx, &ts) in timestamps.iter().enumerate().skip(1) {
        if ts < timestamps[best] {
            best = idx;
        }
    }
    best
}

/// Encodes every row of `tables` to the file at `path` as one binary stream
/// in non-decreasing timestamp order, and returns the number of wire bytes
/// emitted (before compression).
///
/// Each table must already be internally sorted by timestamp. Ties across
/// tables break by table index, then row index.
///
/// # Errors
/// This function returns an error if the output file cannot be opened or
/// written.
pub fn write(tables: &[ClassTable], path: impl AsRef<Path>, params: &WriteParams) -> Result<u64> {
    let mut buffer_size = params.buffer_size;
    if buffer_size > MAX_WRITE_BUFFER_SIZE {
        warn!(
            buffer_size,
            max = MAX_WRITE_BUFFER_SIZE,
            "write buffer size above the cap, clamping"
        );
        buffer_size = MAX_WRITE_BUFFER_SIZE;
    }
    if buffer_size < MIN_BUFFER_SIZE {
        warn!(
            buffer_size,
            min = MIN_BUFFER_SIZE,
            "write buffer size below one framed record, raising"
        );
        buffer_size = MIN_BUFFER_SIZE;
    }

    let mut total_msgs = 0u64;
    let mut total_bytes = 0u64;
    for table in tables {
        for row in 0..table.len() {
            total_msgs += 1;
            total_bytes += message_size(table.msg_type(row) as u8) as u64;
        }
    }
    info!(messages = total_msgs, bytes = total_bytes, "encoding messages");

    let buffer_size = buffer_size.min(total_bytes.max(MIN_BUFFER_SIZE as u64) as usize);
    let mut writer = DynWriter::from_file(path, params.append, params.gzip, buffer_size)?;
    let written = write_records(tables, &mut writer)?;
    writer.finish()?;
    Ok(written)
}

/// Encodes every row of `tables` to `writer` as one merged binary stream in
/// non-decreasing timestamp order, and returns the number of bytes written.
///
/// # Errors
/// This function returns an error if it fails to write to `writer`.
pub fn write_records<W: Write>(tables: &[ClassTable], writer: &mut W) -> Result<u64> {
    // cursor and head timestamp per table; exhausted tables park at i64::MAX
    let mut cursors = vec![0usize; tables.len()];
    let mut heads: Vec<i64> = tables
        .iter()
        .map(|t| if t.is_empty() { i64::MAX } else { t.timestamp(0) })
        .collect();
    let mut remaining: u64 = tables.iter().map(|t| t.len() as u64).sum();

    let mut scratch = [0u8; MIN_BUFFER_SIZE];
    let mut written = 0u64;
    while remaining > 0 {
        let table_idx = min_pos(&heads);
        let row = cursors[table_idx];
        let n = tables[table_idx].encode_row(row, &mut scratch);
        writer
            .write_all(&scratch[..n])
            .map_err(|e| Error::io(e, "writing encoded messages"))?;
        written += n as u64;
        cursors[table_idx] += 1;
        heads[table_idx] = if cursors[table_idx] < tables[table_idx].len() {
            tables[table_idx].timestamp(cursors[table_idx])
        } else {
            i64::MAX
        };
        remaining -= 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MsgClass, MIN_BUFFER_SIZE};
    use crate::count::count_reader;
    use crate::decode::{read_reader, ReadParams};
    use crate::tables::{HeaderColumns, OrdersTable, TradesTable};

    fn orders_table(timestamps: &[i64]) -> ClassTable {
        let n = timestamps.len();
        OrdersTable {
            hd: HeaderColumns {
                msg_type: vec!['A'; n],
                stock_locate: vec![1; n],
                tracking_number: vec![0; n],
                timestamp: timestamps.to_vec(),
            },
            order_ref: (0..n as i64).collect(),
            buy: vec![true; n],
            shares: vec![100; n],
            stock: vec!["UFO".to_owned(); n],
            price: vec![12.96; n],
            mpid: vec![None; n],
        }
        .into()
    }

    fn trades_table(timestamps: &[i64]) -> ClassTable {
        let n = timestamps.len();
        TradesTable {
            hd: HeaderColumns {
                msg_type: vec!['B'; n],
                stock_locate: vec![1; n],
                tracking_number: vec![0; n],
                timestamp: timestamps.to_vec(),
            },
            order_ref: vec![crate::tables::NULL_I64; n],
            buy: vec![None; n],
            shares: vec![crate::tables::NULL_I32; n],
            stock: vec![None; n],
            price: vec![f64::NAN; n],
            match_number: (0..n as i64).collect(),
            cross_type: vec![None; n],
        }
        .into()
    }

    fn merged_timestamps(tables: &[ClassTable]) -> Vec<i64> {
        let mut out = Vec::new();
        write_records(tables, &mut out).unwrap();
        let counts = count_reader(out.as_slice(), MIN_BUFFER_SIZE, None).unwrap();
        let decoded = read_reader(
            out.as_slice(),
            &[MsgClass::Orders, MsgClass::Trades],
            &ReadParams {
                buffer_size: MIN_BUFFER_SIZE,
                ..ReadParams::default()
            },
            &counts,
        )
        .unwrap();
        let mut stamped: Vec<(i64, char)> = Vec::new();
        for table in &decoded {
            for row in 0..table.len() {
                stamped.push((table.timestamp(row), table.msg_type(row)));
            }
        }
        // merge order is verified on the raw stream below; here return the
        // per-class view sorted for a content check
        stamped.sort_unstable();
        stamped.iter().map(|&(ts, _)| ts).collect()
    }

    #[test]
    fn test_two_table_merge_orders_by_timestamp() {
        let tables = [orders_table(&[10, 30]), trades_table(&[20])];
        let mut out = Vec::new();
        let written = write_records(&tables, &mut out).unwrap();
        assert_eq!(written, out.len() as u64);
        // walk the raw stream and confirm emit order 10, 20, 30
        let mut timestamps = Vec::new();
        let mut framer = crate::decode::framer::Framer::new(
            out.as_slice(),
            MIN_BUFFER_SIZE,
            None,
            "testing",
        )
        .unwrap();
        while let Some(frame) = framer.next_frame().unwrap() {
            timestamps.push(crate::wire::read_u48(&frame[7..]));
        }
        assert_eq!(timestamps, vec![10, 20, 30]);
    }

    #[test]
    fn test_merge_tie_breaks_by_table_index() {
        let tables = [orders_table(&[10]), trades_table(&[10])];
        let mut out = Vec::new();
        write_records(&tables, &mut out).unwrap();
        // the orders row (table 0) must come first
        assert_eq!(out[2], b'A');
    }

    #[test]
    fn test_merge_with_empty_tables() {
        let tables = [
            orders_table(&[]),
            trades_table(&[5, 15]),
            orders_table(&[10]),
        ];
        assert_eq!(merged_timestamps(&tables), vec![5, 10, 15]);
    }

    #[test]
    fn test_min_pos_prefers_smallest_index() {
        assert_eq!(min_pos(&[3, 1, 1, 2]), 1);
        assert_eq!(min_pos(&[7]), 0);
    }
}
