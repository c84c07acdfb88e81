//! Copying selected messages from one ITCH stream to another without
//! decoding them into columns.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::info;

use crate::catalog::{class_of, MsgClass, DEFAULT_BUFFER_SIZE, FRAME_PREFIX_LEN};
use crate::decode::framer::Framer;
use crate::decode::{DynReader, Filters};
use crate::encode::DynWriter;
use crate::wire::read_u48;
use crate::{Error, Result};

/// Parameters for [`filter`].
#[derive(Debug, Clone)]
pub struct FilterParams {
    /// The first class-local ordinal to copy.
    pub skip: u64,
    /// The last class-local ordinal to copy (inclusive); `None` means no
    /// end. Ordinals count per message class, only over messages that passed
    /// the predicates.
    pub limit: Option<u64>,
    /// Record predicates.
    pub filters: Filters,
    /// Appends to the output file instead of truncating it.
    pub append: bool,
    /// The streaming window size in bytes.
    pub buffer_size: usize,
    /// Checked at every buffer refill; raising it cancels the copy.
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: None,
            filters: Filters::default(),
            append: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            interrupt: None,
        }
    }
}

/// What a [`filter`] run scanned and kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    /// Bytes of framed records scanned from the input.
    pub bytes_scanned: u64,
    /// Bytes of framed records copied to the output.
    pub bytes_written: u64,
    /// Messages scanned from the input.
    pub messages_scanned: u64,
    /// Messages copied to the output.
    pub messages_written: u64,
}

/// Copies the messages of `in_path` accepted by the predicates and the
/// per-class window to `out_path`, verbatim and in input order. A `.gz`
/// filename suffix on either path selects the gzip backend for that side.
///
/// # Errors
/// This function returns an error if no predicate and no window is set (the
/// copy would be the identity), if either file cannot be opened, on framing
/// errors, or when cancelled through the interrupt flag.
pub fn filter(
    in_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    params: &FilterParams,
) -> Result<FilterSummary> {
    let out_path = out_path.as_ref();
    if params.filters.is_empty() && params.skip == 0 && params.limit.is_none() {
        return Err(Error::bad_argument(
            "filters",
            "no predicates or window set, aborting the filter process",
        ));
    }
    let reader = DynReader::from_file(in_path)?;
    let gzip = crate::decode::dyn_reader::path_is_gzip(out_path);
    let mut writer = DynWriter::from_file(out_path, params.append, gzip, params.buffer_size)?;
    let summary = filter_io(reader, &mut writer, params)?;
    writer.finish()?;
    info!(
        bytes_scanned = summary.bytes_scanned,
        bytes_written = summary.bytes_written,
        messages_scanned = summary.messages_scanned,
        messages_written = summary.messages_written,
        "filtered messages"
    );
    Ok(summary)
}

/// Copies the accepted messages of an ITCH byte stream to `writer`. The
/// driver behind [`filter`], usable with any reader and writer.
///
/// # Errors
/// This function returns an error if reading or writing fails, on framing
/// errors, or when cancelled through the interrupt flag.
pub fn filter_io<R: Read, W: Write>(
    reader: R,
    writer: &mut W,
    params: &FilterParams,
) -> Result<FilterSummary> {
    let mut framer = Framer::new(
        reader,
        params.buffer_size,
        params.interrupt.clone(),
        "filtering messages",
    )?;
    let max_ts = params.filters.max_timestamp();
    let end_ordinal = params.limit.unwrap_or(u64::MAX);
    // class-local window ordinals, indexed by class discriminant
    let mut matched = [0u64; MsgClass::COUNT];
    let mut summary = FilterSummary::default();

    while let Some(frame) = framer.next_frame()? {
        let rec = &frame[FRAME_PREFIX_LEN..];
        if read_u48(&rec[5..]) > max_ts {
            break;
        }
        summary.messages_scanned += 1;
        summary.bytes_scanned += frame.len() as u64;
        if !params.filters.accepts(rec) {
            continue;
        }
        // every framed type belongs to a class; the window counts per class
        let Some(class) = class_of(rec[0]) else {
            continue;
        };
        let ordinal = matched[class as usize];
        matched[class as usize] += 1;
        if ordinal < params.skip || ordinal > end_ordinal {
            continue;
        }
        writer
            .write_all(frame)
            .map_err(|e| Error::io(e, "writing filtered messages"))?;
        summary.messages_written += 1;
        summary.bytes_written += frame.len() as u64;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MIN_BUFFER_SIZE;
    use crate::count::count_reader;
    use crate::decode::tests::{add_order, cross_trade};

    fn small(params: FilterParams) -> FilterParams {
        FilterParams {
            buffer_size: MIN_BUFFER_SIZE,
            ..params
        }
    }

    #[test]
    fn test_filter_by_stock_locate_copies_verbatim() {
        let mut bytes = Vec::new();
        let mut expected = Vec::new();
        for (locate, ts) in [(1, 10), (5, 20), (5, 30), (2, 40)] {
            let frame = add_order(locate, ts, 9, true, 100, "UFO", 129_600);
            if locate == 5 {
                expected.extend_from_slice(&frame);
            }
            bytes.extend_from_slice(&frame);
        }
        let mut out = Vec::new();
        let summary = filter_io(
            bytes.as_slice(),
            &mut out,
            &small(FilterParams {
                filters: Filters {
                    stock_locates: vec![5],
                    ..Filters::default()
                },
                ..FilterParams::default()
            }),
        )
        .unwrap();
        assert_eq!(out, expected);
        assert_eq!(summary.messages_scanned, 4);
        assert_eq!(summary.messages_written, 2);
        assert_eq!(summary.bytes_scanned, bytes.len() as u64);
        assert_eq!(summary.bytes_written, expected.len() as u64);
    }

    #[test]
    fn test_window_counts_per_class() {
        let mut bytes = Vec::new();
        for i in 0..4i64 {
            bytes.extend_from_slice(&add_order(1, i * 2, i, true, 1, "UFO", 1));
            bytes.extend_from_slice(&cross_trade(1, i * 2 + 1, 100, "UFO"));
        }
        let mut out = Vec::new();
        filter_io(
            bytes.as_slice(),
            &mut out,
            &small(FilterParams {
                skip: 1,
                limit: Some(2),
                ..FilterParams::default()
            }),
        )
        .unwrap();
        // ordinals 1 and 2 of each class survive
        let counts = count_reader(out.as_slice(), MIN_BUFFER_SIZE, None).unwrap();
        assert_eq!(counts.get(b'A'), 2);
        assert_eq!(counts.get(b'Q'), 2);
    }

    #[test]
    fn test_timestamp_early_exit() {
        let mut bytes = Vec::new();
        for ts in [10, 20, 30, 40] {
            bytes.extend_from_slice(&add_order(1, ts, ts, true, 1, "UFO", 1));
        }
        let mut out = Vec::new();
        let summary = filter_io(
            bytes.as_slice(),
            &mut out,
            &small(FilterParams {
                filters: Filters {
                    timestamps: vec![(0, 25)],
                    ..Filters::default()
                },
                ..FilterParams::default()
            }),
        )
        .unwrap();
        assert_eq!(summary.messages_written, 2);
        // the scan stopped at the first message past the bound
        assert_eq!(summary.messages_scanned, 2);
    }

    #[test]
    fn test_identity_filter_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let in_path = dir.path().join("in.itch");
        std::fs::write(&in_path, add_order(1, 10, 4, true, 1, "UFO", 1)).unwrap();
        let res = filter(
            &in_path,
            dir.path().join("out.itch"),
            &FilterParams::default(),
        );
        assert!(matches!(res, Err(Error::BadArgument { .. })));
    }
}
