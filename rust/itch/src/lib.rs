//! A library for counting, decoding, filtering, and encoding NASDAQ
//! TotalView-ITCH 5.0 market data files.
//!
//! An ITCH file is a stream of variable-length, big-endian, typed records.
//! This crate frames that stream through bounded buffers, decodes selected
//! message classes into columnar tables (one [`ClassTable`] per class),
//! re-encodes tables back into the bit-exact wire format merged in timestamp
//! order, and copies record subsets between files without decoding them.
//! Plain and gzip-compressed files are handled transparently, selected by a
//! `.gz` filename suffix.
//!
//! # Example
//! ```no_run
//! use itch::{MsgClass, ReadParams};
//!
//! fn main() -> itch::Result<()> {
//!     let counts = itch::count("20101224.TEST_ITCH_50", itch::DEFAULT_BUFFER_SIZE, None)?;
//!     println!("{} messages", counts.total());
//!
//!     let tables = itch::read(
//!         "20101224.TEST_ITCH_50",
//!         &[MsgClass::Orders, MsgClass::Trades],
//!         &ReadParams::default(),
//!     )?;
//!     println!("{} order rows", tables[0].len());
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(clippy::missing_errors_doc)]

pub mod catalog;
mod count;
pub mod debug;
pub mod decode;
pub mod encode;
mod error;
mod filter;
mod gz;
mod tables;
mod wire;

pub use crate::catalog::{
    class_of, message_size, record_len, MsgClass, ACTIVE_TYPES, DEFAULT_BUFFER_SIZE,
    FRAME_PREFIX_LEN, MAX_RECORD_LEN, MAX_WRITE_BUFFER_SIZE, MIN_BUFFER_SIZE,
};
pub use crate::count::{count, count_reader, MessageCounts};
pub use crate::decode::{read, read_reader, DynReader, Filters, ReadParams};
pub use crate::encode::{write, write_records, DynWriter, WriteParams};
pub use crate::error::{Error, Result};
pub use crate::filter::{filter, filter_io, FilterParams, FilterSummary};
pub use crate::gz::{gunzip_file, gzip_file};
pub use crate::tables::{
    ClassTable, HeaderColumns, IpoTable, LuldTable, MarketParticipantStatesTable,
    ModificationsTable, MwcbTable, NoiiTable, OrdersTable, RegShoTable, RpiiTable,
    StockDirectoryTable, SystemEventsTable, TradesTable, TradingStatusTable, NULL_I32, NULL_I64,
};
