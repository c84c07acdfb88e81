//! The static ITCH 5.0 message catalog: per-type record lengths, the set of
//! active message types, and the grouping of types into message classes.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::Error;

/// The number of zero bytes preceding every record on the wire.
pub const FRAME_PREFIX_LEN: usize = 2;
/// The length of the longest record in the catalog (type `I`), excluding the
/// frame prefix.
pub const MAX_RECORD_LEN: usize = 50;
/// The smallest usable buffer size: one framed record of maximum length.
pub const MIN_BUFFER_SIZE: usize = FRAME_PREFIX_LEN + MAX_RECORD_LEN;
/// The default streaming buffer size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 100_000_000;
/// The hard cap applied to write buffer sizes.
pub const MAX_WRITE_BUFFER_SIZE: usize = 5_000_000_000;

/// The message types the codec decodes and encodes, in canonical order.
pub const ACTIVE_TYPES: [u8; 22] = *b"SRHYLVWKJhAFECXDUPQBIN";

/// The size of the contiguous type-byte alphabet `'A'..='h'`.
pub(crate) const ALPHABET_LEN: usize = 40;

// Record lengths for the contiguous type-byte range 'A'..='h'; zero marks a
// hole in the alphabet.
const LENGTHS: [u8; ALPHABET_LEN] = [
    // A   B   C   D   E   F  G   H   I   J   K   L  M   N  O   P   Q   R   S  T
    36, 19, 36, 19, 31, 40, 0, 25, 50, 35, 28, 26, 0, 20, 0, 44, 40, 39, 12, 0,
    // U   V   W   X   Y  Z  [  \  ]  ^  _  `  a  b  c  d  e  f  g   h
    35, 35, 12, 23, 20, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 21,
];

static RECORD_LENGTHS: [u8; 256] = build_length_table();

const fn build_length_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < ALPHABET_LEN {
        table[b'A' as usize + i] = LENGTHS[i];
        i += 1;
    }
    table
}

/// Returns the on-wire record length for a message type byte, excluding the
/// frame prefix. Zero means the byte is not a valid message type.
#[inline]
pub fn record_len(msg_type: u8) -> usize {
    RECORD_LENGTHS[msg_type as usize] as usize
}

/// Returns the full framed size of a message: frame prefix plus record.
#[inline]
pub fn message_size(msg_type: u8) -> usize {
    FRAME_PREFIX_LEN + record_len(msg_type)
}

/// A semantic grouping of message types that share one column schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum MsgClass {
    /// System event messages (type `S`).
    SystemEvents = 0,
    /// Stock directory messages (type `R`).
    StockDirectory,
    /// Stock and market-wide trading actions (types `H` and `h`).
    TradingStatus,
    /// Reg SHO short sale price test restrictions (type `Y`).
    RegSho,
    /// Market participant position messages (type `L`).
    MarketParticipantStates,
    /// Market-wide circuit breaker levels and breaches (types `V` and `W`).
    Mwcb,
    /// IPO quoting period updates (type `K`).
    Ipo,
    /// Limit up / limit down auction collars (type `J`).
    Luld,
    /// Add order messages, with and without MPID attribution (types `A` and `F`).
    Orders,
    /// Order executions, cancels, deletes, and replaces (types `E`, `C`, `X`,
    /// `D`, and `U`).
    Modifications,
    /// Non-cross trades, cross trades, and broken trades (types `P`, `Q`, and
    /// `B`).
    Trades,
    /// Net order imbalance indicators (type `I`).
    Noii,
    /// Retail price improvement indicators (type `N`).
    Rpii,
}

impl MsgClass {
    /// The number of message classes.
    pub const COUNT: usize = 13;

    /// All message classes in canonical order.
    pub const ALL: [MsgClass; Self::COUNT] = [
        MsgClass::SystemEvents,
        MsgClass::StockDirectory,
        MsgClass::TradingStatus,
        MsgClass::RegSho,
        MsgClass::MarketParticipantStates,
        MsgClass::Mwcb,
        MsgClass::Ipo,
        MsgClass::Luld,
        MsgClass::Orders,
        MsgClass::Modifications,
        MsgClass::Trades,
        MsgClass::Noii,
        MsgClass::Rpii,
    ];

    /// Converts the message class to its `str` representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MsgClass::SystemEvents => "system_events",
            MsgClass::StockDirectory => "stock_directory",
            MsgClass::TradingStatus => "trading_status",
            MsgClass::RegSho => "reg_sho",
            MsgClass::MarketParticipantStates => "market_participant_states",
            MsgClass::Mwcb => "mwcb",
            MsgClass::Ipo => "ipo",
            MsgClass::Luld => "luld",
            MsgClass::Orders => "orders",
            MsgClass::Modifications => "modifications",
            MsgClass::Trades => "trades",
            MsgClass::Noii => "noii",
            MsgClass::Rpii => "rpii",
        }
    }

    /// The message type bytes owned by this class.
    pub const fn types(&self) -> &'static [u8] {
        match self {
            MsgClass::SystemEvents => b"S",
            MsgClass::StockDirectory => b"R",
            MsgClass::TradingStatus => b"Hh",
            MsgClass::RegSho => b"Y",
            MsgClass::MarketParticipantStates => b"L",
            MsgClass::Mwcb => b"VW",
            MsgClass::Ipo => b"K",
            MsgClass::Luld => b"J",
            MsgClass::Orders => b"AF",
            MsgClass::Modifications => b"ECXDU",
            MsgClass::Trades => b"PQB",
            MsgClass::Noii => b"I",
            MsgClass::Rpii => b"N",
        }
    }
}

impl AsRef<str> for MsgClass {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for MsgClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MsgClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MsgClass::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| Error::bad_argument("class", format!("unknown message class '{s}'")))
    }
}

const NO_CLASS: u8 = u8::MAX;

static TYPE_CLASSES: [u8; 256] = build_class_table();

const fn build_class_table() -> [u8; 256] {
    let mut table = [NO_CLASS; 256];
    let mut c = 0;
    while c < MsgClass::COUNT {
        let types = MsgClass::ALL[c].types();
        let mut t = 0;
        while t < types.len() {
            table[types[t] as usize] = MsgClass::ALL[c] as u8;
            t += 1;
        }
        c += 1;
    }
    table
}

/// Maps a message type byte to the class that owns it, or `None` for bytes
/// outside the active set.
#[inline]
pub fn class_of(msg_type: u8) -> Option<MsgClass> {
    MsgClass::try_from(TYPE_CLASSES[msg_type as usize]).ok()
}
