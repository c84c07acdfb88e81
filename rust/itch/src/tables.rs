//! Column tables for decoded messages: one concrete table type per message
//! class, and [`ClassTable`], the closed enum over all thirteen.
//!
//! Every table shares the header columns (message type, stock locate,
//! tracking number, timestamp). Columns a type does not populate within its
//! class schema carry typed null sentinels: [`NULL_I64`] and [`NULL_I32`] for
//! integers, `f64::NAN` for prices, and `None` for tri-state booleans and
//! strings. The absent string is distinct from the empty string, which is a
//! valid decoded value.

use tracing::warn;

use crate::catalog::MsgClass;
use crate::wire::{
    price4_to_f64, price8_to_f64, read_fixed_ascii, read_i32, read_i64, read_u16, read_u48,
};

/// The sentinel for absent 64-bit integer columns.
pub const NULL_I64: i64 = i64::MIN;
/// The sentinel for absent 32-bit integer columns.
pub const NULL_I32: i32 = i32::MIN;

/// Decodes a `Y`/`N`/space byte into a tri-state boolean.
#[inline]
fn tri_state(byte: u8) -> Option<bool> {
    match byte {
        b'Y' => Some(true),
        b'N' => Some(false),
        _ => None,
    }
}

/// The header columns shared by every message class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderColumns {
    /// The message type of each row.
    pub msg_type: Vec<char>,
    /// The exchange-assigned symbol locate code of each row.
    pub stock_locate: Vec<u16>,
    /// The exchange-internal tracking number of each row.
    pub tracking_number: Vec<u16>,
    /// Nanoseconds since midnight.
    pub timestamp: Vec<i64>,
}

impl HeaderColumns {
    fn with_capacity(n: usize) -> Self {
        Self {
            msg_type: Vec::with_capacity(n),
            stock_locate: Vec::with_capacity(n),
            tracking_number: Vec::with_capacity(n),
            timestamp: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, rec: &[u8]) {
        self.msg_type.push(rec[0] as char);
        self.stock_locate.push(read_u16(&rec[1..]));
        self.tracking_number.push(read_u16(&rec[3..]));
        self.timestamp.push(read_u48(&rec[5..]));
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.msg_type.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.msg_type.is_empty()
    }
}

/// Capability shared by the thirteen column tables: create with a capacity
/// hint and append one decoded record.
pub(crate) trait ColumnSink {
    fn with_capacity(n: usize) -> Self;

    /// Decodes `rec` (frame prefix stripped) into the columns. The caller
    /// guarantees `rec[0]` belongs to this table's class and that `rec` is
    /// the full catalog length for its type.
    fn push_record(&mut self, rec: &[u8]);
}

/// Column table for system event messages (type `S`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemEventsTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The system event code.
    pub event_code: Vec<char>,
}

impl ColumnSink for SystemEventsTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            event_code: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.event_code.push(rec[11] as char);
    }
}

/// Column table for stock directory messages (type `R`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockDirectoryTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The symbol, trailing spaces trimmed.
    pub stock: Vec<String>,
    /// The listing market category code.
    pub market_category: Vec<char>,
    /// The financial status indicator code.
    pub financial_status: Vec<char>,
    /// The number of shares in a round lot.
    pub lot_size: Vec<i32>,
    /// Whether only round-lot orders are accepted.
    pub round_lots_only: Vec<bool>,
    /// The issue classification code.
    pub issue_classification: Vec<char>,
    /// The issue sub-type code.
    pub issue_subtype: Vec<String>,
    /// `true` for live/production instruments, `false` for test.
    pub authentic: Vec<bool>,
    /// Whether the issue is subject to mandatory close-out of short sales.
    pub short_sell_closeout: Vec<Option<bool>>,
    /// Whether the issue is being set up for an IPO release.
    pub ipo_flag: Vec<Option<bool>>,
    /// The LULD price tier code.
    pub luld_price_tier: Vec<char>,
    /// Whether the issue is an exchange traded product.
    pub etp_flag: Vec<Option<bool>>,
    /// The ETP leverage factor.
    pub etp_leverage: Vec<i32>,
    /// Whether the ETP is an inverse product.
    pub inverse: Vec<bool>,
}

impl ColumnSink for StockDirectoryTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            stock: Vec::with_capacity(n),
            market_category: Vec::with_capacity(n),
            financial_status: Vec::with_capacity(n),
            lot_size: Vec::with_capacity(n),
            round_lots_only: Vec::with_capacity(n),
            issue_classification: Vec::with_capacity(n),
            issue_subtype: Vec::with_capacity(n),
            authentic: Vec::with_capacity(n),
            short_sell_closeout: Vec::with_capacity(n),
            ipo_flag: Vec::with_capacity(n),
            luld_price_tier: Vec::with_capacity(n),
            etp_flag: Vec::with_capacity(n),
            etp_leverage: Vec::with_capacity(n),
            inverse: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.stock.push(read_fixed_ascii(&rec[11..19]));
        self.market_category.push(rec[19] as char);
        self.financial_status.push(rec[20] as char);
        self.lot_size.push(read_i32(&rec[21..]));
        self.round_lots_only.push(rec[25] == b'Y');
        self.issue_classification.push(rec[26] as char);
        self.issue_subtype.push(read_fixed_ascii(&rec[27..29]));
        // P is live/production, T is test
        self.authentic.push(rec[29] == b'P');
        self.short_sell_closeout.push(tri_state(rec[30]));
        self.ipo_flag.push(tri_state(rec[31]));
        self.luld_price_tier.push(rec[32] as char);
        self.etp_flag.push(tri_state(rec[33]));
        self.etp_leverage.push(read_i32(&rec[34..]));
        self.inverse.push(rec[38] == b'Y');
    }
}

/// Column table for trading status messages (types `H` and `h`).
///
/// Type `H` populates the trading-state columns, type `h` the market-code
/// columns; the other half of the schema carries null sentinels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradingStatusTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The symbol, trailing spaces trimmed.
    pub stock: Vec<String>,
    /// The trading state code (type `H` only).
    pub trading_state: Vec<Option<char>>,
    /// Reserved byte (type `H` only).
    pub reserved: Vec<Option<char>>,
    /// The trading action reason (type `H` only).
    pub reason: Vec<Option<String>>,
    /// The market code (type `h` only).
    pub market_code: Vec<Option<char>>,
    /// Whether the operation is halted (type `h` only).
    pub operation_halted: Vec<Option<bool>>,
}

impl ColumnSink for TradingStatusTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            stock: Vec::with_capacity(n),
            trading_state: Vec::with_capacity(n),
            reserved: Vec::with_capacity(n),
            reason: Vec::with_capacity(n),
            market_code: Vec::with_capacity(n),
            operation_halted: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.stock.push(read_fixed_ascii(&rec[11..19]));
        if rec[0] == b'H' {
            self.trading_state.push(Some(rec[19] as char));
            self.reserved.push(Some(rec[20] as char));
            self.reason.push(Some(read_fixed_ascii(&rec[21..25])));
            self.market_code.push(None);
            self.operation_halted.push(None);
        } else {
            self.trading_state.push(None);
            self.reserved.push(None);
            self.reason.push(None);
            self.market_code.push(Some(rec[19] as char));
            self.operation_halted.push(Some(rec[20] == b'H'));
        }
    }
}

/// Column table for Reg SHO short sale price test messages (type `Y`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegShoTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The symbol, trailing spaces trimmed.
    pub stock: Vec<String>,
    /// The Reg SHO action code.
    pub regsho_action: Vec<char>,
}

impl ColumnSink for RegShoTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            stock: Vec::with_capacity(n),
            regsho_action: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.stock.push(read_fixed_ascii(&rec[11..19]));
        self.regsho_action.push(rec[19] as char);
    }
}

/// Column table for market participant position messages (type `L`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketParticipantStatesTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The market participant identifier.
    pub mpid: Vec<String>,
    /// The symbol, trailing spaces trimmed.
    pub stock: Vec<String>,
    /// Whether the participant is a primary market maker.
    pub primary_mm: Vec<bool>,
    /// The market maker mode code.
    pub mm_mode: Vec<char>,
    /// The market participant state code.
    pub participant_state: Vec<char>,
}

impl ColumnSink for MarketParticipantStatesTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            mpid: Vec::with_capacity(n),
            stock: Vec::with_capacity(n),
            primary_mm: Vec::with_capacity(n),
            mm_mode: Vec::with_capacity(n),
            participant_state: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.mpid.push(read_fixed_ascii(&rec[11..15]));
        self.stock.push(read_fixed_ascii(&rec[15..23]));
        self.primary_mm.push(rec[23] == b'Y');
        self.mm_mode.push(rec[24] as char);
        self.participant_state.push(rec[25] as char);
    }
}

/// Column table for market-wide circuit breaker messages (types `V` and `W`).
///
/// Type `V` populates the three decline levels (eight implied decimal
/// places), type `W` the breached level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MwcbTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The level 1 decline threshold (type `V` only).
    pub level1: Vec<f64>,
    /// The level 2 decline threshold (type `V` only).
    pub level2: Vec<f64>,
    /// The level 3 decline threshold (type `V` only).
    pub level3: Vec<f64>,
    /// The breached level, 1 to 3 (type `W` only).
    pub breached_level: Vec<i32>,
}

impl ColumnSink for MwcbTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            level1: Vec::with_capacity(n),
            level2: Vec::with_capacity(n),
            level3: Vec::with_capacity(n),
            breached_level: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        if rec[0] == b'V' {
            self.level1.push(price8_to_f64(read_i64(&rec[11..])));
            self.level2.push(price8_to_f64(read_i64(&rec[19..])));
            self.level3.push(price8_to_f64(read_i64(&rec[27..])));
            self.breached_level.push(NULL_I32);
        } else {
            self.level1.push(f64::NAN);
            self.level2.push(f64::NAN);
            self.level3.push(f64::NAN);
            self.breached_level.push((rec[11] - b'0') as i32);
        }
    }
}

/// Column table for IPO quoting period update messages (type `K`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IpoTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The symbol, trailing spaces trimmed.
    pub stock: Vec<String>,
    /// The quotation release time in seconds since midnight.
    pub release_time: Vec<i32>,
    /// The release qualifier code.
    pub release_qualifier: Vec<char>,
    /// The IPO price.
    pub ipo_price: Vec<f64>,
}

impl ColumnSink for IpoTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            stock: Vec::with_capacity(n),
            release_time: Vec::with_capacity(n),
            release_qualifier: Vec::with_capacity(n),
            ipo_price: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.stock.push(read_fixed_ascii(&rec[11..19]));
        self.release_time.push(read_i32(&rec[19..]));
        self.release_qualifier.push(rec[23] as char);
        self.ipo_price.push(price4_to_f64(read_i32(&rec[24..])));
    }
}

/// Column table for limit up / limit down auction collar messages (type `J`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LuldTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The symbol, trailing spaces trimmed.
    pub stock: Vec<String>,
    /// The auction collar reference price.
    pub reference_price: Vec<f64>,
    /// The upper auction collar price.
    pub upper_price: Vec<f64>,
    /// The lower auction collar price.
    pub lower_price: Vec<f64>,
    /// The number of extensions.
    pub extension: Vec<i32>,
}

impl ColumnSink for LuldTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            stock: Vec::with_capacity(n),
            reference_price: Vec::with_capacity(n),
            upper_price: Vec::with_capacity(n),
            lower_price: Vec::with_capacity(n),
            extension: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.stock.push(read_fixed_ascii(&rec[11..19]));
        self.reference_price.push(price4_to_f64(read_i32(&rec[19..])));
        self.upper_price.push(price4_to_f64(read_i32(&rec[23..])));
        self.lower_price.push(price4_to_f64(read_i32(&rec[27..])));
        self.extension.push(read_i32(&rec[31..]));
    }
}

/// Column table for add order messages (types `A` and `F`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The exchange-assigned order reference number.
    pub order_ref: Vec<i64>,
    /// `true` for buy orders, `false` for sell orders.
    pub buy: Vec<bool>,
    /// The number of shares.
    pub shares: Vec<i32>,
    /// The symbol, trailing spaces trimmed.
    pub stock: Vec<String>,
    /// The limit price.
    pub price: Vec<f64>,
    /// The attributed market participant (type `F` only).
    pub mpid: Vec<Option<String>>,
}

impl ColumnSink for OrdersTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            order_ref: Vec::with_capacity(n),
            buy: Vec::with_capacity(n),
            shares: Vec::with_capacity(n),
            stock: Vec::with_capacity(n),
            price: Vec::with_capacity(n),
            mpid: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.order_ref.push(read_i64(&rec[11..]));
        self.buy.push(rec[19] == b'B');
        self.shares.push(read_i32(&rec[20..]));
        self.stock.push(read_fixed_ascii(&rec[24..32]));
        self.price.push(price4_to_f64(read_i32(&rec[32..])));
        self.mpid.push(if rec[0] == b'F' {
            Some(read_fixed_ascii(&rec[36..40]))
        } else {
            None
        });
    }
}

/// Column table for order modification messages (types `E`, `C`, `X`, `D`,
/// and `U`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModificationsTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The reference number of the affected order.
    pub order_ref: Vec<i64>,
    /// Executed or canceled shares (types `E`, `C`, `X`; new size for `U`).
    pub shares: Vec<i32>,
    /// The execution match number (types `E` and `C` only).
    pub match_number: Vec<i64>,
    /// Whether the execution is reflected on displays (type `C` only).
    pub printable: Vec<Option<bool>>,
    /// The execution or replacement price (types `C` and `U` only).
    pub price: Vec<f64>,
    /// The replacing order's reference number (type `U` only).
    pub new_order_ref: Vec<i64>,
}

impl ColumnSink for ModificationsTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            order_ref: Vec::with_capacity(n),
            shares: Vec::with_capacity(n),
            match_number: Vec::with_capacity(n),
            printable: Vec::with_capacity(n),
            price: Vec::with_capacity(n),
            new_order_ref: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.order_ref.push(read_i64(&rec[11..]));
        match rec[0] {
            b'E' => {
                self.shares.push(read_i32(&rec[19..]));
                self.match_number.push(read_i64(&rec[23..]));
                self.printable.push(None);
                self.price.push(f64::NAN);
                self.new_order_ref.push(NULL_I64);
            }
            b'C' => {
                self.shares.push(read_i32(&rec[19..]));
                self.match_number.push(read_i64(&rec[23..]));
                self.printable.push(Some(rec[31] == b'P'));
                self.price.push(price4_to_f64(read_i32(&rec[32..])));
                self.new_order_ref.push(NULL_I64);
            }
            b'X' => {
                self.shares.push(read_i32(&rec[19..]));
                self.match_number.push(NULL_I64);
                self.printable.push(None);
                self.price.push(f64::NAN);
                self.new_order_ref.push(NULL_I64);
            }
            b'D' => {
                self.shares.push(NULL_I32);
                self.match_number.push(NULL_I64);
                self.printable.push(None);
                self.price.push(f64::NAN);
                self.new_order_ref.push(NULL_I64);
            }
            _ => {
                // 'U' replaces the order under a new reference number
                self.new_order_ref.push(read_i64(&rec[19..]));
                self.shares.push(read_i32(&rec[27..]));
                self.price.push(price4_to_f64(read_i32(&rec[31..])));
                self.match_number.push(NULL_I64);
                self.printable.push(None);
            }
        }
    }
}

/// Column table for trade messages (types `P`, `Q`, and `B`).
///
/// Broken trades (`B`) carry only a match number; every other column holds a
/// null sentinel for those rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradesTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The reference number of the matched order (type `P` only).
    pub order_ref: Vec<i64>,
    /// Whether the matched order was a buy order (type `P` only).
    pub buy: Vec<Option<bool>>,
    /// The number of shares traded.
    pub shares: Vec<i32>,
    /// The symbol, trailing spaces trimmed.
    pub stock: Vec<Option<String>>,
    /// The trade price.
    pub price: Vec<f64>,
    /// The exchange-assigned match number.
    pub match_number: Vec<i64>,
    /// The auction phase of a cross trade (type `Q` only).
    pub cross_type: Vec<Option<char>>,
}

impl ColumnSink for TradesTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            order_ref: Vec::with_capacity(n),
            buy: Vec::with_capacity(n),
            shares: Vec::with_capacity(n),
            stock: Vec::with_capacity(n),
            price: Vec::with_capacity(n),
            match_number: Vec::with_capacity(n),
            cross_type: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        match rec[0] {
            b'P' => {
                self.order_ref.push(read_i64(&rec[11..]));
                self.buy.push(Some(rec[19] == b'B'));
                self.shares.push(read_i32(&rec[20..]));
                self.stock.push(Some(read_fixed_ascii(&rec[24..32])));
                self.price.push(price4_to_f64(read_i32(&rec[32..])));
                self.match_number.push(read_i64(&rec[36..]));
                self.cross_type.push(None);
            }
            b'Q' => {
                // cross trades carry an 8-byte share count; the column is
                // 32-bit like every other share field
                let wide = read_i64(&rec[11..]);
                if wide > i32::MAX as i64 {
                    warn!(
                        row = self.hd.len() - 1,
                        shares = wide,
                        "cross trade share count exceeds 32 bits, truncating"
                    );
                }
                self.shares.push(wide as i32);
                self.stock.push(Some(read_fixed_ascii(&rec[19..27])));
                self.price.push(price4_to_f64(read_i32(&rec[27..])));
                self.match_number.push(read_i64(&rec[31..]));
                self.cross_type.push(Some(rec[39] as char));
                self.order_ref.push(NULL_I64);
                self.buy.push(None);
            }
            _ => {
                // 'B'
                self.match_number.push(read_i64(&rec[11..]));
                self.order_ref.push(NULL_I64);
                self.buy.push(None);
                self.shares.push(NULL_I32);
                self.stock.push(None);
                self.price.push(f64::NAN);
                self.cross_type.push(None);
            }
        }
    }
}

/// Column table for net order imbalance indicator messages (type `I`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoiiTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The number of shares matched at the current reference price.
    pub paired_shares: Vec<i64>,
    /// The number of unmatched shares at the current reference price.
    pub imbalance_shares: Vec<i64>,
    /// The direction of the imbalance.
    pub imbalance_direction: Vec<char>,
    /// The symbol, trailing spaces trimmed.
    pub stock: Vec<String>,
    /// The far clearing price.
    pub far_price: Vec<f64>,
    /// The near clearing price.
    pub near_price: Vec<f64>,
    /// The current reference price.
    pub reference_price: Vec<f64>,
    /// The auction phase of the cross.
    pub cross_type: Vec<char>,
    /// The price variation indicator.
    pub variation_indicator: Vec<char>,
}

impl ColumnSink for NoiiTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            paired_shares: Vec::with_capacity(n),
            imbalance_shares: Vec::with_capacity(n),
            imbalance_direction: Vec::with_capacity(n),
            stock: Vec::with_capacity(n),
            far_price: Vec::with_capacity(n),
            near_price: Vec::with_capacity(n),
            reference_price: Vec::with_capacity(n),
            cross_type: Vec::with_capacity(n),
            variation_indicator: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.paired_shares.push(read_i64(&rec[11..]));
        self.imbalance_shares.push(read_i64(&rec[19..]));
        self.imbalance_direction.push(rec[27] as char);
        self.stock.push(read_fixed_ascii(&rec[28..36]));
        self.far_price.push(price4_to_f64(read_i32(&rec[36..])));
        self.near_price.push(price4_to_f64(read_i32(&rec[40..])));
        self.reference_price.push(price4_to_f64(read_i32(&rec[44..])));
        self.cross_type.push(rec[48] as char);
        self.variation_indicator.push(rec[49] as char);
    }
}

/// Column table for retail price improvement indicator messages (type `N`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpiiTable {
    /// The shared header columns.
    pub hd: HeaderColumns,
    /// The symbol, trailing spaces trimmed.
    pub stock: Vec<String>,
    /// The retail interest flag.
    pub interest_flag: Vec<char>,
}

impl ColumnSink for RpiiTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            hd: HeaderColumns::with_capacity(n),
            stock: Vec::with_capacity(n),
            interest_flag: Vec::with_capacity(n),
        }
    }

    fn push_record(&mut self, rec: &[u8]) {
        self.hd.push(rec);
        self.stock.push(read_fixed_ascii(&rec[11..19]));
        self.interest_flag.push(rec[19] as char);
    }
}

/// A decoded column table for one message class.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassTable {
    /// System event messages.
    SystemEvents(SystemEventsTable),
    /// Stock directory messages.
    StockDirectory(StockDirectoryTable),
    /// Trading status messages.
    TradingStatus(TradingStatusTable),
    /// Reg SHO messages.
    RegSho(RegShoTable),
    /// Market participant position messages.
    MarketParticipantStates(MarketParticipantStatesTable),
    /// Market-wide circuit breaker messages.
    Mwcb(MwcbTable),
    /// IPO quoting period update messages.
    Ipo(IpoTable),
    /// LULD auction collar messages.
    Luld(LuldTable),
    /// Add order messages.
    Orders(OrdersTable),
    /// Order modification messages.
    Modifications(ModificationsTable),
    /// Trade messages.
    Trades(TradesTable),
    /// Net order imbalance indicator messages.
    Noii(NoiiTable),
    /// Retail price improvement indicator messages.
    Rpii(RpiiTable),
}

/// Dispatches `$body` over the concrete table inside a [`ClassTable`].
macro_rules! with_table {
    ($table:expr, |$t:ident| $body:expr) => {
        match $table {
            ClassTable::SystemEvents($t) => $body,
            ClassTable::StockDirectory($t) => $body,
            ClassTable::TradingStatus($t) => $body,
            ClassTable::RegSho($t) => $body,
            ClassTable::MarketParticipantStates($t) => $body,
            ClassTable::Mwcb($t) => $body,
            ClassTable::Ipo($t) => $body,
            ClassTable::Luld($t) => $body,
            ClassTable::Orders($t) => $body,
            ClassTable::Modifications($t) => $body,
            ClassTable::Trades($t) => $body,
            ClassTable::Noii($t) => $body,
            ClassTable::Rpii($t) => $body,
        }
    };
}
pub(crate) use with_table;

impl ClassTable {
    /// Creates an empty table of the given class with row capacity `n`.
    pub fn with_capacity(class: MsgClass, n: usize) -> Self {
        match class {
            MsgClass::SystemEvents => Self::SystemEvents(SystemEventsTable::with_capacity(n)),
            MsgClass::StockDirectory => Self::StockDirectory(StockDirectoryTable::with_capacity(n)),
            MsgClass::TradingStatus => Self::TradingStatus(TradingStatusTable::with_capacity(n)),
            MsgClass::RegSho => Self::RegSho(RegShoTable::with_capacity(n)),
            MsgClass::MarketParticipantStates => {
                Self::MarketParticipantStates(MarketParticipantStatesTable::with_capacity(n))
            }
            MsgClass::Mwcb => Self::Mwcb(MwcbTable::with_capacity(n)),
            MsgClass::Ipo => Self::Ipo(IpoTable::with_capacity(n)),
            MsgClass::Luld => Self::Luld(LuldTable::with_capacity(n)),
            MsgClass::Orders => Self::Orders(OrdersTable::with_capacity(n)),
            MsgClass::Modifications => Self::Modifications(ModificationsTable::with_capacity(n)),
            MsgClass::Trades => Self::Trades(TradesTable::with_capacity(n)),
            MsgClass::Noii => Self::Noii(NoiiTable::with_capacity(n)),
            MsgClass::Rpii => Self::Rpii(RpiiTable::with_capacity(n)),
        }
    }

    /// The class whose records this table holds.
    pub fn class(&self) -> MsgClass {
        match self {
            Self::SystemEvents(_) => MsgClass::SystemEvents,
            Self::StockDirectory(_) => MsgClass::StockDirectory,
            Self::TradingStatus(_) => MsgClass::TradingStatus,
            Self::RegSho(_) => MsgClass::RegSho,
            Self::MarketParticipantStates(_) => MsgClass::MarketParticipantStates,
            Self::Mwcb(_) => MsgClass::Mwcb,
            Self::Ipo(_) => MsgClass::Ipo,
            Self::Luld(_) => MsgClass::Luld,
            Self::Orders(_) => MsgClass::Orders,
            Self::Modifications(_) => MsgClass::Modifications,
            Self::Trades(_) => MsgClass::Trades,
            Self::Noii(_) => MsgClass::Noii,
            Self::Rpii(_) => MsgClass::Rpii,
        }
    }

    /// The shared header columns.
    pub fn header(&self) -> &HeaderColumns {
        with_table!(self, |t| &t.hd)
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.header().len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.header().is_empty()
    }

    /// The message type of the given row.
    pub fn msg_type(&self, row: usize) -> char {
        self.header().msg_type[row]
    }

    /// The timestamp of the given row in nanoseconds since midnight.
    pub fn timestamp(&self, row: usize) -> i64 {
        self.header().timestamp[row]
    }

    pub(crate) fn push_record(&mut self, rec: &[u8]) {
        with_table!(self, |t| t.push_record(rec))
    }
}

macro_rules! impl_from_table {
    ($($variant:ident => $table:ty),* $(,)?) => {
        $(
            impl From<$table> for ClassTable {
                fn from(table: $table) -> Self {
                    Self::$variant(table)
                }
            }
        )*
    };
}

impl_from_table! {
    SystemEvents => SystemEventsTable,
    StockDirectory => StockDirectoryTable,
    TradingStatus => TradingStatusTable,
    RegSho => RegShoTable,
    MarketParticipantStates => MarketParticipantStatesTable,
    Mwcb => MwcbTable,
    Ipo => IpoTable,
    Luld => LuldTable,
    Orders => OrdersTable,
    Modifications => ModificationsTable,
    Trades => TradesTable,
    Noii => NoiiTable,
    Rpii => RpiiTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tri_state() {
        assert_eq!(tri_state(b'Y'), Some(true));
        assert_eq!(tri_state(b'N'), Some(false));
        assert_eq!(tri_state(b' '), None);
    }

    #[test]
    fn test_with_capacity_round_trips_class() {
        for class in MsgClass::ALL {
            let table = ClassTable::with_capacity(class, 8);
            assert_eq!(table.class(), class);
            assert!(table.is_empty());
        }
    }
}
