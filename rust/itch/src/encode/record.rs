//! Per-class row encoders producing the exact on-wire record layouts.

use crate::catalog::{message_size, FRAME_PREFIX_LEN};
use crate::tables::{
    with_table, ClassTable, HeaderColumns, IpoTable, LuldTable, MarketParticipantStatesTable,
    ModificationsTable, MwcbTable, NoiiTable, OrdersTable, RegShoTable, RpiiTable,
    StockDirectoryTable, SystemEventsTable, TradesTable, TradingStatusTable,
};
use crate::wire::{
    f64_to_price4, f64_to_price8, write_fixed_ascii, write_i32, write_i64, write_u16, write_u48,
};

/// Capability shared by the thirteen column tables: write the framed wire
/// image of one row.
pub(crate) trait EncodeRow {
    /// Writes the framed wire image of `row` into the front of `out`,
    /// returning the number of bytes written. `out` must hold at least
    /// [`MIN_BUFFER_SIZE`](crate::catalog::MIN_BUFFER_SIZE) bytes. Only the
    /// columns the row's type populates are consulted.
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize;
}

/// Zeroes the frame, writes the prefix and the four header fields, and
/// returns the record body slice with the type byte at offset 0.
fn encode_header<'a>(hd: &HeaderColumns, row: usize, msg: u8, out: &'a mut [u8]) -> &'a mut [u8] {
    let frame = &mut out[..message_size(msg)];
    frame.fill(0);
    let rec = &mut frame[FRAME_PREFIX_LEN..];
    rec[0] = msg;
    write_u16(&mut rec[1..], hd.stock_locate[row]);
    write_u16(&mut rec[3..], hd.tracking_number[row]);
    write_u48(&mut rec[5..], hd.timestamp[row]);
    rec
}

#[inline]
fn yn(val: bool) -> u8 {
    if val {
        b'Y'
    } else {
        b'N'
    }
}

#[inline]
fn tri_byte(val: Option<bool>) -> u8 {
    match val {
        Some(true) => b'Y',
        Some(false) => b'N',
        None => b' ',
    }
}

#[inline]
fn opt_char(val: Option<char>) -> u8 {
    val.map_or(b' ', |c| c as u8)
}

impl EncodeRow for SystemEventsTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        rec[11] = self.event_code[row] as u8;
        message_size(msg)
    }
}

impl EncodeRow for StockDirectoryTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        write_fixed_ascii(&mut rec[11..19], &self.stock[row]);
        rec[19] = self.market_category[row] as u8;
        rec[20] = self.financial_status[row] as u8;
        write_i32(&mut rec[21..], self.lot_size[row]);
        rec[25] = yn(self.round_lots_only[row]);
        rec[26] = self.issue_classification[row] as u8;
        write_fixed_ascii(&mut rec[27..29], &self.issue_subtype[row]);
        rec[29] = if self.authentic[row] { b'P' } else { b'T' };
        rec[30] = tri_byte(self.short_sell_closeout[row]);
        rec[31] = tri_byte(self.ipo_flag[row]);
        rec[32] = self.luld_price_tier[row] as u8;
        rec[33] = tri_byte(self.etp_flag[row]);
        write_i32(&mut rec[34..], self.etp_leverage[row]);
        rec[38] = yn(self.inverse[row]);
        message_size(msg)
    }
}

impl EncodeRow for TradingStatusTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        write_fixed_ascii(&mut rec[11..19], &self.stock[row]);
        if msg == b'H' {
            rec[19] = opt_char(self.trading_state[row]);
            rec[20] = opt_char(self.reserved[row]);
            write_fixed_ascii(&mut rec[21..25], self.reason[row].as_deref().unwrap_or(""));
        } else {
            rec[19] = opt_char(self.market_code[row]);
            rec[20] = if self.operation_halted[row].unwrap_or(false) {
                b'H'
            } else {
                b'T'
            };
        }
        message_size(msg)
    }
}

impl EncodeRow for RegShoTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        write_fixed_ascii(&mut rec[11..19], &self.stock[row]);
        rec[19] = self.regsho_action[row] as u8;
        message_size(msg)
    }
}

impl EncodeRow for MarketParticipantStatesTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        write_fixed_ascii(&mut rec[11..15], &self.mpid[row]);
        write_fixed_ascii(&mut rec[15..23], &self.stock[row]);
        rec[23] = yn(self.primary_mm[row]);
        rec[24] = self.mm_mode[row] as u8;
        rec[25] = self.participant_state[row] as u8;
        message_size(msg)
    }
}

impl EncodeRow for MwcbTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        if msg == b'V' {
            write_i64(&mut rec[11..], f64_to_price8(self.level1[row]));
            write_i64(&mut rec[19..], f64_to_price8(self.level2[row]));
            write_i64(&mut rec[27..], f64_to_price8(self.level3[row]));
        } else {
            rec[11] = b'0' + self.breached_level[row] as u8;
        }
        message_size(msg)
    }
}

impl EncodeRow for IpoTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        write_fixed_ascii(&mut rec[11..19], &self.stock[row]);
        write_i32(&mut rec[19..], self.release_time[row]);
        rec[23] = self.release_qualifier[row] as u8;
        write_i32(&mut rec[24..], f64_to_price4(self.ipo_price[row]));
        message_size(msg)
    }
}

impl EncodeRow for LuldTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        write_fixed_ascii(&mut rec[11..19], &self.stock[row]);
        write_i32(&mut rec[19..], f64_to_price4(self.reference_price[row]));
        write_i32(&mut rec[23..], f64_to_price4(self.upper_price[row]));
        write_i32(&mut rec[27..], f64_to_price4(self.lower_price[row]));
        write_i32(&mut rec[31..], self.extension[row]);
        message_size(msg)
    }
}

impl EncodeRow for OrdersTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        write_i64(&mut rec[11..], self.order_ref[row]);
        rec[19] = if self.buy[row] { b'B' } else { b'S' };
        write_i32(&mut rec[20..], self.shares[row]);
        write_fixed_ascii(&mut rec[24..32], &self.stock[row]);
        write_i32(&mut rec[32..], f64_to_price4(self.price[row]));
        if msg == b'F' {
            write_fixed_ascii(&mut rec[36..40], self.mpid[row].as_deref().unwrap_or(""));
        }
        message_size(msg)
    }
}

impl EncodeRow for ModificationsTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        write_i64(&mut rec[11..], self.order_ref[row]);
        match msg {
            b'E' => {
                write_i32(&mut rec[19..], self.shares[row]);
                write_i64(&mut rec[23..], self.match_number[row]);
            }
            b'C' => {
                write_i32(&mut rec[19..], self.shares[row]);
                write_i64(&mut rec[23..], self.match_number[row]);
                rec[31] = if self.printable[row].unwrap_or(false) {
                    b'P'
                } else {
                    b'Y'
                };
                write_i32(&mut rec[32..], f64_to_price4(self.price[row]));
            }
            b'X' => {
                write_i32(&mut rec[19..], self.shares[row]);
            }
            b'D' => {}
            _ => {
                // 'U'
                write_i64(&mut rec[19..], self.new_order_ref[row]);
                write_i32(&mut rec[27..], self.shares[row]);
                write_i32(&mut rec[31..], f64_to_price4(self.price[row]));
            }
        }
        message_size(msg)
    }
}

impl EncodeRow for TradesTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        match msg {
            b'P' => {
                write_i64(&mut rec[11..], self.order_ref[row]);
                rec[19] = if self.buy[row].unwrap_or(false) {
                    b'B'
                } else {
                    b'S'
                };
                write_i32(&mut rec[20..], self.shares[row]);
                write_fixed_ascii(&mut rec[24..32], self.stock[row].as_deref().unwrap_or(""));
                write_i32(&mut rec[32..], f64_to_price4(self.price[row]));
                write_i64(&mut rec[36..], self.match_number[row]);
            }
            b'Q' => {
                // the cross share count field is 8 bytes on the wire
                write_i64(&mut rec[11..], self.shares[row] as i64);
                write_fixed_ascii(&mut rec[19..27], self.stock[row].as_deref().unwrap_or(""));
                write_i32(&mut rec[27..], f64_to_price4(self.price[row]));
                write_i64(&mut rec[31..], self.match_number[row]);
                rec[39] = opt_char(self.cross_type[row]);
            }
            _ => {
                // 'B'
                write_i64(&mut rec[11..], self.match_number[row]);
            }
        }
        message_size(msg)
    }
}

impl EncodeRow for NoiiTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        write_i64(&mut rec[11..], self.paired_shares[row]);
        write_i64(&mut rec[19..], self.imbalance_shares[row]);
        rec[27] = self.imbalance_direction[row] as u8;
        write_fixed_ascii(&mut rec[28..36], &self.stock[row]);
        write_i32(&mut rec[36..], f64_to_price4(self.far_price[row]));
        write_i32(&mut rec[40..], f64_to_price4(self.near_price[row]));
        write_i32(&mut rec[44..], f64_to_price4(self.reference_price[row]));
        rec[48] = self.cross_type[row] as u8;
        rec[49] = self.variation_indicator[row] as u8;
        message_size(msg)
    }
}

impl EncodeRow for RpiiTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        let msg = self.hd.msg_type[row] as u8;
        let rec = encode_header(&self.hd, row, msg, out);
        write_fixed_ascii(&mut rec[11..19], &self.stock[row]);
        rec[19] = self.interest_flag[row] as u8;
        message_size(msg)
    }
}

impl EncodeRow for ClassTable {
    fn encode_row(&self, row: usize, out: &mut [u8]) -> usize {
        with_table!(self, |t| t.encode_row(row, out))
    }
}
