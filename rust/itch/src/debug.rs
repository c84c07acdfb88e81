//! Hex inspection of ITCH files: an interactive one-message-at-a-time dump
//! and the hex-string converters used as round-trip oracles.

use std::io::{BufRead, Read, Write};
use std::path::Path;

use crate::catalog::{record_len, ACTIVE_TYPES, FRAME_PREFIX_LEN, MsgClass, MIN_BUFFER_SIZE};
use crate::count::count_reader;
use crate::decode::dyn_reader::path_is_gzip;
use crate::decode::{read_reader, DynReader, ReadParams};
use crate::encode::record::EncodeRow;
use crate::tables::ClassTable;
use crate::{Error, Result};

/// Formats bytes as lowercase hex pairs separated by spaces.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a hex string into bytes, ignoring any whitespace.
///
/// # Errors
/// This function returns an error if the string contains a non-hex digit or
/// an odd number of digits.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(Error::decode("hex string has an odd number of digits"));
    }
    digits
        .chunks(2)
        .map(|pair| match (pair[0].to_digit(16), pair[1].to_digit(16)) {
            (Some(hi), Some(lo)) => Ok((hi * 16 + lo) as u8),
            _ => Err(Error::decode(format!(
                "invalid hex digit in '{}{}'",
                pair[0], pair[1]
            ))),
        })
        .collect()
}

/// Decodes every message of `class` in the hex string into a column table.
///
/// # Errors
/// This function returns an error if the hex string is malformed or frames
/// incorrectly.
pub fn hex_to_table(hex: &str, class: MsgClass) -> Result<ClassTable> {
    let bytes = hex_to_bytes(hex)?;
    let buffer_size = bytes.len().max(MIN_BUFFER_SIZE);
    let counts = count_reader(bytes.as_slice(), buffer_size, None)?;
    let params = ReadParams {
        buffer_size,
        ..ReadParams::default()
    };
    read_reader(bytes.as_slice(), &[class], &params, &counts)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::decode("decoding produced no table"))
}

/// Encodes every row of `table` in row order and formats the wire image as a
/// hex string.
pub fn table_to_hex(table: &ClassTable) -> String {
    let mut scratch = [0u8; MIN_BUFFER_SIZE];
    let mut bytes = Vec::new();
    for row in 0..table.len() {
        let n = table.encode_row(row, &mut scratch);
        bytes.extend_from_slice(&scratch[..n]);
    }
    bytes_to_hex(&bytes)
}

/// Interactively hex dumps the file at `path` one message at a time, driven
/// by lines from `input`:
///
/// - empty line: print the next message
/// - a number `n`: print the next `n` messages
/// - an active type letter present in the file: fast-forward to the next
///   message of that type
/// - anything else: exit
///
/// At most `buffer_size` bytes of the file are loaded.
///
/// # Errors
/// This function returns an error if the file cannot be opened or read, on a
/// framing error, or if writing to `output` fails.
pub fn debug_file(
    path: impl AsRef<Path>,
    buffer_size: usize,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    let path = path.as_ref();
    let gz = path_is_gzip(path);
    let mut reader = DynReader::from_file(path)?;
    let mut buf = vec![0u8; buffer_size.max(MIN_BUFFER_SIZE)];
    let mut end = 0;
    while end < buf.len() {
        let n = reader
            .read(&mut buf[end..])
            .map_err(|e| Error::io(e, "reading file to debug"))?;
        if n == 0 {
            break;
        }
        end += n;
    }
    let counts = count_reader(&buf[..end], buf.len(), None)?;

    let out_err = |e| Error::io(e, "writing debug output");
    writeln!(
        output,
        "Debugging file '{}' (.gz-file? {})",
        path.display(),
        if gz { "yes" } else { "no" }
    )
    .map_err(out_err)?;
    writeln!(output, "Usage:").map_err(out_err)?;
    writeln!(output, "- Empty: next message").map_err(out_err)?;
    writeln!(output, "- Number: print the next n messages").map_err(out_err)?;
    writeln!(
        output,
        "- Character: if a valid message type, print the next message of that type, e.g., 'A' for add order"
    )
    .map_err(out_err)?;
    writeln!(output, "- Other non-empty input: exit").map_err(out_err)?;
    writeln!(
        output,
        "Note: bytes in parentheses are the two framing bytes, which are not used"
    )
    .map_err(out_err)?;
    writeln!(output, "Number of messages:").map_err(out_err)?;
    for (t, n) in counts.active() {
        writeln!(output, "- '{t}': {n}").map_err(out_err)?;
    }
    writeln!(output, "=============================").map_err(out_err)?;

    let mut idx = 0usize;
    let mut msg_idx = 0u64;
    let mut skip_end = 0u64;
    let mut type_filter: Option<u8> = None;
    let mut line = String::new();
    loop {
        if idx + FRAME_PREFIX_LEN >= end {
            writeln!(
                output,
                "Reached the end of the buffer, increase the buffer size to read more"
            )
            .map_err(out_err)?;
            return Ok(());
        }
        let msg = buf[idx + FRAME_PREFIX_LEN];
        let len = record_len(msg);
        if len == 0 {
            return Err(Error::Framing {
                msg_type: msg,
                offset: (idx + FRAME_PREFIX_LEN) as u64,
            });
        }
        let frame_len = FRAME_PREFIX_LEN + len;
        if idx + frame_len > end {
            writeln!(
                output,
                "Reached the end of the buffer, increase the buffer size to read more"
            )
            .map_err(out_err)?;
            return Ok(());
        }
        if let Some(wanted) = type_filter {
            if msg != wanted {
                idx += frame_len;
                msg_idx += 1;
                continue;
            }
            type_filter = None;
        }

        writeln!(
            output,
            "'{}' (len 2 + {}) idx {:4} at offset {:5} (0x{:04x}) | ({}) {}",
            msg as char,
            len,
            msg_idx,
            idx,
            idx,
            bytes_to_hex(&buf[idx..idx + FRAME_PREFIX_LEN]),
            bytes_to_hex(&buf[idx + FRAME_PREFIX_LEN..idx + frame_len]),
        )
        .map_err(out_err)?;

        if msg_idx >= skip_end {
            write!(output, "itch> ").map_err(out_err)?;
            output.flush().map_err(out_err)?;
            line.clear();
            let read = input
                .read_line(&mut line)
                .map_err(|e| Error::io(e, "reading debug input"))?;
            if read == 0 {
                return Ok(());
            }
            let cmd = line.trim();
            if !cmd.is_empty() {
                if let Ok(n) = cmd.parse::<u64>() {
                    skip_end = msg_idx + n;
                    writeln!(output, "Showing the next {n} messages").map_err(out_err)?;
                } else {
                    let wanted = cmd.as_bytes()[0];
                    if ACTIVE_TYPES.contains(&wanted) {
                        if counts.get(wanted) == 0 {
                            writeln!(
                                output,
                                "No messages found for type '{}', increase the buffer size or use a different message type",
                                wanted as char
                            )
                            .map_err(out_err)?;
                            continue;
                        }
                        type_filter = Some(wanted);
                        writeln!(output, "Applied filter to message type '{}'", wanted as char)
                            .map_err(out_err)?;
                    } else {
                        writeln!(output, "Stopping printing messages").map_err(out_err)?;
                        return Ok(());
                    }
                }
            }
        }
        idx += frame_len;
        msg_idx += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::class_of;
    use crate::wire::{write_fixed_ascii, write_i32, write_i64, write_u16, write_u48};

    #[test]
    fn test_hex_round_trip() {
        let bytes = vec![0x00, 0x01, 0xfa, 0x40];
        let hex = bytes_to_hex(&bytes);
        assert_eq!(hex, "00 01 fa 40");
        assert_eq!(hex_to_bytes(&hex).unwrap(), bytes);
        assert_eq!(hex_to_bytes("0001FA40").unwrap(), bytes);
    }

    #[test]
    fn test_hex_rejects_bad_input() {
        assert!(matches!(hex_to_bytes("0ab"), Err(Error::Decode(_))));
        assert!(matches!(hex_to_bytes("zz"), Err(Error::Decode(_))));
    }

    /// Builds one framed record of the given type. `build` receives the
    /// record body with the type byte at offset 0.
    fn frame(msg_type: u8, build: impl FnOnce(&mut [u8])) -> Vec<u8> {
        let mut frame = vec![0u8; FRAME_PREFIX_LEN + record_len(msg_type)];
        frame[2] = msg_type;
        write_u16(&mut frame[3..], 3);
        write_u16(&mut frame[5..], 4);
        write_u48(&mut frame[7..], 86_400_000);
        build(&mut frame[FRAME_PREFIX_LEN..]);
        frame
    }

    /// One wire-valid sample record per active type, with every flag byte
    /// drawn from the encoder's output alphabet.
    fn sample_frame(msg_type: u8) -> Vec<u8> {
        frame(msg_type, |rec| match msg_type {
            b'S' => rec[11] = b'O',
            b'R' => {
                write_fixed_ascii(&mut rec[11..19], "UFO");
                rec[19] = b'Q';
                rec[20] = b'N';
                write_i32(&mut rec[21..], 100);
                rec[25] = b'Y';
                rec[26] = b'C';
                write_fixed_ascii(&mut rec[27..29], "Z");
                rec[29] = b'P';
                rec[30] = b'Y';
                rec[31] = b' ';
                rec[32] = b'1';
                rec[33] = b'N';
                write_i32(&mut rec[34..], 0);
                rec[38] = b'N';
            }
            b'H' => {
                write_fixed_ascii(&mut rec[11..19], "UFO");
                rec[19] = b'H';
                rec[20] = b'R';
                write_fixed_ascii(&mut rec[21..25], "T1");
            }
            b'Y' => {
                write_fixed_ascii(&mut rec[11..19], "UFO");
                rec[19] = b'E';
            }
            b'L' => {
                write_fixed_ascii(&mut rec[11..15], "MPID");
                write_fixed_ascii(&mut rec[15..23], "UFO");
                rec[23] = b'Y';
                rec[24] = b'N';
                rec[25] = b'A';
            }
            b'V' => {
                write_i64(&mut rec[11..], 301_321_000_000);
                write_i64(&mut rec[19..], 285_000_000_000);
                write_i64(&mut rec[27..], 260_750_000_000);
            }
            b'W' => rec[11] = b'2',
            b'K' => {
                write_fixed_ascii(&mut rec[11..19], "UFO");
                write_i32(&mut rec[19..], 34_200);
                rec[23] = b'A';
                write_i32(&mut rec[24..], 129_600);
            }
            b'J' => {
                write_fixed_ascii(&mut rec[11..19], "UFO");
                write_i32(&mut rec[19..], 129_600);
                write_i32(&mut rec[23..], 136_080);
                write_i32(&mut rec[27..], 123_120);
                write_i32(&mut rec[31..], 1);
            }
            b'h' => {
                write_fixed_ascii(&mut rec[11..19], "UFO");
                rec[19] = b'Q';
                rec[20] = b'H';
            }
            b'A' | b'F' => {
                write_i64(&mut rec[11..], 4);
                rec[19] = b'B';
                write_i32(&mut rec[20..], 11_900);
                write_fixed_ascii(&mut rec[24..32], "UFO");
                write_i32(&mut rec[32..], 129_600);
                if msg_type == b'F' {
                    write_fixed_ascii(&mut rec[36..40], "MPID");
                }
            }
            b'E' => {
                write_i64(&mut rec[11..], 4);
                write_i32(&mut rec[19..], 200);
                write_i64(&mut rec[23..], 9_001);
            }
            b'C' => {
                write_i64(&mut rec[11..], 4);
                write_i32(&mut rec[19..], 200);
                write_i64(&mut rec[23..], 9_002);
                rec[31] = b'P';
                write_i32(&mut rec[32..], 129_500);
            }
            b'X' => {
                write_i64(&mut rec[11..], 4);
                write_i32(&mut rec[19..], 50);
            }
            b'D' => {
                write_i64(&mut rec[11..], 4);
            }
            b'U' => {
                write_i64(&mut rec[11..], 4);
                write_i64(&mut rec[19..], 5);
                write_i32(&mut rec[27..], 150);
                write_i32(&mut rec[31..], 129_700);
            }
            b'P' => {
                write_i64(&mut rec[11..], 4);
                rec[19] = b'S';
                write_i32(&mut rec[20..], 300);
                write_fixed_ascii(&mut rec[24..32], "UFO");
                write_i32(&mut rec[32..], 129_600);
                write_i64(&mut rec[36..], 9_003);
            }
            b'Q' => {
                write_i64(&mut rec[11..], 5_000);
                write_fixed_ascii(&mut rec[19..27], "UFO");
                write_i32(&mut rec[27..], 129_600);
                write_i64(&mut rec[31..], 9_004);
                rec[39] = b'O';
            }
            b'B' => {
                write_i64(&mut rec[11..], 9_005);
            }
            b'I' => {
                write_i64(&mut rec[11..], 10_000);
                write_i64(&mut rec[19..], 2_500);
                rec[27] = b'B';
                write_fixed_ascii(&mut rec[28..36], "UFO");
                write_i32(&mut rec[36..], 129_700);
                write_i32(&mut rec[40..], 129_650);
                write_i32(&mut rec[44..], 129_600);
                rec[48] = b'O';
                rec[49] = b'A';
            }
            b'N' => {
                write_fixed_ascii(&mut rec[11..19], "UFO");
                rec[19] = b'A';
            }
            _ => unreachable!("not an active type"),
        })
    }

    #[test]
    fn test_every_type_round_trips_bit_exactly() {
        for t in ACTIVE_TYPES {
            let wire = sample_frame(t);
            let hex = bytes_to_hex(&wire);
            let class = class_of(t).unwrap();
            let table = hex_to_table(&hex, class).unwrap();
            assert_eq!(table.len(), 1, "type '{}' decoded {} rows", t as char, table.len());
            assert_eq!(
                table_to_hex(&table),
                hex,
                "type '{}' did not round-trip",
                t as char
            );
        }
    }

    #[test]
    fn test_mixed_class_stream_round_trips_per_class() {
        // a class table re-encodes exactly the records of its own class
        let mut wire = Vec::new();
        let mut orders_wire = Vec::new();
        for t in [b'A', b'B', b'F', b'Q', b'A'] {
            let f = sample_frame(t);
            if class_of(t).unwrap() == MsgClass::Orders {
                orders_wire.extend_from_slice(&f);
            }
            wire.extend_from_slice(&f);
        }
        let table = hex_to_table(&bytes_to_hex(&wire), MsgClass::Orders).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table_to_hex(&table), bytes_to_hex(&orders_wire));
    }

    #[test]
    fn test_seed_add_order_hex() {
        let hex = crate::count::tests::ADD_ORDER_HEX;
        let table = hex_to_table(hex, MsgClass::Orders).unwrap();
        let ClassTable::Orders(ref orders) = table else {
            panic!()
        };
        assert_eq!(orders.hd.timestamp, vec![25_200_002_107_428]);
        assert_eq!(orders.price, vec![12.96]);
        // normalize the seed's spacing before comparing
        let seed = bytes_to_hex(&hex_to_bytes(hex).unwrap());
        assert_eq!(table_to_hex(&table), seed);
    }

    #[test]
    fn test_debug_repl_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.itch");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&sample_frame(b'S'));
        bytes.extend_from_slice(&sample_frame(b'A'));
        bytes.extend_from_slice(&sample_frame(b'B'));
        std::fs::write(&path, &bytes).unwrap();

        // next, fast-forward to 'B', then quit
        let input = b"\nB\nx\n";
        let mut output = Vec::new();
        debug_file(&path, 1 << 16, &input[..], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("- 'S': 1"));
        assert!(text.contains("'S' (len 2 + 12)"));
        assert!(text.contains("Applied filter to message type 'B'"));
        assert!(text.contains("'B' (len 2 + 19)"));
        assert!(text.contains("Stopping printing messages"));
    }

    #[test]
    fn test_debug_repl_warns_on_absent_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.itch");
        std::fs::write(&path, sample_frame(b'S')).unwrap();

        let input = b"Q\nx\n";
        let mut output = Vec::new();
        debug_file(&path, 1 << 16, &input[..], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("No messages found for type 'Q'"));
    }
}
