//! Big-endian wire primitives shared by the decoder and the encoder.
//!
//! All multi-byte integers on the wire are big-endian. Timestamps are 48-bit
//! nanoseconds since midnight and are widened to `i64`. ASCII fields are
//! fixed-width and right-padded with spaces. Prices are signed fixed-point
//! integers with four (or, for MWCB levels, eight) implied decimal places.

use tracing::warn;

pub(crate) trait FromBigEndianSlice {
    fn from_be_slice(slice: &[u8]) -> Self;
}

impl FromBigEndianSlice for u16 {
    /// NOTE: assumes the length of `slice` is at least 2 bytes
    fn from_be_slice(slice: &[u8]) -> Self {
        let (bytes, _) = slice.split_at(std::mem::size_of::<Self>());
        Self::from_be_bytes(bytes.try_into().unwrap())
    }
}

impl FromBigEndianSlice for u32 {
    /// NOTE: assumes the length of `slice` is at least 4 bytes
    fn from_be_slice(slice: &[u8]) -> Self {
        let (bytes, _) = slice.split_at(std::mem::size_of::<Self>());
        Self::from_be_bytes(bytes.try_into().unwrap())
    }
}

impl FromBigEndianSlice for u64 {
    /// NOTE: assumes the length of `slice` is at least 8 bytes
    fn from_be_slice(slice: &[u8]) -> Self {
        let (bytes, _) = slice.split_at(std::mem::size_of::<Self>());
        Self::from_be_bytes(bytes.try_into().unwrap())
    }
}

/// Reads a 2-byte big-endian integer.
#[inline]
pub(crate) fn read_u16(buf: &[u8]) -> u16 {
    u16::from_be_slice(buf)
}

/// Reads a 4-byte big-endian integer as `i32`.
#[inline]
pub(crate) fn read_i32(buf: &[u8]) -> i32 {
    u32::from_be_slice(buf) as i32
}

/// Reads a 6-byte big-endian integer, widened to `i64`.
///
/// NOTE: assumes the length of `buf` is at least 6 bytes
#[inline]
pub(crate) fn read_u48(buf: &[u8]) -> i64 {
    let mut bytes = [0u8; 8];
    bytes[..6].copy_from_slice(&buf[..6]);
    (u64::from_be_bytes(bytes) >> 16) as i64
}

/// Reads an 8-byte big-endian integer as `i64`.
#[inline]
pub(crate) fn read_i64(buf: &[u8]) -> i64 {
    u64::from_be_slice(buf) as i64
}

/// Writes a 2-byte big-endian integer.
#[inline]
pub(crate) fn write_u16(buf: &mut [u8], val: u16) {
    buf[..2].copy_from_slice(&val.to_be_bytes());
}

/// Writes a 4-byte big-endian integer.
#[inline]
pub(crate) fn write_i32(buf: &mut [u8], val: i32) {
    buf[..4].copy_from_slice(&val.to_be_bytes());
}

/// Writes the low 48 bits of `val` as a 6-byte big-endian integer.
#[inline]
pub(crate) fn write_u48(buf: &mut [u8], val: i64) {
    buf[..6].copy_from_slice(&val.to_be_bytes()[2..]);
}

/// Writes an 8-byte big-endian integer.
#[inline]
pub(crate) fn write_i64(buf: &mut [u8], val: i64) {
    buf[..8].copy_from_slice(&val.to_be_bytes());
}

/// Reads a fixed-width space-padded ASCII field, trimming trailing spaces.
/// An all-space field reads as the empty string.
pub(crate) fn read_fixed_ascii(buf: &[u8]) -> String {
    let end = buf.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Writes `s` into the field `buf`, right-padded with spaces to the field
/// width. Values longer than the field are truncated with a diagnostic.
pub(crate) fn write_fixed_ascii(buf: &mut [u8], s: &str) {
    let width = buf.len();
    let bytes = s.as_bytes();
    if bytes.len() > width {
        warn!(value = s, width, "string exceeds fixed field width, truncating");
    }
    let n = bytes.len().min(width);
    buf[..n].copy_from_slice(&bytes[..n]);
    buf[n..].fill(b' ');
}

/// Converts a 4-decimal fixed-point price field to `f64`.
#[inline]
pub(crate) fn price4_to_f64(val: i32) -> f64 {
    val as f64 / 10_000.0
}

/// Converts an `f64` price to the 4-decimal fixed-point wire value, rounding
/// ties to even.
#[inline]
pub(crate) fn f64_to_price4(val: f64) -> i32 {
    (val * 10_000.0).round_ties_even() as i32
}

/// Converts an 8-decimal fixed-point MWCB level field to `f64`.
#[inline]
pub(crate) fn price8_to_f64(val: i64) -> f64 {
    val as f64 / 100_000_000.0
}

/// Converts an `f64` MWCB level to the 8-decimal fixed-point wire value,
/// rounding ties to even.
#[inline]
pub(crate) fn f64_to_price8(val: f64) -> i64 {
    (val * 100_000_000.0).round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_u16_round_trip() {
        let mut buf = [0u8; 2];
        write_u16(&mut buf, 8236);
        assert_eq!(buf, [0x20, 0x2c]);
        assert_eq!(read_u16(&buf), 8236);
    }

    #[test]
    fn test_i32_round_trip() {
        let mut buf = [0u8; 4];
        write_i32(&mut buf, 11_900);
        assert_eq!(buf, [0x00, 0x00, 0x2e, 0x7c]);
        assert_eq!(read_i32(&buf), 11_900);
        write_i32(&mut buf, -1);
        assert_eq!(read_i32(&buf), -1);
    }

    #[test]
    fn test_u48_round_trip() {
        let mut buf = [0u8; 6];
        write_u48(&mut buf, 25_200_002_107_428);
        assert_eq!(buf, [0x16, 0xeb, 0x55, 0x2c, 0x88, 0x24]);
        assert_eq!(read_u48(&buf), 25_200_002_107_428);
    }

    #[test]
    fn test_u48_reads_only_six_bytes() {
        // trailing bytes beyond the field must not leak into the value
        let buf = [0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xff, 0xff];
        assert_eq!(read_u48(&buf), 1);
    }

    #[test]
    fn test_i64_round_trip() {
        let mut buf = [0u8; 8];
        write_i64(&mut buf, 4);
        assert_eq!(buf, [0, 0, 0, 0, 0, 0, 0, 4]);
        assert_eq!(read_i64(&buf), 4);
        write_i64(&mut buf, -2);
        assert_eq!(read_i64(&buf), -2);
    }

    #[test]
    fn test_fixed_ascii_trims_trailing_spaces_only() {
        assert_eq!(read_fixed_ascii(b"UFO     "), "UFO");
        assert_eq!(read_fixed_ascii(b"        "), "");
        assert_eq!(read_fixed_ascii(b"A B     "), "A B");
    }

    #[test]
    fn test_fixed_ascii_pads_with_spaces() {
        let mut buf = [0u8; 8];
        write_fixed_ascii(&mut buf, "UFO");
        assert_eq!(&buf, b"UFO     ");
        write_fixed_ascii(&mut buf, "");
        assert_eq!(&buf, b"        ");
    }

    #[test]
    fn test_fixed_ascii_truncates_oversize_values() {
        let mut buf = [0u8; 4];
        write_fixed_ascii(&mut buf, "TOOLONG");
        assert_eq!(&buf, b"TOOL");
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(-1)]
    #[case(129_600)]
    #[case(i32::MAX)]
    #[case(i32::MIN + 1)]
    fn test_price4_exact_round_trip(#[case] wire: i32) {
        assert_eq!(f64_to_price4(price4_to_f64(wire)), wire);
    }

    #[rstest]
    #[case(0)]
    #[case(301_321_000_000)]
    #[case(-42)]
    fn test_price8_exact_round_trip(#[case] wire: i64) {
        assert_eq!(f64_to_price8(price8_to_f64(wire)), wire);
    }

    #[test]
    fn test_price4_known_values() {
        assert_eq!(f64_to_price4(12.96), 129_600);
        assert_eq!(price4_to_f64(129_600), 12.96);
        assert_eq!(price8_to_f64(301_321_000_000), 3013.21);
    }
}
