//! Whole-file gzip compression and decompression through bounded buffers.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::catalog::MIN_BUFFER_SIZE;
use crate::{Error, Result};

fn open_input(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::io(e, format!("opening input file '{}'", path.display())))
}

fn create_output(path: &Path) -> Result<File> {
    File::create(path)
        .map_err(|e| Error::io(e, format!("opening output file '{}'", path.display())))
}

fn copy_stream(
    mut reader: impl Read,
    mut writer: impl Write,
    buffer_size: usize,
) -> Result<u64> {
    let mut buf = vec![0u8; buffer_size.max(MIN_BUFFER_SIZE)];
    let mut total = 0u64;
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| Error::io(e, "reading input stream"))?;
        if n == 0 {
            return Ok(total);
        }
        writer
            .write_all(&buf[..n])
            .map_err(|e| Error::io(e, "writing output stream"))?;
        total += n as u64;
    }
}

/// Gzip-compresses the file at `in_path` into `out_path`, returning the
/// number of uncompressed bytes processed.
///
/// # Errors
/// This function returns an error if either file cannot be opened or the
/// copy fails.
pub fn gzip_file(
    in_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    buffer_size: usize,
) -> Result<u64> {
    let reader = open_input(in_path.as_ref())?;
    let mut encoder = GzEncoder::new(create_output(out_path.as_ref())?, Compression::default());
    let total = copy_stream(reader, &mut encoder, buffer_size)?;
    encoder
        .finish()
        .and_then(|mut f| f.flush())
        .map_err(|e| Error::io(e, "finishing gzip output"))?;
    Ok(total)
}

/// Decompresses the gzip file at `in_path` into `out_path`, returning the
/// number of uncompressed bytes produced.
///
/// # Errors
/// This function returns an error if either file cannot be opened or the
/// copy fails.
pub fn gunzip_file(
    in_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    buffer_size: usize,
) -> Result<u64> {
    let decoder = MultiGzDecoder::new(open_input(in_path.as_ref())?);
    let mut out = create_output(out_path.as_ref())?;
    let total = copy_stream(decoder, &mut out, buffer_size)?;
    out.flush()
        .map_err(|e| Error::io(e, "flushing decompressed output"))?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gzip_gunzip_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("data.itch");
        let packed = dir.path().join("data.itch.gz");
        let unpacked = dir.path().join("restored.itch");

        let payload: Vec<u8> = (0..10_000u32).flat_map(|i| i.to_be_bytes()).collect();
        std::fs::write(&plain, &payload).unwrap();

        gzip_file(&plain, &packed, 1 << 16).unwrap();
        assert_ne!(std::fs::read(&packed).unwrap(), payload);

        let produced = gunzip_file(&packed, &unpacked, 1 << 16).unwrap();
        assert_eq!(produced, payload.len() as u64);
        assert_eq!(std::fs::read(&unpacked).unwrap(), payload);
    }
}
