//! Argument parsing and shared helpers for the `itch` command-line utility.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};

use itch::{FilterParams, Filters, DEFAULT_BUFFER_SIZE};

/// The `itch` command-line interface.
#[derive(Debug, Parser)]
#[command(name = "itch", version, about = "Count, filter, and inspect NASDAQ TotalView-ITCH 5.0 files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Count the messages of an ITCH file per type without decoding them
    Count(CountArgs),
    /// Copy selected messages of an ITCH file into a new file
    Filter(FilterArgs),
    /// Gzip-compress a file
    Gzip(GzArgs),
    /// Decompress a gzip file
    Gunzip(GzArgs),
    /// Interactively hex dump an ITCH file one message at a time
    Debug(DebugArgs),
}

#[derive(Debug, clap::Args)]
#[cfg_attr(test, derive(Default))]
pub struct CountArgs {
    /// An ITCH file, plain or gzip-compressed
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    /// Streaming buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE, value_name = "BYTES")]
    pub buffer_size: usize,
}

#[derive(Debug, clap::Args)]
#[cfg_attr(test, derive(Default))]
pub struct FilterArgs {
    /// An ITCH file, plain or gzip-compressed
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    /// The file the accepted messages are written to; a `.gz` suffix
    /// gzip-compresses the output
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
    /// Message types to keep, comma-separated (e.g. 'A,F,P')
    #[arg(short = 't', long = "msg-type", value_delimiter = ',', value_name = "TYPE")]
    pub msg_types: Vec<char>,
    /// Stock locate codes to keep, comma-separated
    #[arg(short = 'l', long = "stock-locate", value_delimiter = ',', value_name = "LOCATE")]
    pub stock_locates: Vec<u16>,
    /// Lower timestamp bounds in nanoseconds since midnight, paired with
    /// --max-timestamp
    #[arg(long = "min-timestamp", value_delimiter = ',', value_name = "NS")]
    pub min_timestamps: Vec<i64>,
    /// Upper timestamp bounds in nanoseconds since midnight, paired with
    /// --min-timestamp
    #[arg(long = "max-timestamp", value_delimiter = ',', value_name = "NS")]
    pub max_timestamps: Vec<i64>,
    /// The first class-local message ordinal to keep
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub skip: u64,
    /// The last class-local message ordinal to keep (inclusive)
    #[arg(long, value_name = "N")]
    pub limit: Option<u64>,
    /// Append to the output file instead of truncating it
    #[arg(long, default_value_t = false)]
    pub append: bool,
    /// Allow overwriting an existing output file
    #[arg(short, long, default_value_t = false)]
    pub force: bool,
    /// Streaming buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE, value_name = "BYTES")]
    pub buffer_size: usize,
}

impl FilterArgs {
    /// Consolidates the filter flags into the library's parameter struct.
    ///
    /// # Errors
    /// This function returns an error if the timestamp bounds are not given
    /// in pairs.
    pub fn params(&self) -> anyhow::Result<FilterParams> {
        if self.min_timestamps.len() != self.max_timestamps.len() {
            bail!("--min-timestamp and --max-timestamp must be given in pairs");
        }
        Ok(FilterParams {
            skip: self.skip,
            limit: self.limit,
            filters: Filters {
                msg_types: self.msg_types.clone(),
                stock_locates: self.stock_locates.clone(),
                timestamps: self
                    .min_timestamps
                    .iter()
                    .copied()
                    .zip(self.max_timestamps.iter().copied())
                    .collect(),
            },
            append: self.append,
            buffer_size: self.buffer_size,
            interrupt: None,
        })
    }
}

#[derive(Debug, clap::Args)]
#[cfg_attr(test, derive(Default))]
pub struct GzArgs {
    /// The input file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    /// The output file; defaults to the input with a `.gz` suffix added
    /// (gzip) or removed (gunzip)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Allow overwriting an existing output file
    #[arg(short, long, default_value_t = false)]
    pub force: bool,
    /// Streaming buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE, value_name = "BYTES")]
    pub buffer_size: usize,
}

#[derive(Debug, clap::Args)]
#[cfg_attr(test, derive(Default))]
pub struct DebugArgs {
    /// An ITCH file, plain or gzip-compressed
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    /// At most this many bytes of the file are loaded
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE, value_name = "BYTES")]
    pub buffer_size: usize,
}

/// Refuses to overwrite an existing output file unless `force` or `append`
/// is set.
///
/// # Errors
/// This function returns an error naming the `--force` flag if `path` exists.
pub fn ensure_output_writable(path: &Path, force: bool, append: bool) -> anyhow::Result<()> {
    if !force && !append && path.exists() {
        return Err(anyhow!(
            "Output file '{}' exists. Pass the --force flag to overwrite it.",
            path.display()
        ));
    }
    Ok(())
}

/// The default gzip output path: the input with a `.gz` suffix added.
pub fn default_gzip_output(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// The default gunzip output path: the input with its `.gz` suffix removed.
///
/// # Errors
/// This function returns an error if the input has no `.gz` suffix.
pub fn default_gunzip_output(input: &Path) -> anyhow::Result<PathBuf> {
    if input.extension().is_some_and(|ext| ext == "gz") {
        Ok(input.with_extension(""))
    } else {
        Err(anyhow!(
            "Cannot infer an output name: '{}' has no .gz suffix",
            input.display()
        ))
    }
}

/// Formats an integer with a comma as the thousands separator.
pub fn format_thousands(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
