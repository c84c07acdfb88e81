use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use itch_cli::{
    default_gunzip_output, default_gzip_output, ensure_output_writable, format_thousands, Cli,
    Command, CountArgs, DebugArgs, FilterArgs, GzArgs,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Count(args) => count(args),
        Command::Filter(args) => filter(args),
        Command::Gzip(args) => gzip(args),
        Command::Gunzip(args) => gunzip(args),
        Command::Debug(args) => debug(args),
    }
}

fn count(args: CountArgs) -> anyhow::Result<()> {
    let counts = itch::count(&args.input, args.buffer_size, None)?;
    println!("{:<8} {:>16}", "msg_type", "count");
    for (msg_type, n) in counts.active() {
        println!("{:<8} {:>16}", msg_type, format_thousands(n));
    }
    println!("{:<8} {:>16}", "total", format_thousands(counts.total()));
    Ok(())
}

fn filter(args: FilterArgs) -> anyhow::Result<()> {
    ensure_output_writable(&args.output, args.force, args.append)?;
    let params = args.params()?;
    let summary = itch::filter(&args.input, &args.output, &params)?;
    println!(
        "[Bytes]      scanned {}, filtered {}",
        format_thousands(summary.bytes_scanned),
        format_thousands(summary.bytes_written),
    );
    println!(
        "[Messages]   scanned {}, filtered {}",
        format_thousands(summary.messages_scanned),
        format_thousands(summary.messages_written),
    );
    Ok(())
}

fn gzip(args: GzArgs) -> anyhow::Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_gzip_output(&args.input));
    ensure_output_writable(&output, args.force, false)?;
    let bytes = itch::gzip_file(&args.input, &output, args.buffer_size)?;
    println!(
        "[Compressed] {} bytes into '{}'",
        format_thousands(bytes),
        output.display()
    );
    Ok(())
}

fn gunzip(args: GzArgs) -> anyhow::Result<()> {
    let output = match args.output.clone() {
        Some(output) => output,
        None => default_gunzip_output(&args.input)?,
    };
    ensure_output_writable(&output, args.force, false)?;
    let bytes = itch::gunzip_file(&args.input, &output, args.buffer_size)?;
    println!(
        "[Inflated]   {} bytes into '{}'",
        format_thousands(bytes),
        output.display()
    );
    Ok(())
}

fn debug(args: DebugArgs) -> anyhow::Result<()> {
    itch::debug::debug_file(
        &args.input,
        args.buffer_size,
        io::stdin().lock(),
        io::stdout().lock(),
    )?;
    Ok(())
}
