//! Multiread CLI - read many files as one stream, check content before copying
//!
//! A tool for concatenating sources, merging JSON logs, and sniffing
//! content types without losing the sniffed bytes.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use multiread_core::{LogRecord, MagicDetector, SniffConfig, DEFAULT_SNIFF_LEN};
use multiread_pipeline::{
    chain, classify, decode_chained, decode_each, sniff_and_replay, sniff_and_rewind,
};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "multiread")]
#[command(about = "Read many sources as one stream and sniff content types", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Concatenate files to stdout
    Cat {
        /// Files to read, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print JSON log records from one or more files
    Logs {
        /// Decode each file on its own instead of as one stream
        #[arg(long)]
        separate: bool,

        /// Log files, one JSON object per record
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the detected content type of each file
    Detect {
        /// Files to classify
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Bytes to inspect per file
        #[arg(long, default_value_t = DEFAULT_SNIFF_LEN)]
        sniff_len: usize,
    },

    /// Copy INPUT to OUTPUT only if its content type is accepted
    Sniff {
        /// Input file, or "-" for stdin
        input: String,

        /// Output file (created only after the check passes)
        output: PathBuf,

        /// Accepted media type, repeatable (default: image/png)
        #[arg(long = "expect", value_name = "TYPE")]
        expect: Vec<String>,

        /// Seek back after sniffing instead of replaying the prefix
        #[arg(long)]
        rewind: bool,

        /// Bytes to inspect before deciding
        #[arg(long, default_value_t = DEFAULT_SNIFF_LEN)]
        sniff_len: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for `cat`
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Cat { files } => cmd_cat(&files, &mut out),
        Command::Logs { separate, files } => cmd_logs(&files, separate, &mut out),
        Command::Detect { files, sniff_len } => cmd_detect(&files, sniff_len, &mut out),
        Command::Sniff {
            input,
            output,
            expect,
            rewind,
            sniff_len,
        } => {
            let config = sniff_config(expect, sniff_len);
            cmd_sniff(&input, &output, &config, rewind)
        }
    }
}

fn open_all(paths: &[PathBuf]) -> Result<Vec<File>> {
    paths
        .iter()
        .map(|path| {
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))
        })
        .collect()
}

fn sniff_config(expect: Vec<String>, sniff_len: usize) -> SniffConfig {
    let config = if expect.is_empty() {
        SniffConfig::default()
    } else {
        SniffConfig::expecting(expect)
    };
    config.with_sniff_len(sniff_len)
}

fn cmd_cat<W: Write>(paths: &[PathBuf], out: &mut W) -> Result<()> {
    let sources = open_all(paths)?;

    let copied = io::copy(&mut chain(sources), out).context("Failed to copy to output")?;
    out.flush()?;

    tracing::info!("Copied {} from {} files", format_bytes(copied), paths.len());
    Ok(())
}

fn cmd_logs<W: Write>(paths: &[PathBuf], separate: bool, out: &mut W) -> Result<()> {
    let sources = open_all(paths)?;

    let records: Vec<LogRecord> = if separate {
        decode_each(sources)?
    } else {
        decode_chained(sources)?
    };

    for record in &records {
        writeln!(out, "{}", record)?;
    }
    out.flush()?;

    tracing::info!("Read {} records from {} files", records.len(), paths.len());
    Ok(())
}

fn cmd_detect<W: Write>(paths: &[PathBuf], sniff_len: usize, out: &mut W) -> Result<()> {
    for path in paths {
        let mut file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let (label, prefix) = classify(&mut file, &MagicDetector, sniff_len)?;

        writeln!(
            out,
            "{:<40} {:<32} ({} sniffed)",
            path.display(),
            label,
            format_bytes(prefix.len() as u64)
        )?;
    }
    out.flush()?;
    Ok(())
}

fn cmd_sniff(input: &str, output: &Path, config: &SniffConfig, rewind: bool) -> Result<()> {
    if input == "-" {
        if rewind {
            bail!("--rewind needs a seekable input; stdin can only be replayed");
        }
        return copy_replayed(io::stdin().lock(), output, config).map(|_| ());
    }

    let mut file = File::open(input).with_context(|| format!("Failed to open {}", input))?;
    if rewind {
        let label = sniff_and_rewind(&mut file, &MagicDetector, config)?;
        write_output(&mut file, output, &label)?;
    } else {
        copy_replayed(file, output, config)?;
    }
    Ok(())
}

/// Check `source`, then copy it (sniffed bytes included) into a new `output` file
fn copy_replayed<R: Read>(source: R, output: &Path, config: &SniffConfig) -> Result<u64> {
    let mut replay = sniff_and_replay(source, &MagicDetector, config)?;
    let label = replay.content_type().to_string();
    write_output(&mut replay, output, &label)
}

fn write_output<R: Read>(reader: &mut R, output: &Path, label: &str) -> Result<u64> {
    let mut out =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let copied = io::copy(reader, &mut out)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    out.flush()?;

    tracing::info!("Wrote {} ({}) to {}", format_bytes(copied), label, output.display());
    Ok(copied)
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else if bytes < 1_073_741_824 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    }
}
