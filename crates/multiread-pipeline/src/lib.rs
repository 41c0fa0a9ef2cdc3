//! # Multiread Pipeline
//!
//! Stream wrappers for reading several sources as one and for sniffing a
//! stream's content type without losing the sniffed bytes:
//! - **ChainedReader**: ordered sources presented as one contiguous stream
//! - **SniffedReader**: a checked stream that replays its sniffed prefix
//! - **sniff_and_rewind**: the same check for seekable sources, without a buffer
//! - **records**: JSON record decoding across chained sources
//!
//! ## Example
//!
//! ```rust,no_run
//! use multiread_core::{MagicDetector, SniffConfig};
//! use multiread_pipeline::{chain, sniff_and_replay};
//! use std::fs::File;
//! use std::io;
//!
//! // Copy two log files to stdout as one stream
//! let mut day1 = File::open("day1.log").unwrap();
//! let mut day2 = File::open("day2.log").unwrap();
//! io::copy(&mut chain(vec![&mut day1, &mut day2]), &mut io::stdout()).unwrap();
//!
//! // Check an upload is a PNG before writing it anywhere
//! let upload = File::open("upload.bin").unwrap();
//! let mut image = sniff_and_replay(upload, &MagicDetector, &SniffConfig::default()).unwrap();
//! let mut out = File::create("image.png").unwrap();
//! io::copy(&mut image, &mut out).unwrap();
//! ```

pub mod chain;
pub mod records;
pub mod sniff;

pub use chain::{chain, ChainedReader};
pub use records::{decode_chained, decode_each, decode_stream};
pub use sniff::{
    classify, sniff_and_replay, sniff_and_rewind, sniff_prefix, Segment, SniffedReader,
};
