//! # Multiread Core
//!
//! Core traits, types, and error handling shared by the multiread crates.
//!
//! This crate provides the foundational pieces for reading several byte
//! sources as one stream and for sniffing a stream's content type:
//! - **ContentDetector**: pluggable "bytes in, media type out" classifier
//! - **MagicDetector**: built-in signature table with a text/binary fallback
//! - **SniffConfig**: how many bytes to sniff and which types to accept
//! - **LogRecord**: the JSON log entry decoded by the `logs` command
//!
//! ## Example
//!
//! ```rust
//! use multiread_core::{ContentDetector, MagicDetector, SniffConfig};
//!
//! let detector = MagicDetector;
//! let label = detector.detect(b"\x89PNG\r\n\x1a\n");
//! assert_eq!(label, "image/png");
//! assert!(SniffConfig::default().accepts(&label));
//! ```

pub mod config;
pub mod detect;
pub mod error;
pub mod limits;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use config::{Accept, SniffConfig};
pub use detect::{matches_expected, media_type_essence, MagicDetector};
pub use error::{Error, Result};
pub use limits::*;
pub use traits::ContentDetector;
pub use types::LogRecord;
