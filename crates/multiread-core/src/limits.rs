//! Sniffing limits and validation helpers
//!
//! Bounds on how many bytes a single sniff may buffer before classification.

use crate::Error;

/// Default number of bytes read for content sniffing (512, the usual sniffing window)
pub const DEFAULT_SNIFF_LEN: usize = 512;

/// Largest sniff buffer we'll allocate (64 KB)
pub const MAX_SNIFF_LEN: usize = 64 * 1024;

/// Validate a sniff length
///
/// A zero-length sniff would classify every source as empty text, so it is
/// rejected along with anything above [`MAX_SNIFF_LEN`].
pub fn validate_sniff_len(len: usize) -> crate::Result<usize> {
    if len == 0 || len > MAX_SNIFF_LEN {
        return Err(Error::invalid_config(format!(
            "Invalid sniff length: {} (must be 1-{})",
            len, MAX_SNIFF_LEN
        )));
    }

    Ok(len)
}
