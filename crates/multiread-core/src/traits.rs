//! Core traits for multiread

/// Classifies a byte prefix into a media type label.
///
/// Implementations must not perform I/O: they only look at the bytes they are
/// handed. The returned label is a MIME type, optionally with parameters
/// (e.g. `text/plain; charset=utf-8`).
pub trait ContentDetector {
    /// Detect the content type of `prefix`
    fn detect(&self, prefix: &[u8]) -> String;
}

/// Any closure over the prefix works as a detector
impl<F> ContentDetector for F
where
    F: Fn(&[u8]) -> String,
{
    fn detect(&self, prefix: &[u8]) -> String {
        self(prefix)
    }
}
