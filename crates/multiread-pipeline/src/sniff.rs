//! Sniffing pipelines - classify a stream by its first bytes without losing them
//!
//! Two ways to get the sniffed bytes back:
//! - **Replay** (any `Read`): the prefix is buffered and chained in front of
//!   the rest of the source. This is the default.
//! - **Rewind** (`Read + Seek`): the source is repositioned to where sniffing
//!   started, so no buffer has to be carried along.

use crate::chain::ChainedReader;
use multiread_core::{validate_sniff_len, ContentDetector, Error, Result, SniffConfig};
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// One half of a replayed stream
#[derive(Debug)]
pub enum Segment<R> {
    /// Bytes consumed while sniffing
    Replay(Cursor<Vec<u8>>),
    /// The source, continuing from where sniffing stopped
    Rest(R),
}

impl<R: Read> Read for Segment<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Segment::Replay(prefix) => prefix.read(buf),
            Segment::Rest(source) => source.read(buf),
        }
    }
}

/// A stream whose content type has been checked, reading exactly the bytes
/// of the original source from its starting position.
///
/// # Example
///
/// ```rust
/// use multiread_core::{MagicDetector, SniffConfig};
/// use multiread_pipeline::sniff_and_replay;
/// use std::io::Read;
///
/// let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
/// png.extend_from_slice(&[7u8; 1000]);
///
/// let mut replay = sniff_and_replay(&png[..], &MagicDetector, &SniffConfig::default()).unwrap();
/// assert_eq!(replay.content_type(), "image/png");
///
/// let mut out = Vec::new();
/// replay.read_to_end(&mut out).unwrap();
/// assert_eq!(out, png);
/// ```
#[derive(Debug)]
pub struct SniffedReader<R> {
    inner: ChainedReader<Segment<R>>,
    content_type: String,
    prefix_len: usize,
}

impl<R> SniffedReader<R> {
    /// Label the detector produced for the sniffed prefix
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Number of bytes consumed by sniffing (and replayed first)
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// True while the sniffed prefix has not been fully replayed
    pub fn is_replaying(&self) -> bool {
        self.inner.current_index() == 0 && !self.inner.is_exhausted()
    }

    /// Unwrap into the underlying two-segment chain
    pub fn into_chain(self) -> ChainedReader<Segment<R>> {
        self.inner
    }
}

impl<R: Read> Read for SniffedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

/// Read up to `limit` bytes from the front of `source`
///
/// Returns fewer bytes only when the source ends first. Read errors are
/// returned as [`Error::SourceRead`].
pub fn sniff_prefix<R: Read>(source: &mut R, limit: usize) -> Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(limit);
    source.by_ref().take(limit as u64).read_to_end(&mut prefix)?;
    Ok(prefix)
}

/// Sniff and classify `source` without checking it against an expected set
///
/// Returns the detected label and the bytes that were consumed.
pub fn classify<R, D>(source: &mut R, detector: &D, limit: usize) -> Result<(String, Vec<u8>)>
where
    R: Read,
    D: ContentDetector + ?Sized,
{
    let limit = validate_sniff_len(limit)?;
    let prefix = sniff_prefix(source, limit)?;
    let detected = detector.detect(&prefix);
    tracing::debug!("Sniffed {} bytes, detected {}", prefix.len(), detected);
    Ok((detected, prefix))
}

/// Check `source`'s content type, then hand back a stream over all of its bytes
///
/// Works for any readable source: the sniffed prefix is replayed ahead of
/// the remainder. Fails with [`Error::ContentTypeMismatch`] (and no stream)
/// when the detected type is not accepted by `config`.
pub fn sniff_and_replay<R, D>(
    mut source: R,
    detector: &D,
    config: &SniffConfig,
) -> Result<SniffedReader<R>>
where
    R: Read,
    D: ContentDetector + ?Sized,
{
    config.validate()?;

    let (content_type, prefix) = classify(&mut source, detector, config.sniff_len)?;
    ensure_accepted(&content_type, config)?;

    let prefix_len = prefix.len();
    let inner = ChainedReader::new([Segment::Replay(Cursor::new(prefix)), Segment::Rest(source)]);

    Ok(SniffedReader {
        inner,
        content_type,
        prefix_len,
    })
}

/// Check a seekable `source`'s content type and put its cursor back
///
/// The cursor returns to wherever it was on entry, whether the check passes,
/// fails, or the sniff read itself errors (the seek-back is best effort in
/// that last case and the read error is what gets returned). Returns the
/// detected label.
pub fn sniff_and_rewind<R, D>(source: &mut R, detector: &D, config: &SniffConfig) -> Result<String>
where
    R: Read + Seek,
    D: ContentDetector + ?Sized,
{
    config.validate()?;

    let start = source.stream_position()?;
    let (content_type, _) = match classify(source, detector, config.sniff_len) {
        Ok(classified) => classified,
        Err(err) => {
            let _ = source.seek(SeekFrom::Start(start));
            return Err(err);
        }
    };
    source.seek(SeekFrom::Start(start))?;
    tracing::trace!("Rewound source to offset {}", start);

    ensure_accepted(&content_type, config)?;
    Ok(content_type)
}

fn ensure_accepted(content_type: &str, config: &SniffConfig) -> Result<()> {
    if !config.accepts(content_type) {
        return Err(Error::mismatch(content_type, config.expected()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiread_core::{MagicDetector, DEFAULT_SNIFF_LEN};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn png_with_payload(payload_len: usize) -> Vec<u8> {
        let mut data = PNG_MAGIC.to_vec();
        data.extend((0..payload_len).map(|i| (i % 251) as u8));
        data
    }

    /// Forward-only source that hands out one byte per read
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "no access"))
        }
    }

    fn read_all<R: Read>(mut reader: R) -> Vec<u8> {
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_replay_round_trip_lengths() {
        let config = SniffConfig::default();

        // Shorter than, equal to, and longer than the sniff window
        for total in [8, 100, DEFAULT_SNIFF_LEN, DEFAULT_SNIFF_LEN + 1, 4096] {
            let data = png_with_payload(total - PNG_MAGIC.len());
            let replay = sniff_and_replay(&data[..], &MagicDetector, &config).unwrap();

            assert_eq!(replay.content_type(), "image/png");
            assert_eq!(replay.prefix_len(), total.min(DEFAULT_SNIFF_LEN));
            assert_eq!(read_all(replay), data, "length {}", total);
        }
    }

    #[test]
    fn test_replay_png_to_file_sink() {
        let data = png_with_payload(1000);
        let mut replay =
            sniff_and_replay(Cursor::new(data.clone()), &MagicDetector, &SniffConfig::default())
                .unwrap();

        let mut sink = NamedTempFile::new().unwrap();
        let copied = io::copy(&mut replay, &mut sink).unwrap();
        sink.flush().unwrap();

        assert_eq!(copied, 1008);
        assert_eq!(std::fs::read(sink.path()).unwrap(), data);
    }

    #[test]
    fn test_replay_forward_only_source() {
        let data = png_with_payload(2000);
        let replay =
            sniff_and_replay(Trickle(&data), &MagicDetector, &SniffConfig::default()).unwrap();

        // One-byte reads still fill the whole window
        assert_eq!(replay.prefix_len(), DEFAULT_SNIFF_LEN);
        assert!(replay.is_replaying());
        assert_eq!(read_all(replay), data);
    }

    #[test]
    fn test_replay_short_text_source() {
        let config = SniffConfig::expecting(["text/plain"]);
        let replay = sniff_and_replay(&b"short"[..], &MagicDetector, &config).unwrap();

        assert_eq!(replay.content_type(), "text/plain; charset=utf-8");
        assert_eq!(replay.prefix_len(), 5);
        assert_eq!(read_all(replay), b"short");
    }

    #[test]
    fn test_replay_mismatch() {
        let text = b"This is a fake file for demo purposes";
        let result = sniff_and_replay(&text[..], &MagicDetector, &SniffConfig::default());

        match result {
            Err(Error::ContentTypeMismatch { detected, expected }) => {
                assert_eq!(detected, "text/plain; charset=utf-8");
                assert_eq!(expected, vec!["image/png"]);
            }
            other => panic!("expected mismatch, got {:?}", other.map(|r| r.prefix_len())),
        }
    }

    #[test]
    fn test_replay_read_error() {
        let result = sniff_and_replay(Broken, &MagicDetector, &SniffConfig::default());
        assert!(matches!(
            result,
            Err(Error::SourceRead(ref e)) if e.kind() == io::ErrorKind::PermissionDenied
        ));
    }

    #[test]
    fn test_replay_empty_source() {
        let config = SniffConfig::default().accept_any();
        let replay = sniff_and_replay(io::empty(), &MagicDetector, &config).unwrap();

        assert_eq!(replay.content_type(), "text/plain; charset=utf-8");
        assert_eq!(replay.prefix_len(), 0);
        assert!(read_all(replay).is_empty());
    }

    #[test]
    fn test_replay_empty_expected_rejects_text() {
        let config = SniffConfig::expecting(Vec::<String>::new());
        let result = sniff_and_replay(&b"plain text"[..], &MagicDetector, &config);

        match result {
            Err(Error::ContentTypeMismatch { detected, expected }) => {
                assert_eq!(detected, "text/plain; charset=utf-8");
                assert!(expected.is_empty());
            }
            other => panic!("expected mismatch, got {:?}", other.map(|r| r.prefix_len())),
        }
    }

    #[test]
    fn test_replay_custom_detector() {
        let detector = |prefix: &[u8]| {
            if prefix.starts_with(b"LOG") {
                "application/x-log".to_string()
            } else {
                "application/octet-stream".to_string()
            }
        };
        let config = SniffConfig::expecting(["application/x-log"]).with_sniff_len(3);

        let replay = sniff_and_replay(&b"LOG line one\n"[..], &detector, &config).unwrap();
        assert_eq!(replay.prefix_len(), 3);
        assert_eq!(read_all(replay), b"LOG line one\n");
    }

    #[test]
    fn test_replay_dyn_detector() {
        let detector: &dyn ContentDetector = &MagicDetector;
        let data = png_with_payload(10);
        let replay = sniff_and_replay(&data[..], detector, &SniffConfig::default()).unwrap();
        assert_eq!(replay.content_type(), "image/png");
    }

    #[test]
    fn test_replay_invalid_config() {
        let config = SniffConfig::default().with_sniff_len(0);
        let result = sniff_and_replay(&b"abc"[..], &MagicDetector, &config);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rewind_cursor() {
        let data = png_with_payload(1000);
        let mut cursor = Cursor::new(data.clone());

        let label = sniff_and_rewind(&mut cursor, &MagicDetector, &SniffConfig::default()).unwrap();
        assert_eq!(label, "image/png");
        assert_eq!(cursor.position(), 0);
        assert_eq!(read_all(cursor), data);
    }

    #[test]
    fn test_rewind_from_offset() {
        // PNG embedded after a 4-byte header
        let mut data = b"HDR:".to_vec();
        data.extend(png_with_payload(50));
        let mut cursor = Cursor::new(data);
        cursor.seek(SeekFrom::Start(4)).unwrap();

        sniff_and_rewind(&mut cursor, &MagicDetector, &SniffConfig::default()).unwrap();
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_rewind_mismatch_restores_position() {
        let mut cursor = Cursor::new(b"plain text".to_vec());

        let err =
            sniff_and_rewind(&mut cursor, &MagicDetector, &SniffConfig::default()).unwrap_err();
        assert_eq!(err.detected_type(), Some("text/plain; charset=utf-8"));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_rewind_after_read_error() {
        // Serves 8 bytes, then every further read fails
        struct FailsAfter {
            inner: Cursor<Vec<u8>>,
            limit: u64,
        }

        impl Read for FailsAfter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let left = self.limit.saturating_sub(self.inner.position()) as usize;
                if left == 0 {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "stalled"));
                }
                let n = buf.len().min(left);
                self.inner.read(&mut buf[..n])
            }
        }

        impl Seek for FailsAfter {
            fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
                self.inner.seek(pos)
            }
        }

        let mut source = FailsAfter {
            inner: Cursor::new(png_with_payload(100)),
            limit: 8,
        };

        let result = sniff_and_rewind(&mut source, &MagicDetector, &SniffConfig::default());
        assert!(matches!(
            result,
            Err(Error::SourceRead(ref e)) if e.kind() == io::ErrorKind::TimedOut
        ));
        assert_eq!(source.inner.position(), 0);
    }

    #[test]
    fn test_rewind_file() {
        let data = png_with_payload(700);
        let mut tmpfile = NamedTempFile::new().unwrap();
        tmpfile.write_all(&data).unwrap();
        tmpfile.flush().unwrap();

        let mut file = std::fs::File::open(tmpfile.path()).unwrap();
        sniff_and_rewind(&mut file, &MagicDetector, &SniffConfig::default()).unwrap();
        assert_eq!(read_all(file), data);
    }

    #[test]
    fn test_classify_consumes_prefix() {
        let mut source = &b"GIF89a-and-more"[..];
        let (label, prefix) = classify(&mut source, &MagicDetector, 6).unwrap();

        assert_eq!(label, "image/gif");
        assert_eq!(prefix, b"GIF89a");
        assert_eq!(source, b"-and-more");
    }
}
