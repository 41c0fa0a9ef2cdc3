//! Chained pipeline - presents an ordered list of sources as one stream

use std::io::{self, Read};

/// A pipeline that reads its sources back to back, as if they were concatenated.
///
/// Each call to `read` is served by a single source: bytes from the current
/// source are returned as soon as it yields any, and an exhausted source is
/// skipped within the same call. An error from a source is returned as-is and
/// the sources after it are never touched.
///
/// Sources are only read, never closed or rewound. Pass `&mut File` (or any
/// `&mut R`) to keep ownership with the caller, or take them back with
/// [`ChainedReader::into_inner`].
///
/// # Example
///
/// ```rust
/// use multiread_pipeline::ChainedReader;
/// use std::io::Read;
///
/// let mut chained = ChainedReader::new(vec![&b"abc"[..], &b""[..], &b"def"[..]]);
/// let mut out = String::new();
/// chained.read_to_string(&mut out).unwrap();
/// assert_eq!(out, "abcdef");
/// ```
#[derive(Debug)]
pub struct ChainedReader<R> {
    sources: Vec<R>,
    index: usize,
}

impl<R: Read> ChainedReader<R> {
    /// Create a new chained pipeline over `sources`, read in iteration order
    pub fn new<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        Self {
            sources: sources.into_iter().collect(),
            index: 0,
        }
    }
}

impl<R> ChainedReader<R> {
    /// Index of the source currently being read
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Total number of sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True if the chain was built with no sources
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// True once every source has reported end-of-stream
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.sources.len()
    }

    /// The source currently being read, if any remain
    pub fn get_ref(&self) -> Option<&R> {
        self.sources.get(self.index)
    }

    /// Give back all sources, including the ones already drained
    pub fn into_inner(self) -> Vec<R> {
        self.sources
    }
}

impl<R: Read> Read for ChainedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // A zero-length read says nothing about exhaustion
        if buf.is_empty() {
            return Ok(0);
        }

        while let Some(source) = self.sources.get_mut(self.index) {
            let n = source.read(buf)?;
            if n > 0 {
                return Ok(n);
            }

            tracing::trace!(
                "Source {} of {} exhausted, advancing",
                self.index + 1,
                self.sources.len()
            );
            self.index += 1;
        }

        Ok(0) // EOF
    }
}

/// Chain `sources` into a single reader
pub fn chain<I>(sources: I) -> ChainedReader<I::Item>
where
    I: IntoIterator,
    I::Item: Read,
{
    ChainedReader::new(sources)
}
