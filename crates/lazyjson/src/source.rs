//! Byte source adapter.
//!
//! Presents any byte- or character-producing source as a single pull
//! operation: read up to N bytes, advancing the source. The core always
//! treats input as UTF-8; encoding detection beyond that is out of scope
//! and left to callers of [`ChunkIterSource`].

use std::io::{self, Read};

use log::debug;

/// A pull-based source of bytes.
///
/// Blanket-implemented for every [`std::io::Read`], so files, sockets
/// (wrapped by the caller), and in-memory slices all work without an
/// adapter. [`ChunkIterSource`] adapts an iterator of byte chunks for
/// sources that only produce data piecewise (e.g. an HTTP response body
/// streamed by an external crate, which this core does not depend on).
pub trait ByteSource {
    /// Reads into `buf`, returning the number of bytes written. Returns
    /// `Ok(0)` only at end-of-input. Read failures are propagated
    /// unchanged.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<R: Read> ByteSource for R {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }
}

/// Adapts an iterator of byte chunks into a [`ByteSource`], keeping a
/// *residual* chunk: the tail of the most recently pulled chunk that did not
/// fit in the caller's buffer.
///
/// Grounded in `daggaz/json-stream`'s `IterableStream`, which does the same
/// thing for Python file-like objects: `readinto` copies as much of
/// `self.remainder or next(iterator)` as fits and stashes the rest.
///
/// # Examples
///
/// ```
/// use lazyjson::source::{ByteSource, ChunkIterSource};
///
/// let chunks = vec![b"{\"a\":".to_vec(), b"1}".to_vec()];
/// let mut src = ChunkIterSource::new(chunks.into_iter().map(Ok));
/// let mut buf = [0u8; 4];
/// let n = src.read_bytes(&mut buf).unwrap();
/// assert_eq!(&buf[..n], b"{\"a\"");
/// ```
pub struct ChunkIterSource<I> {
    iter: I,
    residual: Vec<u8>,
    residual_pos: usize,
}

impl<I> ChunkIterSource<I> {
    /// Wraps `iter`, an iterator of fallible byte chunks.
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            residual: Vec::new(),
            residual_pos: 0,
        }
    }
}

impl<I> ByteSource for ChunkIterSource<I>
where
    I: Iterator<Item = io::Result<Vec<u8>>>,
{
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.residual_pos >= self.residual.len() {
            match self.iter.next() {
                Some(Ok(chunk)) => {
                    self.residual = chunk;
                    self.residual_pos = 0;
                }
                Some(Err(e)) => return Err(e),
                None => return Ok(0),
            }
        }
        let remaining = &self.residual[self.residual_pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.residual_pos += n;
        if n < buf.len() && n == remaining.len() {
            debug!("chunk iterator yielded fewer bytes than requested buffer size");
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residual_chunk_spans_reads() {
        let chunks = vec![Ok(b"hello ".to_vec()), Ok(b"world".to_vec())];
        let mut src = ChunkIterSource::new(chunks.into_iter());
        let mut out = Vec::new();
        let mut buf = [0u8; 3];
        loop {
            let n = src.read_bytes(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn empty_iterator_is_immediate_eof() {
        let mut src = ChunkIterSource::new(std::iter::empty::<io::Result<Vec<u8>>>());
        let mut buf = [0u8; 4];
        assert_eq!(src.read_bytes(&mut buf).unwrap(), 0);
    }
}
