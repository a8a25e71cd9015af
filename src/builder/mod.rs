//! Chunked byte builder.
//!
//! A [`Builder`] is a sequence of [`Write`] actions rather than a string.
//! Appending is amortized O(1): the shorter sequence is spliced onto the
//! longer one, and small writes meeting at the seam are fused into a
//! single inline write. Nothing is copied into output buffers until
//! extraction, which walks the plan once and fills bounded chunks.
//!
//! # Example
//!
//! ```
//! use markup_fuse::builder::{Builder, Write};
//!
//! let mut greeting = Builder::new();
//! greeting.push(Write::from_static(b"Hello, "));
//! let world = Builder::from(Write::from_static(b"World!"));
//!
//! let bytes = greeting.append(world).to_bytes();
//! assert_eq!(bytes, b"Hello, World!");
//! ```

use std::collections::VecDeque;
use std::io;
use std::ops::Add;

use crate::error::{Error, Result};

mod chunk;
mod write;

pub use chunk::{ChunkBuf, Chunker, Flush};
pub use write::{INLINE_CAP, Write};

/// Default chunk size (bytes) used by extraction.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Writes larger than this skip the chunk copy when they are flat.
pub const DEFAULT_MAX_COPY_SIZE: usize = 4 * 1024;

/// Configuration for chunked extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Size of each output chunk.
    pub chunk_size: usize,
    /// Flat writes above this size are emitted as their own chunk.
    pub max_copy_size: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_copy_size: DEFAULT_MAX_COPY_SIZE,
        }
    }
}

impl BuilderConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_copy_size(mut self, max_copy_size: usize) -> Self {
        self.max_copy_size = max_copy_size;
        self
    }

    /// Reject configurations that cannot make progress.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk size must be non-zero".into()));
        }
        Ok(())
    }
}

/// An append-only plan of write actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Builder {
    writes: VecDeque<Write>,
    len: usize,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of bytes the builder will produce.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of pending write actions after fusion.
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Append one write, fusing it into the last write when both are small.
    pub fn push(&mut self, write: Write) {
        if write.is_empty() {
            return;
        }
        self.len += write.len();
        if let Some(last) = self.writes.back_mut()
            && last.len() + write.len() <= INLINE_CAP
        {
            let prev = std::mem::take(last);
            *last = prev.then(write);
            return;
        }
        self.writes.push_back(write);
    }

    /// Prepend one write, fusing it into the first write when both are small.
    pub fn push_front(&mut self, write: Write) {
        if write.is_empty() {
            return;
        }
        self.len += write.len();
        if let Some(first) = self.writes.front_mut()
            && first.len() + write.len() <= INLINE_CAP
        {
            let next = std::mem::take(first);
            *first = write.then(next);
            return;
        }
        self.writes.push_front(write);
    }

    /// Concatenate two builders, preserving order.
    ///
    /// The shorter plan is moved onto the longer one, so building a document
    /// out of `n` sequential appends costs O(n) in total whichever side the
    /// appends nest on.
    pub fn append(mut self, mut other: Builder) -> Builder {
        if self.writes.len() >= other.writes.len() {
            for write in other.writes {
                self.push(write);
            }
            self
        } else {
            for write in self.writes.into_iter().rev() {
                other.push_front(write);
            }
            other
        }
    }

    /// Extract the output as one contiguous vector (a single allocation).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for write in &self.writes {
            write.append_to(&mut out);
        }
        out
    }

    /// Extract the output as a sequence of bounded chunks.
    pub fn into_chunks(self, config: &BuilderConfig) -> Vec<Vec<u8>> {
        let mut chunks = Vec::with_capacity(self.len / config.chunk_size.max(1) + 1);
        let mut flush = |f: Flush<'_>| -> std::result::Result<(), std::convert::Infallible> {
            match f {
                Flush::Chunk(chunk) => chunks.push(chunk.take()),
                Flush::Direct(bytes) => chunks.push(bytes.to_vec()),
            }
            Ok(())
        };

        let mut chunker = Chunker::new(*config);
        for write in &self.writes {
            let Ok(()) = chunker.feed(write, &mut flush);
        }
        let Ok(()) = chunker.finish(&mut flush);

        log::trace!(
            "extracted {} bytes from {} writes into {} chunks",
            self.len,
            self.writes.len(),
            chunks.len()
        );
        chunks
    }

    /// Stream the output into `sink`, one chunk at a time.
    ///
    /// The chunk buffer is reused between flushes.
    pub fn write_to<W: io::Write>(&self, mut sink: W, config: &BuilderConfig) -> Result<()> {
        config.validate()?;
        let mut flush = |f: Flush<'_>| -> io::Result<()> {
            match f {
                Flush::Chunk(chunk) => sink.write_all(chunk.as_slice()),
                Flush::Direct(bytes) => sink.write_all(bytes),
            }
        };

        let mut chunker = Chunker::new(*config);
        for write in &self.writes {
            chunker.feed(write, &mut flush)?;
        }
        chunker.finish(&mut flush)?;
        log::trace!("streamed {} bytes in {} flushes", self.len, chunker.flushed());

        sink.flush()?;
        Ok(())
    }
}

impl From<Write> for Builder {
    fn from(write: Write) -> Self {
        let mut builder = Builder::new();
        builder.push(write);
        builder
    }
}

impl Add for Builder {
    type Output = Builder;

    fn add(self, rhs: Builder) -> Builder {
        self.append(rhs)
    }
}

impl Extend<Write> for Builder {
    fn extend<I: IntoIterator<Item = Write>>(&mut self, iter: I) {
        for write in iter {
            self.push(write);
        }
    }
}

impl FromIterator<Write> for Builder {
    fn from_iter<I: IntoIterator<Item = Write>>(iter: I) -> Self {
        let mut builder = Builder::new();
        builder.extend(iter);
        builder
    }
}

impl FromIterator<Builder> for Builder {
    fn from_iter<I: IntoIterator<Item = Builder>>(iter: I) -> Self {
        iter.into_iter().fold(Builder::new(), Builder::append)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(bytes: &[u8]) -> Builder {
        Builder::from(Write::copy(bytes))
    }

    #[test]
    fn test_empty_builder() {
        let builder = Builder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.to_bytes(), b"");
        assert!(builder.into_chunks(&BuilderConfig::default()).is_empty());
    }

    #[test]
    fn test_small_pushes_fuse() {
        let mut builder = Builder::new();
        for _ in 0..10 {
            builder.push(Write::byte(b'a'));
        }
        assert_eq!(builder.write_count(), 1);
        assert_eq!(builder.len(), 10);
        assert_eq!(builder.to_bytes(), b"aaaaaaaaaa");
    }

    #[test]
    fn test_fusion_stops_at_inline_cap() {
        let mut builder = Builder::new();
        for _ in 0..(INLINE_CAP + 1) {
            builder.push(Write::byte(b'x'));
        }
        assert_eq!(builder.write_count(), 2);
        assert_eq!(builder.len(), INLINE_CAP + 1);
    }

    #[test]
    fn test_append_preserves_order_both_ways() {
        let long: Builder = (0..5).map(|i| b(&[b'a' + i; 40])).collect();
        let short = b(b"!");

        let right = long.clone().append(short.clone());
        assert!(right.to_bytes().ends_with(b"!"));

        let left = short.append(long);
        assert!(left.to_bytes().starts_with(b"!"));
        assert_eq!(left.len(), 201);
    }

    #[test]
    fn test_append_is_associative() {
        let x = b(b"<p>");
        let y = b(&[b'y'; 50]);
        let z = b(b"</p>");
        let left = (x.clone() + y.clone()) + z.clone();
        let right = x + (y + z);
        assert_eq!(left.to_bytes(), right.to_bytes());
    }

    #[test]
    fn test_empty_is_identity() {
        let x = b(b"content");
        assert_eq!((Builder::new() + x.clone()).to_bytes(), x.to_bytes());
        assert_eq!((x.clone() + Builder::new()).to_bytes(), x.to_bytes());
    }

    #[test]
    fn test_chunks_are_bounded() {
        let builder: Builder = (0..100).map(|_| b(&[b'q'; 40])).collect();
        let config = BuilderConfig::default()
            .with_chunk_size(256)
            .with_max_copy_size(usize::MAX);
        let chunks = builder.clone().into_chunks(&config);

        assert!(chunks.iter().all(|c| c.len() <= 256));
        assert_eq!(chunks.concat(), builder.to_bytes());
        // 4000 bytes in 40-byte writes: six writes fill each 256-byte chunk.
        assert_eq!(chunks.len(), 17);
    }

    #[test]
    fn test_write_to_matches_to_bytes() {
        let builder: Builder = (0..50).map(|i| b(format!("item{i};").as_bytes())).collect();
        let mut out = Vec::new();
        builder
            .write_to(&mut out, &BuilderConfig::default().with_chunk_size(16))
            .unwrap();
        assert_eq!(out, builder.to_bytes());
    }

    #[test]
    fn test_write_to_rejects_zero_chunk_size() {
        let err = b(b"x")
            .write_to(Vec::new(), &BuilderConfig::default().with_chunk_size(0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
