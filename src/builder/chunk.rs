//! Bounded output chunks and the policy that fills them.

use super::{BuilderConfig, Write};

/// A bounded output buffer.
///
/// The only way to put bytes in is [`ChunkBuf::reserve`], which hands out a
/// zeroed slice of exactly the requested length and advances past it.
#[derive(Debug, Default)]
pub struct ChunkBuf {
    buf: Vec<u8>,
    capacity: usize,
}

impl ChunkBuf {
    /// Create an empty chunk. Nothing is allocated until the first reserve.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes left before the chunk counts as full.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.buf.len())
    }

    /// Reserve `n` bytes and return them for writing.
    ///
    /// A request larger than [`ChunkBuf::remaining`] still succeeds by
    /// growing the chunk; the caller decides when to flush first.
    pub fn reserve(&mut self, n: usize) -> &mut [u8] {
        if self.buf.capacity() == 0 {
            self.buf.reserve_exact(self.capacity.max(n));
        }
        let start = self.buf.len();
        self.buf.resize(start + n, 0);
        &mut self.buf[start..]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Take the filled bytes, leaving an unallocated chunk behind.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Discard the filled bytes, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// A completed piece of output handed to a flush callback.
pub enum Flush<'a> {
    /// The current chunk filled up (or output ended). The callback either
    /// takes the bytes or leaves them; the chunker clears whatever remains.
    Chunk(&'a mut ChunkBuf),
    /// A large flat write passed through without copying into a chunk.
    Direct(&'a [u8]),
}

/// Feeds writes into chunks, flushing whenever the next write would overflow.
#[derive(Debug)]
pub struct Chunker {
    chunk: ChunkBuf,
    config: BuilderConfig,
    flushed: usize,
}

impl Chunker {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            chunk: ChunkBuf::new(config.chunk_size),
            config,
            flushed: 0,
        }
    }

    /// Number of flushes performed so far.
    pub fn flushed(&self) -> usize {
        self.flushed
    }

    pub fn feed<E>(
        &mut self,
        write: &Write,
        flush: &mut impl FnMut(Flush<'_>) -> Result<(), E>,
    ) -> Result<(), E> {
        let n = write.len();
        if n == 0 {
            return Ok(());
        }

        if n > self.config.max_copy_size
            && let Some(bytes) = write.as_flat()
        {
            self.flush_chunk(flush)?;
            self.flushed += 1;
            return flush(Flush::Direct(bytes));
        }

        if n > self.chunk.remaining() {
            self.flush_chunk(flush)?;
        }
        write.run(self.chunk.reserve(n));
        Ok(())
    }

    /// Flush the partially filled chunk, if any.
    pub fn finish<E>(
        &mut self,
        flush: &mut impl FnMut(Flush<'_>) -> Result<(), E>,
    ) -> Result<(), E> {
        self.flush_chunk(flush)
    }

    fn flush_chunk<E>(
        &mut self,
        flush: &mut impl FnMut(Flush<'_>) -> Result<(), E>,
    ) -> Result<(), E> {
        if self.chunk.is_empty() {
            return Ok(());
        }
        self.flushed += 1;
        let result = flush(Flush::Chunk(&mut self.chunk));
        self.chunk.clear();
        result
    }
}
