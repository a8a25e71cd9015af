//! Streaming rendering into an [`io::Write`] sink.

use std::io;

use crate::builder::{Chunker, Flush, Write};
use crate::error::Result;

use super::{Format, RenderConfig, Renderer};

/// Sends output to a sink in bounded chunks while the document is walked.
///
/// At most one chunk is buffered at a time. The first sink error stops all
/// further output and is returned by [`Renderer::finish`].
pub struct StreamRenderer<W: io::Write> {
    sink: W,
    chunker: Chunker,
    config: RenderConfig,
    written: usize,
    error: Option<io::Error>,
}

impl<W: io::Write> StreamRenderer<W> {
    pub fn new(sink: W, config: RenderConfig) -> Self {
        Self {
            sink,
            chunker: Chunker::new(config.builder),
            config,
            written: 0,
            error: None,
        }
    }

    /// Bytes accepted so far, including those still buffered.
    pub fn written(&self) -> usize {
        self.written
    }

    fn flush_into(sink: &mut W) -> impl FnMut(Flush<'_>) -> io::Result<()> + '_ {
        move |f| match f {
            Flush::Chunk(chunk) => sink.write_all(chunk.as_slice()),
            Flush::Direct(bytes) => sink.write_all(bytes),
        }
    }
}

impl<W: io::Write> Renderer for StreamRenderer<W> {
    type Output = Result<W>;

    fn format(&self) -> Format {
        self.config.format
    }

    fn emit(&mut self, write: Write) {
        if self.error.is_some() {
            return;
        }
        self.written += write.len();
        let mut flush = Self::flush_into(&mut self.sink);
        if let Err(err) = self.chunker.feed(&write, &mut flush) {
            log::warn!("stream sink failed after {} bytes: {err}", self.written);
            self.error = Some(err);
        }
    }

    fn finish(mut self) -> Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        {
            let mut flush = Self::flush_into(&mut self.sink);
            self.chunker.finish(&mut flush)?;
        }
        self.sink.flush()?;
        log::debug!(
            "streamed {} bytes in {} flushes",
            self.written,
            self.chunker.flushed()
        );
        Ok(self.sink)
    }
}
