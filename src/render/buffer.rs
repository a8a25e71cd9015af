//! In-memory rendering into a [`Builder`].

use crate::builder::{Builder, Write};

use super::{Format, RenderConfig, Renderer};

/// Accumulates every emitted write into a [`Builder`].
#[derive(Debug, Default)]
pub struct BufferRenderer {
    builder: Builder,
    config: RenderConfig,
}

impl BufferRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            builder: Builder::new(),
            config,
        }
    }

    /// Bytes emitted so far.
    pub fn len(&self) -> usize {
        self.builder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builder.is_empty()
    }
}

impl Renderer for BufferRenderer {
    type Output = Builder;

    fn format(&self) -> Format {
        self.config.format
    }

    fn emit(&mut self, write: Write) {
        self.builder.push(write);
    }

    fn finish(self) -> Builder {
        log::debug!(
            "rendered {} bytes as {} writes",
            self.builder.len(),
            self.builder.write_count()
        );
        self.builder
    }
}
