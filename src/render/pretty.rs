//! Human-readable rendering with one node per line.

use crate::builder::{Builder, Write};
use crate::codec::materialize;
use crate::markup::{Tag, Text};

use super::{Format, PendingAttributes, RenderConfig, Renderer, emit_open_tag, emit_text};

const NEWLINE: Write = Write::from_static(b"\n");

/// Puts every tag and text leaf on its own line, indented by nesting depth.
///
/// Whitespace is added around text, so this is for inspection rather than
/// for documents where inline whitespace matters.
#[derive(Debug)]
pub struct PrettyRenderer {
    builder: Builder,
    config: RenderConfig,
    depth: usize,
    /// Materialized indentation, indexed by depth.
    indents: Vec<Write>,
}

impl PrettyRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            builder: Builder::new(),
            config,
            depth: 0,
            indents: vec![Write::empty()],
        }
    }

    fn indent(&mut self) {
        while self.indents.len() <= self.depth {
            let width = self.indents.len() * self.config.indent;
            let spaces: Builder = std::iter::repeat_n(Write::byte(b' '), width).collect();
            self.indents.push(materialize(&spaces));
        }
        let indent = self.indents[self.depth].clone();
        self.builder.push(indent);
    }
}

impl Renderer for PrettyRenderer {
    type Output = Builder;

    fn format(&self) -> Format {
        self.config.format
    }

    fn emit(&mut self, write: Write) {
        self.builder.push(write);
    }

    fn text(&mut self, text: &Text) {
        self.indent();
        emit_text(self, text);
        self.emit(NEWLINE);
    }

    fn open_tag(&mut self, tag: &Tag, attrs: PendingAttributes<'_>, leaf: bool) {
        self.indent();
        emit_open_tag(self, tag, attrs, leaf);
        self.emit(NEWLINE);
        if !leaf {
            self.depth += 1;
        }
    }

    fn close_tag(&mut self, tag: &Tag) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.emit(tag.close().clone());
        self.emit(NEWLINE);
    }

    fn finish(self) -> Builder {
        log::debug!("pretty-rendered {} bytes", self.builder.len());
        self.builder
    }
}
