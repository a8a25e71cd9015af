//! Turning document values into bytes.
//!
//! There is exactly one traversal, [`walk`]. Backends implement
//! [`Renderer`] and only decide what happens to the emitted writes:
//!
//! - [`BufferRenderer`] accumulates them into a [`Builder`]
//! - [`StreamRenderer`] pushes bounded chunks into an [`std::io::Write`] sink
//! - [`PrettyRenderer`] interleaves newlines and indentation
//!
//! Traversal rules, shared by every backend:
//!
//! 1. `Empty` emits nothing.
//! 2. `Text` emits its content, escaped unless it is verbatim.
//! 3. `Element` emits `<tag`, the pending attributes, `>`, its children
//!    (with no pending attributes), then `</tag>`.
//! 4. `Leaf` emits `<tag`, the pending attributes, then `/>` for
//!    [`Format::Xhtml`] or `>` for [`Format::Html`].
//! 5. `WithAttributes` adds its attributes to the pending set for `node`.
//!    Text ignores pending attributes.
//! 6. `Concat` walks its nodes in order with the same pending set.

use std::io;

use crate::builder::{Builder, BuilderConfig, Write};
use crate::codec::{escape_with, raw_str};
use crate::error::Result;
use crate::markup::{Attribute, Node, Tag, Text};

mod buffer;
mod pretty;
mod stream;

pub use buffer::BufferRenderer;
pub use pretty::PrettyRenderer;
pub use stream::StreamRenderer;

const CLOSE: Write = Write::from_static(b">");
const SELF_CLOSE: Write = Write::from_static(b"/>");
const QUOTE: Write = Write::from_static(b"\"");

/// How leaf elements are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// `<br/>`
    #[default]
    Xhtml,
    /// `<br>`
    Html,
}

/// Configuration shared by all renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub format: Format,
    /// Spaces per nesting level (pretty rendering only).
    pub indent: usize,
    pub builder: BuilderConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: Format::default(),
            indent: 2,
            builder: BuilderConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_builder(mut self, builder: BuilderConfig) -> Self {
        self.builder = builder;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.builder.validate()
    }
}

/// Attributes waiting to be attached to the next top-level element.
///
/// Groups are stored outermost first. Iteration yields the innermost group
/// first, each group in the order it was supplied.
#[derive(Debug, Clone, Copy)]
pub struct PendingAttributes<'a> {
    groups: &'a [&'a [Attribute]],
}

impl<'a> PendingAttributes<'a> {
    pub fn iter(self) -> impl Iterator<Item = &'a Attribute> {
        self.groups.iter().rev().flat_map(|group| group.iter())
    }
}

/// A rendering backend.
///
/// Only [`Renderer::emit`], [`Renderer::format`] and [`Renderer::finish`]
/// are required. The structural hooks default to the plain serialization
/// and can be overridden to add layout around it.
pub trait Renderer {
    type Output;

    fn format(&self) -> Format;

    /// Accept the next write, in output order.
    fn emit(&mut self, write: Write);

    fn text(&mut self, text: &Text) {
        emit_text(self, text);
    }

    fn open_tag(&mut self, tag: &Tag, attrs: PendingAttributes<'_>, leaf: bool) {
        emit_open_tag(self, tag, attrs, leaf);
    }

    fn close_tag(&mut self, tag: &Tag) {
        self.emit(tag.close().clone());
    }

    /// Extract the result.
    fn finish(self) -> Self::Output
    where
        Self: Sized;
}

/// Emit a text leaf through the codec.
pub fn emit_text<R: Renderer + ?Sized>(renderer: &mut R, text: &Text) {
    if text.is_verbatim() {
        renderer.emit(raw_str(text.content()));
    } else {
        escape_with(text.content(), |w| renderer.emit(w));
    }
}

/// Emit `<tag`, the attributes and the closing bracket.
pub fn emit_open_tag<R: Renderer + ?Sized>(
    renderer: &mut R,
    tag: &Tag,
    attrs: PendingAttributes<'_>,
    leaf: bool,
) {
    renderer.emit(tag.open().clone());
    for attr in attrs.iter() {
        emit_attribute(renderer, attr);
    }
    let end = match (leaf, renderer.format()) {
        (true, Format::Xhtml) => SELF_CLOSE,
        _ => CLOSE,
    };
    renderer.emit(end);
}

/// Emit ` key="value"`.
pub fn emit_attribute<R: Renderer + ?Sized>(renderer: &mut R, attr: &Attribute) {
    renderer.emit(attr.prefix().clone());
    if attr.is_verbatim() {
        renderer.emit(raw_str(attr.value()));
    } else {
        escape_with(attr.value(), |w| renderer.emit(w));
    }
    renderer.emit(QUOTE);
}

/// Pending work for [`walk`].
enum Step<'n> {
    Visit(&'n Node),
    /// Close an element, then restore the pending set from outside it.
    Close(&'n Tag, Vec<&'n [Attribute]>),
    /// Drop the innermost pending group.
    Pop,
}

/// Traverse `node`, driving `renderer`.
///
/// The traversal keeps its own stack, so nesting depth is bounded by memory
/// rather than by the thread's stack.
pub fn walk<R: Renderer + ?Sized>(node: &Node, renderer: &mut R) {
    let mut pending: Vec<&[Attribute]> = Vec::new();
    let mut steps = vec![Step::Visit(node)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(Node::Empty) => {}
            Step::Visit(Node::Text(text)) => renderer.text(text),
            Step::Visit(Node::Element { tag, children }) => {
                renderer.open_tag(tag, PendingAttributes { groups: &pending }, false);
                // Attributes distribute across siblings, not into children.
                steps.push(Step::Close(tag, std::mem::take(&mut pending)));
                steps.push(Step::Visit(children));
            }
            Step::Visit(Node::Leaf(tag)) => {
                renderer.open_tag(tag, PendingAttributes { groups: &pending }, true);
            }
            Step::Visit(Node::WithAttributes { attrs, node }) => {
                pending.push(attrs.as_slice());
                steps.push(Step::Pop);
                steps.push(Step::Visit(node));
            }
            Step::Visit(Node::Concat(nodes)) => {
                steps.extend(nodes.iter().rev().map(Step::Visit));
            }
            Step::Close(tag, outer) => {
                renderer.close_tag(tag);
                pending = outer;
            }
            Step::Pop => {
                pending.pop();
            }
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Render into a [`Builder`] for later extraction.
pub fn render(node: &Node, config: &RenderConfig) -> Builder {
    let mut renderer = BufferRenderer::new(*config);
    walk(node, &mut renderer);
    renderer.finish()
}

/// Render with the default configuration into one byte vector.
pub fn render_bytes(node: &Node) -> Vec<u8> {
    render(node, &RenderConfig::default()).to_bytes()
}

/// Render with the default configuration into a string.
pub fn render_string(node: &Node) -> Result<String> {
    render_string_with(node, &RenderConfig::default())
}

pub fn render_string_with(node: &Node, config: &RenderConfig) -> Result<String> {
    Ok(String::from_utf8(render(node, config).to_bytes())?)
}

/// Render into bounded chunks.
pub fn render_chunks(node: &Node, config: &RenderConfig) -> Result<Vec<Vec<u8>>> {
    config.validate()?;
    Ok(render(node, config).into_chunks(&config.builder))
}

/// Stream the rendering into `sink` chunk by chunk, returning the sink.
pub fn render_to<W: io::Write>(node: &Node, sink: W, config: &RenderConfig) -> Result<W> {
    config.validate()?;
    let mut renderer = StreamRenderer::new(sink, *config);
    walk(node, &mut renderer);
    renderer.finish()
}

/// Render with one element, leaf or text per line, indented by depth.
pub fn render_pretty(node: &Node, config: &RenderConfig) -> Result<String> {
    let mut renderer = PrettyRenderer::new(*config);
    walk(node, &mut renderer);
    Ok(String::from_utf8(renderer.finish().to_bytes())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{add_attributes, element, leaf_element, text, unescaped_text};

    #[test]
    fn test_pending_attributes_order() {
        let inner = [Attribute::new("a", "1"), Attribute::new("b", "2")];
        let outer = [Attribute::new("c", "3")];
        let groups: [&[Attribute]; 2] = [&outer, &inner];
        let pending = PendingAttributes { groups: &groups };
        let keys: Vec<_> = pending.iter().map(Attribute::key).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_render_element_with_text() {
        let doc = element("em", text("a<b"));
        assert_eq!(render_string(&doc).unwrap(), "<em>a&lt;b</em>");
    }

    #[test]
    fn test_render_unescaped() {
        let doc = unescaped_text("<!-- raw -->");
        assert_eq!(render_bytes(&doc), b"<!-- raw -->");
    }

    #[test]
    fn test_leaf_formats() {
        let doc = leaf_element("br");
        let xhtml = RenderConfig::new();
        let html = RenderConfig::new().with_format(Format::Html);
        assert_eq!(render_string_with(&doc, &xhtml).unwrap(), "<br/>");
        assert_eq!(render_string_with(&doc, &html).unwrap(), "<br>");
    }

    #[test]
    fn test_attribute_values_escaped() {
        let doc = add_attributes([("title", "say \"hi\" & go")], leaf_element("hr"));
        assert_eq!(
            render_string(&doc).unwrap(),
            r#"<hr title="say &quot;hi&quot; &amp; go"/>"#
        );
    }

    #[test]
    fn test_pre_escaped_attribute_verbatim() {
        let doc = add_attributes(
            [Attribute::pre_escaped("title", "a &amp; b")],
            leaf_element("hr"),
        );
        assert_eq!(render_string(&doc).unwrap(), r#"<hr title="a &amp; b"/>"#);
    }

    #[test]
    fn test_attributes_do_not_descend() {
        let doc = add_attributes(
            [("class", "outer")],
            element("div", leaf_element("span")),
        );
        assert_eq!(
            render_string(&doc).unwrap(),
            r#"<div class="outer"><span/></div>"#
        );
    }

    #[test]
    fn test_render_chunks_rejects_zero_chunk_size() {
        let config =
            RenderConfig::new().with_builder(BuilderConfig::default().with_chunk_size(0));
        assert!(render_chunks(&text("x"), &config).is_err());
    }
}
