//! Renderer-agnostic document values.
//!
//! A document is a [`Node`]: a small closed set of variants combined with
//! [`concat`] (or `+`). The algebra is what matters:
//!
//! - `concat` is associative and [`Node::Empty`] is its identity.
//! - Attributes attached to a concatenation reach every top-level element
//!   of it, but never descend into an element's children.
//! - Attributes attached to text alone do nothing.
//! - Attribute lists are kept as given, duplicates included.
//!
//! None of these laws are enforced by rewriting the tree. They follow from
//! how [`crate::render::walk`] traverses it.
//!
//! # Example
//!
//! ```
//! use markup_fuse::markup::{add_attribute, node_element, text};
//! use markup_fuse::render::render_string;
//!
//! let p = node_element("p");
//! let doc = add_attribute(("id", "x"), p(text("Hi & bye")));
//! assert_eq!(render_string(&doc).unwrap(), r#"<p id="x">Hi &amp; bye</p>"#);
//! ```

use std::borrow::Cow;
use std::collections::VecDeque;
use std::ops::{Add, AddAssign};

mod attribute;
mod tag;

use crate::codec;
use crate::error::Result;

pub use attribute::Attribute;
pub use tag::Tag;

/// Leaf character content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    content: Cow<'static, str>,
    verbatim: bool,
}

impl Text {
    /// Text that is escaped when rendered.
    pub fn escaped(content: impl Into<Cow<'static, str>>) -> Self {
        Self {
            content: content.into(),
            verbatim: false,
        }
    }

    /// Text that is already escaped (or deliberately raw) and is emitted as is.
    pub fn verbatim(content: impl Into<Cow<'static, str>>) -> Self {
        Self {
            content: content.into(),
            verbatim: true,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_verbatim(&self) -> bool {
        self.verbatim
    }
}

/// A document value.
///
/// Rendering walks any depth of nesting, but the derived `Clone`,
/// `PartialEq` and drop glue recurse once per nested `Element` or
/// `WithAttributes`. Sequential concatenation is flat and costs no depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Node {
    /// Contributes nothing.
    #[default]
    Empty,
    Text(Text),
    /// `<tag ...>children</tag>`.
    Element { tag: Tag, children: Box<Node> },
    /// A self-closing element with no children.
    Leaf(Tag),
    /// Attributes to attach to every top-level element of `node`.
    WithAttributes {
        attrs: Vec<Attribute>,
        node: Box<Node>,
    },
    /// Nodes in order. Never nested directly inside another `Concat` and
    /// never containing `Empty` when built through [`concat`].
    Concat(VecDeque<Node>),
}

impl Node {
    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    /// Concatenate `self` and `other`. See [`concat`].
    pub fn concat(self, other: Node) -> Node {
        match (self, other) {
            (Node::Empty, node) | (node, Node::Empty) => node,
            (Node::Concat(mut left), Node::Concat(mut right)) => {
                if left.len() >= right.len() {
                    left.append(&mut right);
                    Node::Concat(left)
                } else {
                    while let Some(node) = left.pop_back() {
                        right.push_front(node);
                    }
                    Node::Concat(right)
                }
            }
            (Node::Concat(mut left), node) => {
                left.push_back(node);
                Node::Concat(left)
            }
            (node, Node::Concat(mut right)) => {
                right.push_front(node);
                Node::Concat(right)
            }
            (left, right) => Node::Concat(VecDeque::from([left, right])),
        }
    }

    /// Attach attributes. See [`add_attributes`].
    pub fn with_attributes<I, A>(self, attrs: I) -> Node
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        add_attributes(attrs, self)
    }

    /// Attach one attribute. See [`add_attribute`].
    pub fn with_attribute(self, attr: impl Into<Attribute>) -> Node {
        add_attribute(attr, self)
    }
}

// ============================================================================
// Construction primitives
// ============================================================================

/// The empty document.
pub fn empty() -> Node {
    Node::Empty
}

/// Text that will be escaped on output. Empty text is [`Node::Empty`].
pub fn text(content: impl Into<Cow<'static, str>>) -> Node {
    let content = content.into();
    if content.is_empty() {
        return Node::Empty;
    }
    Node::Text(Text::escaped(content))
}

/// `text("")`.
pub fn empty_text() -> Node {
    text("")
}

/// Text emitted verbatim, without escaping.
pub fn unescaped_text(content: impl Into<Cow<'static, str>>) -> Node {
    let content = content.into();
    if content.is_empty() {
        return Node::Empty;
    }
    Node::Text(Text::verbatim(content))
}

/// Pre-encoded bytes emitted verbatim, without escaping.
///
/// Fails with [`crate::Error::InvalidUtf8`] if `bytes` is not UTF-8.
pub fn unescaped_bytes(bytes: &[u8]) -> Result<Node> {
    let content = codec::raw_bytes(bytes)?;
    Ok(unescaped_text(content.to_owned()))
}

/// A constructor that wraps children in `tag`.
///
/// ```
/// use markup_fuse::markup::{node_element, text};
///
/// let li = node_element("li");
/// let items = li(text("one")) + li(text("two"));
/// ```
pub fn node_element(tag: impl Into<Tag>) -> impl Fn(Node) -> Node {
    let tag = tag.into();
    move |children| element(tag.clone(), children)
}

/// `tag` wrapped around `children`.
pub fn element(tag: impl Into<Tag>, children: Node) -> Node {
    Node::Element {
        tag: tag.into(),
        children: Box::new(children),
    }
}

/// A self-closing element.
pub fn leaf_element(tag: impl Into<Tag>) -> Node {
    Node::Leaf(tag.into())
}

/// Attach `attrs`, in order, to every top-level element of `node`.
///
/// Nothing is deduplicated. Attaching to text or to nothing has no visible
/// effect.
pub fn add_attributes<I, A>(attrs: I, node: Node) -> Node
where
    I: IntoIterator<Item = A>,
    A: Into<Attribute>,
{
    let attrs: Vec<Attribute> = attrs.into_iter().map(Into::into).collect();
    if attrs.is_empty() {
        return node;
    }
    match node {
        // Inner attributes render first, so the outer ones extend the list.
        Node::WithAttributes {
            attrs: mut inner,
            node,
        } => {
            inner.extend(attrs);
            Node::WithAttributes { attrs: inner, node }
        }
        node => Node::WithAttributes {
            attrs,
            node: Box::new(node),
        },
    }
}

/// Attach a single attribute.
pub fn add_attribute(attr: impl Into<Attribute>, node: Node) -> Node {
    add_attributes([attr.into()], node)
}

/// Concatenate two documents, preserving order.
pub fn concat(left: Node, right: Node) -> Node {
    left.concat(right)
}

/// Concatenate `nodes` with a single space of text between neighbors.
pub fn join_with_space(nodes: impl IntoIterator<Item = Node>) -> Node {
    let mut out = Node::Empty;
    for (i, node) in nodes.into_iter().enumerate() {
        if i > 0 {
            out = out.concat(text(" "));
        }
        out = out.concat(node);
    }
    out
}

impl Add for Node {
    type Output = Node;

    fn add(self, rhs: Node) -> Node {
        self.concat(rhs)
    }
}

impl AddAssign for Node {
    fn add_assign(&mut self, rhs: Node) {
        let this = std::mem::take(self);
        *self = this.concat(rhs);
    }
}

impl FromIterator<Node> for Node {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        iter.into_iter().fold(Node::Empty, Node::concat)
    }
}

impl Extend<Node> for Node {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, iter: I) {
        for node in iter {
            *self += node;
        }
    }
}
