//! Element tag names with their opening and closing bytes prepared once.

use std::borrow::Cow;
use std::fmt;

use crate::builder::{Builder, Write};
use crate::codec::{materialize, raw_str};

/// A tag name.
///
/// `<name` and `</name>` are materialized when the tag is created, so a tag
/// reused across many elements costs one flat copy per emission.
#[derive(Clone)]
pub struct Tag {
    name: Cow<'static, str>,
    open: Write,
    close: Write,
}

impl Tag {
    /// Create a tag. The name is opaque and emitted verbatim.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();

        let mut open = Builder::new();
        open.push(Write::byte(b'<'));
        open.push(raw_str(&name));

        let mut close = Builder::new();
        close.push(Write::from_static(b"</"));
        close.push(raw_str(&name));
        close.push(Write::byte(b'>'));

        Self {
            open: materialize(&open),
            close: materialize(&close),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<name`, without the closing bracket.
    pub fn open(&self) -> &Write {
        &self.open
    }

    /// `</name>`.
    pub fn close(&self) -> &Write {
        &self.close
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tag").field(&self.name).finish()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Tag {}

impl From<&'static str> for Tag {
    fn from(name: &'static str) -> Self {
        Tag::new(name)
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag::new(name)
    }
}
