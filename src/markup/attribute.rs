//! Attribute key/value pairs.

use std::borrow::Cow;
use std::fmt;

use crate::builder::{Builder, Write};
use crate::codec::{materialize, raw_str};

/// A single `key="value"` pair.
///
/// The key is opaque and emitted verbatim. The value is escaped on output
/// unless the attribute was built with [`Attribute::pre_escaped`], in which
/// case keeping it well-formed is the caller's job.
#[derive(Clone)]
pub struct Attribute {
    key: Cow<'static, str>,
    /// ` key="`, materialized at construction.
    prefix: Write,
    value: Cow<'static, str>,
    verbatim: bool,
}

impl Attribute {
    /// An attribute whose value is escaped when rendered.
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self::build(key.into(), value.into(), false)
    }

    /// An attribute whose value is emitted exactly as given.
    pub fn pre_escaped(
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::build(key.into(), value.into(), true)
    }

    fn build(key: Cow<'static, str>, value: Cow<'static, str>, verbatim: bool) -> Self {
        let mut prefix = Builder::new();
        prefix.push(Write::byte(b' '));
        prefix.push(raw_str(&key));
        prefix.push(Write::from_static(b"=\""));
        Self {
            prefix: materialize(&prefix),
            key,
            value,
            verbatim,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the value bypasses escaping.
    pub fn is_verbatim(&self) -> bool {
        self.verbatim
    }

    /// ` key="`: everything before the value.
    pub fn prefix(&self) -> &Write {
        &self.prefix
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("verbatim", &self.verbatim)
            .finish()
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value && self.verbatim == other.verbatim
    }
}

impl Eq for Attribute {}

impl<K, V> From<(K, V)> for Attribute
where
    K: Into<Cow<'static, str>>,
    V: Into<Cow<'static, str>>,
{
    fn from((key, value): (K, V)) -> Self {
        Attribute::new(key, value)
    }
}
