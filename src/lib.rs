//! # markup-fuse
//!
//! Build markup documents out of composable fragments and serialize them
//! to bytes without escaping mistakes.
//!
//! ## Layers
//!
//! - [`markup`]: the document algebra ([`Node`]) and its constructors
//! - [`render`]: the single traversal and its backends (in-memory,
//!   streaming, pretty-printed)
//! - [`codec`]: UTF-8 encoding with entity escaping, and materialization
//!   of reusable fragments
//! - [`builder`]: the chunked byte builder everything is written into
//!
//! ## Quick Start
//!
//! ```
//! use markup_fuse::markup::{add_attributes, leaf_element, node_element, text};
//! use markup_fuse::render::render_string;
//!
//! let p = node_element("p");
//! let doc = add_attributes([("class", "note")], p(text("1 < 2")) + leaf_element("hr"));
//!
//! assert_eq!(
//!     render_string(&doc).unwrap(),
//!     r#"<p class="note">1 &lt; 2</p><hr class="note"/>"#,
//! );
//! ```

pub mod builder;
pub mod codec;
mod error;
pub mod markup;
pub mod render;

#[cfg(feature = "cli")]
pub mod json;

pub use builder::{Builder, BuilderConfig, Write};
pub use error::{Error, Result};
pub use markup::{Attribute, Node, Tag, Text};
pub use render::{Format, RenderConfig, Renderer};
