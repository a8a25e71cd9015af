//! JSON description of documents, used by the command-line tool.
//!
//! Accepted shapes:
//!
//! ```json
//! "plain text"
//! {"text": "escaped text"}
//! {"raw": "<!-- verbatim -->"}
//! {"element": "p", "attrs": [["id", "x"]], "children": ["Hi"]}
//! {"leaf": "br", "attrs": [["class", "gap"]]}
//! [ ...nodes, concatenated in order... ]
//! ```

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::markup::{self, Attribute, Node};

/// One node of a JSON document.
///
/// Each object shape rejects keys it does not know, so an object mixing
/// shapes (say `leaf` with `children`) is an error rather than a node with
/// some of its content dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JsonNode {
    Str(String),
    Many(Vec<JsonNode>),
    Element(JsonElement),
    Leaf(JsonLeaf),
    Text(JsonText),
    Raw(JsonRaw),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonElement {
    pub element: String,
    #[serde(default)]
    pub attrs: Vec<(String, String)>,
    #[serde(default)]
    pub children: Vec<JsonNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonLeaf {
    pub leaf: String,
    #[serde(default)]
    pub attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonText {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonRaw {
    pub raw: String,
}

impl From<JsonNode> for Node {
    fn from(json: JsonNode) -> Self {
        match json {
            JsonNode::Str(text) | JsonNode::Text(JsonText { text }) => markup::text(text),
            JsonNode::Raw(JsonRaw { raw }) => markup::unescaped_text(raw),
            JsonNode::Many(nodes) => nodes.into_iter().map(Node::from).collect(),
            JsonNode::Element(JsonElement {
                element,
                attrs,
                children,
            }) => {
                let children: Node = children.into_iter().map(Node::from).collect();
                with_attrs(markup::element(element, children), attrs)
            }
            JsonNode::Leaf(JsonLeaf { leaf, attrs }) => {
                with_attrs(markup::leaf_element(leaf), attrs)
            }
        }
    }
}

fn with_attrs(node: Node, attrs: Vec<(String, String)>) -> Node {
    markup::add_attributes(attrs.into_iter().map(Attribute::from), node)
}

/// Parse a JSON document into a [`Node`].
pub fn from_json(input: &str) -> Result<Node> {
    let json: JsonNode =
        serde_json::from_str(input).map_err(|e| Error::InvalidDocument(e.to_string()))?;
    Ok(json.into())
}
