//! Rendering scenarios across the in-memory, streaming and pretty backends.

use std::io::Read;

use markup_fuse::markup::{
    Node, add_attribute, add_attributes, concat, empty, join_with_space, leaf_element,
    node_element, text, unescaped_bytes, unescaped_text,
};
use markup_fuse::render::{
    BufferRenderer, render, render_chunks, render_pretty, render_string, render_string_with,
    render_to, walk,
};
use markup_fuse::builder::INLINE_CAP;
use markup_fuse::{BuilderConfig, Format, RenderConfig, Renderer};

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_leaf_then_empty() {
    let doc = concat(leaf_element("br"), empty());
    assert_eq!(render_string(&doc).unwrap(), "<br/>");

    let html = RenderConfig::new().with_format(Format::Html);
    assert_eq!(render_string_with(&doc, &html).unwrap(), "<br>");
}

#[test]
fn test_paragraph_with_id() {
    let p = node_element("p");
    let doc = add_attributes([("id", "x")], p(text("Hi & bye")));
    assert_eq!(render_string(&doc).unwrap(), r#"<p id="x">Hi &amp; bye</p>"#);
}

#[test]
fn test_duplicate_attributes_preserved() {
    let div = node_element("div");
    let doc = add_attributes([("class", "a"), ("class", "a")], div(empty()));
    assert_eq!(
        render_string(&doc).unwrap(),
        r#"<div class="a" class="a"></div>"#
    );
}

#[test]
fn test_attributes_on_each_sibling() {
    let li = node_element("li");
    let doc = add_attribute(("class", "item"), li(text("one")) + li(text("two")));
    assert_eq!(
        render_string(&doc).unwrap(),
        r#"<li class="item">one</li><li class="item">two</li>"#
    );
}

#[test]
fn test_attributes_skip_text_siblings() {
    let doc = add_attribute(("id", "n"), text("before ") + leaf_element("hr") + text(" after"));
    assert_eq!(render_string(&doc).unwrap(), r#"before <hr id="n"/> after"#);
}

#[test]
fn test_inner_attributes_come_first() {
    let img = add_attribute(("src", "a.png"), leaf_element("img"));
    let doc = add_attribute(("alt", "A"), img + leaf_element("br"));
    assert_eq!(
        render_string(&doc).unwrap(),
        r#"<img src="a.png" alt="A"/><br alt="A"/>"#
    );
}

#[test]
fn test_unescaped_bytes_render_verbatim() {
    let raw = unescaped_bytes("<!-- é -->".as_bytes()).unwrap();
    let doc = node_element("div")(raw) + text("&");
    assert_eq!(render_string(&doc).unwrap(), "<div><!-- é --></div>&amp;");
}

#[test]
fn test_unescaped_bytes_reject_invalid_utf8() {
    let bytes = vec![b'o', b'k', 0xE2, 0x82];
    let err = unescaped_bytes(&bytes).unwrap_err();
    assert!(matches!(err, markup_fuse::Error::InvalidUtf8 { offset: 2 }));
}

#[test]
fn test_unescaped_text_verbatim() {
    let doc = node_element("script")(unescaped_text("if (a < b && c > d) {}"));
    assert_eq!(
        render_string(&doc).unwrap(),
        "<script>if (a < b && c > d) {}</script>"
    );
}

#[test]
fn test_join_with_space() {
    let em = node_element("em");
    let doc = join_with_space([text("a"), em(text("b")), text("c")]);
    assert_eq!(render_string(&doc).unwrap(), "a <em>b</em> c");
}

#[test]
fn test_unicode_text() {
    let doc = text("café “quotes” 😀 <ok>");
    assert_eq!(
        render_string(&doc).unwrap(),
        "café “quotes” 😀 &lt;ok&gt;"
    );
}

// ============================================================================
// Backends
// ============================================================================

fn sample_document(items: usize) -> Node {
    let ul = node_element("ul");
    let li = node_element("li");
    let body: Node = (0..items)
        .map(|i| add_attribute(("data-i", i.to_string()), li(text(format!("item {i} & more")))))
        .collect();
    ul(body)
}

#[test]
fn test_chunks_concat_to_full_output() {
    let doc = sample_document(200);
    let config = RenderConfig::new().with_builder(BuilderConfig::default().with_chunk_size(128));

    let full = render_string(&doc).unwrap();
    let chunks = render_chunks(&doc, &config).unwrap();

    assert!(chunks.iter().all(|c| c.len() <= 128));
    assert_eq!(chunks.concat(), full.as_bytes());
}

#[test]
fn test_stream_to_file() {
    let doc = sample_document(50);
    let config = RenderConfig::new().with_builder(BuilderConfig::default().with_chunk_size(64));

    let file = tempfile::tempfile().unwrap();
    let mut file = render_to(&doc, file, &config).unwrap();

    use std::io::{Seek, SeekFrom};
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut written = String::new();
    file.read_to_string(&mut written).unwrap();

    assert_eq!(written, render_string(&doc).unwrap());
}

#[test]
fn test_buffer_renderer_directly() {
    let doc = sample_document(3);
    let mut renderer = BufferRenderer::new(RenderConfig::default());
    walk(&doc, &mut renderer);
    let builder = renderer.finish();
    assert_eq!(builder.len(), render(&doc, &RenderConfig::default()).len());
}

#[test]
fn test_pretty_output() {
    let doc = sample_document(2);
    let out = render_pretty(&doc, &RenderConfig::default()).unwrap();
    let expected = "\
<ul>
  <li data-i=\"0\">
    item 0 &amp; more
  </li>
  <li data-i=\"1\">
    item 1 &amp; more
  </li>
</ul>
";
    assert_eq!(out, expected);
}

// ============================================================================
// Scaling
// ============================================================================

#[test]
fn test_sequential_concat_scales_linearly() {
    let n = 100_000;
    let mut doc = Node::Empty;
    for _ in 0..n {
        doc += leaf_element("br");
    }

    let chunk_size = 4096;
    let config =
        RenderConfig::new().with_builder(BuilderConfig::default().with_chunk_size(chunk_size));
    let chunks = render_chunks(&doc, &config).unwrap();

    let total: usize = chunks.iter().map(Vec::len).sum();
    assert_eq!(total, n * "<br/>".len());
    // A chunk is only flushed when the next fused write would not fit.
    assert!(chunks.len() <= total / (chunk_size - INLINE_CAP) + 1);
}

#[test]
fn test_right_nested_concat_is_supported() {
    let mut doc = Node::Empty;
    for i in 0..10_000 {
        doc = text(format!("{}", i % 10)) + doc;
    }
    let out = render_string(&doc).unwrap();
    assert_eq!(out.len(), 10_000);
    assert!(out.starts_with("9876543210"));
}

/// Take a document apart one level at a time, since dropping it whole
/// recurses once per nested element.
fn dismantle(node: Node) {
    let mut stack = vec![node];
    while let Some(mut node) = stack.pop() {
        match &mut node {
            Node::Element { children, .. } | Node::WithAttributes { node: children, .. } => {
                stack.push(std::mem::take(&mut **children));
            }
            Node::Concat(nodes) => stack.extend(nodes.drain(..)),
            _ => {}
        }
    }
}

#[test]
fn test_deep_element_nesting_renders() {
    let depth = 200_000;
    let mut doc = text("x");
    for _ in 0..depth {
        doc = add_attribute(("class", "n"), node_element("b")(doc));
    }

    let out = render(&doc, &RenderConfig::default()).to_bytes();
    let open = r#"<b class="n">"#;
    assert_eq!(out.len(), depth * (open.len() + "</b>".len()) + 1);
    assert!(out.starts_with(format!("{open}{open}").as_bytes()));
    assert!(out.ends_with(b"x</b></b>"));

    dismantle(doc);
}
