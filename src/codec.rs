//! UTF-8 encoding with inline entity escaping.
//!
//! This is the one place markup-significant characters are replaced:
//!
//! | char | entity   |
//! |------|----------|
//! | `<`  | `&lt;`   |
//! | `>`  | `&gt;`   |
//! | `&`  | `&amp;`  |
//! | `"`  | `&quot;` |
//! | `'`  | `&apos;` |
//!
//! [`encode_char`] is the per-character primitive. [`escape_str`] produces
//! byte-identical output but copies whole runs of safe text at once, using
//! `memchr` to find the next character that needs an entity.

use std::sync::Arc;

use memchr::{memchr2_iter, memchr3_iter};

use crate::builder::{Builder, INLINE_CAP, Write};
use crate::error::Result;

const LT: Write = Write::from_static(b"&lt;");
const GT: Write = Write::from_static(b"&gt;");
const AMP: Write = Write::from_static(b"&amp;");
const QUOT: Write = Write::from_static(b"&quot;");
const APOS: Write = Write::from_static(b"&apos;");

fn entity_write(b: u8) -> Option<Write> {
    match b {
        b'<' => Some(LT),
        b'>' => Some(GT),
        b'&' => Some(AMP),
        b'"' => Some(QUOT),
        b'\'' => Some(APOS),
        _ => None,
    }
}

/// Number of bytes `c` occupies in UTF-8.
pub fn utf8_len(c: char) -> usize {
    match c as u32 {
        0..=0x7F => 1,
        0x80..=0x7FF => 2,
        0x800..=0xFFFF => 3,
        _ => 4,
    }
}

/// Encode one character as UTF-8, without escaping.
pub fn raw_char(c: char) -> Write {
    let mut buf = [0u8; 4];
    c.encode_utf8(&mut buf);
    Write::copy(&buf[..utf8_len(c)])
}

/// Encode one character, replacing markup-significant characters with
/// their entity.
pub fn encode_char(c: char) -> Write {
    if c.is_ascii()
        && let Some(write) = entity_write(c as u8)
    {
        return write;
    }
    raw_char(c)
}

/// Feed the escaped encoding of `s` to `emit`, one write per safe run or
/// entity.
pub fn escape_with(s: &str, mut emit: impl FnMut(Write)) {
    let bytes = s.as_bytes();
    let mut markup = memchr3_iter(b'<', b'>', b'&', bytes).peekable();
    let mut quotes = memchr2_iter(b'"', b'\'', bytes).peekable();
    let mut start = 0;

    loop {
        let pos = match (markup.peek().copied(), quotes.peek().copied()) {
            (Some(m), Some(q)) if m < q => markup.next(),
            (_, Some(_)) => quotes.next(),
            (Some(_), None) => markup.next(),
            (None, None) => None,
        };
        let Some(pos) = pos else {
            break;
        };

        // Entity bytes are ASCII, so `pos` always sits on a char boundary.
        if pos > start {
            emit(Write::copy(&bytes[start..pos]));
        }
        if let Some(write) = entity_write(bytes[pos]) {
            emit(write);
        }
        start = pos + 1;
    }

    if start < bytes.len() {
        emit(Write::copy(&bytes[start..]));
    }
}

/// Escape `s` into a new builder.
pub fn escape_str(s: &str) -> Builder {
    let mut builder = Builder::new();
    escape_with(s, |w| builder.push(w));
    builder
}

/// Escape `s` character by character through [`encode_char`].
///
/// Slower than [`escape_str`]; kept as the reference encoding.
pub fn escape_chars(s: &str) -> Builder {
    s.chars().map(encode_char).collect()
}

/// Emit `s` verbatim.
pub fn raw_str(s: &str) -> Write {
    Write::copy(s.as_bytes())
}

/// Accept pre-encoded bytes for verbatim output.
///
/// Nothing is escaped, so the caller vouches for the markup. The bytes must
/// still be UTF-8; otherwise the error carries the offset of the first bad
/// sequence.
pub fn raw_bytes(bytes: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

/// Force a builder into one flat, shareable write.
///
/// Useful for fragments emitted many times: each use becomes one copy
/// instead of re-running the writes that produced it. Output is unchanged.
pub fn materialize(builder: &Builder) -> Write {
    if builder.len() <= INLINE_CAP {
        return Write::copy(&builder.to_bytes());
    }
    Write::shared(Arc::from(builder.to_bytes()))
}
