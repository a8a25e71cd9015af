//! Write actions: length-tagged byte writers that compose by fusion.
//!
//! A [`Write`] always knows exactly how many bytes it will produce, and it
//! only ever writes into a slice of exactly that length. The length is
//! derived from the bytes the write owns or borrows, never supplied by the
//! caller, so a write cannot overrun or underfill its destination.

use std::fmt;
use std::sync::Arc;

/// Largest payload stored inline (no heap allocation).
pub const INLINE_CAP: usize = 30;

/// A single write action.
///
/// Cloning is cheap: inline writes are copied, everything else is shared.
#[derive(Clone)]
pub struct Write {
    op: Op,
}

#[derive(Clone)]
enum Op {
    Inline { buf: [u8; INLINE_CAP], len: u8 },
    Static(&'static [u8]),
    Shared(Arc<[u8]>),
    /// Two writes run back to back; `len` caches the sum.
    Fused(Arc<(Write, Write)>, usize),
}

impl Write {
    /// The write that produces no bytes.
    pub const fn empty() -> Self {
        Self {
            op: Op::Inline {
                buf: [0; INLINE_CAP],
                len: 0,
            },
        }
    }

    /// A write producing a single byte.
    pub fn byte(b: u8) -> Self {
        let mut buf = [0; INLINE_CAP];
        buf[0] = b;
        Self {
            op: Op::Inline { buf, len: 1 },
        }
    }

    /// A write that borrows static bytes (tag punctuation, entities).
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self {
            op: Op::Static(bytes),
        }
    }

    /// A write that copies `bytes`, inline when they fit.
    pub fn copy(bytes: &[u8]) -> Self {
        if bytes.len() <= INLINE_CAP {
            let mut buf = [0; INLINE_CAP];
            buf[..bytes.len()].copy_from_slice(bytes);
            Self {
                op: Op::Inline {
                    buf,
                    len: bytes.len() as u8,
                },
            }
        } else {
            Self::shared(Arc::from(bytes))
        }
    }

    /// A write over an already shared byte region.
    pub fn shared(bytes: Arc<[u8]>) -> Self {
        Self {
            op: Op::Shared(bytes),
        }
    }

    /// Exact number of bytes this write produces.
    pub fn len(&self) -> usize {
        match &self.op {
            Op::Inline { len, .. } => *len as usize,
            Op::Static(bytes) => bytes.len(),
            Op::Shared(bytes) => bytes.len(),
            Op::Fused(_, len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bytes as one contiguous region, when the write has one.
    ///
    /// Fused writes return `None`; their bytes only exist once run.
    pub fn as_flat(&self) -> Option<&[u8]> {
        match &self.op {
            Op::Inline { buf, len } => Some(&buf[..*len as usize]),
            Op::Static(bytes) => Some(bytes),
            Op::Shared(bytes) => Some(bytes),
            Op::Fused(..) => None,
        }
    }

    /// Compose two writes: `self` at the destination offset, `next` after it.
    ///
    /// Small results are copied into a single inline write; larger ones keep
    /// both halves and run them in sequence.
    pub fn then(self, next: Write) -> Write {
        if next.is_empty() {
            return self;
        }
        if self.is_empty() {
            return next;
        }

        let total = self.len() + next.len();
        if total <= INLINE_CAP {
            let mut buf = [0; INLINE_CAP];
            let (head, tail) = buf[..total].split_at_mut(self.len());
            self.run(head);
            next.run(tail);
            return Write {
                op: Op::Inline {
                    buf,
                    len: total as u8,
                },
            };
        }

        Write {
            op: Op::Fused(Arc::new((self, next)), total),
        }
    }

    /// Run the write into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst.len() != self.len()`. Every caller in this crate
    /// obtains `dst` by reserving exactly `self.len()` bytes.
    pub fn run(&self, dst: &mut [u8]) {
        assert_eq!(
            dst.len(),
            self.len(),
            "write length does not match its destination"
        );
        match &self.op {
            Op::Inline { buf, len } => dst.copy_from_slice(&buf[..*len as usize]),
            Op::Static(bytes) => dst.copy_from_slice(bytes),
            Op::Shared(bytes) => dst.copy_from_slice(bytes),
            Op::Fused(pair, _) => {
                let (first, second) = &**pair;
                let (head, tail) = dst.split_at_mut(first.len());
                first.run(head);
                second.run(tail);
            }
        }
    }

    /// Append the produced bytes to `out`.
    pub fn append_to(&self, out: &mut Vec<u8>) {
        let start = out.len();
        out.resize(start + self.len(), 0);
        self.run(&mut out[start..]);
    }

    /// Collect the produced bytes into a fresh vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        self.append_to(&mut out);
        out
    }
}

impl Default for Write {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Write {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.op {
            Op::Inline { .. } => "Inline",
            Op::Static(_) => "Static",
            Op::Shared(_) => "Shared",
            Op::Fused(..) => "Fused",
        };
        f.debug_struct("Write")
            .field("kind", &kind)
            .field("bytes", &String::from_utf8_lossy(&self.to_vec()))
            .finish()
    }
}

impl PartialEq for Write {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.to_vec() == other.to_vec()
    }
}

impl Eq for Write {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_small_is_inline() {
        let w = Write::copy(b"hello");
        assert_eq!(w.len(), 5);
        assert_eq!(w.as_flat(), Some(&b"hello"[..]));
        assert!(matches!(w.op, Op::Inline { .. }));
    }

    #[test]
    fn test_copy_large_is_shared() {
        let data = vec![b'x'; INLINE_CAP + 1];
        let w = Write::copy(&data);
        assert!(matches!(w.op, Op::Shared(_)));
        assert_eq!(w.to_vec(), data);
    }

    #[test]
    fn test_then_small_fuses_inline() {
        let w = Write::from_static(b"<p").then(Write::byte(b'>'));
        assert!(matches!(w.op, Op::Inline { .. }));
        assert_eq!(w.to_vec(), b"<p>");
    }

    #[test]
    fn test_then_large_keeps_both_halves() {
        let a = Write::copy(&[b'a'; 20]);
        let b = Write::copy(&[b'b'; 20]);
        let w = a.then(b);
        assert_eq!(w.len(), 40);
        assert!(w.as_flat().is_none());

        let mut expected = vec![b'a'; 20];
        expected.extend_from_slice(&[b'b'; 20]);
        assert_eq!(w.to_vec(), expected);
    }

    #[test]
    fn test_then_with_empty_is_identity() {
        let w = Write::from_static(b"abc");
        assert_eq!(w.clone().then(Write::empty()), w);
        assert_eq!(Write::empty().then(w.clone()), w);
    }

    #[test]
    fn test_then_is_associative() {
        let a = Write::copy(&[b'1'; 12]);
        let b = Write::copy(&[b'2'; 12]);
        let c = Write::copy(&[b'3'; 12]);
        let left = a.clone().then(b.clone()).then(c.clone());
        let right = a.then(b.then(c));
        assert_eq!(left, right);
    }

    #[test]
    #[should_panic(expected = "write length does not match")]
    fn test_run_rejects_wrong_destination() {
        let w = Write::copy(b"abc");
        let mut dst = [0u8; 2];
        w.run(&mut dst);
    }
}
