//! Element scanner: finds opening tags that carry attributes.
//!
//! A candidate is `<`, a word character, more tag-name characters
//! (`[A-Za-z0-9_:.$-]`), one whitespace character, the attribute region and
//! the closing `>`. Tags without attributes (`<div>`, `<br/>`), end tags and
//! comment openers never match.
//!
//! Finding the closing `>`:
//! - Outside quotes and bindings, the first `>` closes the tag.
//! - A quote opens only where a value may start (after `=` or `{`), or
//!   anywhere inside a `{...}` binding.
//! - `>` inside a quoted value or inside a binding does not close the tag.
//! - If that search runs off the end (unbalanced quote or brace), the first
//!   plain `>` is used instead. No `>` at all rejects the candidate.

use memchr::memchr;

/// One opening tag, borrowed from the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementSpan<'a> {
    /// Absolute offset of `<` in the document.
    pub start: usize,
    /// The whole tag, `<` through `>`.
    pub text: &'a str,
    /// The attribute region, between the whitespace after the tag name and `>`.
    pub attrs: &'a str,
    /// Offset of `attrs` inside `text`.
    pub attrs_offset: usize,
}

impl ElementSpan<'_> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Lazy iterator over the element spans of `src`, in document order.
pub fn elements(src: &str) -> Elements<'_> {
    Elements { src, pos: 0 }
}

#[derive(Debug, Clone)]
pub struct Elements<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Iterator for Elements<'a> {
    type Item = ElementSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let src = self.src;
        let s = src.as_bytes();
        while self.pos < s.len() {
            let Some(rel) = memchr(b'<', &s[self.pos..]) else {
                break;
            };
            let lt = self.pos + rel;
            if let Some((attrs_start, gt)) = match_element(s, lt) {
                self.pos = gt + 1;
                // all delimiters are ASCII, so every offset is a char boundary
                return Some(ElementSpan {
                    start: lt,
                    text: &src[lt..=gt],
                    attrs: &src[attrs_start..gt],
                    attrs_offset: attrs_start - lt,
                });
            }
            self.pos = lt + 1;
        }
        self.pos = s.len();
        None
    }
}

impl std::iter::FusedIterator for Elements<'_> {}

/* ============================ Utility predicates ========================= */

#[inline]
fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
fn is_tag_name_char(b: u8) -> bool {
    is_word(b) || matches!(b, b':' | b'.' | b'$' | b'-')
}

#[inline]
fn is_quote(b: u8) -> bool {
    matches!(b, b'"' | b'\'' | b'`')
}

/* =============================== Tag matching ============================ */

/// Match an element at `lt` (s[lt] == '<'). Returns the start of the attribute
/// region and the index of the closing '>'.
fn match_element(s: &[u8], lt: usize) -> Option<(usize, usize)> {
    let n = s.len();
    let mut i = lt + 1;
    if i >= n || !is_word(s[i]) {
        return None;
    }
    i += 1;
    while i < n && is_tag_name_char(s[i]) {
        i += 1;
    }
    if i >= n || !s[i].is_ascii_whitespace() {
        return None;
    }
    let attrs_start = i + 1;
    let gt = find_tag_end(s, attrs_start)
        .or_else(|| memchr(b'>', &s[attrs_start..]).map(|p| attrs_start + p))?;
    Some((attrs_start, gt))
}

/// Find the '>' closing a tag whose attribute region starts at `i`, skipping
/// quoted values and `{...}` bindings.
fn find_tag_end(s: &[u8], mut i: usize) -> Option<usize> {
    let n = s.len();
    let mut quote: u8 = 0;
    let mut braces = 0usize;
    let mut prev: u8 = b' ';
    while i < n {
        let b = s[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
                prev = b;
            }
        } else if is_quote(b) && (braces > 0 || prev == b'=' || prev == b'{') {
            quote = b;
        } else if b == b'{' {
            braces += 1;
            prev = b;
        } else if b == b'}' && braces > 0 {
            braces -= 1;
            prev = b;
        } else if b == b'>' && braces == 0 {
            return Some(i);
        } else if !b.is_ascii_whitespace() {
            prev = b;
        }
        i += 1;
    }
    None
}
