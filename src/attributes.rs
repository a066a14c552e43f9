//! Attribute tokenizer for one element's attribute region.
//!
//! Grammar, loosely: `name ( ws* '=' ws* '{'? quote value quote '}'? )?`.
//! Names are runs of anything but whitespace, `=`, quotes (including
//! backticks) and braces; a lone `?` is the wildcard name. Runs starting with
//! a digit, `--` or `-<digit>` are dropped whole. `name=bare` and `name={expr}` are skipped without a record.

use std::ops::Range;

use memchr::memchr;

/// One syntactic attribute occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeRecord<'a> {
    /// The whole matched text, `name` through the closing quote or brace.
    pub raw: &'a str,
    pub name: &'a str,
    /// Quote around the value; `None` for a boolean attribute.
    pub quote: Option<char>,
    /// Text between the quotes; `None` for a boolean attribute.
    pub value: Option<&'a str>,
    /// Range of `raw` within the attribute region.
    pub span: Range<usize>,
    /// Range of `value` within the attribute region.
    pub value_span: Option<Range<usize>>,
}

/// Iterate the attributes of `region` in source order.
pub fn attributes(region: &str) -> Attributes<'_> {
    Attributes { src: region, pos: 0 }
}

#[derive(Debug, Clone)]
pub struct Attributes<'a> {
    src: &'a str,
    pos: usize,
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    !(b.is_ascii_whitespace()
        || matches!(b, b'=' | b'"' | b'\'' | b'`' | b'{' | b'}'))
}

#[inline]
fn is_quote(b: u8) -> bool {
    matches!(b, b'"' | b'\'' | b'`')
}

/// Numeric literals and `--`/`-2` lookalikes are not attribute names.
fn is_rejected_name(name: &[u8]) -> bool {
    match name {
        [d, ..] if d.is_ascii_digit() => true,
        [b'-', b'-', ..] => true,
        [b'-', d, ..] if d.is_ascii_digit() => true,
        _ => false,
    }
}

fn skip_ws(s: &[u8], mut i: usize) -> usize {
    while i < s.len() && s[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Index after the quote closing the string opened at `i`, or the end.
fn skip_quoted(s: &[u8], i: usize) -> usize {
    memchr(s[i], &s[i + 1..]).map_or(s.len(), |p| i + 1 + p + 1)
}

/// Index after the `}` matching the `{` at `i`, or the end.
fn skip_binding(s: &[u8], mut i: usize) -> usize {
    let mut depth = 0usize;
    while i < s.len() {
        match s[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            q if is_quote(q) => {
                i = skip_quoted(s, i);
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    s.len()
}

fn skip_unquoted(s: &[u8], mut i: usize) -> usize {
    while i < s.len() && !s[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

enum Value {
    None,
    Quoted {
        quote: u8,
        content: Range<usize>,
        end: usize,
    },
    Opaque {
        end: usize,
    },
}

/// Parse what follows a name ending at `i`.
fn parse_value(s: &[u8], i: usize) -> Value {
    let n = s.len();
    let eq = skip_ws(s, i);
    if eq >= n || s[eq] != b'=' {
        return Value::None;
    }
    let j = skip_ws(s, eq + 1);
    if j >= n {
        return Value::Opaque { end: n };
    }
    let braced = s[j] == b'{';
    let k = if braced { j + 1 } else { j };
    if k < n && (s[k] == b'"' || s[k] == b'\'') {
        let quote = s[k];
        if let Some(p) = memchr(quote, &s[k + 1..]) {
            let close = k + 1 + p;
            let mut end = close + 1;
            if braced && end < n && s[end] == b'}' {
                end += 1;
            }
            return Value::Quoted {
                quote,
                content: k + 1..close,
                end,
            };
        }
        // unterminated: the name stands alone, the rest is skipped as stray
        return Value::None;
    }
    let end = if braced {
        skip_binding(s, j)
    } else if is_quote(s[j]) {
        skip_quoted(s, j)
    } else {
        skip_unquoted(s, j)
    };
    Value::Opaque { end }
}

impl<'a> Iterator for Attributes<'a> {
    type Item = AttributeRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let src = self.src;
        let s = src.as_bytes();
        let n = s.len();
        loop {
            let mut i = skip_ws(s, self.pos);
            if i >= n {
                self.pos = n;
                return None;
            }
            let b = s[i];
            let start = i;
            let name_end;
            if is_quote(b) {
                self.pos = skip_quoted(s, i);
                continue;
            } else if !is_name_byte(b) {
                self.pos = i + 1;
                continue;
            } else {
                while i < n && is_name_byte(s[i]) {
                    i += 1;
                }
                let mut end = i;
                while end > start && s[end - 1] == b'/' {
                    end -= 1;
                }
                if end == start || is_rejected_name(&s[start..end]) {
                    self.pos = i;
                    continue;
                }
                if end < i {
                    // `name/`: a self-closing marker, never followed by a value
                    self.pos = i;
                    return Some(self.boolean(start, end));
                }
                name_end = i;
            }

            match parse_value(s, name_end) {
                Value::None => {
                    self.pos = name_end;
                    return Some(self.boolean(start, name_end));
                }
                Value::Opaque { end } => {
                    self.pos = end;
                }
                Value::Quoted {
                    quote,
                    content,
                    end,
                } => {
                    self.pos = end;
                    // ASCII delimiters keep every range on char boundaries
                    return Some(AttributeRecord {
                        raw: &src[start..end],
                        name: &src[start..name_end],
                        quote: Some(quote as char),
                        value: Some(&src[content.clone()]),
                        span: start..end,
                        value_span: Some(content),
                    });
                }
            }
        }
    }
}

impl<'a> Attributes<'a> {
    fn boolean(&self, start: usize, end: usize) -> AttributeRecord<'a> {
        let name = &self.src[start..end];
        AttributeRecord {
            raw: name,
            name,
            quote: None,
            value: None,
            span: start..end,
            value_span: None,
        }
    }
}

impl std::iter::FusedIterator for Attributes<'_> {}
