//! Value splitter.

#[inline]
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\'' | '"' | '`' | ';')
}

/// Split an attribute value into its fragments, in order, keeping duplicates.
pub fn fragments(value: &str) -> impl Iterator<Item = &str> + '_ {
    value.split(is_separator).filter(|f| !f.is_empty())
}
