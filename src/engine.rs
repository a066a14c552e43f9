//! The seam between the scanner and whatever decides what a utility class is.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use async_trait::async_trait;

use crate::error::{BoxError, Error, Result};

/// Capability the transform consults for every candidate token.
#[async_trait]
pub trait UtilityEngine: Send + Sync {
    /// Resolve `token`; `Ok(true)` means it generates at least one rule.
    async fn parse_token(&self, token: &str) -> Result<bool, BoxError>;

    /// Whether `selector` may be treated as a class selector at all. Only
    /// consulted for non-valued attributes.
    fn is_valid_selector(&self, selector: &str) -> bool {
        is_valid_selector(selector)
    }
}

/// A selector is eligible as soon as it holds one character a utility name
/// can be made of.
pub fn is_valid_selector(selector: &str) -> bool {
    selector.chars().any(|c| {
        c.is_ascii_alphanumeric()
            || c == '_'
            || ('%'..='?').contains(&c)
            || ('\u{00A0}'..='\u{FFFF}').contains(&c)
    })
}

/// Engine backed by a fixed list of known utility classes.
#[derive(Debug, Clone, Default)]
pub struct UtilitySet {
    classes: HashSet<String>,
}

impl UtilitySet {
    /// One class per line; blank lines and `#` comments are skipped.
    pub fn from_word_list(src: &str) -> Self {
        src.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_word_list(&src))
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for UtilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl UtilityEngine for UtilitySet {
    async fn parse_token(&self, token: &str) -> Result<bool, BoxError> {
        Ok(self.contains(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_predicate() {
        assert!(is_valid_selector("mt-2"));
        assert!(is_valid_selector("?"));
        assert!(is_valid_selector("é"));
        assert!(is_valid_selector("w-1/2"));
        assert!(!is_valid_selector(""));
        assert!(!is_valid_selector("@!"));
        assert!(!is_valid_selector("[]{}"));
    }

    #[test]
    fn word_list() {
        let set = UtilitySet::from_word_list("# utilities\nmt-2\n\n  text-red  \n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("mt-2"));
        assert!(set.contains("text-red"));
        assert!(!set.contains("# utilities"));
        assert!(!set.is_empty());
        assert!(UtilitySet::from_word_list("# nothing here\n").is_empty());
    }

    #[tokio::test]
    async fn set_confirms_members_only() {
        let set: UtilitySet = ["flex"].into_iter().collect();
        assert!(set.parse_token("flex").await.unwrap());
        assert!(!set.parse_token("grid").await.unwrap());
    }
}
