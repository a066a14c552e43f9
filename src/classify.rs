//! Token classifier: decides what each attribute of an element contributes.

use std::borrow::Cow;
use std::ops::Range;

use futures::future::try_join_all;
use tracing::trace;

use crate::attributes::{attributes, AttributeRecord};
use crate::engine::UtilityEngine;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::scanner::ElementSpan;
use crate::value::fragments;

/// Binding decorations stripped from a name, tried in order, first match only.
pub const BINDING_PREFIXES: &[&str] = &["v-bind:", ":"];

/// Names whose value is the element's existing class list.
pub const CLASS_ATTRIBUTES: &[&str] = &["class", "className"];

/// Fragment standing for the attribute name itself (`hover="~"` is `hover`).
const SELF_FRAGMENT: &str = "~";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Ignored,
    ExistingClass,
    NonValuedCandidate,
    ValuedCandidate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedAttribute<'a> {
    pub record: AttributeRecord<'a>,
    /// Name after prefix and binding-decoration stripping.
    pub effective_name: Cow<'a, str>,
    pub disposition: Disposition,
}

/// What one element contributes to the rewrite. Ranges are byte offsets into
/// the element text (`ElementSpan::text`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementClasses {
    /// Confirmed utilities in discovery order. Not deduplicated.
    pub tokens: Vec<String>,
    /// Value of the last `class`/`className` attribute.
    pub existing_class: Option<Range<usize>>,
    /// Attributes to drop, each with one preceding whitespace character.
    pub deletions: Vec<Range<usize>>,
}

/// Compute the effective name of `record` and its disposition. Does not call
/// the engine's token resolver.
pub fn classify<'a>(
    record: AttributeRecord<'a>,
    engine: &dyn UtilityEngine,
    options: &Options,
) -> ClassifiedAttribute<'a> {
    let raw_name = record.name;
    let mut name = if options.prefixed_only {
        remove_first(raw_name, &options.prefix)
    } else {
        Cow::Borrowed(raw_name)
    };

    let disposition = if options.is_ignored(&name) {
        Disposition::Ignored
    } else {
        if let Some(prefix) = BINDING_PREFIXES.iter().find(|p| name.starts_with(**p)) {
            name = match name {
                Cow::Borrowed(s) => Cow::Borrowed(&s[prefix.len()..]),
                Cow::Owned(s) => Cow::Owned(s[prefix.len()..].to_owned()),
            };
        }
        match record.value {
            None if options.non_valued_attribute && engine.is_valid_selector(&name) => {
                Disposition::NonValuedCandidate
            }
            None => Disposition::Ignored,
            // `:class` is a framework binding, not a class list
            Some(_) if CLASS_ATTRIBUTES.contains(&&*name) && !raw_name.contains(':') => {
                Disposition::ExistingClass
            }
            Some(_) => Disposition::ValuedCandidate,
        }
    };

    ClassifiedAttribute {
        record,
        effective_name: name,
        disposition,
    }
}

/// `name` without the first occurrence of `pat`, wherever it sits
/// (`:un-text` loses `un-` too).
fn remove_first<'a>(name: &'a str, pat: &str) -> Cow<'a, str> {
    if pat.is_empty() {
        return Cow::Borrowed(name);
    }
    match name.find(pat) {
        Some(0) => Cow::Borrowed(&name[pat.len()..]),
        Some(at) => Cow::Owned(format!("{}{}", &name[..at], &name[at + pat.len()..])),
        None => Cow::Borrowed(name),
    }
}

/// Candidate tokens for a valued attribute, in fragment order.
pub fn valued_candidates(name: &str, value: &str) -> Vec<String> {
    fragments(value)
        .map(|f| {
            if f == SELF_FRAGMENT {
                name.to_owned()
            } else {
                format!("{name}-{f}")
            }
        })
        .collect()
}

async fn confirm(engine: &dyn UtilityEngine, token: &str) -> Result<bool> {
    let ok = engine
        .parse_token(token)
        .await
        .map_err(|source| Error::Engine {
            token: token.to_owned(),
            source,
        })?;
    trace!(token, ok, "utility lookup");
    Ok(ok)
}

/// Classify every attribute of `element` and resolve its candidates against
/// `engine`. Fragments of one attribute are resolved concurrently; attributes
/// are resolved one after another.
pub async fn classify_element(
    element: &ElementSpan<'_>,
    engine: &dyn UtilityEngine,
    options: &Options,
) -> Result<ElementClasses> {
    let mut out = ElementClasses::default();
    let base = element.attrs_offset;

    for record in attributes(element.attrs) {
        let attr = classify(record, engine, options);
        let name: &str = &attr.effective_name;
        let record = &attr.record;

        let confirmed = match attr.disposition {
            Disposition::Ignored => continue,
            Disposition::ExistingClass => {
                out.existing_class = record
                    .value_span
                    .as_ref()
                    .map(|r| base + r.start..base + r.end);
                continue;
            }
            Disposition::NonValuedCandidate => {
                if confirm(engine, name).await? {
                    out.tokens.push(name.to_owned());
                    true
                } else {
                    false
                }
            }
            Disposition::ValuedCandidate => {
                let candidates = valued_candidates(name, record.value.unwrap_or_default());
                let results = try_join_all(candidates.iter().map(|t| confirm(engine, t))).await?;
                let before = out.tokens.len();
                out.tokens.extend(
                    candidates
                        .into_iter()
                        .zip(results)
                        .filter_map(|(token, ok)| ok.then_some(token)),
                );
                out.tokens.len() > before
            }
        };

        if confirmed && options.delete_class {
            out.deletions.push(deletion_range(element.text, base, &record.span));
        }
    }

    Ok(out)
}

/// `span` (relative to the attribute region at `base`) widened over one
/// preceding whitespace character.
fn deletion_range(text: &str, base: usize, span: &Range<usize>) -> Range<usize> {
    let start = base + span.start;
    let end = base + span.end;
    if start > 0 && text.as_bytes()[start - 1].is_ascii_whitespace() {
        start - 1..end
    } else {
        start..end
    }
}
