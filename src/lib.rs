//! attributify: fold utility attributes into `class`.
//!
//! `<div mt-2 text="red bold">` becomes
//! `<div mt-2 text="red bold" class="mt-2 text-red text-bold">` when a
//! [`UtilityEngine`] confirms those tokens.
//!
//! - One left-to-right pass over opening tags; no DOM, no AST.
//! - Everything outside rewritten tags is copied byte for byte.
//! - Bare attributes become `name`, valued attributes `name-fragment` per
//!   value fragment (`~` stands for `name` itself).
//! - Tokens are appended to an existing `class`/`className` or land in a new
//!   `class` attribute before the closing `>`.
//! - With `delete_class`, attributes that produced a token are removed.
//!
//! The engine is injected; this crate never decides on its own what a utility
//! class is. [`UtilitySet`] is a word-list engine for the CLI and tests.

pub mod attributes;
pub mod classify;
pub mod engine;
pub mod error;
pub mod options;
pub mod rewrite;
pub mod scanner;
pub mod value;

use tracing::debug;

pub use classify::{ClassifiedAttribute, Disposition, ElementClasses};
pub use engine::{is_valid_selector, UtilityEngine, UtilitySet};
pub use error::{BoxError, Error, Result};
pub use options::Options;
pub use rewrite::PlanEntry;
pub use scanner::ElementSpan;

/// Transformer name reported to host pipelines.
pub const NAME: &str = "transformer-attributify";

/// Transform `source`, resolving candidates against `engine`.
///
/// Fails on the first engine error; there is no partial output.
pub async fn transform(source: &str, engine: &dyn UtilityEngine, options: &Options) -> Result<String> {
    let mut plan = Vec::new();
    let mut scanned = 0usize;

    for element in scanner::elements(source) {
        scanned += 1;
        let classes = classify::classify_element(&element, engine, options).await?;
        if let Some(entry) = rewrite::rewrite_element(&element, &classes) {
            debug!(
                offset = element.start,
                tokens = classes.tokens.len(),
                deleted = classes.deletions.len(),
                "rewrote element"
            );
            plan.push(entry);
        }
    }

    debug!(elements = scanned, rewritten = plan.len(), "attributify pass done");
    Ok(rewrite::apply_plan(source, plan))
}

/// When a host should run this transformer relative to others.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Enforce {
    Pre,
    Post,
}

/// A configured transformer, for hosts that keep a list of them.
#[derive(Clone, Debug, Default)]
pub struct Attributify {
    options: Options,
}

impl Attributify {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn name(&self) -> &'static str {
        NAME
    }

    /// Runs before other source transformers, so they see the final classes.
    pub fn enforce(&self) -> Enforce {
        Enforce::Pre
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub async fn transform(&self, source: &str, engine: &dyn UtilityEngine) -> Result<String> {
        transform(source, engine, &self.options).await
    }
}
