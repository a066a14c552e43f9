//! Rewriter: turns resolved classes into edits of the element text and
//! applies the per-document plan.

use std::ops::Range;

use crate::classify::ElementClasses;
use crate::scanner::ElementSpan;

/// Replacement of `start..end` in the original document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanEntry {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// Replace `range` of the element text with `text`. Empty ranges insert.
#[derive(Debug)]
struct Edit {
    range: Range<usize>,
    text: String,
}

/* ============================ Utility predicates ========================= */

#[inline]
fn is_ws(b: u8) -> bool {
    b.is_ascii_whitespace()
}

/// Where a new `class` attribute goes: after the last attribute byte,
/// before any whitespace, a self-closing `/` and the closing `>`.
fn class_insertion_point(tag: &[u8], floor: usize) -> usize {
    let mut p = tag.len().saturating_sub(1);
    if p > floor && tag[p - 1] == b'/' {
        p -= 1;
    }
    while p > floor && is_ws(tag[p - 1]) {
        p -= 1;
    }
    p
}

/// Build the plan entry for one element. `None` when nothing was resolved,
/// leaving the element untouched.
pub fn rewrite_element(element: &ElementSpan<'_>, classes: &ElementClasses) -> Option<PlanEntry> {
    if classes.tokens.is_empty() {
        return None;
    }
    let joined = classes.tokens.join(" ");

    let mut edits: Vec<Edit> = classes
        .deletions
        .iter()
        .map(|r| Edit {
            range: r.clone(),
            text: String::new(),
        })
        .collect();

    let class_edit = match &classes.existing_class {
        Some(value) if value.is_empty() => Edit {
            range: value.end..value.end,
            text: joined,
        },
        Some(value) => Edit {
            range: value.end..value.end,
            text: format!(" {joined}"),
        },
        None => {
            let at = class_insertion_point(element.text.as_bytes(), element.attrs_offset);
            Edit {
                range: at..at,
                text: format!(" class=\"{joined}\""),
            }
        }
    };
    edits.push(class_edit);

    Some(PlanEntry {
        start: element.start,
        end: element.end(),
        replacement: apply_edits(element.text, edits),
    })
}

fn apply_edits(text: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| (e.range.start, e.range.end));
    let mut out = String::with_capacity(text.len() + edits.iter().map(|e| e.text.len()).sum::<usize>());
    let mut i = 0usize;
    for edit in edits {
        debug_assert!(edit.range.start >= i, "overlapping element edits");
        out.push_str(&text[i..edit.range.start]);
        out.push_str(&edit.text);
        i = edit.range.end;
    }
    out.push_str(&text[i..]);
    out
}

/// Apply non-overlapping plan entries to `src`, copying everything else
/// verbatim.
pub fn apply_plan(src: &str, mut plan: Vec<PlanEntry>) -> String {
    if plan.is_empty() {
        return src.to_owned();
    }
    plan.sort_by_key(|e| e.start);
    let grow: usize = plan.iter().map(|e| e.replacement.len()).sum();
    let mut out = String::with_capacity(src.len() + grow);
    let mut i = 0usize;
    for entry in plan {
        debug_assert!(entry.start >= i, "overlapping plan entries");
        out.push_str(&src[i..entry.start]);
        out.push_str(&entry.replacement);
        i = entry.end;
    }
    out.push_str(&src[i..]);
    out
}
