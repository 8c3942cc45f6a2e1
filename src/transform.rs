//! Line cleanup and ordering.
//!
//! Every ordering action runs the same preprocessing first: trim (if
//! enabled), then drop empty lines (if enabled). Ordering is always a stable
//! sort, so lines with equal keys keep the order they had going in.

use crate::model::OrderingPolicy;
use std::cmp::Reverse;

/// Preprocessing switches applied before ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toggles {
    pub trim: bool,
    pub remove_blank: bool,
}

/// Trim and/or drop blank lines, in that order.
///
/// Blankness is checked after the trim step, so a whitespace-only line only
/// counts as blank when trimming is on. An already-empty line is dropped
/// regardless of the trim setting.
pub fn preprocess<I, S>(lines: I, toggles: Toggles) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| {
            let line = line.as_ref();
            if toggles.trim {
                line.trim().to_string()
            } else {
                line.to_string()
            }
        })
        .filter(|line| !(toggles.remove_blank && line.is_empty()))
        .collect()
}

/// Stable in-place sort by the given policy.
pub fn order(lines: &mut [String], policy: OrderingPolicy) {
    match policy {
        OrderingPolicy::ByLengthAscending => lines.sort_by_key(|l| l.chars().count()),
        OrderingPolicy::ByLengthDescending => lines.sort_by_key(|l| Reverse(l.chars().count())),
        // `str` ordering is byte-wise UTF-8, which matches code-point order.
        OrderingPolicy::LexicographicAscending => lines.sort(),
        OrderingPolicy::LexicographicDescending => lines.sort_by(|a, b| b.cmp(a)),
    }
}

/// Run the full pipeline and return a new sequence. Never fails.
pub fn transform<I, S>(lines: I, toggles: Toggles, policy: OrderingPolicy) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = preprocess(lines, toggles);
    order(&mut out, policy);
    out
}
