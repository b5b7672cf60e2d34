//! Span — pure multi-span string replacement.
//!
//! Replaces byte-offset spans of a string with replacement text, applying
//! from the highest start offset down so that one replacement never
//! invalidates the offsets of the next. Spans must not overlap.

use std::ops::Range;

pub(crate) fn replace_spans(text: &str, mut spans: Vec<(Range<usize>, String)>) -> String {
    spans.sort_by(|a, b| b.0.start.cmp(&a.0.start));

    let mut out = text.to_string();
    for (range, replacement) in spans {
        out.replace_range(range, &replacement);
    }
    out
}
