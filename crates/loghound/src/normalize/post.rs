//! Post — category-specific text transforms.
//!
//! Closed set of transforms named by [`PostProcess`]; adding one means adding
//! a variant and an arm here.

use crate::catalog::PostProcess;

pub(crate) fn apply(kind: PostProcess, text: &str) -> String {
    match kind {
        PostProcess::StripNativeDump => strip_native_dump(text),
    }
}

/// Native crash bodies carry raw register/dump lines of unbounded,
/// instance-specific content that redaction patterns cannot enumerate.
/// Delete every line strictly between the `signal …, fault addr` marker and
/// the `backtrace:` marker that contains a run of four spaces.
fn strip_native_dump(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let start = lines
        .iter()
        .position(|line| line.contains("signal") && line.contains("fault addr"));
    let end = lines.iter().position(|line| line.contains("backtrace:"));

    let (Some(start), Some(end)) = (start, end) else {
        return text.to_string();
    };
    if start + 1 >= end {
        return text.to_string();
    }

    let kept: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| !(*i > start && *i < end && line.contains("    ")))
        .map(|(_, line)| *line)
        .collect();
    kept.join("\n")
}
