//! Unified line diff for modified sections.
//!
//! Presentation only: classification never looks at lines.

use crate::similarity::{OpTag, SequenceMatcher};

pub const OLD_HEADER: &str = "--- Old Version";
pub const NEW_HEADER: &str = "+++ New Version";

/// Unified diff of `old` against `new`, one string per output line, no line
/// terminators. Empty when the texts have identical lines.
pub fn unified_diff(old: &str, new: &str, context: usize) -> Vec<String> {
    let a: Vec<&str> = old.lines().collect();
    let b: Vec<&str> = new.lines().collect();
    let matcher = SequenceMatcher::new(&a, &b);

    let mut out = Vec::new();
    for group in matcher.grouped_opcodes(context) {
        if out.is_empty() {
            out.push(OLD_HEADER.to_string());
            out.push(NEW_HEADER.to_string());
        }
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        out.push(format!(
            "@@ -{} +{} @@",
            hunk_range(first.a_start, last.a_end),
            hunk_range(first.b_start, last.b_end)
        ));
        for op in &group {
            match op.tag {
                OpTag::Equal => {
                    out.extend(a[op.a_start..op.a_end].iter().map(|l| format!(" {l}")));
                }
                OpTag::Replace | OpTag::Delete | OpTag::Insert => {
                    out.extend(a[op.a_start..op.a_end].iter().map(|l| format!("-{l}")));
                    out.extend(b[op.b_start..op.b_end].iter().map(|l| format!("+{l}")));
                }
            }
        }
    }
    out
}

fn hunk_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    match length {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}
