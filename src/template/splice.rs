// ABOUTME: Line splicing for substitution and filter application
// ABOUTME: Replaces a byte span of a line with new text, always producing a fresh buffer

use std::ops::Range;

/// Build a new line from `line[..span.start]`, `replacement` and `line[span.end..]`
pub fn splice(line: &[u8], span: Range<usize>, replacement: &[u8]) -> Vec<u8> {
    let head = &line[..span.start];
    let tail = &line[span.end..];

    let mut spliced = Vec::with_capacity(head.len() + replacement.len() + tail.len());
    spliced.extend_from_slice(head);
    spliced.extend_from_slice(replacement);
    spliced.extend_from_slice(tail);
    spliced
}
