// ABOUTME: Loop block expansion for `xXx LOOP item arr xXx ... xXx BBL xXx`
// ABOUTME: Renders the loop body once per array element in a short-lived child scope

use tracing::{trace, warn};

use super::buffer::OutputBuffer;
use super::context::Context;
use super::engine::RenderOptions;
use super::error::{Position, Result, TemplateError};
use super::interpolate::interpolate_line;
use super::matcher::Matchers;
use super::value::{Value, ValueKind};

/// Rendered loop block and how many input bytes it covered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopExpansion {
    pub output: Vec<u8>,
    pub consumed: usize,
}

/// Expand a loop block starting at the beginning of `rest`.
///
/// Returns `Ok(None)` when `rest` does not open with a loop start marker, or
/// when no end marker follows it. The body runs up to the nearest end marker,
/// so nested loops are not supported.
pub fn expand_loop(
    matchers: &Matchers,
    options: &RenderOptions,
    ctx: &Context<'_>,
    rest: &[u8],
    position: Position,
) -> Result<Option<LoopExpansion>> {
    let Some(start) = matchers.find_loop_start(rest) else {
        return Ok(None);
    };

    let Some(end) = matchers.find_loop_end(rest, start.body_start) else {
        warn!(
            "Loop over '{}' at {} has no closing marker, rendering as plain text",
            start.array, position
        );
        return Ok(None);
    };

    let items = match ctx.lookup_value(&start.array) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(TemplateError::TypeMismatch {
                name: start.array.into_owned(),
                expected: ValueKind::Array,
                found: other.kind(),
                position,
            })
        }
        None => {
            return Err(TemplateError::UnknownVariable {
                name: start.array.into_owned(),
                position,
            })
        }
    };

    let body = &rest[start.body_start..end.start];
    trace!(
        "Expanding loop '{}' over '{}' ({} items, {} byte body)",
        start.item,
        start.array,
        items.len(),
        body.len()
    );

    let mut output = OutputBuffer::new();
    for (index, element) in items.iter().enumerate() {
        let value = match element {
            Value::String(value) => value,
            Value::Array(_) => {
                return Err(TemplateError::TypeMismatch {
                    name: format!("{}[{}]", start.array, index),
                    expected: ValueKind::String,
                    found: ValueKind::Array,
                    position,
                })
            }
        };

        let mut scope = ctx.child();
        scope.add_string(&start.item, value);
        let piece = interpolate_line(matchers, options, &scope, body, position)?;
        output.append(&piece)?;
    }

    Ok(Some(LoopExpansion {
        output: output.finish(),
        consumed: end.end,
    }))
}
