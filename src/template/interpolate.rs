// ABOUTME: Interpolation of a single line or loop body
// ABOUTME: Substitutes variables until none remain, then applies at most one filter

use std::borrow::Cow;
use tracing::trace;

use super::context::Context;
use super::engine::RenderOptions;
use super::error::{Position, Result, TemplateError};
use super::matcher::Matchers;
use super::splice::splice;
use super::value::{Value, ValueKind};

/// Render one line against `ctx`. `position` is reported in any error.
pub fn interpolate_line(
    matchers: &Matchers,
    options: &RenderOptions,
    ctx: &Context<'_>,
    line: &[u8],
    position: Position,
) -> Result<Vec<u8>> {
    reject_include(matchers, line, position)?;
    let substituted = substitute_variables(matchers, options, ctx, line, position)?;
    // Values are rescanned for markers, so an include can arrive through one
    reject_include(matchers, &substituted, position)?;
    apply_filter(matchers, ctx, substituted, position)
}

fn reject_include(matchers: &Matchers, line: &[u8], position: Position) -> Result<()> {
    match matchers.find_include(line) {
        Some(name) => Err(TemplateError::Unsupported {
            construct: "SCREAM",
            name: name.into_owned(),
            position,
        }),
        None => Ok(()),
    }
}

/// Replace the leftmost variable marker, then rescan, until no marker is left
fn substitute_variables<'a>(
    matchers: &Matchers,
    options: &RenderOptions,
    ctx: &Context<'_>,
    line: &'a [u8],
    position: Position,
) -> Result<Cow<'a, [u8]>> {
    let mut current = Cow::Borrowed(line);
    let mut passes = 0;

    loop {
        let next = match matchers.find_variable(&current) {
            Some(found) => {
                if passes == options.max_passes {
                    return Err(TemplateError::SubstitutionLimit {
                        limit: options.max_passes,
                        position,
                    });
                }
                passes += 1;

                let value = resolve_string(ctx, &found.name, position)?;
                trace!("Substituting variable '{}' ({} bytes)", found.name, value.len());
                splice(&current, found.span, value.as_bytes())
            }
            None => break,
        };
        current = Cow::Owned(next);
    }

    Ok(current)
}

/// Apply the first filter marker on the line, if there is one
fn apply_filter(
    matchers: &Matchers,
    ctx: &Context<'_>,
    line: Cow<'_, [u8]>,
    position: Position,
) -> Result<Vec<u8>> {
    let Some(found) = matchers.find_filter(&line) else {
        return Ok(line.into_owned());
    };

    let filter = ctx
        .lookup_filter(&found.name)
        .ok_or_else(|| TemplateError::UnknownFilter {
            name: found.name.to_string(),
            position,
        })?;

    let argument = String::from_utf8_lossy(found.argument);
    let result = filter.apply(&argument);
    trace!(
        "Applied filter '{}' to {} byte argument",
        found.name,
        argument.len()
    );

    let filtered = splice(&line, found.span, result.as_bytes());
    filter.release(result);
    Ok(filtered)
}

fn resolve_string<'c>(ctx: &'c Context<'_>, name: &str, position: Position) -> Result<&'c str> {
    match ctx.lookup_value(name) {
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(other) => Err(TemplateError::TypeMismatch {
            name: name.to_string(),
            expected: ValueKind::String,
            found: other.kind(),
            position,
        }),
        None => Err(TemplateError::UnknownVariable {
            name: name.to_string(),
            position,
        }),
    }
}
