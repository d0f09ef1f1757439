// ABOUTME: Template render driver
// ABOUTME: Scans the input once, expanding loop blocks and interpolating lines into one output buffer

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::buffer::OutputBuffer;
use super::context::Context;
use super::error::{Position, Result};
use super::interpolate::interpolate_line;
use super::loops::expand_loop;
use super::matcher::Matchers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Upper bound on variable substitutions within one line or loop body
    pub max_passes: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { max_passes: 10_000 }
    }
}

/// Compiled matchers plus render options. Immutable, so one engine can serve
/// many renders, including from several threads at once.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    matchers: Matchers,
    options: RenderOptions,
}

impl TemplateEngine {
    /// Create a new template engine with default options
    pub fn new() -> Result<Self> {
        Self::with_options(RenderOptions::default())
    }

    pub fn with_options(options: RenderOptions) -> Result<Self> {
        Ok(Self {
            matchers: Matchers::compile()?,
            options,
        })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `input` against `ctx`. The returned buffer holds exactly the
    /// rendered bytes; nothing is appended or overwritten at the end.
    pub fn render(&self, ctx: &Context<'_>, input: &[u8]) -> Result<Vec<u8>> {
        debug!("Rendering template ({} bytes)", input.len());

        let mut output = OutputBuffer::new();
        let mut cursor = 0;
        let mut line = 1;

        while cursor < input.len() {
            let rest = &input[cursor..];
            let position = Position::new(line, cursor);

            let consumed =
                match expand_loop(&self.matchers, &self.options, ctx, rest, position)? {
                    Some(expansion) => {
                        output.append(&expansion.output)?;
                        expansion.consumed
                    }
                    None => {
                        let current = read_line(rest);
                        let rendered = interpolate_line(
                            &self.matchers,
                            &self.options,
                            ctx,
                            current,
                            position,
                        )?;
                        output.append(&rendered)?;
                        current.len()
                    }
                };

            line += count_line_ends(input, cursor..cursor + consumed);
            cursor += consumed;
        }

        debug!("Rendered {} bytes into {} bytes", input.len(), output.len());
        Ok(output.finish())
    }
}

/// Render with a freshly compiled engine
pub fn render(ctx: &Context<'_>, input: &[u8]) -> Result<Vec<u8>> {
    TemplateEngine::new()?.render(ctx, input)
}

/// Bytes up to and including the first line terminator, or all of `rest`
fn read_line(rest: &[u8]) -> &[u8] {
    match rest.iter().position(|&b| b == b'\n' || b == b'\r') {
        Some(end) => &rest[..=end],
        None => rest,
    }
}

/// Line ends inside `range`: every `\n`, and every `\r` not followed by `\n`
fn count_line_ends(input: &[u8], range: std::ops::Range<usize>) -> usize {
    range
        .filter(|&i| match input[i] {
            b'\n' => true,
            b'\r' => input.get(i + 1) != Some(&b'\n'),
            _ => false,
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::error::TemplateError;

    fn render_str(ctx: &Context<'_>, input: &str) -> Result<String> {
        let engine = TemplateEngine::new().unwrap();
        engine
            .render(ctx, input.as_bytes())
            .map(|bytes| String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_read_line() {
        assert_eq!(read_line(b"one\ntwo"), b"one\n");
        assert_eq!(read_line(b"one\r\ntwo"), b"one\r");
        assert_eq!(read_line(b"last"), b"last");
    }

    #[test]
    fn test_count_line_ends() {
        assert_eq!(count_line_ends(b"a\rb\rc", 0..5), 2);
        assert_eq!(count_line_ends(b"a\r\nb\n", 0..5), 2);
        assert_eq!(count_line_ends(b"a\r\n", 0..2), 0);
    }

    #[test]
    fn test_error_line_with_carriage_returns() {
        let ctx = Context::new();
        let err = TemplateEngine::new()
            .unwrap()
            .render(&ctx, b"a\rb\rxXx @missing xXx\r")
            .unwrap_err();

        assert_eq!(err.position(), Some(Position::new(3, 4)));
    }

    #[test]
    fn test_error_line_with_crlf() {
        let ctx = Context::new();
        let err = TemplateEngine::new()
            .unwrap()
            .render(&ctx, b"a\r\nb\r\nxXx @missing xXx\r\n")
            .unwrap_err();

        assert_eq!(err.position(), Some(Position::new(3, 6)));
    }

    #[test]
    fn test_marker_free_input_unchanged() {
        let ctx = Context::new();
        let input = "plain text\nwith lines\r\nand no markers\n";
        assert_eq!(render_str(&ctx, input).unwrap(), input);
    }

    #[test]
    fn test_trailing_byte_is_preserved() {
        let mut ctx = Context::new();
        ctx.add_string("name", "world");

        assert_eq!(render_str(&ctx, "xXx @name xXx").unwrap(), "world");
        assert_eq!(render_str(&ctx, "xXx @name xXx\n").unwrap(), "world\n");
    }

    #[test]
    fn test_empty_input() {
        let ctx = Context::new();
        assert_eq!(render_str(&ctx, "").unwrap(), "");
    }

    #[test]
    fn test_document_with_loop() {
        let mut ctx = Context::new();
        ctx.add_string("title", "Fruits");
        ctx.add_array("fruits")
            .push_string("apple")
            .push_string("pear");

        let input = "<h1>xXx @title xXx</h1>\n<ul>\n  xXx LOOP f fruits xXx\n  <li>xXx @f xXx</li>xXx BBL xXx\n</ul>\n";
        let expected = "<h1>Fruits</h1>\n<ul>\n\n  <li>apple</li>\n  <li>pear</li>\n</ul>\n";
        assert_eq!(render_str(&ctx, input).unwrap(), expected);
    }

    #[test]
    fn test_error_position_points_at_line() {
        let ctx = Context::new();
        let err = render_str(&ctx, "ok\nstill ok\nxXx @missing xXx\n").unwrap_err();

        match err {
            TemplateError::UnknownVariable { name, position } => {
                assert_eq!(name, "missing");
                assert_eq!(position, Position::new(3, 12));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_free_render_function() {
        let mut ctx = Context::new();
        ctx.add_int("answer", 42);

        let out = render(&ctx, b"xXx @answer xXx").unwrap();
        assert_eq!(out, b"42");
    }

    #[test]
    fn test_engine_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TemplateEngine>();

        let engine = TemplateEngine::new().unwrap();
        std::thread::scope(|scope| {
            for n in 0..4 {
                let engine = &engine;
                scope.spawn(move || {
                    let mut ctx = Context::new();
                    ctx.add_int("n", n);
                    let out = engine.render(&ctx, b"n=xXx @n xXx").unwrap();
                    assert_eq!(out, format!("n={n}").into_bytes());
                });
            }
        });
    }
}
