// ABOUTME: Compiled marker patterns for variables, loops, filters and includes
// ABOUTME: Matchers are immutable once built and safe to share between concurrent renders

use regex::bytes::{Captures, Regex};
use std::borrow::Cow;
use std::ops::Range;

use super::error::Result;

const VARIABLE_PATTERN: &str = r"xXx @([A-Za-z0-9_]+) xXx";
const LOOP_START_PATTERN: &str = r"^[ \t]*xXx LOOP ([A-Za-z0-9_]+) ([A-Za-z0-9_]+) xXx";
const LOOP_END_PATTERN: &str = r"xXx BBL xXx";
// The argument spans arbitrary bytes, not only valid UTF-8
const FILTER_PATTERN: &str = r"(?s-u)XxX ([A-Za-z0-9_]+)(?: (.*?))? XxX";
const INCLUDE_PATTERN: &str = r"xXx SCREAM ([A-Za-z0-9_]+) xXx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMatch<'a> {
    /// Span of the whole marker
    pub span: Range<usize>,
    pub name: Cow<'a, str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMatch<'a> {
    pub span: Range<usize>,
    pub name: Cow<'a, str>,
    pub argument: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopStart<'a> {
    pub item: Cow<'a, str>,
    pub array: Cow<'a, str>,
    /// Offset just past the start marker
    pub body_start: usize,
}

#[derive(Debug, Clone)]
pub struct Matchers {
    variable: Regex,
    loop_start: Regex,
    loop_end: Regex,
    filter: Regex,
    include: Regex,
}

impl Matchers {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            variable: Regex::new(VARIABLE_PATTERN)?,
            loop_start: Regex::new(LOOP_START_PATTERN)?,
            loop_end: Regex::new(LOOP_END_PATTERN)?,
            filter: Regex::new(FILTER_PATTERN)?,
            include: Regex::new(INCLUDE_PATTERN)?,
        })
    }

    /// Leftmost `xXx @name xXx` marker in `line`
    pub fn find_variable<'a>(&self, line: &'a [u8]) -> Option<VariableMatch<'a>> {
        let caps = self.variable.captures(line)?;
        Some(VariableMatch {
            span: caps.get(0)?.range(),
            name: group_str(&caps, 1)?,
        })
    }

    /// Leftmost `XxX name argument XxX` marker in `line`
    pub fn find_filter<'a>(&self, line: &'a [u8]) -> Option<FilterMatch<'a>> {
        let caps = self.filter.captures(line)?;
        Some(FilterMatch {
            span: caps.get(0)?.range(),
            name: group_str(&caps, 1)?,
            argument: caps.get(2).map_or(&[][..], |m| m.as_bytes()),
        })
    }

    /// Loop start marker at the very beginning of `rest`, after optional indentation
    pub fn find_loop_start<'a>(&self, rest: &'a [u8]) -> Option<LoopStart<'a>> {
        let caps = self.loop_start.captures(rest)?;
        Some(LoopStart {
            item: group_str(&caps, 1)?,
            array: group_str(&caps, 2)?,
            body_start: caps.get(0)?.end(),
        })
    }

    /// Nearest end marker at or after `from`
    pub fn find_loop_end(&self, rest: &[u8], from: usize) -> Option<Range<usize>> {
        self.loop_end.find_at(rest, from).map(|m| m.range())
    }

    /// Name of the first include marker in `line`, if any
    pub fn find_include<'a>(&self, line: &'a [u8]) -> Option<Cow<'a, str>> {
        let caps = self.include.captures(line)?;
        group_str(&caps, 1)
    }
}

fn group_str<'a>(caps: &Captures<'a>, index: usize) -> Option<Cow<'a, str>> {
    caps.get(index).map(|m| String::from_utf8_lossy(m.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matchers() -> Matchers {
        Matchers::compile().unwrap()
    }

    #[test]
    fn test_variable_match() {
        let m = matchers();
        let line = b"Hello xXx @name_1 xXx!";
        let found = m.find_variable(line).unwrap();

        assert_eq!(found.name, "name_1");
        assert_eq!(&line[found.span], b"xXx @name_1 xXx");
    }

    #[test]
    fn test_variable_requires_exact_marker() {
        let m = matchers();
        assert!(m.find_variable(b"xXx name xXx").is_none());
        assert!(m.find_variable(b"xXx @na-me xXx").is_none());
        assert!(m.find_variable(b"xXx @name XxX").is_none());
    }

    #[test]
    fn test_filter_match_stops_at_next_delimiter() {
        let m = matchers();
        let line = b"a XxX upper hello world XxX b XxX lower X XxX";
        let found = m.find_filter(line).unwrap();

        assert_eq!(found.name, "upper");
        assert_eq!(found.argument, b"hello world");
        assert_eq!(&line[found.span], b"XxX upper hello world XxX");
    }

    #[test]
    fn test_filter_argument_with_latin1_byte() {
        let m = matchers();
        let line = b"XxX id caf\xe9 XxX";
        let found = m.find_filter(line).unwrap();

        assert_eq!(found.name, "id");
        assert_eq!(found.argument, b"caf\xe9");
        assert_eq!(found.span, 0..line.len());
    }

    #[test]
    fn test_filter_without_argument() {
        let m = matchers();
        let found = m.find_filter(b"XxX timestamp XxX").unwrap();

        assert_eq!(found.name, "timestamp");
        assert!(found.argument.is_empty());
    }

    #[test]
    fn test_loop_start_anchored() {
        let m = matchers();
        let start = m.find_loop_start(b"  \txXx LOOP i items xXx body").unwrap();
        assert_eq!(start.item, "i");
        assert_eq!(start.array, "items");
        assert_eq!(start.body_start, 23);

        assert!(m.find_loop_start(b"text xXx LOOP i items xXx").is_none());
        assert!(m.find_loop_start(b"\nxXx LOOP i items xXx").is_none());
    }

    #[test]
    fn test_loop_end_search() {
        let m = matchers();
        let text = b"xXx BBL xXx and xXx BBL xXx";
        assert_eq!(m.find_loop_end(text, 0), Some(0..11));
        assert_eq!(m.find_loop_end(text, 1), Some(16..27));
        assert_eq!(m.find_loop_end(b"nothing", 0), None);
    }

    #[test]
    fn test_include_match() {
        let m = matchers();
        assert_eq!(
            m.find_include(b"  xXx SCREAM header xXx").as_deref(),
            Some("header")
        );
        assert!(m.find_include(b"xXx @header xXx").is_none());
    }
}
