// ABOUTME: Built-in filter transforms for template rendering
// ABOUTME: Implements case conversion, trimming, base64 and timestamp filters

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::format::{Item, StrftimeItems};
use chrono::Utc;
use tracing::warn;

use super::context::Context;

const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Names of every filter installed by [`register_builtin_filters`]
pub const BUILTIN_FILTERS: &[&str] = &[
    "upper",
    "lower",
    "trim",
    "base64_encode",
    "base64_decode",
    "timestamp",
];

/// Uppercase filter
pub fn upper_filter(argument: &str) -> String {
    argument.to_uppercase()
}

/// Lowercase filter
pub fn lower_filter(argument: &str) -> String {
    argument.to_lowercase()
}

pub fn trim_filter(argument: &str) -> String {
    argument.trim().to_string()
}

/// Base64 encode filter
pub fn base64_encode_filter(argument: &str) -> String {
    BASE64.encode(argument.as_bytes())
}

/// Base64 decode filter. Input that is not valid base64 of UTF-8 text is
/// passed through unchanged.
pub fn base64_decode_filter(argument: &str) -> String {
    let decoded = BASE64
        .decode(argument.trim())
        .map_err(|e| e.to_string())
        .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()));

    match decoded {
        Ok(text) => text,
        Err(e) => {
            warn!("base64_decode filter left its argument unchanged: {}", e);
            argument.to_string()
        }
    }
}

/// Timestamp filter - formats the current UTC time, the argument being the
/// strftime pattern
pub fn timestamp_filter(argument: &str) -> String {
    let pattern = argument.trim();
    let format = if pattern.is_empty() || !is_valid_format(pattern) {
        DEFAULT_TIMESTAMP_FORMAT
    } else {
        pattern
    };

    Utc::now().format(format).to_string()
}

fn is_valid_format(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

/// Register all built-in filters with a context
pub fn register_builtin_filters(ctx: &mut Context<'_>) {
    ctx.add_filter("upper", upper_filter);
    ctx.add_filter("lower", lower_filter);
    ctx.add_filter("trim", trim_filter);
    ctx.add_filter("base64_encode", base64_encode_filter);
    ctx.add_filter("base64_decode", base64_decode_filter);
    ctx.add_filter("timestamp", timestamp_filter);
}
