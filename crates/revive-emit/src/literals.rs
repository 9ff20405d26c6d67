//! Rendering of primitive and buffer literals.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// A JS string literal. `serde_json::to_string` produces a double-quoted,
/// backslash-escaped literal whose escaping rules are a strict subset of
/// what every host's string-literal grammar accepts, so it round-trips
/// through the host's own parser exactly (including lone surrogates, which
/// `serde_json` passes through as `\uXXXX` escapes).
pub fn render_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}

/// A finite, non-zero-ambiguous number.
pub fn render_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else {
        format!("{n}")
    }
}

pub fn render_bigint(digits: &str) -> String {
    format!("{digits}n")
}

pub fn render_regex(pattern: &str, flags: &str) -> String {
    let escaped = pattern.replace('/', "\\/");
    format!("/{escaped}/{flags}")
}

/// `atob`-style base64 decode call, matching end-to-end scenario 1's
/// "base64-decodes ... and wraps the bytes in the equivalent typed-buffer
/// view" expectation. The emitted program decodes through
/// `Uint8Array.from(atob(...), c => c.charCodeAt(0))`, which every target
/// host exposes without an extra import.
pub fn render_base64_decode_expr(bytes: &[u8]) -> String {
    let encoded = BASE64.encode(bytes);
    format!("Uint8Array.from(atob({}), __revive_c => __revive_c.charCodeAt(0))", render_string(&encoded))
}

#[cfg(test)]
#[path = "../tests/literals.rs"]
mod tests;
