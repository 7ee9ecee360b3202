use std::sync::LazyLock;

use regex::Regex;

/// Name used when nothing usable is left of the input.
pub const FALLBACK_IDENT: &str = "X";

static LEADING_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^a-zA-Z]*").expect("valid regex"));

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \n\t\x08\r_]+").expect("valid regex"));

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("valid regex"));

/// Turn arbitrary header text into an identifier made of ASCII letters,
/// digits and underscores, starting with a letter.
///
/// Whitespace and underscore runs collapse to a single `_`. Text with nothing
/// usable left becomes [`FALLBACK_IDENT`].
pub fn make_valid_identifier(text: &str) -> String {
    if text.is_empty() {
        return FALLBACK_IDENT.to_string();
    }

    let token = text.trim_matches(|c: char| c <= ' ');
    let token = LEADING_INVALID.replace(token, "");
    let token = SEPARATOR_RUNS.replace_all(&token, "_");
    let token = INVALID_CHARS.replace_all(&token, "");

    let token = token.strip_suffix('_').unwrap_or(&*token);
    if token.is_empty() {
        return FALLBACK_IDENT.to_string();
    }

    token.to_string()
}
