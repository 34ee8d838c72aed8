// src/extractors/keys.rs
use once_cell::sync::Lazy;
use regex::Regex;

// Any run of characters that cannot appear in a key
static NON_KEY_CHARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9]+").expect("Failed to compile NON_KEY_CHARS_RE")
});

/// Turns free text (a field label or an issue heading) into a snake_case key.
///
/// `"What's your name?"` becomes `"what_s_your_name"`. Total and idempotent.
pub fn normalize_key(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_KEY_CHARS_RE
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}
