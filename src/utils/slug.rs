//! Title slugification.
//!
//! The default `make_safe` used for `{title}` path substitution and for
//! normalizing exposed values into URL-friendly bucket names.

use deunicode::deunicode;

/// Punctuation dropped outright, before whitespace folding.
const STRIPPED_CHARS: &[char] = &['-', '/', '\'', '"', '(', ')', '[', ']', '?', '+'];

/// Convert a title to a URL-safe slug.
///
/// Non-ASCII text is transliterated, the characters in `STRIPPED_CHARS`
/// are removed, whitespace runs collapse to a single `-`, and the result
/// is lowercased. Explicit item slugs bypass this on purpose.
pub fn make_safe(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.trim().chars() {
        if STRIPPED_CHARS.contains(&c) {
            continue;
        }
        if c.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.extend(c.to_lowercase());
    }

    slug
}
