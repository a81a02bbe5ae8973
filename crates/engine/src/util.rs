//! Internal helpers shared across the engine.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Turns a display name into a URL-safe slug.
///
/// NFKD-normalizes the input, drops combining marks, lowercases ASCII
/// alphanumerics and collapses every other run of characters into a single
/// `-`. Leading and trailing separators are trimmed, so
/// `"Crédit Épargne 1"` becomes `"credit-epargne-1"`.
pub(crate) fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_sep = false;

    for ch in value.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}
