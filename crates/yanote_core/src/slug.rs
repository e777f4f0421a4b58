//! Transliteration-based slug derivation.
//!
//! # Responsibility
//! - Turn free-form (often Cyrillic) titles into URL-safe slugs.
//!
//! # Invariants
//! - `slugify` is deterministic: the same title always yields the same slug.
//! - Output contains only ASCII letters, digits, `_` and `-`, lowercased.
//!   Letters without a transliteration are dropped.
//! - Output length is not bounded here; callers truncate.

use once_cell::sync::Lazy;
use regex::Regex;

static AMPERSAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&amp;|&").expect("valid ampersand regex"));
static DASH_OR_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("valid dash/space regex"));
static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_\s-]").expect("valid non-slug regex"));

/// Lowercase transliteration pairs. Uppercase input reuses these with the
/// first output letter capitalized.
const TRANSLIT_TABLE: &[(char, &str)] = &[
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "g"),
    ('д', "d"),
    ('е', "e"),
    ('ё', "yo"),
    ('ж', "zh"),
    ('з', "z"),
    ('и', "i"),
    ('й', "j"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "h"),
    ('ц', "ts"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "sch"),
    ('ъ', "`"),
    ('ы', "yi"),
    ('ь', "'"),
    ('э', "e"),
    ('ю', "yu"),
    ('я', "ya"),
    // Ukrainian
    ('є', "ye"),
    ('і', "i"),
    ('ї', "yi"),
    ('ґ', "g"),
    // typography
    ('‘', "'"),
    ('’', "'"),
    ('«', "\""),
    ('»', "\""),
    ('“', "\""),
    ('”', "\""),
    ('–', "-"),
    ('—', "-"),
    ('‒', "-"),
    ('−', "-"),
    ('…', "..."),
    ('№', "#"),
];

/// Derives a slug from `input`.
///
/// Steps: lowercase, `&` to ` and `, runs of whitespace/dashes to a single
/// `-`, transliterate, drop everything that is not an ASCII word char,
/// whitespace or `-`, then trim.
///
/// ```
/// assert_eq!(yanote_core::slugify("Новая заметка"), "novaya-zametka");
/// ```
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let expanded = AMPERSAND_RE.replace_all(&lowered, " and ");
    let hyphenated = DASH_OR_SPACE_RE.replace_all(&expanded, "-");
    let latin = translify(&hyphenated);
    NON_SLUG_RE
        .replace_all(&latin, "")
        .trim()
        .to_lowercase()
}

/// Transliterates Cyrillic letters and typographic symbols to ASCII.
///
/// Characters without a mapping pass through unchanged. Case is preserved on
/// the first output letter (`Щ` -> `Sch`).
pub fn translify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if let Some(latin) = lookup(ch) {
            out.push_str(latin);
            continue;
        }

        let mut lower = ch.to_lowercase();
        let single_lower = match (lower.next(), lower.next()) {
            (Some(value), None) if value != ch => Some(value),
            _ => None,
        };
        match single_lower.and_then(lookup) {
            Some(latin) => push_capitalized(&mut out, latin),
            None => out.push(ch),
        }
    }
    out
}

fn lookup(ch: char) -> Option<&'static str> {
    TRANSLIT_TABLE
        .iter()
        .find(|(source, _)| *source == ch)
        .map(|(_, latin)| *latin)
}

fn push_capitalized(out: &mut String, latin: &str) {
    let mut chars = latin.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}
