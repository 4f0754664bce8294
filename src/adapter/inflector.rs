//! Name formatting used to build action URLs.

use heck::ToLowerCamelCase;
use regex::Regex;

lazy_static::lazy_static! {
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"([a-z\d])([A-Z])").unwrap();
}

/// Converts an identifier to lowercase, hyphen-separated form.
///
/// `markAsRead` becomes `mark-as-read`; `bulk_archive` becomes `bulk-archive`.
/// Only a lowercase letter or digit followed by a capital starts a new word, so runs of
/// capitals stay together (`XMLHttpRequest` becomes `xmlhttp-request`). Other punctuation
/// is kept as is.
pub fn dasherize(name: &str) -> String {
    CAMEL_BOUNDARY
        .replace_all(name, "${1}_${2}")
        .to_lowercase()
        .replace([' ', '_'], "-")
}

/// The URL path segment for a type key: camelized, then pluralized.
///
/// `post` becomes `posts`, `blog-post` becomes `blogPosts`.
pub fn path_for_type(type_key: &str) -> String {
    pluralize(&type_key.to_lower_camel_case())
}

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
    "data",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("mouse", "mice"),
];

/// English pluralization of the last word of a camel-cased identifier.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();

    if UNCOUNTABLE.iter().any(|u| ends_with_word(word, u)) {
        return word.to_owned();
    }
    for (singular, plural) in IRREGULAR {
        if ends_with_word(word, singular) {
            let stem = &word[..word.len() - singular.len()];
            let head = &word[word.len() - singular.len()..];
            return format!("{stem}{}", match_case(head, plural));
        }
    }

    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last().map(|c| c.to_ascii_lowercase());
        if !matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u') | None) {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

/// True when `word` ends with `suffix` (ignoring ASCII case) and the suffix starts a
/// word of its own: either the whole identifier or a camel-case hump.
fn ends_with_word(word: &str, suffix: &str) -> bool {
    let Some(start) = word.len().checked_sub(suffix.len()) else {
        return false;
    };
    if !word.is_char_boundary(start) {
        return false;
    }
    let tail = &word[start..];
    tail.eq_ignore_ascii_case(suffix)
        && (start == 0 || tail.starts_with(|c: char| c.is_ascii_uppercase()))
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.starts_with(|c: char| c.is_ascii_uppercase()) {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    } else {
        replacement.to_owned()
    }
}
