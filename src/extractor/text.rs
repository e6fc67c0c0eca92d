//! Text helpers shared by extractors

/// Collapses every whitespace run (including non-breaking spaces) to one
/// regular space and trims both ends.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Derives a catalog id from a link target
///
/// The id is the text between the last `/` and the first `.` after it, so
/// `/texts/42.html` yields `42`. Targets without both separators yield `None`.
pub fn catalog_id(href: &str) -> Option<&str> {
    let start = href.rfind('/')? + 1;
    let end = start + href[start..].find('.')?;
    Some(&href[start..end])
}

/// Returns the part of `text` after the label, with separating punctuation trimmed
///
/// Falls back to the text after the last `:` when the label itself is not
/// found verbatim (e.g. when it was split across several nodes).
pub fn value_after_label(text: &str, label: &str) -> String {
    let rest = match text.find(label) {
        Some(index) if !label.is_empty() => &text[index + label.len()..],
        _ => match text.rfind(':') {
            Some(index) => &text[index + 1..],
            None => "",
        },
    };

    normalize_text(rest.trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == '-'))
}
