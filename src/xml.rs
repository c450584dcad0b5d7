//! XML escaping utilities for manifest serialization.

/// Escape a string for safe inclusion in XML content.
///
/// This escapes the five predefined XML entities.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 16);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Reverse [`escape`]: replace the five predefined entities with their
/// characters. Unknown entity sequences pass through untouched.
#[must_use]
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        let candidate = &rest[idx..];
        let (replacement, consumed) = if candidate.starts_with("&amp;") {
            ("&", "&amp;".len())
        } else if candidate.starts_with("&lt;") {
            ("<", "&lt;".len())
        } else if candidate.starts_with("&gt;") {
            (">", "&gt;".len())
        } else if candidate.starts_with("&quot;") {
            ("\"", "&quot;".len())
        } else if candidate.starts_with("&apos;") {
            ("'", "&apos;".len())
        } else {
            ("&", 1)
        };
        out.push_str(replacement);
        rest = &candidate[consumed..];
    }
    out.push_str(rest);
    out
}
