/// Escape characters that carry meaning in HTML so the value can be placed
/// verbatim in element content or a quoted attribute.
pub fn escape_markup(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Trim then escape. Missing input becomes an empty string.
pub fn clean_text(value: Option<&str>) -> String {
    escape_markup(value.unwrap_or_default().trim())
}
