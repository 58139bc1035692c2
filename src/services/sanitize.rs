//! Escaping applied to user text before it leaves the server.

/// HTML-entity escape `& < > " ' /`.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out
}

/// Backslash-escape the characters Telegram's legacy Markdown treats as markup.
/// Legacy mode only accepts escapes for `_ * [` and backquote; `]` stays as is.
#[must_use]
pub fn escape_markdown(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '_' | '*' | '[' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod tests;
