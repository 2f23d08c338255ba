//! HTML-ish completion output to chat-friendly plain text.

/// Fragment substitutions, applied in order.
///
/// `</p>\n` must run before `</p>` so a paragraph close followed by a newline
/// collapses to a single newline.
const REPLACEMENTS: [(&str, &str); 8] = [
    ("</p>\n", "\n"),
    ("</p>", "\n"),
    ("<p>", ""),
    ("<ol>", "- "),
    ("</ol>", "\n"),
    ("<li>", "- "),
    ("</li>", "\n"),
    ("<br>", "\n"),
];

/// Replace paragraph, ordered-list, list-item and line-break tags with their
/// plain-text equivalents.
///
/// This is literal substring replacement, not a markup parser: nested or
/// malformed markup comes out correspondingly malformed.
pub fn html_to_chat(html: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(html.to_string(), |text, (from, to)| text.replace(from, to))
}
