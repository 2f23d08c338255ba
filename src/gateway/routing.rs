//! Trigger detection and prompt extraction.

/// Marker that turns a chat message into a completion request.
pub const TRIGGER: &str = "0>";

/// Marker plus the separating space, stripped from the message to form the prompt.
const TRIGGER_WITH_SPACE: &str = "0> ";

/// Extract the prompt from a chat message, or `None` if it is not a trigger.
///
/// Detection only needs `0>` somewhere in the text, but stripping removes the
/// first `0> ` (with the space). A message like `x0>y` is therefore a trigger
/// whose prompt is the unchanged text.
pub fn extract_prompt(text: &str) -> Option<String> {
    if text == TRIGGER {
        return Some(String::new());
    }
    if !text.contains(TRIGGER) {
        return None;
    }
    Some(text.replacen(TRIGGER_WITH_SPACE, "", 1))
}
