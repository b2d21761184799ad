pub const SUGGESTIONS_HEADER: &str = "💡 Suggested Actions:";
pub const SUGGESTION_BULLET: &str = "•";

/// Renders suggestions as a bulleted block for a display-only assistant
/// message. Empty input yields nothing so no empty block gets appended.
pub fn format_suggestions(suggestions: &[String]) -> Option<String> {
    if suggestions.is_empty() {
        return None;
    }

    let mut block = String::from(SUGGESTIONS_HEADER);
    for suggestion in suggestions {
        block.push('\n');
        block.push_str(SUGGESTION_BULLET);
        block.push(' ');
        block.push_str(suggestion);
    }
    Some(block)
}
