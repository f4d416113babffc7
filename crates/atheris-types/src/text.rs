/// Title given to conversations before one is derived
pub const DEFAULT_TITLE: &str = "New Chat";

/// Shown in place of an assistant reply that could not be produced
pub const APOLOGY_MESSAGE: &str = "I'm having trouble responding. Please try again later.";

const TITLE_MAX_CHARS: usize = 40;
const EMPHASIS_CHARS: &[char] = &['#', '*', '_', '~', '`'];

/// Conversation title from the first user message
///
/// Strips markdown emphasis characters, keeps the first line and cuts it to
/// 40 characters, appending `...` when something was cut.
pub fn derive_title(content: &str) -> String {
    let stripped: String = content
        .trim()
        .chars()
        .filter(|c| !EMPHASIS_CHARS.contains(c))
        .collect();
    let first_line = stripped.split('\n').next().unwrap_or_default();

    let truncated: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
    if truncated.chars().count() < first_line.chars().count() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}
