//! Unified diff rendering between two versions of a file's text.

use similar::TextDiff;

/// Render a line-based unified diff with `---`/`+++` headers carrying
/// `display_name`. Identical inputs produce the empty string, so no-op
/// edits never generate diff noise.
pub fn unified_diff(old_text: &str, new_text: &str, display_name: &str) -> String {
    if old_text == new_text {
        return String::new();
    }

    let diff = TextDiff::from_lines(old_text, new_text);
    diff.unified_diff()
        .context_radius(3)
        .header(
            &format!("a/{display_name}"),
            &format!("b/{display_name}"),
        )
        .to_string()
}
