use serde_json::Value;

use crate::error::{ImageGenError, Result};

/// Extract the prompt from an arbitrary JSON body
///
/// Trims, collapses whitespace runs to single spaces, and truncates to
/// `max_chars` characters. Truncation is silent; only an absent, non-string
/// or blank prompt is an error.
pub fn validate_prompt(body: &Value, max_chars: usize) -> Result<String> {
    let raw = body
        .get("prompt")
        .and_then(Value::as_str)
        .ok_or(ImageGenError::MissingPrompt)?;

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(ImageGenError::MissingPrompt);
    }

    Ok(truncate_chars(collapsed, max_chars))
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
    text
}

/// Append the house style as `"<prompt>, <style>"`
pub fn apply_style(prompt: String, style: Option<&str>) -> String {
    match style.map(str::trim).filter(|s| !s.is_empty()) {
        Some(style) => format!("{prompt}, {style}"),
        None => prompt,
    }
}
