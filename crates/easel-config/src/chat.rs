use serde::Deserialize;

/// Chat pass-through configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Chat completion model identifier
    #[serde(default = "default_chat_model")]
    pub model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_chat_model(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_owned()
}
