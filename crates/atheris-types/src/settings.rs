use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStyle {
    #[default]
    Minimal,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Presentation preferences stored under `userSettings`
///
/// The chat core reads only `model`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub chat_style: ChatStyle,
    pub theme: Theme,
    pub show_timestamps: bool,
    pub group_messages_by_date: bool,
    pub auto_refresh_content: bool,
    pub font_size: FontSize,
    pub model: String,
    pub use_enhanced_sidebar: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            chat_style: ChatStyle::Minimal,
            theme: Theme::Dark,
            show_timestamps: true,
            group_messages_by_date: true,
            auto_refresh_content: true,
            font_size: FontSize::Medium,
            model: atheris_llm::DEFAULT_MODEL.to_string(),
            use_enhanced_sidebar: false,
        }
    }
}
