//! Application settings consumed by the coordinator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Color theme selection. Carried for the editing layer, the coordinator
/// never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// Settings structure for the application. Only `pin_templates` and
/// `auto_paste` affect the coordinator; the rest belongs to the editing
/// layer and rides along in the same document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// UI theme.
    #[serde(default, skip_serializing_if = "is_default_theme")]
    pub theme: Theme,

    /// Show the floating palette while pinned templates exist.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub pin_templates: bool,

    /// Simulate a paste keystroke after copying a fired template.
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_paste: bool,

    /// UI language tag (e.g. "en").
    #[serde(default = "default_language", skip_serializing_if = "is_default_language")]
    pub language: String,

    /// Directory of custom emoji glyphs for template icons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_folder: Option<PathBuf>,

    /// Show template content previews in the editing UI.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub show_template_content: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            pin_templates: true,
            auto_paste: false,
            language: default_language(),
            emoji_folder: None,
            show_template_content: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_default_theme(theme: &Theme) -> bool {
    *theme == Theme::default()
}

fn default_language() -> String {
    "en".to_owned()
}

fn is_default_language(language: &str) -> bool {
    language == default_language()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serialize_to_nothing() {
        let serialized = toml::to_string_pretty(&Settings::default()).unwrap();
        assert!(serialized.is_empty(), "unexpected fields: {serialized}");
    }

    #[test]
    fn empty_document_parses_to_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let settings: Settings = toml::from_str("auto_paste = true\ntheme = \"dark\"\n").unwrap();
        assert!(settings.auto_paste);
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.pin_templates);
        assert_eq!(settings.language, "en");
    }

    #[test]
    fn non_default_fields_round_trip() {
        let mut settings = Settings::default();
        settings.pin_templates = false;
        settings.auto_paste = true;
        settings.language = "de".to_owned();

        let serialized = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, settings);
    }
}
