//! Loading and saving the user-owned configuration documents.
//!
//! Two documents live in the config directory: the settings file, which
//! this process saves back on startup to materialize defaults, and the
//! template document, which belongs to the editing layer and is only
//! ever read here.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{APP_NAME, Settings, Template};

/// Template document file name. The document is owned by the editing layer.
const TEMPLATES_FILE: &str = "templates.toml";

/// On-disk shape of the template document: a `[[templates]]` array.
#[derive(Debug, Default, Deserialize, Serialize)]
struct TemplateDocument {
    #[serde(default)]
    templates: Vec<Template>,
}

/// Manages loading and saving of the settings and template documents.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new `ConfigManager` rooted at the default configuration
    /// directory.
    pub fn new() -> Result<Self> {
        let base = config_dir().context("Failed to retrieve configuration directory")?;
        Ok(Self {
            config_dir: base.join(APP_NAME),
        })
    }

    /// Creates a manager rooted at a specific directory. Useful for testing
    /// with temporary directories.
    pub fn with_config_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            config_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The directory holding both documents.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path to the settings document.
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(format!("{APP_NAME}.toml"))
    }

    /// Path to the template document.
    pub fn templates_path(&self) -> PathBuf {
        self.config_dir.join(TEMPLATES_FILE)
    }

    /// Loads the settings from the settings document or returns the default
    /// settings when the document does not exist yet.
    pub fn load_settings(&self) -> Result<Settings> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file at {path:?}"))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse settings file at {path:?}"))
    }

    /// Saves the settings document, only writing non-default fields.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        fs::create_dir_all(&self.config_dir)
            .with_context(|| format!("Failed to create config directory at {:?}", self.config_dir))?;

        let serialized = toml::to_string_pretty(settings).context("Failed to serialize settings")?;

        let path = self.settings_path();
        fs::write(&path, serialized)
            .with_context(|| format!("Failed to write settings file at {path:?}"))
    }

    /// Loads the template list. An absent document is an empty list, not an
    /// error, since the editing layer may not have written one yet.
    pub fn load_templates(&self) -> Result<Vec<Template>> {
        let path = self.templates_path();
        if !path.exists() {
            warn!(
                "No template document at {:?}. Add [[templates]] entries to bind shortcuts.",
                path
            );
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template document at {path:?}"))?;
        let document: TemplateDocument = toml::from_str(&content)
            .with_context(|| format!("Failed to parse template document at {path:?}"))?;
        Ok(document.templates)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_default_settings() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());
        let settings = manager.load_settings().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());

        let mut settings = Settings::default();
        settings.auto_paste = true;
        settings.pin_templates = false;
        manager.save_settings(&settings).unwrap();

        let loaded = manager.load_settings().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_save_creates_settings_file() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());

        manager.save_settings(&Settings::default()).unwrap();
        assert!(manager.settings_path().exists());
    }

    #[test]
    fn test_missing_template_document_is_empty() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());
        assert!(manager.load_templates().unwrap().is_empty());
    }

    #[test]
    fn test_load_template_document() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());

        let document = r#"
[[templates]]
id = "1"
title = "Greeting"
content = "Hello! How can I help you today?"
shortcut = "Ctrl+Alt+1"
pinned = true

[[templates]]
id = "2"
title = "Thanks"
content = "Thank you for your message."
"#;
        fs::write(manager.templates_path(), document).unwrap();

        let templates = manager.load_templates().unwrap();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].id, "1");
        assert_eq!(templates[0].shortcut(), Some("Ctrl+Alt+1"));
        assert!(templates[0].pinned);
        assert_eq!(templates[1].shortcut(), None);
        assert!(!templates[1].pinned);
    }

    #[test]
    fn test_malformed_template_document_errors() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());

        fs::write(manager.templates_path(), "[[templates]]\nid = 12\n").unwrap();
        assert!(manager.load_templates().is_err());
    }
}
