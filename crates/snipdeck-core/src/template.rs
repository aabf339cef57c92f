//! Template data model.

use serde::{Deserialize, Serialize};

/// A user-defined clipboard template.
///
/// Templates are owned by the editing layer; the coordinator only ever
/// sees read-only snapshots of the full list and captures what it needs
/// by value at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Template {
    /// Opaque identifier, stable for the template's lifetime.
    pub id: String,

    /// Display title.
    pub title: String,

    /// The payload copied to the clipboard when the template fires.
    pub content: String,

    /// Optional glyph shown next to the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Optional accelerator string, e.g. "Ctrl+Alt+1". Uniqueness across
    /// the live template set is enforced at registration, not here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,

    /// Whether the template appears in the floating palette.
    #[serde(default, skip_serializing_if = "is_false")]
    pub pinned: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Template {
    /// The accelerator string, if one is set and non-empty.
    pub fn shortcut(&self) -> Option<&str> {
        self.shortcut
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(shortcut: Option<&str>) -> Template {
        Template {
            id: "1".to_owned(),
            title: "Greeting".to_owned(),
            content: "Hello!".to_owned(),
            icon: None,
            shortcut: shortcut.map(str::to_owned),
            pinned: false,
        }
    }

    #[test]
    fn shortcut_absent_or_blank_is_none() {
        assert_eq!(template(None).shortcut(), None);
        assert_eq!(template(Some("")).shortcut(), None);
        assert_eq!(template(Some("   ")).shortcut(), None);
    }

    #[test]
    fn shortcut_is_trimmed() {
        assert_eq!(template(Some(" Ctrl+K ")).shortcut(), Some("Ctrl+K"));
    }

    #[test]
    fn optional_fields_are_skipped_when_serialized() {
        let serialized = toml::to_string(&template(None)).unwrap();
        assert!(!serialized.contains("icon"));
        assert!(!serialized.contains("shortcut"));
        assert!(!serialized.contains("pinned"));
    }
}
