//! Application events for the tao event loop.

use snipdeck_core::{Settings, Template};

/// Events for the tao event loop. Inbound edges are the document watcher
/// (snapshot changes), the hotkey firing path, and the palette content.
#[derive(Debug, Clone)]
pub enum DeckEvent {
    /// The template document changed; carries the fresh snapshot
    TemplatesChanged(Vec<Template>),
    /// The settings document changed; carries the fresh snapshot
    SettingsChanged(Settings),
    /// A template hotkey fired and its content is on the clipboard
    TemplateCopied {
        template_id: String,
        title: String,
        accelerator: String,
    },
    /// The palette window finished loading and can receive content
    PaletteReady,
    /// The palette content reported its rendered bounds
    PaletteResizeRequested { width: u32, height: u32 },
    /// The palette content asked for the current pinned templates
    PaletteTemplatesRequested,
}
