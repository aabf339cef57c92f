//! Desired-state reconciliation.
//!
//! On every template or settings change the orchestrator is handed a
//! fresh snapshot and drives live OS state to match it: the shortcut
//! table is torn down and rebuilt, and the floating palette is opened,
//! updated or closed. A newer snapshot simply supersedes the previous
//! one; there is no cancellation.

use std::time::Instant;

use snipdeck_core::{Settings, Template};
use tracing::info;

use crate::palette::{FloatingPalette, PaletteHost};
use crate::shortcuts::{FiredTemplate, HotkeyBinder, RegistrationResult, ShortcutTable};

#[derive(Default)]
pub struct Reconciler {
    table: ShortcutTable,
    palette: FloatingPalette,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drives hotkey registrations and the palette window to match the
    /// given snapshot.
    pub fn reconcile(
        &mut self,
        templates: &[Template],
        settings: &Settings,
        binder: &mut dyn HotkeyBinder,
        host: &mut impl PaletteHost,
    ) -> RegistrationResult {
        let result = self.table.rebuild(templates, binder);
        info!(
            registered = result.registered,
            templates = templates.len(),
            "Rebuilt shortcut table"
        );

        let pinned: Vec<Template> = templates.iter().filter(|t| t.pinned).cloned().collect();
        self.palette.manage(&pinned, settings.pin_templates, host);

        result
    }

    /// Debounce-checked hotkey firing lookup.
    pub fn fire(&mut self, hotkey_id: u32, now: Instant) -> Option<FiredTemplate> {
        self.table.fire(hotkey_id, now)
    }

    /// Live palette existence, correcting cached state on mismatch.
    pub fn is_palette_open(&mut self, host: &impl PaletteHost) -> bool {
        self.palette.is_open(host)
    }

    /// The palette window finished loading its content.
    pub fn palette_ready(&mut self, host: &mut impl PaletteHost) {
        self.palette.mark_ready(host);
    }

    /// The palette content reported its rendered bounds.
    pub fn palette_resize(&mut self, width: u32, height: u32, host: &mut impl PaletteHost) -> bool {
        self.palette.apply_resize(width, height, host)
    }

    /// Host-side window size changed; re-check the runaway guard.
    pub fn palette_bounds_check(&mut self, host: &mut impl PaletteHost) {
        self.palette.enforce_bounds(host);
    }

    /// The palette content asked for the current pinned templates.
    pub fn push_palette_templates(&mut self, host: &mut impl PaletteHost) {
        self.palette.push_current(host);
    }

    /// Unconditional teardown of everything this process holds: all OS
    /// registrations and any live palette window.
    pub fn shutdown(&mut self, binder: &mut dyn HotkeyBinder, host: &mut impl PaletteHost) {
        binder.unregister_all();
        self.palette.force_close(host);
    }
}
