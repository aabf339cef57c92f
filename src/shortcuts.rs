//! Process-wide shortcut registry.
//!
//! The table owns every OS-level hotkey registration the process holds.
//! It is rebuilt wholesale on every template change: tear down all
//! bindings, then re-register from the fresh list. Registration is cheap
//! and infrequent relative to user edits, so no incremental diffing.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use global_hotkey::GlobalHotKeyManager;
use global_hotkey::hotkey::HotKey;
use snipdeck_core::Template;
use tracing::{debug, warn};

use crate::accel::parse_accelerator;

/// Firings of the same accelerator within this window are swallowed.
/// Absorbs OS-level key repeat and double delivery.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// OS-level global hotkey registration, as consumed by the shortcut table.
pub trait HotkeyBinder {
    /// Attempts an OS registration. Returns false when the OS refuses,
    /// e.g. the combination is owned by another application.
    fn register(&mut self, hotkey: HotKey) -> bool;

    /// Removes every registration made through this binder. Idempotent,
    /// safe to call with zero registrations.
    fn unregister_all(&mut self);
}

/// Production binder over `global_hotkey`. Tracks what it bound because
/// the underlying manager unregisters per key.
pub struct OsHotkeyBinder {
    manager: GlobalHotKeyManager,
    bound: Vec<HotKey>,
}

impl OsHotkeyBinder {
    pub fn new() -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;
        Ok(Self {
            manager,
            bound: Vec::new(),
        })
    }
}

impl HotkeyBinder for OsHotkeyBinder {
    fn register(&mut self, hotkey: HotKey) -> bool {
        match self.manager.register(hotkey) {
            Ok(()) => {
                self.bound.push(hotkey);
                true
            }
            Err(e) => {
                warn!(error = %e, "OS refused hotkey registration");
                false
            }
        }
    }

    fn unregister_all(&mut self) {
        for hotkey in self.bound.drain(..) {
            if let Err(e) = self.manager.unregister(hotkey) {
                warn!(error = %e, "Failed to unregister hotkey");
            }
        }
    }
}

/// A live registration. The owning template is captured by value so a
/// stale firing after an edit still sees the content it was bound with.
#[derive(Debug, Clone)]
struct Binding {
    accelerator: String,
    template_id: String,
    title: String,
    content: String,
    last_fired: Option<Instant>,
}

/// Payload handed to the firing path once a hotkey event clears the
/// debounce check.
#[derive(Debug, Clone)]
pub struct FiredTemplate {
    pub template_id: String,
    pub title: String,
    pub content: String,
    pub accelerator: String,
}

/// Outcome of a rebuild pass: how many shortcuts are live, and which
/// template owns each accelerator.
#[derive(Debug, Clone, Default)]
pub struct RegistrationResult {
    pub registered: usize,
    /// (accelerator, template id) pairs in registration order.
    pub entries: Vec<(String, String)>,
}

#[derive(Default)]
pub struct ShortcutTable {
    bindings: HashMap<u32, Binding>,
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full teardown and rebind from the given template list.
    ///
    /// Templates are visited in list order. A shortcut already claimed by
    /// an earlier template, an unparsable accelerator, or an OS refusal
    /// each skip that template with a warning; none of them abort the pass.
    pub fn rebuild(
        &mut self,
        templates: &[Template],
        binder: &mut dyn HotkeyBinder,
    ) -> RegistrationResult {
        binder.unregister_all();
        self.bindings.clear();

        let mut claimed: HashSet<&str> = HashSet::new();
        let mut result = RegistrationResult::default();

        for template in templates {
            let Some(accelerator) = template.shortcut() else {
                continue;
            };

            if claimed.contains(accelerator) {
                warn!(
                    accelerator,
                    template = %template.id,
                    "Shortcut already claimed by an earlier template, skipping"
                );
                continue;
            }

            let hotkey = match parse_accelerator(accelerator) {
                Ok(hotkey) => hotkey,
                Err(e) => {
                    warn!(accelerator, template = %template.id, error = %e, "Invalid shortcut, skipping");
                    continue;
                }
            };

            if !binder.register(hotkey) {
                warn!(accelerator, template = %template.id, "Failed to register shortcut");
                continue;
            }

            claimed.insert(accelerator);
            result.registered += 1;
            result
                .entries
                .push((accelerator.to_owned(), template.id.clone()));
            self.bindings.insert(
                hotkey.id(),
                Binding {
                    accelerator: accelerator.to_owned(),
                    template_id: template.id.clone(),
                    title: template.title.clone(),
                    content: template.content.clone(),
                    last_fired: None,
                },
            );
            debug!(accelerator, template = %template.id, "Registered shortcut");
        }

        result
    }

    /// Debounce-checked firing. Returns the captured payload when the
    /// event should be acted on; `None` for unknown ids and for repeats
    /// inside the debounce window. The timestamp is updated before the
    /// payload is returned.
    pub fn fire(&mut self, hotkey_id: u32, now: Instant) -> Option<FiredTemplate> {
        let binding = self.bindings.get_mut(&hotkey_id)?;

        if let Some(last) = binding.last_fired {
            if now.saturating_duration_since(last) < DEBOUNCE {
                debug!(accelerator = %binding.accelerator, "Debounced hotkey firing");
                return None;
            }
        }
        binding.last_fired = Some(now);

        Some(FiredTemplate {
            template_id: binding.template_id.clone(),
            title: binding.title.clone(),
            content: binding.content.clone(),
            accelerator: binding.accelerator.clone(),
        })
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
