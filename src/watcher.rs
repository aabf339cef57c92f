//! Filesystem watcher for the configuration documents.
//!
//! The editing layer owns the settings and template documents; this
//! watcher is the inbound edge of its change feed. Whenever either
//! document changes on disk, a fresh snapshot is loaded and handed to
//! the event loop for reconciliation.

use std::ffi::OsStr;
use std::sync::mpsc::channel;
use std::thread;
use std::time::Duration;

use notify::{RecursiveMode, Watcher, recommended_watcher};
use snipdeck_core::ConfigManager;
use tao::event_loop::EventLoopProxy;
use tracing::{debug, warn};

use crate::event::DeckEvent;

/// Quiet period after a burst of file events before documents reload.
/// Editors tend to write via temp file plus rename.
const SETTLE: Duration = Duration::from_millis(200);

/// Spawns the watcher thread. Watch failures are logged, never fatal;
/// the tray menu's reload entry remains as the manual path.
pub fn spawn(config: ConfigManager, proxy: EventLoopProxy<DeckEvent>) {
    thread::spawn(move || {
        if let Err(e) = watch_loop(config, proxy) {
            warn!(error = %e, "Document watcher stopped");
        }
    });
}

fn watch_loop(config: ConfigManager, proxy: EventLoopProxy<DeckEvent>) -> notify::Result<()> {
    let (tx, rx) = channel();
    let mut watcher = recommended_watcher(move |event: notify::Result<notify::Event>| {
        if let Ok(event) = event {
            if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                tx.send(event.paths).ok();
            }
        }
    })?;

    let dir = config.config_dir().to_path_buf();
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    debug!(dir = %dir.display(), "Watching config directory");

    let settings_name = config.settings_path().file_name().map(OsStr::to_owned);
    let templates_name = config.templates_path().file_name().map(OsStr::to_owned);

    while let Ok(mut paths) = rx.recv() {
        thread::sleep(SETTLE);
        while let Ok(more) = rx.try_recv() {
            paths.extend(more);
        }

        let touched = |name: &Option<std::ffi::OsString>| {
            name.as_ref()
                .is_some_and(|n| paths.iter().any(|p| p.file_name() == Some(n.as_os_str())))
        };

        if touched(&settings_name) {
            match config.load_settings() {
                Ok(settings) => {
                    if proxy.send_event(DeckEvent::SettingsChanged(settings)).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "Failed to reload settings"),
            }
        }

        if touched(&templates_name) {
            match config.load_templates() {
                Ok(templates) => {
                    if proxy
                        .send_event(DeckEvent::TemplatesChanged(templates))
                        .is_err()
                    {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "Failed to reload templates"),
            }
        }
    }

    Ok(())
}
