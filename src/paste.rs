//! Clipboard delivery and best-effort simulated paste.
//!
//! The clipboard write is synchronous and is the only operation here
//! whose failure surfaces to the caller. The simulated paste runs on a
//! small tokio runtime: a short settle delay, the primary keystroke
//! simulation, then a platform-ordered chain of external helpers, each
//! bounded by a timeout. Whatever happens there, the content is already
//! on the clipboard and the user can paste manually.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use arboard::Clipboard;
use enigo::Direction::{Click, Press, Release};
use enigo::{Enigo, Key, Keyboard};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Delay before simulating the paste keystroke, letting the OS deliver
/// the clipboard update and window focus settle.
const PASTE_DELAY: Duration = Duration::from_millis(200);

/// Upper bound on each external fallback helper.
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(2);

/// One entry in the platform fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// Ordered fallback chain for the current platform, tried first to last
/// when the primary keystroke simulation fails.
pub fn fallback_chain() -> &'static [FallbackCommand] {
    #[cfg(target_os = "windows")]
    {
        &[FallbackCommand {
            program: "powershell.exe",
            args: &[
                "-Command",
                "Add-Type -AssemblyName System.Windows.Forms; [System.Windows.Forms.SendKeys]::SendWait('^v')",
            ],
        }]
    }
    #[cfg(target_os = "macos")]
    {
        &[FallbackCommand {
            program: "osascript",
            args: &[
                "-e",
                "tell application \"System Events\" to keystroke \"v\" using command down",
            ],
        }]
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        &[
            FallbackCommand {
                program: "xdotool",
                args: &["key", "ctrl+v"],
            },
            FallbackCommand {
                program: "wtype",
                args: &["-M", "ctrl", "v", "-m", "ctrl"],
            },
        ]
    }
}

enum KeystrokeRequest {
    Paste(oneshot::Sender<std::result::Result<(), String>>),
}

/// Parks an `Enigo` handle on its own thread and talks to it over a
/// channel; the handle is not `Send`. A thread that fails to acquire the
/// backend keeps answering requests with errors so the fallback chain
/// takes over.
fn spawn_keystroke_task() -> mpsc::Sender<KeystrokeRequest> {
    let (sender, receiver) = mpsc::channel::<KeystrokeRequest>();
    thread::spawn(move || {
        let mut enigo = match Enigo::new(&enigo::Settings::default()) {
            Ok(enigo) => Some(enigo),
            Err(e) => {
                warn!(error = %e, "Keystroke simulation unavailable");
                None
            }
        };
        while let Ok(KeystrokeRequest::Paste(reply)) = receiver.recv() {
            let outcome = match enigo.as_mut() {
                Some(enigo) => paste_keystroke(enigo).map_err(|e| e.to_string()),
                None => Err("keystroke backend unavailable".to_owned()),
            };
            reply.send(outcome).ok();
        }
    });
    sender
}

fn paste_keystroke(enigo: &mut Enigo) -> Result<()> {
    #[cfg(target_os = "macos")]
    let paste_modifier = Key::Meta;
    #[cfg(not(target_os = "macos"))]
    let paste_modifier = Key::Control;

    const KEY_GAP: Duration = Duration::from_millis(10);
    enigo.key(paste_modifier, Press)?;
    thread::sleep(KEY_GAP);
    enigo.key(Key::Unicode('v'), Click)?;
    thread::sleep(KEY_GAP);
    enigo.key(paste_modifier, Release)?;

    Ok(())
}

/// Writes template content to the system clipboard and optionally
/// schedules the simulated paste behind it.
pub struct PasteEffector {
    clipboard: Clipboard,
    keystrokes: mpsc::Sender<KeystrokeRequest>,
    runtime: Runtime,
}

impl PasteEffector {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        let clipboard = Clipboard::new().context("Failed to open system clipboard")?;

        Ok(Self {
            clipboard,
            keystrokes: spawn_keystroke_task(),
            runtime,
        })
    }

    /// Copies `text` to the clipboard.
    pub fn copy(&mut self, text: &str) -> Result<()> {
        self.clipboard
            .set_text(text)
            .context("Failed to write to clipboard")
    }

    /// Copies `content`, then schedules the simulated paste when enabled.
    /// The simulated paste is best-effort and never reports failure here.
    pub fn deliver(&mut self, content: &str, auto_paste: bool) -> Result<()> {
        self.copy(content)?;
        if !auto_paste {
            return Ok(());
        }

        let keystrokes = self.keystrokes.clone();
        self.runtime.spawn(simulate_paste(keystrokes));
        Ok(())
    }
}

/// Primary keystroke simulation with the platform fallback chain behind it.
async fn simulate_paste(keystrokes: mpsc::Sender<KeystrokeRequest>) {
    tokio::time::sleep(PASTE_DELAY).await;

    match primary_paste(&keystrokes).await {
        Ok(()) => {
            debug!("Simulated paste delivered");
            return;
        }
        Err(e) => info!(error = %e, "Primary paste simulation failed, trying fallbacks"),
    }

    for fallback in fallback_chain() {
        match run_fallback(fallback).await {
            Ok(()) => {
                debug!(program = fallback.program, "Fallback paste delivered");
                return;
            }
            Err(e) => {
                info!(program = fallback.program, error = %e, "Fallback paste failed")
            }
        }
    }

    warn!("Simulated paste failed, content left on the clipboard for manual paste");
}

async fn primary_paste(
    keystrokes: &mpsc::Sender<KeystrokeRequest>,
) -> std::result::Result<(), String> {
    let (reply, outcome) = oneshot::channel();
    keystrokes
        .send(KeystrokeRequest::Paste(reply))
        .map_err(|_| "keystroke thread is gone".to_owned())?;
    match outcome.await {
        Ok(result) => result,
        Err(_) => Err("keystroke thread dropped the request".to_owned()),
    }
}

async fn run_fallback(fallback: &FallbackCommand) -> std::result::Result<(), String> {
    let status = tokio::process::Command::new(fallback.program)
        .args(fallback.args)
        .kill_on_drop(true)
        .status();

    match tokio::time::timeout(FALLBACK_TIMEOUT, status).await {
        Ok(Ok(status)) if status.success() => Ok(()),
        Ok(Ok(status)) => Err(format!("exited with {status}")),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("timed out after {FALLBACK_TIMEOUT:?}")),
    }
}
