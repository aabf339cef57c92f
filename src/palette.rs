//! Floating palette window lifecycle.
//!
//! The palette is a single always-on-top, frameless window surfacing the
//! pinned templates. Exactly zero or one exists at a time, and this
//! manager is the only component allowed to create, resize or destroy
//! it. Window calls cross a host boundary, so every mutating operation
//! re-queries live existence instead of trusting the cached flag.

use snipdeck_core::Template;
use tracing::{debug, info, warn};

/// Content-driven width bounds, px.
pub const MIN_WIDTH: u32 = 50;
pub const MAX_WIDTH: u32 = 500;

/// Content-driven height bounds, px.
pub const MIN_HEIGHT: u32 = 50;
pub const MAX_HEIGHT: u32 = 400;

/// Size the window starts at and is forced back to when the runaway
/// guard trips.
pub const DEFAULT_SIZE: (u32, u32) = (250, 150);

/// Either dimension past this trips the runaway-layout guard.
const RUNAWAY_LIMIT: u32 = 500;

/// Windowing backend behind the palette. The production implementation
/// drives a tao window from the event loop; tests drive a mock.
pub trait PaletteHost {
    /// Live existence query against the actual window state.
    fn is_open(&self) -> bool;

    /// Creates the always-on-top palette window.
    fn create(&mut self) -> bool;

    /// Destroys the window. Idempotent when none exists.
    fn destroy(&mut self) -> bool;

    /// Delivers a content payload to the window.
    fn push(&mut self, templates: &[Template]) -> bool;

    /// Requests a window frame resize.
    fn resize(&mut self, width: u32, height: u32) -> bool;

    /// Current window content size, if the window exists.
    fn size(&self) -> Option<(u32, u32)>;

    /// Raises the window.
    fn focus(&mut self);
}

/// State machine over the single window slot: Closed -> Open -> Closed.
#[derive(Default)]
pub struct FloatingPalette {
    active: bool,
    ready: bool,
    current: Vec<Template>,
}

impl FloatingPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local view of the window state. Prefer [`is_open`](Self::is_open)
    /// anywhere a host is available.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Re-queries the host and corrects the local flag on mismatch.
    pub fn is_open(&mut self, host: &impl PaletteHost) -> bool {
        let open = host.is_open();
        if self.active != open {
            debug!(open, "Correcting palette state from host");
            self.active = open;
            if !open {
                self.ready = false;
            }
        }
        open
    }

    /// Creates the window, or degrades to an update when the host reports
    /// one already exists. The payload is held until the window reports
    /// it finished loading; pushing earlier would be silently dropped.
    pub fn create(&mut self, templates: &[Template], host: &mut impl PaletteHost) -> bool {
        if self.is_open(host) {
            info!("Palette already open, updating instead");
            host.focus();
            return self.update(templates, host);
        }

        if !host.create() {
            warn!("Host failed to create the palette window");
            return false;
        }
        self.active = true;
        self.ready = false;
        self.current = templates.to_vec();
        true
    }

    /// Pushes a fresh payload to an existing window. A window that
    /// vanished underneath us resynchronizes local state instead of
    /// erroring.
    pub fn update(&mut self, templates: &[Template], host: &mut impl PaletteHost) -> bool {
        if !self.is_open(host) {
            info!("Palette window is gone, state resynchronized");
            return false;
        }

        self.current = templates.to_vec();
        if !self.ready {
            // held until the window finishes loading
            return true;
        }

        if !host.push(&self.current) {
            warn!("Palette content push failed");
            self.is_open(host);
            return false;
        }
        self.fit_to_content(host);
        true
    }

    /// The window finished loading; deliver the held payload.
    pub fn mark_ready(&mut self, host: &mut impl PaletteHost) {
        if !self.active || self.ready {
            return;
        }
        self.ready = true;
        host.push(&self.current);
        self.fit_to_content(host);
    }

    /// Re-pushes the current payload on request from the window content.
    pub fn push_current(&mut self, host: &mut impl PaletteHost) {
        if self.is_open(host) && self.ready {
            host.push(&self.current);
        }
    }

    /// Requests destruction. Local state goes to closed even when the
    /// host call fails, then actual state is re-verified.
    pub fn close(&mut self, host: &mut impl PaletteHost) -> bool {
        if !host.destroy() {
            warn!("Host failed to destroy the palette window");
        }
        self.active = false;
        if self.is_open(host) {
            // the window survived the destroy call; reflect reality
            return false;
        }
        self.ready = false;
        true
    }

    /// Unconditional teardown for shutdown paths. No orphaned top-level
    /// window may survive the process.
    pub fn force_close(&mut self, host: &mut impl PaletteHost) {
        if host.is_open() {
            host.destroy();
        }
        self.active = false;
        self.ready = false;
    }

    /// Drives live state to the desired state for the given snapshot:
    /// open (creating or updating) while the palette is enabled and the
    /// pinned subset is non-empty, closed otherwise.
    pub fn manage(&mut self, pinned: &[Template], enabled: bool, host: &mut impl PaletteHost) {
        if enabled && !pinned.is_empty() {
            if self.is_open(host) {
                self.update(pinned, host);
            } else {
                self.create(pinned, host);
            }
        } else if self.is_open(host) {
            self.close(host);
        }
        // is_open already corrected the local flag in the remaining case
    }

    /// Applies a content-reported resize request. Requests past the
    /// runaway limit reset the window to the default size; the rest are
    /// clamped to the content bounds.
    pub fn apply_resize(&mut self, width: u32, height: u32, host: &mut impl PaletteHost) -> bool {
        if !self.is_open(host) {
            return false;
        }

        if width > RUNAWAY_LIMIT || height > RUNAWAY_LIMIT {
            warn!(width, height, "Palette resize request past the runaway limit, resetting");
            let (width, height) = DEFAULT_SIZE;
            return host.resize(width, height);
        }

        let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        let height = height.clamp(MIN_HEIGHT, MAX_HEIGHT);
        if !host.resize(width, height) {
            warn!("Palette resize failed, window may have been destroyed concurrently");
            self.is_open(host);
            return false;
        }
        true
    }

    /// Runaway-layout guard: a host-side window grown past the limit is
    /// forced back to the default size.
    pub fn enforce_bounds(&mut self, host: &mut impl PaletteHost) {
        if let Some((width, height)) = host.size() {
            if width > RUNAWAY_LIMIT || height > RUNAWAY_LIMIT {
                warn!(width, height, "Palette window grew past its limit, resetting");
                let (width, height) = DEFAULT_SIZE;
                host.resize(width, height);
            }
        }
    }

    fn fit_to_content(&mut self, host: &mut impl PaletteHost) {
        let (width, height) = content_extent(&self.current);
        host.resize(width, height);
        self.enforce_bounds(host);
    }
}

/// Estimated content extent for a payload, already clamped to the
/// content bounds. Stands in for the renderer-reported bounding box
/// until a palette renderer is attached.
pub fn content_extent(templates: &[Template]) -> (u32, u32) {
    const ROW_HEIGHT: u32 = 34;
    const CHROME: u32 = 16;
    const CHAR_WIDTH: u32 = 8;

    let rows = templates.len() as u32;
    let widest = templates
        .iter()
        .map(|t| t.title.chars().count() as u32)
        .max()
        .unwrap_or(0);

    let width = (widest * CHAR_WIDTH + 3 * CHROME).clamp(MIN_WIDTH, MAX_WIDTH);
    let height = (rows * ROW_HEIGHT + CHROME).clamp(MIN_HEIGHT, MAX_HEIGHT);
    (width, height)
}


#[cfg(test)]
mod tests {
    use super::testing::MockHost;
    use super::*;

    fn template(id: &str) -> Template {
        Template {
            id: id.to_owned(),
            title: format!("Template {id}"),
            content: format!("Content {id}"),
            icon: None,
            shortcut: None,
            pinned: true,
        }
    }

    #[test]
    fn create_holds_payload_until_ready() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        assert!(palette.create(&[template("1")], &mut host));
        assert_eq!(host.creates, 1);
        assert!(host.pushes.is_empty());

        palette.mark_ready(&mut host);
        assert_eq!(host.pushes.len(), 1);
        assert_eq!(host.pushes[0][0].id, "1");
    }

    #[test]
    fn update_before_ready_replaces_held_payload() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        assert!(palette.update(&[template("1"), template("2")], &mut host));
        assert!(host.pushes.is_empty());

        palette.mark_ready(&mut host);
        assert_eq!(host.pushes.len(), 1);
        assert_eq!(host.pushes[0].len(), 2);
    }

    #[test]
    fn mark_ready_is_idempotent() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        palette.mark_ready(&mut host);
        palette.mark_ready(&mut host);
        assert_eq!(host.pushes.len(), 1);
    }

    #[test]
    fn create_when_open_degrades_to_update() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        palette.mark_ready(&mut host);

        assert!(palette.create(&[template("2")], &mut host));
        assert_eq!(host.creates, 1);
        assert_eq!(host.pushes.len(), 2);
        assert_eq!(host.pushes[1][0].id, "2");
    }

    #[test]
    fn update_resyncs_when_window_vanished() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        // closed externally behind the manager's back
        host.open = false;

        assert!(!palette.update(&[template("1")], &mut host));
        assert!(!palette.is_active());
    }

    #[test]
    fn close_clears_local_state_when_window_already_gone() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        // the window vanished and the destroy call errors out
        host.open = false;
        host.fail_destroy = true;

        assert!(palette.close(&mut host));
        assert!(!palette.is_active());
        assert_eq!(host.destroys, 1);
    }

    #[test]
    fn close_resyncs_when_destroy_fails_with_live_window() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        host.fail_destroy = true;

        // re-verification finds the window still alive and says so
        assert!(!palette.close(&mut host));
        assert!(palette.is_active());
    }

    #[test]
    fn manage_opens_when_enabled_with_pinned() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.manage(&[template("1")], true, &mut host);
        assert!(host.open);
        assert!(palette.is_active());
    }

    #[test]
    fn manage_closes_when_disabled_regardless_of_prior_state() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.manage(&[template("1")], true, &mut host);
        palette.manage(&[template("1")], false, &mut host);
        assert!(!host.open);
        assert!(!palette.is_active());
    }

    #[test]
    fn manage_closes_when_no_pinned_templates() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.manage(&[template("1")], true, &mut host);
        palette.manage(&[], true, &mut host);
        assert!(!host.open);
    }

    #[test]
    fn manage_corrects_stale_local_state() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.manage(&[template("1")], true, &mut host);
        host.open = false;

        palette.manage(&[], true, &mut host);
        assert!(!palette.is_active());
        assert_eq!(host.destroys, 0);
    }

    #[test]
    fn resize_within_bounds_passes_through() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        assert!(palette.apply_resize(300, 200, &mut host));
        assert_eq!(host.size, Some((300, 200)));
    }

    #[test]
    fn resize_past_runaway_limit_resets_to_default() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        assert!(palette.apply_resize(600, 600, &mut host));
        assert_eq!(host.size, Some(DEFAULT_SIZE));
    }

    #[test]
    fn resize_clamps_to_content_bounds() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        palette.apply_resize(10, 10, &mut host);
        assert_eq!(host.size, Some((MIN_WIDTH, MIN_HEIGHT)));

        palette.apply_resize(499, 450, &mut host);
        assert_eq!(host.size, Some((499, MAX_HEIGHT)));
    }

    #[test]
    fn resize_without_window_reports_failure() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();
        assert!(!palette.apply_resize(300, 200, &mut host));
    }

    #[test]
    fn enforce_bounds_resets_runaway_window() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        host.size = Some((600, 300));

        palette.enforce_bounds(&mut host);
        assert_eq!(host.size, Some(DEFAULT_SIZE));
    }

    #[test]
    fn force_close_destroys_live_window() {
        let mut palette = FloatingPalette::new();
        let mut host = MockHost::default();

        palette.create(&[template("1")], &mut host);
        palette.force_close(&mut host);
        assert!(!host.open);
        assert!(!palette.is_active());

        // idempotent with no window
        palette.force_close(&mut host);
        assert_eq!(host.destroys, 1);
    }

    #[test]
    fn content_extent_stays_within_bounds() {
        let many: Vec<Template> = (0..40).map(|i| template(&i.to_string())).collect();
        let (width, height) = content_extent(&many);
        assert!(width <= MAX_WIDTH && height <= MAX_HEIGHT);

        let (width, height) = content_extent(&[]);
        assert_eq!((width, height), (MIN_WIDTH, MIN_HEIGHT));
    }
}
