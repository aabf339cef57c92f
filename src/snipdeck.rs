use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use parking_lot::RwLock;
use snipdeck::event::DeckEvent;
use snipdeck::icon::TrayState;
use snipdeck::notify::{NotificationLayer, notify_copied};
use snipdeck::palette::{DEFAULT_SIZE, PaletteHost};
use snipdeck::paste::PasteEffector;
use snipdeck::reconcile::Reconciler;
use snipdeck::shortcuts::OsHotkeyBinder;
use snipdeck::{
    APP_NAME_PRETTY, ConfigManager, DEFAULT_LOG_LEVEL, Template, VERSION, watcher,
};
use tao::dpi::LogicalSize;
use tao::event::{Event, StartCause, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopWindowTarget};
use tao::window::{Window, WindowBuilder};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tray_icon::menu::{AboutMetadataBuilder, Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{TrayIcon, TrayIconBuilder, TrayIconEvent};

/// tao-backed palette host. Window creation needs the event-loop target,
/// so the loop builds one of these around the window slot per dispatch.
struct TaoHost<'a> {
    slot: &'a mut Option<Window>,
    target: &'a EventLoopWindowTarget<DeckEvent>,
    feed: &'a Arc<RwLock<Vec<Template>>>,
}

impl PaletteHost for TaoHost<'_> {
    fn is_open(&self) -> bool {
        self.slot.is_some()
    }

    fn create(&mut self) -> bool {
        let window = WindowBuilder::new()
            .with_title("")
            .with_inner_size(LogicalSize::new(DEFAULT_SIZE.0 as f64, DEFAULT_SIZE.1 as f64))
            .with_decorations(false)
            .with_always_on_top(true)
            .with_transparent(true)
            .with_resizable(false)
            .build(self.target);

        match window {
            Ok(window) => {
                // the first redraw doubles as the loaded signal
                window.request_redraw();
                self.slot.replace(window);
                true
            }
            Err(e) => {
                error!("Failed to create palette window: {}", e);
                false
            }
        }
    }

    fn destroy(&mut self) -> bool {
        // dropping the handle destroys the native window
        self.slot.take();
        true
    }

    fn push(&mut self, templates: &[Template]) -> bool {
        match self.slot.as_ref() {
            Some(window) => {
                *self.feed.write() = templates.to_vec();
                window.request_redraw();
                true
            }
            None => false,
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> bool {
        match self.slot.as_ref() {
            Some(window) => {
                window.set_inner_size(LogicalSize::new(width as f64, height as f64));
                true
            }
            None => false,
        }
    }

    fn size(&self) -> Option<(u32, u32)> {
        self.slot.as_ref().map(|window| {
            let size = window.inner_size().to_logical::<u32>(window.scale_factor());
            (size.width, size.height)
        })
    }

    fn focus(&mut self) {
        if let Some(window) = self.slot.as_ref() {
            window.set_focus();
        }
    }
}

fn main() -> Result<()> {
    // Initialize the logger
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SNIPDECK_LOG")
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .finish()
        .with(NotificationLayer::new())
        .init();

    // Load the documents
    let config_manager = ConfigManager::new()?;
    let mut settings = config_manager.load_settings()?;
    // save back the settings to create the file if it doesn't exist
    config_manager.save_settings(&settings)?;
    let mut templates = config_manager.load_templates()?;

    // Set up hotkeys, clipboard and paste
    let mut binder = OsHotkeyBinder::new()?;
    let mut effector = PasteEffector::new()?;
    let mut reconciler = Reconciler::new();

    // Create the tray menu
    let tray_menu = Menu::new();
    let icon_quit = MenuItem::new("Quit", true, None);
    let icon_copy_config = MenuItem::new("Copy config path", true, None);
    let icon_reload = MenuItem::new("Reload templates", true, None);
    tray_menu.append_items(&[
        // the name of the app
        &MenuItem::new(APP_NAME_PRETTY, false, None),
        &PredefinedMenuItem::separator(),
        &PredefinedMenuItem::about(
            None,
            Some(
                AboutMetadataBuilder::new()
                    .version(Some(VERSION.to_owned()))
                    .build(),
            ),
        ),
        &icon_reload,
        &icon_copy_config,
        &PredefinedMenuItem::separator(),
        &icon_quit,
    ])?;

    // Set up the event loop
    let mut icon_tray: Option<TrayIcon> = None;

    let menu_channel = MenuEvent::receiver();
    let tray_channel = TrayIconEvent::receiver();
    let hotkey_channel = GlobalHotKeyEvent::receiver();

    let event_loop: EventLoop<DeckEvent> = EventLoopBuilder::with_user_event().build();
    let event_sender = event_loop.create_proxy();

    // The editing layer owns the documents; watch them for changes
    watcher::spawn(config_manager.clone(), event_loop.create_proxy());

    // The single palette window slot and the content feed its renderer reads
    let mut palette_slot: Option<Window> = None;
    let content_feed: Arc<RwLock<Vec<Template>>> = Arc::new(RwLock::new(Vec::new()));

    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;

        let mut host = TaoHost {
            slot: &mut palette_slot,
            target,
            feed: &content_feed,
        };

        if let Event::NewEvents(StartCause::Init) = event {
            // We create the icon once the event loop is actually running
            // to prevent issues like https://github.com/tauri-apps/tray-icon/issues/90
            icon_tray.replace(
                TrayIconBuilder::new()
                    .with_menu(Box::new(tray_menu.clone()))
                    .with_tooltip("snipdeck - clipboard templates")
                    .with_icon(TrayState::Idle.icon())
                    .build()
                    .unwrap(),
            );

            // We have to request a redraw here to have the icon actually show up.
            // Tao only exposes a redraw method on the Window so we use core-foundation directly.
            #[cfg(target_os = "macos")]
            unsafe {
                use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};

                let rl = CFRunLoopGetMain();
                CFRunLoopWakeUp(rl);
            }

            let result = reconciler.reconcile(&templates, &settings, &mut binder, &mut host);
            if let Some(tray) = icon_tray.as_ref() {
                tray.set_icon(Some(TrayState::from_palette(host.is_open()).icon()))
                    .ok();
            }
            info!(shortcuts = result.registered, "Snipdeck ready");
        }

        if let Ok(event) = menu_channel.try_recv() {
            if event.id == icon_quit.id() {
                reconciler.shutdown(&mut binder, &mut host);
                icon_tray.take();
                *control_flow = ControlFlow::Exit;
            } else if event.id == icon_copy_config.id() {
                if let Err(e) =
                    effector.copy(&config_manager.settings_path().to_string_lossy())
                {
                    error!("Failed to copy config path to clipboard: {}", e);
                }
            } else if event.id == icon_reload.id() {
                match config_manager.load_templates() {
                    Ok(fresh) => {
                        event_sender
                            .send_event(DeckEvent::TemplatesChanged(fresh))
                            .ok();
                    }
                    Err(e) => warn!("Failed to reload templates: {}", e),
                }
            }
        }

        #[expect(clippy::redundant_pattern_matching)]
        if let Ok(_) = tray_channel.try_recv() {
            // Handle tray icon events
        }

        match event {
            // Handle user provided events
            Event::UserEvent(event) => match event {
                DeckEvent::TemplatesChanged(fresh) => {
                    templates = fresh;
                    let result =
                        reconciler.reconcile(&templates, &settings, &mut binder, &mut host);
                    info!(shortcuts = result.registered, "Templates changed");
                    if let Some(tray) = icon_tray.as_ref() {
                        tray.set_icon(Some(TrayState::from_palette(host.is_open()).icon()))
                            .ok();
                    }
                }
                DeckEvent::SettingsChanged(fresh) => {
                    settings = fresh;
                    reconciler.reconcile(&templates, &settings, &mut binder, &mut host);
                    info!(
                        pin_templates = settings.pin_templates,
                        auto_paste = settings.auto_paste,
                        "Settings changed"
                    );
                    if let Some(tray) = icon_tray.as_ref() {
                        tray.set_icon(Some(TrayState::from_palette(host.is_open()).icon()))
                            .ok();
                    }
                }
                DeckEvent::TemplateCopied {
                    template_id,
                    title,
                    accelerator,
                } => {
                    info!(template = %template_id, accelerator = %accelerator, "Template copied");
                    notify_copied(&title, &accelerator);
                }
                DeckEvent::PaletteReady => reconciler.palette_ready(&mut host),
                DeckEvent::PaletteResizeRequested { width, height } => {
                    reconciler.palette_resize(width, height, &mut host);
                }
                DeckEvent::PaletteTemplatesRequested => {
                    reconciler.push_palette_templates(&mut host)
                }
            },

            // The palette window's first redraw doubles as its loaded signal
            Event::RedrawRequested(window_id) => {
                if host.slot.as_ref().map(|w| w.id()) == Some(window_id) {
                    event_sender.send_event(DeckEvent::PaletteReady).ok();
                }
            }

            Event::WindowEvent {
                window_id,
                event: window_event,
                ..
            } => {
                if host.slot.as_ref().map(|w| w.id()) == Some(window_id) {
                    match window_event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            // closed externally; drop the handle and resync
                            host.slot.take();
                            reconciler.is_palette_open(&host);
                            if let Some(tray) = icon_tray.as_ref() {
                                tray.set_icon(Some(TrayState::Idle.icon())).ok();
                            }
                        }
                        WindowEvent::Resized(_) => reconciler.palette_bounds_check(&mut host),
                        _ => {}
                    }
                }
            }

            Event::LoopDestroyed => {
                // no orphaned palette window or dangling registration may
                // survive the process
                reconciler.shutdown(&mut binder, &mut host);
            }

            _ => {}
        }

        // Handle hotkey events
        if let Ok(event) = hotkey_channel.try_recv() {
            if event.state() == HotKeyState::Pressed {
                if let Some(fired) = reconciler.fire(event.id(), Instant::now()) {
                    match effector.deliver(&fired.content, settings.auto_paste) {
                        Ok(()) => {
                            event_sender
                                .send_event(DeckEvent::TemplateCopied {
                                    template_id: fired.template_id,
                                    title: fired.title,
                                    accelerator: fired.accelerator,
                                })
                                .ok();
                        }
                        Err(e) => error!("Failed to copy template to clipboard: {}", e),
                    }
                }
            }
        }
    });
}
