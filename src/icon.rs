use std::path::Path;
use std::sync::LazyLock;

const COLOR_PALETTE_OPEN: (u8, u8, u8) = (96, 205, 255);
pub const ICON_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/icon.png");

static ICON: LazyLock<tray_icon::Icon> = LazyLock::new(|| load_icon(ICON_PATH, None));
static ICON_PALETTE_OPEN: LazyLock<tray_icon::Icon> =
    LazyLock::new(|| load_icon(ICON_PATH, Some(COLOR_PALETTE_OPEN)));

/// Tray icon variants, keyed by whether the floating palette is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayState {
    Idle,
    PaletteOpen,
}

impl TrayState {
    pub fn from_palette(open: bool) -> Self {
        if open {
            TrayState::PaletteOpen
        } else {
            TrayState::Idle
        }
    }

    pub fn icon(&self) -> tray_icon::Icon {
        match self {
            TrayState::Idle => ICON.clone(),
            TrayState::PaletteOpen => ICON_PALETTE_OPEN.clone(),
        }
    }
}

fn load_icon(path: impl AsRef<Path>, recolor: Option<(u8, u8, u8)>) -> tray_icon::Icon {
    let (icon_rgba, icon_width, icon_height) = {
        let mut image = image::open(path)
            .expect("Failed to open icon path")
            .into_rgba8();

        if let Some((r, g, b)) = recolor {
            for pixel in image.pixels_mut() {
                pixel[0] = r;
                pixel[1] = g;
                pixel[2] = b;
            }
        }

        let (width, height) = image.dimensions();
        let rgba = image.into_raw();
        (rgba, width, height)
    };
    tray_icon::Icon::from_rgba(icon_rgba, icon_width, icon_height).expect("Failed to open icon")
}
