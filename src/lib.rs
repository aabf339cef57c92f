// Re-export from sub-crates
pub use snipdeck_core::{
    APP_NAME, APP_NAME_PRETTY, ConfigManager, DEFAULT_LOG_LEVEL, Settings, Template, Theme,
};

// App-specific modules
pub mod accel;
pub mod event;
pub mod icon;
pub mod notify;
pub mod palette;
pub mod paste;
pub mod reconcile;
pub mod shortcuts;
pub mod watcher;

// Version from this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
