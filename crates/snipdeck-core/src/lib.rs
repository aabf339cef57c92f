//! Core types and configuration for snipdeck.
//!
//! This crate provides the platform-agnostic data model shared by the
//! coordinator binary and any editing front end: templates, settings,
//! and the on-disk documents both are loaded from.

mod config;
mod settings;
mod template;

pub use config::ConfigManager;
pub use settings::{Settings, Theme};
pub use template::Template;

/// Application name
pub const APP_NAME: &str = "snipdeck";

/// Pretty application name for display
pub const APP_NAME_PRETTY: &str = "Snipdeck";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";
