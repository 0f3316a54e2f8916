//! Data models shared by the CLI and the library.
//!
//! - [`Settings`]: user preferences loaded from `settings.yaml` (menu title,
//!   launch command template, units directory, logging)

pub mod config;

pub use config::{FILE_PLACEHOLDER, Settings};
