// wrapwine-scan - Scanner and menu generator for wrapwine units
//
// This is the library crate containing unit parsing, expansion and validation.
// The binary crate (main.rs) provides the command line entry point.

pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod unit;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use env::{EnvSnapshot, VariableSet};
pub use error::{UnitError, UnitIssue};
pub use models::Settings;
pub use services::{LaunchPlan, UnitCatalog};
pub use unit::{Unit, UnitState};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
