//! Services built on top of individual units.
//!
//! # Components
//!
//! - [`UnitCatalog`]: scans a directory of unit files, keeps going past broken
//!   ones, and renders menus:
//!   - rofigen's `title=`/`menu[...]=` bash format
//!   - a plain title list for rofi script mode
//!   - lookup of a selected (annotated) title back to its unit
//!
//! - [`LaunchPlan`]: the environment, working directory and command a launcher
//!   would use for a usable unit. Building a plan never executes anything.
//!
//! - [`spawn_detached`]: fire-and-forget execution of a rendered menu command,
//!   used by the CLI's `launch` subcommand.

pub mod catalog;
pub mod launch;

pub use catalog::{MenuEntry, ScanFailure, UnitCatalog};
pub use launch::{LaunchError, LaunchPlan, find_wine, spawn_detached};
