//! Shell-style variable handling for unit files.
//!
//! - [`parser`]: turns lines into a raw [`VariableSet`], rejecting duplicate keys
//! - [`snapshot`]: [`EnvSnapshot`], the frozen process environment used for `~` and `$HOME`-style substitution
//! - [`expand`]: resolves references between variables of one set to a fixed point
//!
//! # Usage Example
//!
//! ```ignore
//! use wrapwine_scan::env::{expand, EnvSnapshot, VariableSet};
//!
//! let mut vars = VariableSet::parse(text.lines())?;
//! let report = expand(&mut vars, &EnvSnapshot::capture())?;
//! ```

pub mod expand;
pub mod parser;
pub mod snapshot;
mod vars;

pub use expand::{
    ExpansionReport, MAX_EXPANSION_SWEEPS, ReferenceToken, expand, expand_variable,
    first_reference, needs_expansion,
};
pub use parser::{ParsedLine, RawAssignment, parse_line, parse_lines};
pub use snapshot::EnvSnapshot;
pub use vars::VariableSet;
