//! Wrapwine units: one parsed, expanded and validated definition file.
//!
//! A unit moves through a fixed pipeline exactly once:
//!
//! ```text
//! Unparsed -> Parsed -> SanityChecked -> Verified -> Finalized
//!     \__________\___________\_____________\______-> Skipped
//! ```
//!
//! Fatal problems ([`UnitError`]) abort construction entirely. Everything
//! else is recorded as a [`UnitIssue`] and marks the unit as skipped, while
//! the remaining independent checks still run.

mod validate;
mod view;

pub use view::{BAD_FILE_SUFFIX, REMOTE_PREFIX, strip_annotations};

use crate::env::{EnvSnapshot, ExpansionReport, VariableSet, expand};
use crate::error::{UnitError, UnitIssue};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Keys every usable unit must define.
pub const REQUIRED_KEYS: [&str; 4] = ["TITLE", "WINEPREFIX", "GAMEDIR", "FILENAME"];

/// Presence of this key disables a unit without recording an error.
pub const IGNORE_KEY: &str = "IGNORE";

/// Lifecycle stage of a unit. `Finalized` and `Skipped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Unparsed,
    Parsed,
    SanityChecked,
    Verified,
    Finalized,
    Skipped,
}

impl UnitState {
    pub fn is_terminal(self) -> bool {
        matches!(self, UnitState::Finalized | UnitState::Skipped)
    }
}

#[derive(Debug, Clone)]
pub struct Unit {
    source_path: Utf8PathBuf,
    variables: VariableSet,
    expansion: ExpansionReport,
    errors: Vec<UnitIssue>,
    skip: bool,
    state: UnitState,
    base_title: String,
    wineprefix: Option<Utf8PathBuf>,
    gamedir: Option<Utf8PathBuf>,
    exe_name: Option<String>,
}

impl Unit {
    /// Read and build a unit from a file on disk.
    pub fn load(path: impl AsRef<Utf8Path>, env: &EnvSnapshot) -> Result<Self, UnitError> {
        let path = path.as_ref();
        tracing::debug!("- Scanning file '{}'", path);

        let text = fs::read_to_string(path).map_err(|source| UnitError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_source(path, &text, env)
    }

    /// Build a unit from already-read file contents.
    pub fn from_source(
        path: impl AsRef<Utf8Path>,
        text: &str,
        env: &EnvSnapshot,
    ) -> Result<Self, UnitError> {
        let source_path = path.as_ref().to_path_buf();

        let mut variables = VariableSet::parse(text.lines())?;
        let expansion = expand(&mut variables, env)?;

        let mut unit = Self {
            base_title: source_path.to_string(),
            source_path,
            variables,
            expansion,
            errors: Vec::new(),
            skip: false,
            state: UnitState::Unparsed,
            wineprefix: None,
            gamedir: None,
            exe_name: None,
        };
        unit.advance(UnitState::Parsed);

        unit.validate();
        Ok(unit)
    }

    /// Move to `next` unless the unit has already been skipped.
    fn advance(&mut self, next: UnitState) {
        if self.state != UnitState::Skipped {
            self.state = next;
        }
    }

    fn mark_skipped(&mut self) {
        self.skip = true;
        self.state = UnitState::Skipped;
    }

    fn record(&mut self, issue: UnitIssue) {
        tracing::error!("ERR: {} ({})", issue, self.source_path);
        self.errors.push(issue);
        self.mark_skipped();
    }

    pub fn source_path(&self) -> &Utf8Path {
        &self.source_path
    }

    /// Fully expanded variables, in file order.
    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    pub fn expansion(&self) -> &ExpansionReport {
        &self.expansion
    }

    pub fn errors(&self) -> &[UnitIssue] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    /// A launcher must refuse any unit for which this is false.
    pub fn is_usable(&self) -> bool {
        !self.skip
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    /// Resolved `WINEPREFIX`, without trailing slashes.
    pub fn wineprefix(&self) -> Option<&Utf8Path> {
        self.wineprefix.as_deref()
    }

    /// Effective game directory, possibly joined under the wineprefix.
    pub fn gamedir(&self) -> Option<&Utf8Path> {
        self.gamedir.as_deref()
    }

    pub fn exe_name(&self) -> Option<&str> {
        self.exe_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> EnvSnapshot {
        EnvSnapshot::from_pairs([("HOME", "/home/alice")])
    }

    #[test]
    fn test_missing_everything() {
        let unit = Unit::from_source("/units/empty", "# nothing here\n", &env()).unwrap();

        assert_eq!(unit.errors().len(), 4);
        assert!(unit.is_skipped());
        assert_eq!(unit.state(), UnitState::Skipped);
        assert_eq!(unit.basic_title(), "/units/empty");
    }

    #[test]
    fn test_duplicate_key_aborts() {
        let err = Unit::from_source("/units/dup", "A=1\nA=2\n", &env()).unwrap_err();
        assert!(matches!(err, UnitError::DuplicateKey(_)));
    }

    #[test]
    fn test_cycle_aborts() {
        let err = Unit::from_source("/units/cycle", "A=$B\nB=$A\n", &env()).unwrap_err();
        assert!(matches!(err, UnitError::ExpansionOverrun(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Unit::load("/definitely/not/here.wrapwine", &env()).unwrap_err();
        assert!(matches!(err, UnitError::Io { .. }));
    }

    #[test]
    fn test_skipped_state_is_sticky() {
        let mut unit = Unit::from_source("/units/x", "", &env()).unwrap();
        unit.advance(UnitState::Finalized);
        assert_eq!(unit.state(), UnitState::Skipped);
        assert!(unit.state().is_terminal());
    }
}
