use super::{IGNORE_KEY, REQUIRED_KEYS, Unit, UnitState};
use crate::error::UnitIssue;
use camino::Utf8PathBuf;

/// Keys that request ISO mounting, which is not supported.
const ISO_KEYS: [&str; 2] = ["ISODIR", "ISOLOC"];

type VerifyStep = fn(&mut Unit) -> Result<(), UnitIssue>;

/// Checks that depend on each other; the first failure ends the chain.
const VERIFY_CHAIN: [(&str, VerifyStep); 2] = [
    ("wineprefix_check", Unit::check_wineprefix),
    ("gamedir_check", Unit::check_gamedir),
];

impl Unit {
    pub(super) fn validate(&mut self) {
        self.resolve_fields();

        if self.check_required_keys() {
            self.advance(UnitState::SanityChecked);
            if self.verify() {
                self.advance(UnitState::Verified);
            }
        }

        if self.variables.contains_key(IGNORE_KEY) {
            tracing::info!("IGNORE set, skipping '{}'", self.source_path);
            self.mark_skipped();
        }

        self.check_unimplemented();
        self.advance(UnitState::Finalized);
    }

    fn resolve_fields(&mut self) {
        if let Some(title) = self.variables.get("TITLE") {
            self.base_title = title.to_string();
        }
        self.wineprefix = self.variables.get("WINEPREFIX").map(trimmed_path);
        self.gamedir = self.variables.get("GAMEDIR").map(trimmed_path);
        self.exe_name = self.variables.get("FILENAME").map(str::to_string);
    }

    /// Record every missing required key. Returns true when none are missing.
    fn check_required_keys(&mut self) -> bool {
        let missing: Vec<&str> = REQUIRED_KEYS
            .into_iter()
            .filter(|key| !self.variables.contains_key(key))
            .collect();

        for key in &missing {
            self.record(UnitIssue::MissingRequiredKey(key.to_string()));
        }

        missing.is_empty()
    }

    fn verify(&mut self) -> bool {
        for (name, step) in VERIFY_CHAIN {
            if let Err(issue) = step(self) {
                tracing::error!("ERR: Failed verification on {}", name);
                self.record(issue);
                return false;
            }
        }
        true
    }

    fn check_wineprefix(&mut self) -> Result<(), UnitIssue> {
        let wineprefix = self.wineprefix.clone().unwrap_or_default();
        if wineprefix.is_dir() {
            Ok(())
        } else {
            Err(UnitIssue::WineprefixNotFound(wineprefix))
        }
    }

    fn check_gamedir(&mut self) -> Result<(), UnitIssue> {
        let gamedir = self.gamedir.clone().unwrap_or_default();
        if gamedir.is_dir() {
            return Ok(());
        }

        let wineprefix = self.wineprefix.clone().unwrap_or_default();
        let joined = wineprefix.join(&gamedir);
        if joined.is_dir() {
            tracing::debug!("GAMEDIR resolved under WINEPREFIX: {}", joined);
            self.gamedir = Some(joined);
            Ok(())
        } else {
            tracing::error!("ERR: could not correctly determine gamedir path");
            Err(UnitIssue::GamedirNotFound(joined))
        }
    }

    fn check_unimplemented(&mut self) {
        if ISO_KEYS.iter().any(|key| self.variables.contains_key(key)) {
            self.record(UnitIssue::UnimplementedFeature("ISOLOC/ISODIR".to_string()));
        }
    }
}

fn trimmed_path(value: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(value.trim_end_matches('/'))
}
