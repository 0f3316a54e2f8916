use crate::env::EnvSnapshot;
use crate::error::UnitError;
use crate::models::Settings;
use crate::unit::{Unit, strip_annotations};
use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;

/// A unit file that could not be constructed at all.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: Utf8PathBuf,
    pub error: UnitError,
}

/// One line of menu output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Annotated title shown to the user
    pub title: String,

    /// Stable identifier used to find the unit again after selection
    pub id: String,

    /// Rendered launch command for this unit
    pub command: String,

    pub usable: bool,
}

/// All units found in a directory, keyed by their basic title.
#[derive(Debug, Default)]
pub struct UnitCatalog {
    units: IndexMap<String, Unit>,
    failures: Vec<ScanFailure>,
}

impl UnitCatalog {
    /// Load every regular file in `dir` as a unit.
    ///
    /// A unit that fails to build is logged and recorded in
    /// [`failures`](Self::failures); scanning continues with the next file.
    ///
    /// # Errors
    ///
    /// Returns an error only if `dir` is not a readable directory.
    pub fn scan(dir: &Utf8Path, env: &EnvSnapshot) -> Result<Self> {
        if !dir.is_dir() {
            bail!("Unit path must be a directory: {}", dir);
        }

        let mut paths = Vec::new();
        for entry in dir
            .read_dir_utf8()
            .with_context(|| format!("Failed to read unit directory: {}", dir))?
        {
            match entry {
                Ok(entry) => paths.push(entry.into_path()),
                Err(e) => tracing::warn!("Skipping unreadable entry in {}: {}", dir, e),
            }
        }
        paths.sort();

        let mut catalog = Self::default();
        for path in paths {
            tracing::debug!("file: {}", path);
            if !path.is_file() {
                tracing::debug!("skip");
                continue;
            }

            match Unit::load(&path, env) {
                Ok(unit) => catalog.add(unit),
                Err(error) => {
                    tracing::error!("ERROR: could not load unit {}: {}", path, error);
                    catalog.failures.push(ScanFailure { path, error });
                }
            }
        }

        tracing::info!(
            "Scanned {}: {} units, {} failures",
            dir,
            catalog.units.len(),
            catalog.failures.len()
        );

        Ok(catalog)
    }

    pub fn from_units<I: IntoIterator<Item = Unit>>(units: I) -> Self {
        let mut catalog = Self::default();
        for unit in units {
            catalog.add(unit);
        }
        catalog
    }

    fn add(&mut self, unit: Unit) {
        let mut id = unit.basic_title().to_string();
        if self.units.contains_key(&id) {
            tracing::warn!(
                "Title '{}' already used, keying {} by its path",
                id,
                unit.source_path()
            );
            id = unit.source_path().to_string();
        }
        self.units.insert(id, unit);
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn failures(&self) -> &[ScanFailure] {
        &self.failures
    }

    /// Iterate `(id, unit)` pairs in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Unit)> {
        self.units.iter().map(|(id, unit)| (id.as_str(), unit))
    }

    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.units.get(id)
    }

    /// Find the unit behind a menu selection (display title or identifier).
    pub fn find(&self, selection: &str) -> Option<&Unit> {
        self.units
            .get(selection)
            .or_else(|| self.units.get(strip_annotations(selection)))
    }

    /// Entries ordered by case-insensitive display title.
    pub fn menu_entries(&self, settings: &Settings) -> Vec<MenuEntry> {
        let mut entries: Vec<MenuEntry> = self
            .units
            .iter()
            .map(|(id, unit)| MenuEntry {
                title: unit.display_title(),
                id: id.clone(),
                command: settings.render_command(unit.source_path()),
                usable: unit.is_usable(),
            })
            .collect();

        entries.sort_by_cached_key(|entry| entry.title.to_lowercase());
        entries
    }

    /// Menu in rofigen's bash format.
    ///
    /// Skipped units are reported on the log and left out of the menu.
    pub fn render_rofigen(&self, settings: &Settings) -> String {
        let mut out = String::new();

        if settings.title.is_empty() {
            tracing::warn!("WARN: Title was unset, this is probably not intentional");
        } else {
            out.push_str(&format!("title=\"{}\"\n", settings.title));
        }

        for entry in self.menu_entries(settings) {
            let Some(unit) = self.units.get(&entry.id) else {
                continue;
            };
            let errors = unit.error_messages();

            if !errors.is_empty() && unit.is_skipped() {
                tracing::error!("ERROR: {}, skipping '{}'", errors.join(", "), entry.title);
                continue;
            } else if !errors.is_empty() {
                tracing::warn!(
                    "WARN: '{}' has errors but was passed through anyway: {}",
                    entry.title,
                    errors.join(",")
                );
            } else if unit.is_skipped() {
                tracing::info!(
                    "INFO: Skip set but no errors, skipping '{}' (is IGNORE set?)",
                    entry.title
                );
                continue;
            }

            out.push_str(&format!("menu[\"{}\"]=\"{}\"\n", entry.title, entry.command));
        }

        out
    }

    /// One usable display title per line, for rofi's script mode.
    pub fn render_titles(&self, settings: &Settings) -> String {
        self.menu_entries(settings)
            .into_iter()
            .filter(|entry| entry.usable)
            .map(|entry| entry.title)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(path: &str, text: &str) -> Unit {
        Unit::from_source(path, text, &EnvSnapshot::default()).unwrap()
    }

    #[test]
    fn test_duplicate_titles_keyed_by_path() {
        let catalog = UnitCatalog::from_units([
            unit("/u/a", "TITLE=Same\n"),
            unit("/u/b", "TITLE=Same\n"),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Same").unwrap().source_path().as_str(), "/u/a");
        assert_eq!(catalog.get("/u/b").unwrap().source_path().as_str(), "/u/b");
    }

    #[test]
    fn test_find_by_display_title() {
        let catalog = UnitCatalog::from_units([unit("/u/a", "TITLE=Alpha\n")]);

        assert!(catalog.find("Alpha (bad file?)").is_some());
        assert!(catalog.find("{Remote}: Alpha").is_some());
        assert!(catalog.find("Alpha").is_some());
        assert!(catalog.find("Beta").is_none());
    }

    #[test]
    fn test_entries_sorted_case_insensitive() {
        let catalog = UnitCatalog::from_units([
            unit("/u/1", "TITLE=beta\n"),
            unit("/u/2", "TITLE=Alpha\n"),
            unit("/u/3", "TITLE=Gamma\n"),
        ]);

        let ids: Vec<String> = catalog
            .menu_entries(&Settings::default())
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["Alpha", "beta", "Gamma"]);
    }

    #[test]
    fn test_rofigen_omits_skipped() {
        let catalog = UnitCatalog::from_units([unit("/u/a", "TITLE=Broken\n")]);
        let out = catalog.render_rofigen(&Settings::default());

        assert_eq!(out, "title=\"Wrapwine Scanner\"\n");
    }

    #[test]
    fn test_scan_rejects_non_directory() {
        let result = UnitCatalog::scan(Utf8Path::new("/definitely/not/a/dir"), &EnvSnapshot::default());
        assert!(result.is_err());
    }
}
