use super::Unit;
use camino::Utf8PathBuf;

/// Prepended when the wineprefix is a symlink (e.g. onto network storage).
pub const REMOTE_PREFIX: &str = "{Remote}: ";

/// Appended when the target executable cannot be found.
pub const BAD_FILE_SUFFIX: &str = " (bad file?)";

/// Remove display annotations, recovering the basic title.
pub fn strip_annotations(display_title: &str) -> &str {
    let title = display_title
        .strip_prefix(REMOTE_PREFIX)
        .unwrap_or(display_title);
    title.strip_suffix(BAD_FILE_SUFFIX).unwrap_or(title)
}

impl Unit {
    /// The stable identifier: `TITLE`, or the source path when it is unset.
    pub fn basic_title(&self) -> &str {
        &self.base_title
    }

    /// Title for menus, annotated from the current state of the filesystem.
    ///
    /// Nothing is cached; every call re-checks the wineprefix link and the
    /// target executable.
    pub fn display_title(&self) -> String {
        if !self.variables.contains_key("TITLE") {
            return self.base_title.clone();
        }

        let mut title = String::new();
        if self.is_remote() {
            title.push_str(REMOTE_PREFIX);
        }
        title.push_str(&self.base_title);
        if !self.target_exists() {
            title.push_str(BAD_FILE_SUFFIX);
        }
        title
    }

    /// True when the resolved wineprefix is itself a symbolic link.
    pub fn is_remote(&self) -> bool {
        self.wineprefix
            .as_deref()
            .is_some_and(|prefix| prefix.is_symlink())
    }

    /// Game directory joined with `FILENAME`.
    pub fn target_path(&self) -> Option<Utf8PathBuf> {
        Some(self.gamedir.as_deref()?.join(self.exe_name.as_deref()?))
    }

    pub fn target_exists(&self) -> bool {
        self.target_path().is_some_and(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvSnapshot;

    #[test]
    fn test_strip_annotations() {
        assert_eq!(strip_annotations("{Remote}: Game (bad file?)"), "Game");
        assert_eq!(strip_annotations("{Remote}: Game"), "Game");
        assert_eq!(strip_annotations("Game (bad file?)"), "Game");
        assert_eq!(strip_annotations("Game"), "Game");
    }

    #[test]
    fn test_title_fallback_is_path() {
        let unit = Unit::from_source("/units/untitled", "WINEPREFIX=/x\n", &EnvSnapshot::default())
            .unwrap();
        assert_eq!(unit.display_title(), "/units/untitled");
    }

    #[test]
    fn test_title_without_target_is_bad_file() {
        let unit = Unit::from_source("/units/t", "TITLE=Lonely\n", &EnvSnapshot::default())
            .unwrap();
        assert_eq!(unit.display_title(), "Lonely (bad file?)");
        assert!(unit.target_path().is_none());
        assert!(!unit.is_remote());
    }
}
