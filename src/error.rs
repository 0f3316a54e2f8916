use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that abort construction of a single unit.
///
/// Sibling units are unaffected; the catalog records the failure and moves on.
#[derive(Error, Debug)]
pub enum UnitError {
    #[error("Duplicate key '{0}' found")]
    DuplicateKey(String),

    #[error("Variable '{0}' has no value to expand")]
    MissingValue(String),

    #[error("Variable expansion did not settle after {0} sweeps (unresolvable or cyclic reference)")]
    ExpansionOverrun(usize),

    #[error("Failed to read unit file {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Problems recorded on a unit that mark it as skipped without aborting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitIssue {
    MissingRequiredKey(String),
    WineprefixNotFound(Utf8PathBuf),
    GamedirNotFound(Utf8PathBuf),
    UnimplementedFeature(String),
}

impl std::fmt::Display for UnitIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitIssue::MissingRequiredKey(key) => write!(f, "Missing key {}", key),
            UnitIssue::WineprefixNotFound(path) => write!(f, "WINEPREFIX not found: '{}'", path),
            UnitIssue::GamedirNotFound(path) => write!(f, "GAMEDIR not found: '{}'", path),
            UnitIssue::UnimplementedFeature(feature) => write!(f, "{} unimplemented", feature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_messages() {
        assert_eq!(
            UnitIssue::MissingRequiredKey("TITLE".to_string()).to_string(),
            "Missing key TITLE"
        );
        assert_eq!(
            UnitIssue::UnimplementedFeature("ISOLOC/ISODIR".to_string()).to_string(),
            "ISOLOC/ISODIR unimplemented"
        );
        assert_eq!(
            UnitIssue::GamedirNotFound(Utf8PathBuf::from("/pfx/drive_c/Game")).to_string(),
            "GAMEDIR not found: '/pfx/drive_c/Game'"
        );
    }

    #[test]
    fn test_overrun_mentions_sweeps() {
        let err = UnitError::ExpansionOverrun(10);
        assert!(err.to_string().contains("10 sweeps"));
    }
}
