use crate::env::EnvSnapshot;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Placeholder in [`Settings::command`] replaced by the unit's source path.
pub const FILE_PLACEHOLDER: &str = "{File}";

/// User settings from `settings.yaml`, overridable with `WRAPWINE_*` variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Menu title printed in rofigen output
    pub title: String,

    /// Command template used for each menu entry; `{File}` is the unit path
    pub command: String,

    /// Directory holding unit files; `~` and `$VARS` are expanded
    pub units_dir: String,

    /// Log at debug level
    pub debug: bool,

    /// Optional directory for rotating log files
    pub log_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: default_title(),
            command: default_command(),
            units_dir: default_units_dir(),
            debug: false,
            log_dir: None,
        }
    }
}

fn default_title() -> String {
    "Wrapwine Scanner".to_string()
}

fn default_command() -> String {
    "wrapwine '{File}' --nobash".to_string()
}

fn default_units_dir() -> String {
    "~/.wrapwines".to_string()
}

impl Settings {
    /// Fill the command template for one unit file.
    pub fn render_command(&self, unit_path: &Utf8Path) -> String {
        self.command.replace(FILE_PLACEHOLDER, unit_path.as_str())
    }

    /// The units directory with home and environment references resolved.
    pub fn units_dir_path(&self, env: &EnvSnapshot) -> Utf8PathBuf {
        Utf8PathBuf::from(env.substitute(&self.units_dir))
    }
}
