use crate::env::EnvSnapshot;
use crate::unit::Unit;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::process::Command;

/// `STAGING_AUDIO_PERIOD` given to units that bring their own wine build.
pub const DEFAULT_WINE_AUDIO_PERIOD_SIZE: u32 = 100_000;

pub const GAMEMODE_COMMAND: &str = "gamemoderun";

/// Added only when absent; these apply to every launched program.
const ENV_DEFAULTS: [(&str, &str); 1] = [("WINEDEBUG", "-all")];

/// Where a `wine` binary is looked for under a custom wine root.
const WINE_BIN_DIRS: [&str; 2] = ["usr/bin", "bin"];

/// Errors raised while preparing or starting a launch.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Unit '{0}' is skipped and cannot be launched")]
    UnitSkipped(String),

    #[error("Unit '{0}' has no resolved game directory or executable")]
    MissingTarget(String),

    #[error("W path is not a dir: '{0}'")]
    WineRootNotDir(Utf8PathBuf),

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything a launcher needs to start a unit, without starting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub env: BTreeMap<String, String>,
    pub working_dir: Utf8PathBuf,
    pub command: Vec<String>,
}

impl LaunchPlan {
    /// Derive the launch environment and command for a usable unit.
    ///
    /// # Errors
    ///
    /// - [`LaunchError::UnitSkipped`] for skipped units
    /// - [`LaunchError::WineRootNotDir`] if `W` does not name a directory
    pub fn build(unit: &Unit, snapshot: &EnvSnapshot) -> Result<Self, LaunchError> {
        if unit.is_skipped() {
            return Err(LaunchError::UnitSkipped(unit.basic_title().to_string()));
        }

        let (Some(working_dir), Some(exe_name)) = (unit.gamedir(), unit.exe_name()) else {
            return Err(LaunchError::MissingTarget(unit.basic_title().to_string()));
        };

        let mut env: BTreeMap<String, String> = snapshot
            .vars()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (key, value) in unit.variables().iter() {
            tracing::debug!("var: {}", key);
            env.insert(key.to_string(), value.to_string());
        }

        if let Some(wine_root) = unit.variables().get("W") {
            let wine_root = Utf8Path::new(wine_root);
            if !wine_root.is_dir() {
                tracing::error!("W path is not a dir: '{}'", wine_root);
                return Err(LaunchError::WineRootNotDir(wine_root.to_path_buf()));
            }

            if let Some(orig_path) = snapshot.get("PATH") {
                match find_wine(wine_root) {
                    Some(wine_bin) => {
                        let new_path = format!("{}:{}", wine_bin, orig_path);
                        tracing::debug!("new path: {}", new_path);
                        env.insert("PATH".to_string(), new_path);
                    }
                    None => tracing::warn!("No wine binary found under {}", wine_root),
                }
            }

            if !unit.variables().contains_key("STAGING_AUDIO_PERIOD") {
                tracing::debug!(
                    "custom wine versions get STAGING_AUDIO_PERIOD set to {}",
                    DEFAULT_WINE_AUDIO_PERIOD_SIZE
                );
                env.insert(
                    "STAGING_AUDIO_PERIOD".to_string(),
                    DEFAULT_WINE_AUDIO_PERIOD_SIZE.to_string(),
                );
            }
        }

        for (key, value) in ENV_DEFAULTS {
            env.entry(key.to_string()).or_insert_with(|| {
                tracing::debug!("adding {}={} to env", key, value);
                value.to_string()
            });
        }

        let mut command = vec!["wine".to_string(), exe_name.to_string()];
        if env.contains_key("GAMEMODE") {
            tracing::info!("Using gamemode");
            command.insert(0, GAMEMODE_COMMAND.to_string());
        }

        Ok(Self {
            env,
            working_dir: working_dir.to_path_buf(),
            command,
        })
    }
}

/// Directory under a wine root that holds the `wine` binary.
pub fn find_wine(wine_root: &Utf8Path) -> Option<Utf8PathBuf> {
    for dir in WINE_BIN_DIRS {
        let candidate = wine_root.join(dir);
        if candidate.join("wine").is_file() {
            tracing::debug!("found wine in {}", candidate);
            return Some(candidate);
        }
    }

    tracing::debug!("could not find wine");
    None
}

/// Start a rendered menu command through `sh -c` without waiting for it.
///
/// Must be called from within a tokio runtime.
pub fn spawn_detached(command: &str) -> Result<Option<u32>, LaunchError> {
    tracing::info!("Executing: {}", command);

    let child = Command::new("sh")
        .args(["-c", command])
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let pid = child.id();
    tracing::debug!("Spawned pid {:?}", pid);
    Ok(pid)
}
