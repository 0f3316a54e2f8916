use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

// Same shape as POSIX `expandvars`: `$name` or `${anything}`.
static PROCESS_VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:([A-Za-z0-9_]+)|\{([^}]*)\})").expect("Invalid process variable regex")
});

/// Read-only copy of the invoking process's environment.
///
/// Taken once and passed into expansion so that units never observe a live,
/// mutable environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
    fallback_home: Option<String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    ///
    /// Entries that are not valid UTF-8 are dropped.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();

        let fallback_home = directories::UserDirs::new()
            .and_then(|dirs| dirs.home_dir().to_str().map(str::to_string));

        Self {
            vars,
            fallback_home,
        }
    }

    /// Build a snapshot from explicit pairs, with no platform home fallback.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            fallback_home: None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn vars(&self) -> &HashMap<String, String> {
        &self.vars
    }

    /// `HOME` from the snapshot, else the platform's idea of the home directory.
    pub fn home(&self) -> Option<&str> {
        self.get("HOME").or(self.fallback_home.as_deref())
    }

    /// Home directory expansion plus process environment references.
    pub fn substitute(&self, value: &str) -> String {
        self.expand_vars(&self.expand_user(value))
    }

    /// Expand a leading `~` or `~user`.
    ///
    /// `~user` is only resolved for the snapshot's own `USER`; other users are
    /// left untouched, as is a `~` when no home directory is known.
    pub fn expand_user(&self, value: &str) -> String {
        let Some(rest) = value.strip_prefix('~') else {
            return value.to_string();
        };

        let split = rest.find('/').unwrap_or(rest.len());
        let (user, tail) = rest.split_at(split);

        let home = if user.is_empty() || self.get("USER") == Some(user) {
            self.home()
        } else {
            None
        };

        match home {
            Some(home) => {
                let expanded = format!("{}{}", home.trim_end_matches('/'), tail);
                if expanded.is_empty() {
                    "/".to_string()
                } else {
                    expanded
                }
            }
            None => value.to_string(),
        }
    }

    /// Replace `$NAME` / `${NAME}` with values from this snapshot.
    ///
    /// Unknown names are kept verbatim and substituted text is not rescanned.
    pub fn expand_vars(&self, value: &str) -> String {
        if !value.contains('$') {
            return value.to_string();
        }

        PROCESS_VAR_REGEX
            .replace_all(value, |caps: &Captures| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map_or("", |m| m.as_str());
                match self.get(name) {
                    Some(replacement) => replacement.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
