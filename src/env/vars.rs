use indexmap::IndexMap;
use serde::Serialize;

/// Ordered `KEY -> VALUE` mapping parsed from a single unit file.
///
/// Insertion order is kept so expansion sweeps are deterministic. Keys are
/// unique; the parser rejects duplicates instead of overwriting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariableSet {
    vars: IndexMap<String, String>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse unit file lines into a raw set. See [`crate::env::parse_lines`].
    pub fn parse<'a, I>(lines: I) -> Result<Self, crate::error::UnitError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        crate::env::parse_lines(lines)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Serialise back to `KEY=VALUE` lines (no quoting, no `export`).
    pub fn to_lines(&self) -> Vec<String> {
        self.vars.iter().map(|(k, v)| format!("{}={}", k, v)).collect()
    }

    /// Insert or replace a value, keeping the original position of the key.
    pub(crate) fn insert(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.vars.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut set = VariableSet::new();
        set.insert("A".to_string(), "1".to_string());
        set.insert("B".to_string(), "2".to_string());
        set.insert("A".to_string(), "3".to_string());

        assert_eq!(set.to_lines(), vec!["A=3", "B=2"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_lookup() {
        let set = VariableSet::parse(["TITLE=Game", "IGNORE="]).unwrap();
        assert_eq!(set.get("TITLE"), Some("Game"));
        assert_eq!(set.get("IGNORE"), Some(""));
        assert!(set.contains_key("IGNORE"));
        assert!(!set.contains_key("title"));
        assert!(!set.is_empty());
    }
}
