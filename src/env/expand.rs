//! Fixed-point expansion of a unit's variables.
//!
//! Every sweep visits the variables in file order. A variable whose value
//! still holds a reference token gets its home/process substitutions
//! re-applied and then has its *first* reference token rewritten from the same
//! set. Multi-level and forward references settle over several sweeps; cycles
//! and references to names that never exist run into the sweep cap.

use crate::env::{EnvSnapshot, VariableSet};
use crate::error::UnitError;
use regex::Regex;
use std::sync::LazyLock;

/// Sweeps allowed before expansion is declared runaway.
pub const MAX_EXPANSION_SWEEPS: usize = 10;

static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)\}|\$(\w+)").expect("Invalid reference regex"));

/// Outcome of a successful expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Number of full sweeps needed to reach the fixed point
    pub sweeps: usize,

    /// Variables that used the bare `$NAME` form at least once
    pub legacy_references: Vec<String>,
}

impl ExpansionReport {
    fn note_legacy(&mut self, key: &str) {
        if !self.legacy_references.iter().any(|k| k == key) {
            self.legacy_references.push(key.to_string());
        }
    }
}

/// A `${NAME}` or `$NAME` occurrence inside a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceToken {
    /// The matched text, e.g. `${WINEPREFIX}`
    pub full: String,
    pub name: String,
    /// True for the bare `$NAME` form
    pub legacy: bool,
}

/// First reference token in `value`, if any.
pub fn first_reference(value: &str) -> Option<ReferenceToken> {
    let caps = REFERENCE_REGEX.captures(value)?;
    let (name, legacy) = match (caps.get(1), caps.get(2)) {
        (Some(braced), _) => (braced.as_str(), false),
        (None, Some(bare)) => (bare.as_str(), true),
        (None, None) => return None,
    };

    Some(ReferenceToken {
        full: caps[0].to_string(),
        name: name.to_string(),
        legacy,
    })
}

/// Whether a value still contains a reference token.
pub fn needs_expansion(value: &str) -> bool {
    REFERENCE_REGEX.is_match(value)
}

/// Run one expansion step on a single variable.
///
/// # Errors
///
/// [`UnitError::MissingValue`] if `key` is absent or its value is empty.
pub fn expand_variable(
    set: &mut VariableSet,
    key: &str,
    env: &EnvSnapshot,
    report: &mut ExpansionReport,
) -> Result<(), UnitError> {
    let mut value = match set.get(key) {
        Some(value) if !value.is_empty() => env.substitute(value),
        _ => return Err(UnitError::MissingValue(key.to_string())),
    };

    if let Some(token) = first_reference(&value) {
        if token.legacy {
            tracing::warn!(
                "'{}' uses '{}': avoid '$VAR' references, use '${{{}}}' instead",
                key,
                token.full,
                token.name
            );
            report.note_legacy(key);
        }

        match set.get(&token.name) {
            Some(replacement) => {
                value = value.replace(&token.full, replacement);
                tracing::debug!("Replaced {} in '{}': '{}'", token.full, key, value);
            }
            None => {
                tracing::debug!("'{}' needs more expansion: {}", key, token.full);
            }
        }
    }

    set.insert(key.to_string(), value);
    Ok(())
}

/// Expand the whole set in place until no reference tokens remain.
///
/// # Errors
///
/// - [`UnitError::ExpansionOverrun`] if the set has not settled after
///   [`MAX_EXPANSION_SWEEPS`] sweeps
/// - [`UnitError::MissingValue`] propagated from [`expand_variable`]
pub fn expand(set: &mut VariableSet, env: &EnvSnapshot) -> Result<ExpansionReport, UnitError> {
    let mut report = ExpansionReport::default();

    for value in set.values_mut() {
        *value = env.substitute(value);
    }

    while set.iter().any(|(_, value)| needs_expansion(value)) {
        if report.sweeps >= MAX_EXPANSION_SWEEPS {
            tracing::error!("Expansion did not settle after {} sweeps", report.sweeps);
            return Err(UnitError::ExpansionOverrun(MAX_EXPANSION_SWEEPS));
        }
        report.sweeps += 1;

        let keys: Vec<String> = set.keys().map(str::to_string).collect();
        for key in keys {
            if set.get(&key).is_some_and(needs_expansion) {
                expand_variable(set, &key, env, &mut report)?;
            }
        }
    }

    tracing::debug!(
        "Expanded {} variables in {} sweeps",
        set.len(),
        report.sweeps
    );

    Ok(report)
}
