//! Integration tests for the variable expansion engine
//!
//! These tests verify:
//! - Acyclic reference graphs settle, and re-expansion is a no-op
//! - Cycles fail with ExpansionOverrun instead of hanging
//! - Forward references resolve within the sweep cap
//! - Home directory and process environment substitution

use proptest::prelude::*;
use wrapwine_scan::UnitError;
use wrapwine_scan::env::{EnvSnapshot, MAX_EXPANSION_SWEEPS, VariableSet, expand};

fn env() -> EnvSnapshot {
    EnvSnapshot::from_pairs([
        ("HOME", "/home/player"),
        ("USER", "player"),
        ("XDG_DATA_HOME", "/home/player/.local/share"),
    ])
}

fn parse(lines: &[String]) -> VariableSet {
    VariableSet::parse(lines.iter().map(String::as_str)).unwrap()
}

/// Lines `K0..Kn`, each optionally referencing an earlier key.
fn acyclic_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (any::<prop::sample::Index>(), any::<bool>(), any::<bool>(), "[a-z]{0,6}", any::<bool>()),
        1..8,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (target, has_ref, braced, literal, home))| {
                let mut value = String::new();
                if home {
                    value.push_str("~/");
                }
                if has_ref && i > 0 {
                    let j = target.index(i);
                    if braced {
                        value.push_str(&format!("${{K{}}}/", j));
                    } else {
                        value.push_str(&format!("$K{}/", j));
                    }
                }
                value.push_str(&literal);
                format!("K{}={}", i, value)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn expansion_is_idempotent(lines in acyclic_lines()) {
        let mut set = parse(&lines);
        expand(&mut set, &env()).unwrap();
        let once = set.clone();

        let report = expand(&mut set, &env()).unwrap();
        prop_assert_eq!(&set, &once);
        prop_assert_eq!(report.sweeps, 0);
    }

    #[test]
    fn acyclic_sets_leave_no_references(lines in acyclic_lines()) {
        let mut set = parse(&lines);
        expand(&mut set, &env()).unwrap();

        for (key, value) in set.iter() {
            prop_assert!(!value.contains('$'), "{} still has a reference: {}", key, value);
        }
    }
}

#[test]
fn test_two_cycle_overruns() {
    let mut set = parse(&["A=$B".to_string(), "B=$A".to_string()]);
    let err = expand(&mut set, &env()).unwrap_err();
    assert!(matches!(err, UnitError::ExpansionOverrun(n) if n == MAX_EXPANSION_SWEEPS));
}

#[test]
fn test_three_cycle_overruns() {
    let lines = ["A=${B}/a", "B=${C}/b", "C=${A}/c"].map(String::from);
    let err = expand(&mut parse(&lines), &env()).unwrap_err();
    assert!(matches!(err, UnitError::ExpansionOverrun(_)));
}

#[test]
fn test_self_reference_overruns() {
    let lines = ["A=${A}x".to_string()];
    let err = expand(&mut parse(&lines), &env()).unwrap_err();
    assert!(matches!(err, UnitError::ExpansionOverrun(_)));
}

#[test]
fn test_long_forward_chain_resolves() {
    let mut lines: Vec<String> = (0..12).map(|i| format!("K{}=${{K{}}}", i, i + 1)).collect();
    lines.push("K12=/end".to_string());

    let mut set = parse(&lines);
    let report = expand(&mut set, &env()).unwrap();

    assert!(report.sweeps <= MAX_EXPANSION_SWEEPS);
    for (_, value) in set.iter() {
        assert_eq!(value, "/end");
    }
}

#[test]
fn test_home_and_process_environment() {
    let lines = [
        "WINEPREFIX=${XDG_DATA_HOME}/wineprefixes/gog",
        "SAVES=~/saves",
        "OTHER=~someone/saves",
        "GAMEDIR=${WINEPREFIX}/drive_c/Game",
    ]
    .map(String::from);

    let mut set = parse(&lines);
    let report = expand(&mut set, &env()).unwrap();

    assert_eq!(
        set.get("WINEPREFIX"),
        Some("/home/player/.local/share/wineprefixes/gog")
    );
    assert_eq!(set.get("SAVES"), Some("/home/player/saves"));
    assert_eq!(set.get("OTHER"), Some("~someone/saves"));
    assert_eq!(
        set.get("GAMEDIR"),
        Some("/home/player/.local/share/wineprefixes/gog/drive_c/Game")
    );
    assert!(report.legacy_references.is_empty());
}

#[test]
fn test_legacy_references_are_advisory() {
    let lines = ["ROOT=/games", "PFX=$ROOT/pfx", "DIR=$PFX/drive_c"].map(String::from);

    let mut set = parse(&lines);
    let report = expand(&mut set, &env()).unwrap();

    assert_eq!(set.get("DIR"), Some("/games/pfx/drive_c"));
    assert_eq!(report.legacy_references, vec!["PFX", "DIR"]);
}

#[test]
fn test_unknown_reference_is_fatal() {
    let lines = ["GAMEDIR=${UNDEFINED_SOMEWHERE}/Game".to_string()];
    let err = expand(&mut parse(&lines), &env()).unwrap_err();
    assert!(matches!(err, UnitError::ExpansionOverrun(_)));
}
