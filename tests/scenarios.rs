use std::{io::Write, path::PathBuf};

use automata_check::{
    parse::{load, FormatError},
    prelude::*,
};

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test_log::test]
fn deterministic_parity() {
    let mut session = Session::load(data("odd_ones.dfa")).unwrap();
    assert!(session.warnings().is_empty());
    assert!(!session.automaton().is_nondeterministic());

    assert!(session.test("1"));
    assert_eq!(session.last_path().len(), 1);
    assert!(!session.test("11"));
    // two ones bring the automaton back to q0
    assert!(!session.test("101"));
    assert_eq!(
        session.last_path(),
        vec![
            "1: start state q0 input 1 moves to state q1",
            "2: state q1 input 0 moves to state q1",
            "3: state q1 input 1 moves to state q0",
            "4: state q0 input 1 moves to state none and is rejected",
        ]
    );
    assert!(session.test("1011"));
}

#[test_log::test]
fn nondeterministic_parity() {
    let Loaded {
        automaton,
        warnings,
    } = load(data("odd_ones.nfa")).unwrap();
    assert!(automaton.is_nondeterministic());
    assert!(matches!(
        warnings.as_slice(),
        [LoadWarning::Nondeterministic { line: 10, .. }]
    ));
    assert_eq!(
        automaton.description(),
        Some("guesses that a zero already counts")
    );

    let mut engine = Engine::default();
    assert!(engine.test(&automaton, "0"));
    let path = engine.last_path().unwrap();
    assert_eq!(path.len(), 1);
    assert_eq!(
        path.render(&automaton),
        vec!["1: start state q0 input 0 moves to state q1 and is accepted"]
    );
}

#[test_log::test]
fn pushdown_balance() {
    let mut session = Session::load(data("anbn.pda")).unwrap();
    assert!(session.automaton().is_pushdown());
    assert_eq!(
        session.automaton().description(),
        Some("a^n b^n for n at least one")
    );
    assert!(session.test("aabb"));
    assert!(!session.test("aab"));
    assert!(session.test("ab"));
    assert_eq!(session.last_path().len(), 3);
    assert!(!session.test("ba"));
    assert_eq!(
        session.last_path(),
        vec!["1: start state p input b moves to state none and is rejected"]
    );
}

#[test_log::test]
fn summary_lists_chained_keys_once() {
    let session = Session::load(data("odd_ones.nfa")).unwrap();
    let summary = session.describe();
    assert_eq!(summary.kind(), "NFA");
    assert_eq!(summary.transitions.len(), 4);
    let chained = summary
        .transitions
        .iter()
        .find(|t| t.key() == "(q0,0)")
        .unwrap();
    assert_eq!(chained.targets(false), "{q0,q1}");
    assert_eq!(summary, session.describe());
    assert!(summary.to_string().contains("accepting: (q1)"));
}

#[test_log::test]
fn missing_description_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = Session::load(dir.path().join("missing.dfa")).unwrap_err();
    assert!(matches!(err, LoadError::Unreadable { .. }));
    assert!(err.to_string().contains("missing.dfa"));
}

#[test_log::test]
fn malformed_layout_fails_closed() {
    let err = Session::load(data("skewed.dfa")).unwrap_err();
    match err {
        LoadError::Format { source, .. } => assert_eq!(
            source,
            FormatError::Layout {
                line: 4,
                position: 4
            }
        ),
        other => panic!("unexpected error {other}"),
    }
}

#[test_log::test]
fn malformed_layout_falls_back() {
    let options = LoadOptions::default().with_fallback(data("odd_ones.dfa"));
    let mut session = Session::load_with(data("skewed.dfa"), &options).unwrap();
    assert!(matches!(
        session.warnings().first(),
        Some(LoadWarning::FellBack { .. })
    ));
    assert!(session.test("1"));

    let broken = tempfile::NamedTempFile::new().unwrap();
    let options = LoadOptions::default().with_fallback(broken.path());
    assert!(matches!(
        Session::load_with(data("skewed.dfa"), &options),
        Err(LoadError::Format { .. })
    ));
}

#[test_log::test]
fn skipped_lines_keep_the_rest() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "(a)\n(q0,q1)\nq0\n(q1)\n(q0,a)q1\n(q0,a)->q2\n(q0,a)->q1\n(q1,):(,A)->q0"
    )
    .unwrap();
    let mut session = Session::load(file.path()).unwrap();
    let lines = session
        .warnings()
        .iter()
        .map(|w| match w {
            LoadWarning::MalformedTransition { line, .. } | LoadWarning::Transition { line, .. } => {
                *line
            }
            other => panic!("unexpected warning {other}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(lines, vec![5, 6, 8]);
    assert!(session.test("a"));
    assert!(!session.test("aa"));
}
