//! End-to-end scenarios: editing, running and persisting through real files.

use nfakit::{
    Automaton, FormatErrorKind, PersistError, Position, RuleSet, SearchLimits, EPSILON,
};
use std::fs;
use tempfile::tempdir;

fn epsilon() -> RuleSet {
    RuleSet::from_text(&EPSILON.to_string())
}

#[test]
fn lone_start_with_epsilon_self_loop_rejects_empty_input() {
    let mut nfa = Automaton::new(Position::new(0, 0), false);
    let s = nfa.start();
    nfa.add_transition(s, s, epsilon()).unwrap();

    assert!(!nfa.run(""));
}

#[test]
fn symbol_then_epsilon_reaches_accepting_state() {
    let mut nfa = Automaton::new(Position::new(0, 0), false);
    let s = nfa.start();
    let a = nfa.add_state(Position::new(100, 0), false);
    let f = nfa.add_state(Position::new(200, 0), true);
    nfa.add_transition(s, a, RuleSet::from_text("a")).unwrap();
    nfa.add_transition(a, f, epsilon()).unwrap();

    assert!(nfa.run("a"));
}

#[test]
fn load_without_start_record_fails_and_keeps_live_graph() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.nfa");
    fs::write(&path, "state 0 0 true\n#\n").unwrap();

    let mut live = Automaton::new(Position::new(3, 3), false);
    live.add_state(Position::new(9, 9), false);
    let before = live.clone();

    let err = live.reload(&path).unwrap_err();
    assert!(matches!(
        err.format_kind(),
        Some(FormatErrorKind::UnexpectedKeyword { expected: "startstate", .. })
    ));
    assert_eq!(live, before);
    assert_eq!(live.state_count(), 2);
}

#[test]
fn three_states_two_transitions_survive_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("three.nfa");

    let mut nfa = Automaton::new(Position::new(0, 0), false);
    let s = nfa.start();
    let a = nfa.add_state(Position::new(50, 50), false);
    let f = nfa.add_state(Position::new(100, 0), true);
    nfa.add_transition(s, a, RuleSet::from_text("x")).unwrap();
    nfa.add_transition(a, f, RuleSet::from_text("y, z")).unwrap();
    nfa.save(&path).unwrap();

    let loaded = Automaton::load(&path).unwrap();
    assert_eq!(loaded.states().len(), 3);
    assert_eq!(loaded.transition_count(), 2);

    let pairs: Vec<_> = loaded
        .transitions()
        .iter()
        .map(|t| {
            (
                loaded.index_of(t.from()).unwrap(),
                loaded.index_of(t.to()).unwrap(),
            )
        })
        .collect();
    assert_eq!(pairs, vec![(0, 1), (1, 2)]);
    assert!(loaded.run("xz"));
    assert!(!loaded.run("x"));
}

#[test]
fn editor_session_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.nfa");

    let mut nfa = Automaton::new(Position::new(0, 0), false);
    let s = nfa.start();
    let a = nfa.add_state(Position::new(60, 0), false);
    let b = nfa.add_state(Position::new(120, 0), true);

    let forward = nfa.connect(s, a).unwrap();
    nfa.set_rules_from_text(forward, "0, 1").unwrap();
    let back = nfa.connect(a, s).unwrap();
    nfa.set_rules_from_text(back, "0").unwrap();
    let done = nfa.connect(a, b).unwrap();
    nfa.set_rules_from_text(done, &format!("1{EPSILON}")).unwrap();

    assert!(nfa.transition(forward).unwrap().is_tangent());
    assert!(nfa.transition(back).unwrap().is_tangent());

    nfa.save(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("startstate 0 0 false\n"));
    assert!(text.contains("transition 0 1 true 01\n"));
    assert!(text.contains(&format!("transition 1 2 false 1{EPSILON}\n")));

    let mut loaded = Automaton::load(&path).unwrap();
    for input in ["0", "00", "1", "0001", "01"] {
        assert_eq!(loaded.run(input), nfa.run(input), "input {input:?}");
    }

    // Deleting the middle state leaves the start state isolated.
    let middle = loaded.states()[1].id();
    loaded.remove_state(middle).unwrap();
    assert_eq!(loaded.transition_count(), 0);
    assert!(!loaded.run("0"));
}

#[test]
fn long_epsilon_chain_with_cycles_terminates() {
    let mut nfa = Automaton::new(Position::new(0, 0), false);
    let mut ids = vec![nfa.start()];
    for i in 1..200 {
        ids.push(nfa.add_state(Position::new(i, 0), false));
    }
    for pair in ids.windows(2) {
        nfa.add_transition(pair[0], pair[1], epsilon()).unwrap();
        nfa.add_transition(pair[1], pair[0], epsilon()).unwrap();
    }

    assert!(!nfa.run(""));
    assert_eq!(nfa.try_run("", &SearchLimits::unbounded()), Ok(false));
    assert!(nfa
        .try_run("", &SearchLimits::with_max_expansions(10))
        .is_err());

    let last = *ids.last().unwrap();
    nfa.set_accepting(last, true).unwrap();
    assert!(nfa.run(""));
}

#[test]
fn saving_to_unwritable_location_reports_io_error() {
    let dir = tempdir().unwrap();
    let nfa = Automaton::new(Position::new(0, 0), true);
    let result = nfa.save(dir.path().join("missing").join("out.nfa"));
    assert!(matches!(result, Err(PersistError::Io { .. })));
}
