//! Integration tests for the peg state engine driven by planner output and
//! by hand-built moves.

use hanoi_core::{
    Configuration, Engine, EngineError, Move, Peg, Roles, Transcript, TranscriptFormat,
    parse_transcript, plan, verify_sequence,
};

fn mv(from: Peg, to: Peg) -> Move {
    Move::new(from, to).unwrap()
}

#[test]
fn planned_replay_never_fails_and_ends_terminal() {
    for n in 1..=10 {
        let mut engine = Engine::with_disks(n, Roles::STANDARD);
        let moves = plan(n, Peg::A, Peg::B, Peg::C).unwrap();
        let total = moves.len() as u64;

        for (i, m) in moves.into_iter().enumerate() {
            let snap = engine
                .apply(m)
                .unwrap_or_else(|e| panic!("n={n}, move {}: {e}", i + 1));
            snap.configuration
                .check_invariants(n)
                .unwrap_or_else(|e| panic!("n={n}, move {}: {e}", i + 1));
            // Terminal exactly at the last move, never before.
            assert_eq!(engine.is_terminal(), snap.moves_applied == total);
        }

        assert!(engine.is_terminal(), "n={n} should end terminal");
        assert_eq!(engine.moves_applied(), total);
        assert_eq!(
            engine.configuration().sizes(Peg::C),
            (1..=n).rev().collect::<Vec<_>>()
        );
    }
}

#[test]
fn invariants_hold_for_every_role_assignment() {
    let roles = Roles::new(Peg::B, Peg::A, Peg::C).unwrap();
    for n in 0..=10 {
        let report = verify_sequence(
            n,
            roles,
            plan(n, roles.source(), roles.auxiliary(), roles.destination()).unwrap(),
        )
        .unwrap();
        assert!(report.optimal);
    }
}

#[test]
fn one_disk_scenario() {
    let moves = plan(1, Peg::A, Peg::B, Peg::C).unwrap();
    assert_eq!(moves, vec![mv(Peg::A, Peg::C)]);

    let mut engine = Engine::with_disks(1, Roles::STANDARD);
    let snap = engine.apply(moves[0]).unwrap();
    assert_eq!(snap.configuration, Configuration::from_sizes(&[], &[], &[1]));
    assert_eq!(snap.moves_applied, 1);
    assert!(engine.is_terminal());
}

#[test]
fn two_disk_scenario_intermediate_states() {
    let moves = plan(2, Peg::A, Peg::B, Peg::C).unwrap();
    assert_eq!(
        moves,
        vec![mv(Peg::A, Peg::B), mv(Peg::A, Peg::C), mv(Peg::B, Peg::C)]
    );

    let mut engine = Engine::with_disks(2, Roles::STANDARD);
    assert_eq!(
        engine.current().configuration,
        Configuration::from_sizes(&[2, 1], &[], &[])
    );

    let expected = [
        Configuration::from_sizes(&[2], &[1], &[]),
        Configuration::from_sizes(&[], &[1], &[2]),
        Configuration::from_sizes(&[], &[], &[2, 1]),
    ];
    for (m, want) in moves.into_iter().zip(expected) {
        assert_eq!(engine.apply(m).unwrap().configuration, want);
    }
    assert!(engine.is_terminal());
}

#[test]
fn zero_disks_plan_is_empty_and_terminal() {
    assert!(plan(0, Peg::A, Peg::B, Peg::C).unwrap().is_empty());
    let engine = Engine::with_disks(0, Roles::STANDARD);
    assert!(engine.is_terminal());
    assert_eq!(engine.current().configuration, Configuration::default());
}

#[test]
fn injected_move_from_empty_peg_keeps_prior_state() {
    let mut engine = Engine::with_disks(3, Roles::STANDARD);
    engine.apply(mv(Peg::A, Peg::C)).unwrap();
    let before = engine.current();

    let err = engine.apply(mv(Peg::B, Peg::A)).unwrap_err();
    assert!(matches!(err, EngineError::EmptySource { .. }));
    assert_eq!(engine.current(), before);
    assert_eq!(engine.moves_applied(), 1);

    // The engine keeps working after a rejected move.
    engine.apply(mv(Peg::A, Peg::B)).unwrap();
    assert_eq!(
        engine.configuration(),
        &Configuration::from_sizes(&[3], &[2], &[1])
    );
}

#[test]
fn injected_move_onto_smaller_disk_keeps_prior_state() {
    let mut engine = Engine::with_disks(3, Roles::STANDARD);
    engine.apply(mv(Peg::A, Peg::C)).unwrap();
    engine.apply(mv(Peg::A, Peg::B)).unwrap();
    let before = engine.current();

    let err = engine.apply(mv(Peg::A, Peg::B)).unwrap_err();
    assert!(matches!(err, EngineError::IllegalStackOrder { .. }));
    assert_eq!(engine.current(), before);
}

#[test]
fn external_transcript_is_checked_move_by_move() {
    let toml_str = r#"
moves = [["A", "C"], ["A", "C"]]

[puzzle]
disks = 2
"#;
    let transcript = parse_transcript(toml_str, TranscriptFormat::Toml).unwrap();
    let mut engine = Engine::with_disks(transcript.puzzle.disks, transcript.roles().unwrap());

    engine.apply(transcript.moves[0]).unwrap();
    let err = engine.apply(transcript.moves[1]).unwrap_err();
    assert_eq!(err.rejected_move(), mv(Peg::A, Peg::C));
    assert_eq!(
        err.configuration(),
        &Configuration::from_sizes(&[2], &[], &[1])
    );
}

#[test]
fn transcript_file_round_trip_replays_cleanly() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("solution.toml");

    let transcript = Transcript::from_plan(4, Roles::STANDARD).unwrap();
    std::fs::write(&path, transcript.to_toml_string().unwrap()).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let loaded = parse_transcript(&content, TranscriptFormat::from_path(&path)).unwrap();
    let report = verify_sequence(
        loaded.puzzle.disks,
        loaded.roles().unwrap(),
        loaded.moves.iter().copied(),
    )
    .unwrap();
    assert_eq!(report.moves_applied, 15);
}
