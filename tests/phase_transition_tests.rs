//! Phase state machine integration tests.
//!
//! These tests drive the standard catalog through full cycles and verify
//! the turn boundary, the runoff short-circuit, and the terminal wildcard
//! rule.

use werewolf_gm::{
    phase_ids, NullSink, Phase, PhaseId, PhaseManager, RecordingSink, Regulation, SourcePhase,
    Team, TransitionCondition, TransitionRule, NEEDS_RUNOFF,
};

fn advance_to(mgr: &mut PhaseManager, target: &str) {
    mgr.move_to_phase(&PhaseId::from(target), &mut NullSink)
        .unwrap();
}

/// One full standard cycle, following the table.
#[test]
fn test_standard_cycle_follows_table() {
    let mut mgr = PhaseManager::standard(16);
    let reg = Regulation::default();

    let mut visited = vec![mgr.current_phase_id().as_str().to_string()];
    for _ in 0..4 {
        let next = mgr.next_phase(None, &reg).unwrap();
        mgr.move_to_phase(&next, &mut NullSink).unwrap();
        visited.push(mgr.current_phase_id().as_str().to_string());
    }

    assert_eq!(visited, vec!["night", "day", "vote", "execution", "night"]);
}

/// The turn advances exactly on the night->day edge.
#[test]
fn test_turn_boundary_is_night_to_day_only() {
    let mut mgr = PhaseManager::standard(16);
    assert_eq!(mgr.current_turn(), 1);

    advance_to(&mut mgr, phase_ids::DAY);
    assert_eq!(mgr.current_turn(), 2);

    // Every other edge leaves the counter alone, including moving into
    // night from execution.
    advance_to(&mut mgr, phase_ids::VOTE);
    advance_to(&mut mgr, phase_ids::EXECUTION);
    advance_to(&mut mgr, phase_ids::NIGHT);
    assert_eq!(mgr.current_turn(), 2);

    // Day reached from anywhere but night does not advance it either.
    advance_to(&mut mgr, phase_ids::VOTE);
    advance_to(&mut mgr, phase_ids::DAY);
    assert_eq!(mgr.current_turn(), 2);
}

/// A vote context flagged for runoff routes to the runoff phase even when
/// a win condition would otherwise preempt everything.
#[test]
fn test_runoff_flag_overrides_table() {
    let mut mgr = PhaseManager::standard(16);
    advance_to(&mut mgr, phase_ids::DAY);
    advance_to(&mut mgr, phase_ids::VOTE);

    let reg = Regulation::default();
    assert_eq!(
        mgr.next_phase(None, &reg).unwrap().as_str(),
        phase_ids::EXECUTION
    );

    mgr.set_context_flag(NEEDS_RUNOFF, true);
    assert_eq!(
        mgr.next_phase(None, &reg).unwrap().as_str(),
        phase_ids::RUNOFF_VOTE
    );
    assert_eq!(
        mgr.next_phase(Some(Team::Village), &reg).unwrap().as_str(),
        phase_ids::RUNOFF_VOTE
    );

    // The flag lives in the vote context only; after moving, the runoff
    // phase follows its own rule to execution.
    advance_to(&mut mgr, phase_ids::RUNOFF_VOTE);
    assert_eq!(
        mgr.next_phase(None, &reg).unwrap().as_str(),
        phase_ids::EXECUTION
    );
}

/// The terminal wildcard fires from any phase once a win condition holds.
#[test]
fn test_win_condition_preempts_from_any_phase() {
    let reg = Regulation::default();

    for stop_at in ["night", "day", "vote", "execution"] {
        let mut mgr = PhaseManager::standard(16);
        if stop_at != "night" {
            advance_to(&mut mgr, phase_ids::DAY);
        }
        if stop_at == "vote" || stop_at == "execution" {
            advance_to(&mut mgr, phase_ids::VOTE);
        }
        if stop_at == "execution" {
            advance_to(&mut mgr, phase_ids::EXECUTION);
        }
        assert_eq!(mgr.current_phase_id().as_str(), stop_at);

        let next = mgr.next_phase(Some(Team::Werewolf), &reg).unwrap();
        assert_eq!(next.as_str(), phase_ids::EPILOGUE, "from {stop_at}");
    }
}

/// Phase events come out in end / turn / start order with the right names.
#[test]
fn test_phase_event_stream() {
    let mut mgr = PhaseManager::standard(16);
    let mut sink = RecordingSink::new();

    mgr.move_to_phase(&PhaseId::from(phase_ids::DAY), &mut sink)
        .unwrap();
    mgr.move_to_phase(&PhaseId::from(phase_ids::VOTE), &mut sink)
        .unwrap();

    assert_eq!(
        sink.names(),
        vec![
            "phase.end.night",
            "turn.start",
            "phase.start.day",
            "phase.end.day",
            "phase.start.vote",
        ]
    );
}

/// Runtime-registered phases and rules participate like built-ins, with
/// priority deciding between competing rules.
#[test]
fn test_runtime_registered_rules_compete_on_priority() {
    let mut mgr = PhaseManager::standard(16);
    mgr.register_phase(Phase::new("twilight", "Twilight")).unwrap();

    // Same source as the built-in night->day rule, higher priority.
    mgr.register_transition(
        TransitionRule::new(phase_ids::NIGHT, "twilight").with_priority(5),
    )
    .unwrap();

    let reg = Regulation::default();
    assert_eq!(mgr.next_phase(None, &reg).unwrap().as_str(), "twilight");

    // A disabled rule never fires, whatever its priority.
    mgr.register_transition(
        TransitionRule::new(phase_ids::NIGHT, "twilight")
            .with_condition(TransitionCondition::Never)
            .with_priority(100),
    )
    .unwrap();
    assert_eq!(mgr.next_phase(None, &reg).unwrap().as_str(), "twilight");
}

/// Wildcard-source rules apply from every phase.
#[test]
fn test_wildcard_rule_applies_everywhere() {
    let mut mgr = PhaseManager::standard(16);
    mgr.register_phase(Phase::new("intermission", "Intermission"))
        .unwrap();
    mgr.register_transition(
        TransitionRule::new(SourcePhase::Any, "intermission")
            .with_condition(TransitionCondition::ContextFlag("paused".to_string()))
            .with_priority(1000),
    )
    .unwrap();

    let reg = Regulation::default();
    advance_to(&mut mgr, phase_ids::DAY);
    assert_eq!(mgr.next_phase(None, &reg).unwrap().as_str(), phase_ids::VOTE);

    mgr.set_context_flag("paused", true);
    assert_eq!(mgr.next_phase(None, &reg).unwrap().as_str(), "intermission");
}
