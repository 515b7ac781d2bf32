//! Tests for round phase machine.

use super::*;

fn alive(health: u32) -> SideStatus {
    SideStatus { health, alive: true }
}

fn ko() -> SideStatus {
    SideStatus { health: 0, alive: false }
}

fn config() -> MatchConfig {
    MatchConfig {
        rounds_to_win: 2,
        max_rounds: 5,
        round_time_ms: 10_000,
        intro_ms: 1_000,
        round_end_ms: 500,
        ai_decision_interval_ms: 250,
    }
}

/// Intro → Active at `intro_ms`
fn started(config: &MatchConfig) -> RoundState {
    let mut state = RoundState::new(config, 0);
    let events = state.advance(config.intro_ms, [alive(100), alive(100)], config);
    assert_eq!(events, vec![RoundEvent::RoundStarted { round: 1 }]);
    state
}

#[test]
fn test_intro_waits_for_countdown() {
    let config = config();
    let mut state = RoundState::new(&config, 0);
    assert!(state.advance(999, [alive(100), alive(100)], &config).is_empty());
    assert!(!state.is_active());

    state.advance(1_000, [alive(100), alive(100)], &config);
    assert!(state.is_active());
    assert_eq!(state.started_at, 1_000);
}

#[test]
fn test_knockout_ends_round() {
    let config = config();
    let mut state = started(&config);

    let events = state.advance(3_000, [alive(40), ko()], &config);
    let expected = RoundOutcome {
        winner: Some(PlayerSlot::P1),
        reason: RoundEndReason::Knockout,
    };
    assert_eq!(events, vec![RoundEvent::RoundEnded { round: 1, outcome: expected }]);
    assert_eq!(state.wins, [1, 0]);
}

#[test]
fn test_timeout_with_equal_health_is_draw() {
    let config = config();
    let mut state = started(&config);

    assert!(state.advance(10_999, [alive(40), alive(40)], &config).is_empty());
    let events = state.advance(11_000, [alive(40), alive(40)], &config);

    assert_eq!(
        events,
        vec![RoundEvent::RoundEnded {
            round: 1,
            outcome: RoundOutcome {
                winner: None,
                reason: RoundEndReason::Timeout
            }
        }]
    );
    assert_eq!(state.wins, [0, 0]);
    assert_eq!(state.remaining_ms(), 0);
}

#[test]
fn test_timeout_higher_health_wins() {
    let config = config();
    let mut state = started(&config);
    state.advance(11_000, [alive(30), alive(55)], &config);
    assert_eq!(state.wins, [0, 1]);
}

#[test]
fn test_double_knockout_is_draw() {
    let config = config();
    let mut state = started(&config);
    let events = state.advance(2_000, [ko(), ko()], &config);
    assert!(matches!(
        events[0],
        RoundEvent::RoundEnded {
            outcome: RoundOutcome {
                winner: None,
                reason: RoundEndReason::DoubleKnockout
            },
            ..
        }
    ));
    assert_eq!(state.wins, [0, 0]);
}

#[test]
fn test_next_round_then_match_end() {
    let config = config();
    let mut state = started(&config);

    // Round 1: P2 KO
    state.advance(2_000, [alive(10), ko()], &config);
    let events = state.advance(2_500, [alive(10), ko()], &config);
    assert_eq!(events, vec![RoundEvent::NextRound { round: 2 }]);
    assert!(matches!(state.phase, RoundPhase::Intro { until: 3_500 }));

    // Round 2: P2 KO again → match over after round-end pause
    state.advance(3_500, [alive(100), alive(100)], &config);
    state.advance(4_000, [alive(80), ko()], &config);
    let events = state.advance(4_500, [alive(80), ko()], &config);
    assert_eq!(
        events,
        vec![RoundEvent::MatchEnded {
            winner: Some(PlayerSlot::P1),
            wins: [2, 0]
        }]
    );
    assert!(state.is_match_over());

    // MatchEnd terminal
    assert!(state.advance(99_000, [alive(100), alive(100)], &config).is_empty());
}

#[test]
fn test_max_rounds_caps_a_run_of_draws() {
    let config = MatchConfig {
        max_rounds: 3,
        ..config()
    };
    let mut state = RoundState::new(&config, 0);
    let mut now = 0;
    let mut match_end = None;

    for _ in 0..50 {
        now += 500;
        let sides = if state.is_active() { [ko(), ko()] } else { [alive(100), alive(100)] };
        for event in state.advance(now, sides, &config) {
            if let RoundEvent::MatchEnded { winner, .. } = event {
                match_end = Some(winner);
            }
        }
        if state.is_match_over() {
            break;
        }
    }

    assert_eq!(match_end, Some(None));
    assert_eq!(state.round, 3);
}

#[test]
fn test_pause_and_resume() {
    let config = config();
    let mut state = started(&config);
    state.pause();
    assert!(state.is_paused());
    state.resume();
    assert!(!state.is_paused());
}
