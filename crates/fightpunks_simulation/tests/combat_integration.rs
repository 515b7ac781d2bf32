//! Combat integration test
//!
//! Полный headless App со всеми plugins:
//! - scripted KO матч (2 раунда, P1 выигрывает)
//! - AI vs AI матч доходит до конца, Health инварианты держатся
//! - pause замораживает часы и бойцов
//! - input вне Active фазы игнорируется

use bevy::prelude::*;
use fightpunks_simulation::*;

/// Записанные события (читаются после всего pipeline)
#[derive(Resource, Default)]
struct Recorded {
    combat: Vec<CombatEvent>,
    rounds: Vec<RoundEvent>,
    sounds: Vec<SoundEvent>,
}

fn record_events(
    mut recorded: ResMut<Recorded>,
    mut combat: EventReader<CombatEvent>,
    mut rounds: EventReader<RoundEvent>,
    mut sounds: EventReader<SoundEvent>,
) {
    recorded.combat.extend(combat.read().cloned());
    recorded.rounds.extend(rounds.read().cloned());
    recorded.sounds.extend(sounds.read().copied());
}

fn fast_config() -> MatchConfig {
    MatchConfig {
        rounds_to_win: 2,
        max_rounds: 5,
        round_time_ms: 20_000,
        intro_ms: 100,
        round_end_ms: 100,
        ai_decision_interval_ms: 100,
    }
}

/// Helper: создать полный combat App с всеми plugins
fn create_combat_app(seed: u64, stage: StageBounds) -> App {
    create_combat_app_with(seed, stage, fast_config())
}

fn create_combat_app_with(seed: u64, stage: StageBounds, config: MatchConfig) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(config).insert_resource(stage);
    app.add_plugins(SimulationPlugin);

    app.init_resource::<Recorded>();
    app.add_systems(FixedUpdate, record_events.after(SimulationSet::Rounds));
    app
}

fn close_stage() -> StageBounds {
    StageBounds {
        spawn_x: [500.0, 600.0],
        ..StageBounds::default()
    }
}

fn send(app: &mut App, slot: PlayerSlot, action: CommandAction) {
    app.world_mut().send_event(FighterCommand::new(slot, action));
}

fn run_until_active(app: &mut App) {
    for _ in 0..120 {
        app.update();
        if app.world().resource::<RoundState>().is_active() {
            return;
        }
    }
    panic!("round never became active");
}

/// Test: P1 бьёт heavy атаками неподвижного Dummy до победы в матче
#[test]
fn test_scripted_knockouts_win_match() {
    let mut app = create_combat_app(42, close_stage());
    spawn_fighter(app.world_mut(), "Kevin", PlayerSlot::P1, Controller::Human).unwrap();
    spawn_fighter(app.world_mut(), "Dummy", PlayerSlot::P2, Controller::Human).unwrap();

    for _ in 0..3_000 {
        send(&mut app, PlayerSlot::P1, CommandAction::Attack(AttackSlot::Two));
        app.update();
        if app.world().resource::<RoundState>().is_match_over() {
            break;
        }
    }

    let state = app.world().resource::<RoundState>();
    assert_eq!(state.phase, RoundPhase::MatchEnd { winner: Some(PlayerSlot::P1) });
    assert_eq!(state.wins, [2, 0]);

    let recorded = app.world().resource::<Recorded>();
    let defeats = recorded
        .combat
        .iter()
        .filter(|e| matches!(e, CombatEvent::Defeated { fighter: FighterId(2), .. }))
        .count();
    assert_eq!(defeats, 2, "ровно один Defeated на раунд");

    // Kevin 12 × 1.5 = 18 raw, Dummy defense 5 → 13 за первый удар серии,
    // дальше combo scaling только добавляет
    let hits: Vec<(u32, u32)> = recorded
        .combat
        .iter()
        .filter_map(|e| match e {
            CombatEvent::Hit { damage, combo, .. } => Some((*damage, *combo)),
            _ => None,
        })
        .collect();
    assert!(!hits.is_empty());
    for (damage, combo) in &hits {
        if *combo == 1 {
            assert_eq!(*damage, 13);
        } else {
            assert!(*damage > 13, "combo {} hit dealt {}", combo, damage);
        }
    }

    assert!(recorded.rounds.contains(&RoundEvent::NextRound { round: 2 }));
    assert!(matches!(recorded.rounds.last(), Some(RoundEvent::MatchEnded { winner: Some(PlayerSlot::P1), .. })));
    assert!(recorded.sounds.iter().any(|s| s.cue == SoundCue::Attack2));
    assert!(recorded.sounds.iter().any(|s| s.cue == SoundCue::Hit));
    assert!(recorded.sounds.iter().any(|s| s.cue == SoundCue::Death));

    let stats = app.world().resource::<MatchStats>();
    assert_eq!(stats.matches_played, 1);
    assert_eq!(stats.match_wins, [1, 0]);
    assert_eq!(stats.rounds_played, 2);
    assert!(stats.damage_dealt[0] >= 200);
    assert_eq!(stats.damage_dealt[1], 0);
}

/// Test: AI vs AI матч заканчивается (таймауты гарантируют), Health в пределах
#[test]
fn test_ai_match_runs_to_completion() {
    let mut app = create_combat_app(42, StageBounds::default());
    spawn_fighter(app.world_mut(), "Kevin", PlayerSlot::P1, Controller::Ai).unwrap();
    spawn_fighter(app.world_mut(), "Fire Girl", PlayerSlot::P2, Controller::Ai).unwrap();

    let mut finished = false;
    for _ in 0..8_000 {
        app.update();

        let mut query = app.world_mut().query::<&Fighter>();
        for fighter in query.iter(app.world()) {
            assert!(fighter.health.current <= fighter.health.max);
            if fighter.health.current == 0 {
                assert_eq!(fighter.action(), ActionState::Dead);
            }
        }

        if app.world().resource::<RoundState>().is_match_over() {
            finished = true;
            break;
        }
    }

    assert!(finished, "match should end within the round time limits");
    let stats = app.world().resource::<MatchStats>();
    assert_eq!(stats.matches_played, 1);
    assert!(stats.rounds_played >= 2);
}

/// Test: pause замораживает MatchClock и бойцов
#[test]
fn test_pause_freezes_simulation() {
    let mut app = create_combat_app(1, close_stage());
    spawn_fighter(app.world_mut(), "Kevin", PlayerSlot::P1, Controller::Human).unwrap();
    spawn_fighter(app.world_mut(), "Dummy", PlayerSlot::P2, Controller::Human).unwrap();
    run_until_active(&mut app);

    send(&mut app, PlayerSlot::P1, CommandAction::Move { direction: Direction::Left, pressed: true });
    app.update();

    app.world_mut().resource_mut::<RoundState>().pause();
    let clock_before = app.world().resource::<MatchClock>().now();
    let x_before = fighter_in_slot(app.world_mut(), PlayerSlot::P1).unwrap().position.x;

    for _ in 0..30 {
        app.update();
    }
    assert_eq!(app.world().resource::<MatchClock>().now(), clock_before);
    assert_eq!(fighter_in_slot(app.world_mut(), PlayerSlot::P1).unwrap().position.x, x_before);

    app.world_mut().resource_mut::<RoundState>().resume();
    for _ in 0..10 {
        app.update();
    }
    assert!(app.world().resource::<MatchClock>().now() > clock_before);
    assert!(fighter_in_slot(app.world_mut(), PlayerSlot::P1).unwrap().position.x < x_before);
}

/// Test: команды во время intro отбрасываются, в Active доходят до бойца
#[test]
fn test_commands_only_apply_while_active() {
    let mut app = create_combat_app(1, close_stage());
    spawn_fighter(app.world_mut(), "Kevin", PlayerSlot::P1, Controller::Human).unwrap();
    spawn_fighter(app.world_mut(), "Dummy", PlayerSlot::P2, Controller::Human).unwrap();

    app.update();
    app.update();
    assert!(!app.world().resource::<RoundState>().is_active());
    send(&mut app, PlayerSlot::P1, CommandAction::Attack(AttackSlot::One));
    app.update();
    assert!(fighter_in_slot(app.world_mut(), PlayerSlot::P1).unwrap().active_attack().is_none());

    run_until_active(&mut app);
    send(&mut app, PlayerSlot::P1, CommandAction::Attack(AttackSlot::One));
    app.update();

    let p1 = fighter_in_slot(app.world_mut(), PlayerSlot::P1).unwrap();
    assert_eq!(p1.action(), ActionState::Attacking1);

    let mut query = app.world_mut().query::<(&Fighter, &AnimationPlayer, &Hitboxes)>();
    let (_, player, hitboxes) = query
        .iter(app.world())
        .find(|(f, _, _)| f.slot == PlayerSlot::P1)
        .unwrap();
    assert_eq!(player.key(), AnimationKey::Attack1);
    assert!(hitboxes.attack_active());
}

/// Test: зажатое движение не переживает конец раунда
#[test]
fn test_round_end_releases_held_movement() {
    let config = MatchConfig {
        round_time_ms: 300,
        round_end_ms: 500,
        ..fast_config()
    };
    let mut app = create_combat_app_with(1, close_stage(), config);
    spawn_fighter(app.world_mut(), "Kevin", PlayerSlot::P1, Controller::Human).unwrap();
    spawn_fighter(app.world_mut(), "Dummy", PlayerSlot::P2, Controller::Human).unwrap();
    run_until_active(&mut app);

    send(&mut app, PlayerSlot::P1, CommandAction::Move { direction: Direction::Left, pressed: true });
    let spawn_x = fighter_in_slot(app.world_mut(), PlayerSlot::P1).unwrap().position.x;

    let mut ended = false;
    for _ in 0..60 {
        app.update();
        if matches!(app.world().resource::<RoundState>().phase, RoundPhase::RoundEnd { .. }) {
            ended = true;
            break;
        }
    }
    assert!(ended, "timeout should end the round");

    let p1 = fighter_in_slot(app.world_mut(), PlayerSlot::P1).unwrap();
    assert!(p1.position.x < spawn_x, "P1 walked during the round");
    assert_eq!(p1.intent().horizontal(), None);
    let x_at_end = p1.position.x;

    for _ in 0..10 {
        app.update();
    }
    let p1 = fighter_in_slot(app.world_mut(), PlayerSlot::P1).unwrap();
    assert!(matches!(app.world().resource::<RoundState>().phase, RoundPhase::RoundEnd { .. }));
    assert_eq!(p1.position.x, x_at_end);
    assert_eq!(p1.action(), ActionState::Idle);
}

/// Test: ошибки спавна
#[test]
fn test_spawn_errors() {
    let mut app = create_combat_app(1, StageBounds::default());

    let err = spawn_fighter(app.world_mut(), "Nobody", PlayerSlot::P1, Controller::Human).unwrap_err();
    assert_eq!(err, SpawnError::UnknownFighter("Nobody".to_string()));

    spawn_fighter(app.world_mut(), "Kevin", PlayerSlot::P1, Controller::Human).unwrap();
    let err = spawn_fighter(app.world_mut(), "Dummy", PlayerSlot::P1, Controller::Human).unwrap_err();
    assert_eq!(err, SpawnError::SlotOccupied(PlayerSlot::P1));
}

/// Test: roster из JSON с кривым атрибутом → SpawnError
#[test]
fn test_spawn_from_custom_roster() {
    let mut app = create_combat_app(1, StageBounds::default());
    let roster = FighterRoster::from_json_str(r#"{ "Rookie": { "attack_damage": 9 }, "Broken": { "weight": -1.0 } }"#).unwrap();
    app.insert_resource(roster);

    spawn_fighter(app.world_mut(), "Rookie", PlayerSlot::P1, Controller::Human).unwrap();
    let rookie = fighter_in_slot(app.world_mut(), PlayerSlot::P1).unwrap();
    assert_eq!(rookie.attributes.attack_damage, 9);
    assert_eq!(rookie.health.max, FighterAttributes::DEFAULT_MAX_HEALTH);

    let err = spawn_fighter(app.world_mut(), "Broken", PlayerSlot::P2, Controller::Human).unwrap_err();
    assert!(matches!(err, SpawnError::InvalidAttribute { attribute: "weight", .. }));
}
