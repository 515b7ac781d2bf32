//! Headless симуляция FiGHTPuNKS
//!
//! AI vs AI матч без рендера: `fightpunks_simulation [seed]`

use fightpunks_simulation::{
    create_headless_app, logger, spawn_fighter, Controller, MatchStats, PlayerSlot, RoundState, SimulationPlugin,
};

/// 10 минут матча при 60Hz
const MAX_TICKS: u64 = 60 * 60 * 10;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    println!("Starting FiGHTPuNKS headless match (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    for (name, slot) in [("Kevin", PlayerSlot::P1), ("Fire Girl", PlayerSlot::P2)] {
        if let Err(err) = spawn_fighter(app.world_mut(), name, slot, Controller::Ai) {
            logger::log_error(&format!("Cannot start match: {}", err));
            std::process::exit(1);
        }
    }

    let mut ticks = 0;
    while ticks < MAX_TICKS {
        app.update();
        ticks += 1;

        let Some(state) = app.world().get_resource::<RoundState>() else {
            break;
        };
        if state.is_match_over() {
            break;
        }
        if ticks % 600 == 0 {
            println!(
                "Tick {}: round {} {:?}, wins {:?}, {}s left",
                ticks,
                state.round,
                state.phase,
                state.wins,
                state.remaining_ms() / 1000
            );
        }
    }

    if let Some(state) = app.world().get_resource::<RoundState>() {
        println!("Final phase after {} ticks: {:?}, wins {:?}", ticks, state.phase, state.wins);
    }
    if let Some(stats) = app.world().get_resource::<MatchStats>() {
        println!(
            "Rounds: {}, damage dealt: {:?}, longest combo: {}",
            stats.rounds_played, stats.damage_dealt, stats.longest_combo
        );
    }
    println!("Simulation complete!");
}
