//! FiGHTPuNKS Simulation Core
//!
//! Two-fighter real-time combat на Bevy 0.16 ECS, headless.
//!
//! Один FixedUpdate (60Hz) pipeline, строго по порядку:
//!
//! ```text
//! Clock → Intents (AI → input) → Fighters (facing → tick) → Animation
//!       → Combat (hitboxes → resolve → sound cues) → Rounds (flow → stats)
//! ```
//!
//! Рендер, ассеты, звук и меню живут снаружи: они читают события
//! (`CombatEvent`, `SoundEvent`, `RoundEvent`) и компоненты (`Fighter`,
//! `AnimationPlayer`, `Hitboxes`), а пишут только `FighterCommand`.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod animation;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod fighter;
pub mod input;
pub mod logger;
pub mod rounds;
pub mod stats;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AiController, AiDecision, IntentStrategy, RandomBrawler, ScriptedIntents};
pub use animation::{AnimationKey, AnimationPlayer, AnimationPlugin, FrameCountTable, FrameRef, FrameSource};
pub use combat::{CombatEvent, CombatPlugin, Hitboxes, SoundCue, SoundEvent};
pub use components::*;
pub use config::{AttackProfile, AttackSlot, CombatTuning, FighterAttributes, FighterRoster, MatchConfig, StageBounds};
pub use error::{RosterError, SpawnError};
pub use fighter::{ActionState, DamageReport, Fighter, FighterPlugin};
pub use input::{CommandAction, FighterCommand, InputPlugin};
pub use logger::init_logger;
pub use rounds::{RoundEndReason, RoundEvent, RoundOutcome, RoundPhase, RoundPlugin, RoundState};
pub use stats::{MatchStats, StatsPlugin};

/// Fixed tick rate of the simulation
pub const TICK_HZ: f64 = 60.0;

/// Фазы FixedUpdate pipeline (выполняются цепочкой)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Clock,
    Intents,
    Fighters,
    Animation,
    Combat,
    Rounds,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .init_resource::<MatchClock>()
            .init_resource::<CombatTuning>()
            .init_resource::<StageBounds>()
            .init_resource::<MatchConfig>();

        // Seed и roster могли поставить заранее (create_headless_app, тесты)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
        if !app.world().contains_resource::<FighterRoster>() {
            app.insert_resource(FighterRoster::builtin());
        }

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Clock,
                SimulationSet::Intents,
                SimulationSet::Fighters,
                SimulationSet::Animation,
                SimulationSet::Combat,
                SimulationSet::Rounds,
            )
                .chain()
                .run_if(rounds::simulation_running),
        );

        app.add_systems(FixedUpdate, advance_match_clock.in_set(SimulationSet::Clock));

        app.add_plugins((
            RoundPlugin,
            AIPlugin,
            InputPlugin,
            FighterPlugin,
            AnimationPlugin,
            CombatPlugin,
            StatsPlugin,
        ));
    }
}

/// Monotonic match clock (ms). Двигается только пока симуляция не на паузе.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct MatchClock {
    elapsed: Duration,
}

impl MatchClock {
    pub fn now(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed += delta;
    }
}

/// System: MatchClock += fixed delta
pub fn advance_match_clock(time: Res<Time>, mut clock: ResMut<MatchClock>) {
    clock.advance(time.delta());
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` двигает время ровно на один fixed tick.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / TICK_HZ)));

    app
}

/// Spawn a fighter from the roster into `slot`.
///
/// The only fallible step of a match: unknown fighter, invalid attributes
/// or a slot that is already taken. AI-controlled fighters get a
/// `RandomBrawler` controller (replace the component to script them).
pub fn spawn_fighter(
    world: &mut World,
    name: &str,
    slot: PlayerSlot,
    controller: Controller,
) -> Result<Entity, SpawnError> {
    let occupied = world.query::<&Fighter>().iter(world).any(|f| f.slot == slot);
    if occupied {
        return Err(SpawnError::SlotOccupied(slot));
    }

    let attributes = match world.get_resource::<FighterRoster>() {
        Some(roster) => roster.attributes_for(name)?,
        None => FighterRoster::builtin().attributes_for(name)?,
    };
    let tuning = world.get_resource::<CombatTuning>().cloned().unwrap_or_default();
    let stage = world.get_resource::<StageBounds>().copied().unwrap_or_default();
    let interval = world
        .get_resource::<MatchConfig>()
        .map(|c| c.ai_decision_interval_ms)
        .unwrap_or_else(|| MatchConfig::default().ai_decision_interval_ms);

    let fighter = Fighter::new(
        FighterId(slot.index() as u32 + 1),
        name,
        slot,
        controller,
        attributes,
        tuning,
        &stage,
    );
    let hitboxes = Hitboxes::of(&fighter);

    let mut entity = world.spawn((fighter, AnimationPlayer::default(), hitboxes));
    if controller == Controller::Ai {
        entity.insert(AiController::new(RandomBrawler::default(), interval));
    }

    logger::log_info(&format!("Spawned '{}' as {:?} ({:?})", name, slot, controller));
    Ok(entity.id())
}

/// Fighter in `slot`, if spawned
pub fn fighter_in_slot(world: &mut World, slot: PlayerSlot) -> Option<Fighter> {
    world
        .query::<&Fighter>()
        .iter(world)
        .find(|f| f.slot == slot)
        .cloned()
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
