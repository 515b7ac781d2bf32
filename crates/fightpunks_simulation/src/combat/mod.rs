//! Combat module: hitbox geometry, resolver, events.
//!
//! Ответственность:
//! - Hitboxes: body + attack rect каждого бойца, пересчёт каждый тик
//! - Resolver: overlap → Hit / Blocked / Defeated (P1 первым, трейды проходят оба)
//! - Events: CombatEvent для round flow и stats, SoundEvent для audio слоя

use bevy::prelude::*;

pub mod events;
pub mod hitbox;
pub mod resolver;
pub mod systems;


pub use events::{CombatEvent, SoundCue, SoundEvent};
pub use hitbox::{attack_rect, body_rect, overlaps, update_hitboxes, Hitboxes};
pub use resolver::resolve;
pub use systems::{flush_sound_cues, resolve_combat};

use crate::rounds::round_active;
use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (60Hz), после fighter tick.
///
/// Порядок выполнения:
/// 1. update_hitboxes: rect'ы из transform после движения
/// 2. resolve_combat: только пока раунд Active
/// 3. flush_sound_cues: cue outbox бойцов → SoundEvent
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatEvent>().add_event::<SoundEvent>();

        app.add_systems(
            FixedUpdate,
            (
                update_hitboxes,
                resolve_combat.run_if(round_active),
                flush_sound_cues,
            )
                .chain()
                .in_set(SimulationSet::Combat),
        );
    }
}
