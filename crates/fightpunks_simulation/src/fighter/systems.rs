//! Fighter ECS systems: facing, per-tick integration.

use bevy::prelude::*;

use crate::config::StageBounds;
use crate::{MatchClock, SimulationSet};

use super::Fighter;

/// System: каждый боец поворачивается к другому (если не залочен)
pub fn face_opponents(mut fighters: Query<&mut Fighter>) {
    let positions: Vec<_> = fighters.iter().map(|f| (f.slot, f.position.x)).collect();
    for mut fighter in fighters.iter_mut() {
        if let Some((_, x)) = positions.iter().find(|(slot, _)| *slot != fighter.slot) {
            fighter.face_towards(*x);
        }
    }
}

/// System: закрыть окна, проинтегрировать движение
pub fn tick_fighters(mut fighters: Query<&mut Fighter>, clock: Res<MatchClock>, stage: Res<StageBounds>) {
    let now = clock.now();
    for mut fighter in fighters.iter_mut() {
        fighter.tick(now, &stage);
    }
}

/// Fighter Plugin
///
/// Порядок: face_opponents → tick_fighters (после input, до анимации/hitbox).
pub struct FighterPlugin;

impl Plugin for FighterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StageBounds>().init_resource::<crate::config::CombatTuning>();
        app.add_systems(
            FixedUpdate,
            (face_opponents, tick_fighters)
                .chain()
                .in_set(SimulationSet::Fighters),
        );
    }
}
