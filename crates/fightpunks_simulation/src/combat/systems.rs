//! Combat ECS systems: resolve + sound cue flush

use bevy::prelude::*;

use crate::fighter::Fighter;
use crate::logger;
use crate::MatchClock;

use super::events::{CombatEvent, SoundEvent};
use super::resolver::resolve;

/// Пара бойцов, отсортированная по slot (P1 первым)
pub(crate) fn ordered_pair<'a, 'b>(fighters: &'a mut [Mut<'b, Fighter>]) -> Option<(&'a mut Fighter, &'a mut Fighter)> {
    fighters.sort_by_key(|f| f.slot);
    match fighters {
        [first, second] => Some((&mut **first, &mut **second)),
        _ => None,
    }
}

/// System: резолв атак текущего тика (только в Active фазе раунда)
pub fn resolve_combat(
    mut fighters: Query<&mut Fighter>,
    clock: Res<MatchClock>,
    mut combat_events: EventWriter<CombatEvent>,
) {
    let mut all: Vec<Mut<Fighter>> = fighters.iter_mut().collect();
    let Some((p1, p2)) = ordered_pair(&mut all) else {
        return;
    };

    for event in resolve(p1, p2, clock.now()) {
        combat_events.write(event);
    }
}

/// System: fighter cue outbox → SoundEvent (fire-and-forget)
pub fn flush_sound_cues(mut fighters: Query<&mut Fighter>, mut sounds: EventWriter<SoundEvent>) {
    let mut all: Vec<Mut<Fighter>> = fighters.iter_mut().collect();
    all.sort_by_key(|f| f.slot);

    for fighter in all.iter_mut() {
        if fighter.cues().is_empty() {
            continue;
        }
        let id = fighter.id;
        for cue in fighter.drain_cues() {
            logger::log(&format!("{}: sound '{}'", fighter.name, cue.name()));
            sounds.write(SoundEvent { fighter: id, cue });
        }
    }
}
