//! Combat и audio события (ECS → caller/HUD/audio layer)

use bevy::prelude::*;

use crate::components::FighterId;
use crate::config::AttackSlot;

/// Результат одного резолва атаки.
///
/// Генерируется `resolve_combat` системой. Stats, HUD, round flow читают эти события;
/// ядро само ничего в stats не пишет.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// Атака прошла в незаблокированного противника
    Hit {
        attacker: FighterId,
        defender: FighterId,
        slot: AttackSlot,
        /// Net damage (после defense)
        damage: u32,
        /// Combo counter атакующего после этого попадания
        combo: u32,
        /// Impulse после деления на weight (уже поставлен в очередь defender'у)
        knockback: Option<f32>,
    },
    /// Атака попала в блок
    Blocked {
        attacker: FighterId,
        defender: FighterId,
        slot: AttackSlot,
        damage: u32,
    },
    /// Health бойца дошло до 0. Ровно один раз за раунд.
    Defeated {
        fighter: FighterId,
        by: Option<FighterId>,
    },
}

/// Audio cue names (fire-and-forget, ядро не ждёт завершения)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SoundCue {
    Hit,
    Block,
    Jump,
    Dash,
    Attack1,
    Attack2,
    Death,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Hit => "hit",
            SoundCue::Block => "block",
            SoundCue::Jump => "jump",
            SoundCue::Dash => "dash",
            SoundCue::Attack1 => "attack1",
            SoundCue::Attack2 => "attack2",
            SoundCue::Death => "death",
        }
    }
}

/// Событие для audio collaborator
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundEvent {
    pub fighter: FighterId,
    pub cue: SoundCue,
}
