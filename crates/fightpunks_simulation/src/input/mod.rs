//! Raw action events → fighter state machine.
//!
//! Команды приходят от input слоя (клавиатура, геймпад, сеть) или от AI.
//! Timestamp ставится здесь по `MatchClock`, источнику время не нужно знать.

use bevy::prelude::*;

use crate::components::{Direction, PlayerSlot};
use crate::config::AttackSlot;
use crate::fighter::Fighter;
use crate::rounds::RoundState;
use crate::{MatchClock, SimulationSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Press/release of a direction (double tap → dash)
    Move { direction: Direction, pressed: bool },
    Jump,
    Attack(AttackSlot),
    Block(bool),
}

/// Команда для бойца в слоте
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FighterCommand {
    pub slot: PlayerSlot,
    pub action: CommandAction,
}

impl FighterCommand {
    pub fn new(slot: PlayerSlot, action: CommandAction) -> Self {
        Self { slot, action }
    }
}

/// Apply one command at `now`
pub fn apply_command(fighter: &mut Fighter, action: CommandAction, now: u64) {
    match action {
        CommandAction::Move { direction, pressed } => {
            fighter.press_direction(direction, pressed, now);
        }
        CommandAction::Jump => fighter.press_jump(),
        CommandAction::Attack(slot) => {
            fighter.request_attack(slot, now);
        }
        CommandAction::Block(held) => fighter.set_block(held),
    }
}

/// System: FighterCommand → Fighter. Вне Active фазы команды отбрасываются.
pub fn apply_fighter_commands(
    mut commands: EventReader<FighterCommand>,
    mut fighters: Query<&mut Fighter>,
    state: Res<RoundState>,
    clock: Res<MatchClock>,
) {
    if !state.is_active() {
        commands.clear();
        return;
    }

    let now = clock.now();
    for command in commands.read() {
        if let Some(mut fighter) = fighters.iter_mut().find(|f| f.slot == command.slot) {
            apply_command(&mut fighter, command.action, now);
        }
    }
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FighterCommand>().add_systems(
            FixedUpdate,
            apply_fighter_commands
                .after(crate::ai::drive_ai_controllers)
                .in_set(SimulationSet::Intents),
        );
    }
}
