//! AI decision-making module
//!
//! AI не трогает `Fighter` напрямую: стратегия выдаёт `AiDecision` (что
//! держать нажатым), контроллер превращает разницу с текущим intent в
//! `FighterCommand` события, дальше обычный input pipeline. Решения
//! принимаются раз в `interval_ms` и используют seeded `DeterministicRng`.

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::components::Direction;
use crate::config::AttackSlot;
use crate::fighter::{ActionState, Fighter};
use crate::input::{CommandAction, FighterCommand};
use crate::rounds::round_active;
use crate::{DeterministicRng, MatchClock, SimulationSet};

pub mod strategies;

pub use strategies::{RandomBrawler, ScriptedIntents};

// ============================================================================
// Strategy seam
// ============================================================================

/// Что AI видит на момент решения
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiView {
    pub now: u64,
    pub position: Vec2,
    pub facing: Direction,
    pub action: ActionState,
    pub health_fraction: f32,
    pub opponent_position: Vec2,
    pub opponent_action: ActionState,
    pub opponent_health_fraction: f32,
    /// Horizontal distance at which the quick attack connects
    pub reach: f32,
}

impl AiView {
    pub fn distance(&self) -> f32 {
        (self.opponent_position.x - self.position.x).abs()
    }

    pub fn towards_opponent(&self) -> Direction {
        if self.opponent_position.x >= self.position.x {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

/// Desired held inputs for the next interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiDecision {
    pub move_towards: Option<Direction>,
    pub block: bool,
    pub jump: bool,
    pub dash: Option<Direction>,
    pub attack: Option<AttackSlot>,
}

/// Pluggable AI brain
pub trait IntentStrategy: Send + Sync {
    fn decide(&mut self, view: &AiView, rng: &mut ChaCha8Rng) -> AiDecision;
}

// ============================================================================
// Controller component
// ============================================================================

#[derive(Component)]
pub struct AiController {
    strategy: Box<dyn IntentStrategy>,
    pub interval_ms: u64,
    next_decision_at: u64,
}

impl std::fmt::Debug for AiController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiController")
            .field("interval_ms", &self.interval_ms)
            .field("next_decision_at", &self.next_decision_at)
            .finish()
    }
}

impl AiController {
    pub fn new(strategy: impl IntentStrategy + 'static, interval_ms: u64) -> Self {
        Self {
            strategy: Box::new(strategy),
            interval_ms,
            next_decision_at: 0,
        }
    }

    /// Commands for this tick (empty between decisions)
    pub fn commands_for(&mut self, fighter: &Fighter, view: &AiView, rng: &mut ChaCha8Rng) -> Vec<CommandAction> {
        if view.now < self.next_decision_at || fighter.is_dead() {
            return Vec::new();
        }
        self.next_decision_at = view.now.saturating_add(self.interval_ms.max(1));

        let decision = self.strategy.decide(view, rng);
        decision_to_commands(fighter, &decision)
    }
}

/// Diff desired held inputs against the fighter's current intent
pub fn decision_to_commands(fighter: &Fighter, decision: &AiDecision) -> Vec<CommandAction> {
    let intent = fighter.intent();
    let mut commands = Vec::new();

    for direction in [Direction::Left, Direction::Right] {
        let held = match direction {
            Direction::Left => intent.move_left,
            Direction::Right => intent.move_right,
        };
        let wanted = decision.move_towards == Some(direction);
        if held && !wanted {
            commands.push(CommandAction::Move { direction, pressed: false });
        }
    }

    if let Some(direction) = decision.dash {
        // Double tap; input layer отдаёт это в request_dash
        commands.push(CommandAction::Move { direction, pressed: true });
        commands.push(CommandAction::Move { direction, pressed: false });
        commands.push(CommandAction::Move { direction, pressed: true });
        if decision.move_towards != Some(direction) {
            commands.push(CommandAction::Move { direction, pressed: false });
        }
    } else if let Some(direction) = decision.move_towards {
        let held = match direction {
            Direction::Left => intent.move_left,
            Direction::Right => intent.move_right,
        };
        if !held {
            commands.push(CommandAction::Move { direction, pressed: true });
        }
    }

    if decision.block != intent.block {
        commands.push(CommandAction::Block(decision.block));
    }
    if decision.jump {
        commands.push(CommandAction::Jump);
    }
    if let Some(slot) = decision.attack {
        commands.push(CommandAction::Attack(slot));
    }

    commands
}

fn build_view(fighter: &Fighter, opponent: &Fighter, now: u64) -> AiView {
    let quick = fighter.tuning().attack(AttackSlot::One);
    let reach = quick.offset_x + quick.width * fighter.attributes.attack_range * 0.5 + fighter.tuning().body_width * 0.5;
    AiView {
        now,
        position: fighter.position,
        facing: fighter.facing,
        action: fighter.action(),
        health_fraction: fighter.health.fraction(),
        opponent_position: opponent.position,
        opponent_action: opponent.action(),
        opponent_health_fraction: opponent.health.fraction(),
        reach,
    }
}

// ============================================================================
// Systems / plugin
// ============================================================================

/// System: AI decisions → FighterCommand (P1 first, for a stable RNG order)
pub fn drive_ai_controllers(
    mut controllers: Query<(&Fighter, &mut AiController)>,
    fighters: Query<&Fighter>,
    clock: Res<MatchClock>,
    mut rng: ResMut<DeterministicRng>,
    mut commands: EventWriter<FighterCommand>,
) {
    let now = clock.now();
    let mut ordered: Vec<_> = controllers.iter_mut().collect();
    ordered.sort_by_key(|(fighter, _)| fighter.slot);

    for (fighter, mut controller) in ordered {
        let Some(opponent) = fighters.iter().find(|f| f.slot != fighter.slot) else {
            continue;
        };
        let view = build_view(fighter, opponent, now);
        for action in controller.commands_for(fighter, &view, &mut rng.rng) {
            commands.write(FighterCommand::new(fighter.slot, action));
        }
    }
}

/// AI Plugin
///
/// Регистрирует AI систему в FixedUpdate (Intents set, до input команд).
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            drive_ai_controllers
                .run_if(round_active)
                .in_set(SimulationSet::Intents),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Controller, FighterId, PlayerSlot};
    use crate::config::{CombatTuning, FighterAttributes, StageBounds};
    use rand::SeedableRng;

    fn fighter(slot: PlayerSlot) -> Fighter {
        Fighter::new(
            FighterId(slot.index() as u32 + 1),
            "Dummy",
            slot,
            Controller::Ai,
            FighterAttributes::default(),
            CombatTuning::default(),
            &StageBounds::default(),
        )
    }

    #[test]
    fn test_move_diff_releases_and_presses() {
        let mut f = fighter(PlayerSlot::P1);
        f.press_direction(Direction::Left, true, 0);

        let decision = AiDecision {
            move_towards: Some(Direction::Right),
            ..AiDecision::default()
        };
        let commands = decision_to_commands(&f, &decision);
        assert_eq!(
            commands,
            vec![
                CommandAction::Move { direction: Direction::Left, pressed: false },
                CommandAction::Move { direction: Direction::Right, pressed: true },
            ]
        );
    }

    #[test]
    fn test_dash_decision_is_double_tap() {
        let mut f = fighter(PlayerSlot::P1);
        let decision = AiDecision {
            dash: Some(Direction::Right),
            ..AiDecision::default()
        };
        for action in decision_to_commands(&f, &decision) {
            crate::input::apply_command(&mut f, action, 500);
        }
        assert_eq!(f.action(), ActionState::Dashing);
        assert!(!f.intent().move_right);
    }

    #[test]
    fn test_controller_respects_interval() {
        let f = fighter(PlayerSlot::P1);
        let opponent = fighter(PlayerSlot::P2);
        let script = ScriptedIntents::new(vec![
            AiDecision {
                attack: Some(AttackSlot::One),
                ..AiDecision::default()
            };
            3
        ]);
        let mut controller = AiController::new(script, 250);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let view = build_view(&f, &opponent, 0);
        assert_eq!(controller.commands_for(&f, &view, &mut rng).len(), 1);

        let view = build_view(&f, &opponent, 100);
        assert!(controller.commands_for(&f, &view, &mut rng).is_empty());

        let view = build_view(&f, &opponent, 250);
        assert_eq!(controller.commands_for(&f, &view, &mut rng).len(), 1);
    }
}
