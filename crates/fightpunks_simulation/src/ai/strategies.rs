//! Built-in AI strategies.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{AiDecision, AiView, IntentStrategy};
use crate::config::AttackSlot;
use crate::fighter::ActionState;

/// Training-dummy brawler: closes distance, swings at random, blocks some
/// incoming attacks, backs off when low on health.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomBrawler {
    /// Chance to swing when in reach
    pub aggression: f64,
    /// Chance to block an attack started in reach
    pub block_chance: f64,
    /// Share of heavy attacks among swings
    pub heavy_ratio: f64,
    /// Health fraction below which the brawler starts backing off
    pub retreat_health: f32,
    pub dash_chance: f64,
    pub jump_chance: f64,
}

impl Default for RandomBrawler {
    fn default() -> Self {
        Self {
            aggression: 0.7,
            block_chance: 0.35,
            heavy_ratio: 0.3,
            retreat_health: 0.25,
            dash_chance: 0.15,
            jump_chance: 0.05,
        }
    }
}

impl IntentStrategy for RandomBrawler {
    fn decide(&mut self, view: &AiView, rng: &mut ChaCha8Rng) -> AiDecision {
        if view.action == ActionState::Dead {
            return AiDecision::default();
        }

        let distance = view.distance();
        let towards = view.towards_opponent();
        let in_reach = distance <= view.reach;

        // Retreat: low health, opponent healthier
        if view.health_fraction < self.retreat_health
            && view.opponent_health_fraction > view.health_fraction
            && rng.gen_bool(0.5)
        {
            let away = towards.flipped();
            return AiDecision {
                move_towards: Some(away),
                dash: rng.gen_bool(self.dash_chance).then_some(away),
                ..AiDecision::default()
            };
        }

        if view.opponent_action.is_attacking() && distance <= view.reach * 1.5 && rng.gen_bool(self.block_chance) {
            return AiDecision {
                block: true,
                ..AiDecision::default()
            };
        }

        if in_reach {
            let attack = rng.gen_bool(self.aggression).then(|| {
                if rng.gen_bool(self.heavy_ratio) {
                    AttackSlot::Two
                } else {
                    AttackSlot::One
                }
            });
            return AiDecision {
                attack,
                ..AiDecision::default()
            };
        }

        let far = distance > view.reach * 3.0;
        AiDecision {
            move_towards: Some(towards),
            dash: (far && rng.gen_bool(self.dash_chance)).then_some(towards),
            jump: rng.gen_bool(self.jump_chance),
            ..AiDecision::default()
        }
    }
}

/// Plays back a fixed list of decisions, then idles. For tests and demos.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedIntents {
    decisions: VecDeque<AiDecision>,
}

impl ScriptedIntents {
    pub fn new(decisions: impl IntoIterator<Item = AiDecision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.decisions.len()
    }
}

impl IntentStrategy for ScriptedIntents {
    fn decide(&mut self, _view: &AiView, _rng: &mut ChaCha8Rng) -> AiDecision {
        self.decisions.pop_front().unwrap_or_default()
    }
}
