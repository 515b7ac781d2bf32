//! Tuning and match configuration (data-only).
//!
//! Units: pixels and fixed ticks for motion (the loop runs at a constant
//! 60 Hz, so per-tick integration is frame-rate independent), milliseconds of
//! `MatchClock` time for every gameplay timer.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod roster;

pub use roster::{FighterAttributes, FighterRoster};

/// Attack slot (attack-1 = quick, attack-2 = heavy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum AttackSlot {
    One,
    Two,
}

impl AttackSlot {
    pub fn index(self) -> usize {
        match self {
            AttackSlot::One => 0,
            AttackSlot::Two => 1,
        }
    }
}

/// Per-attack geometry and timing.
///
/// Offsets are relative to the fighter's feet point: `offset_x` is measured
/// along the facing direction (mirrored for left-facing fighters),
/// `offset_y` upwards from the feet to the hitbox center. Width and height
/// are multiplied by the fighter's `attack_range` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Active window length (ms). Hitbox exists only inside it.
    pub duration_ms: u64,
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
    /// Raw damage = floor(attack_damage × damage_scale)
    pub damage_scale: f32,
    /// Stun applied to an unblocked target (0 = none)
    pub hitstun_ms: u64,
    /// Knockback impulse before weight scaling (0 = none)
    pub knockback: f32,
}

impl AttackProfile {
    pub fn quick() -> Self {
        Self {
            duration_ms: 300,
            offset_x: 90.0,
            offset_y: 200.0,
            width: 110.0,
            height: 60.0,
            damage_scale: 1.0,
            hitstun_ms: 200,
            knockback: 6.0,
        }
    }

    pub fn heavy() -> Self {
        Self {
            duration_ms: 450,
            offset_x: 110.0,
            offset_y: 180.0,
            width: 150.0,
            height: 90.0,
            damage_scale: 1.5,
            hitstun_ms: 350,
            knockback: 12.0,
        }
    }
}

/// Combat constants shared by all fighters (copied into each `Fighter` at spawn)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatTuning {
    /// px/tick² (screen y grows downward)
    pub gravity: f32,
    pub dash_duration_ms: u64,
    pub double_press_window_ms: u64,
    pub combo_window_ms: u64,
    /// Raw damage bonus per chained hit: × (1 + (combo - 1) × step)
    pub combo_damage_step: f32,
    pub body_width: f32,
    pub body_height: f32,
    /// [attack-1, attack-2]
    pub attacks: [AttackProfile; 2],
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            dash_duration_ms: 100,
            double_press_window_ms: 200,
            combo_window_ms: 1_000,
            combo_damage_step: 0.1,
            body_width: 125.0,
            body_height: 320.0,
            attacks: [AttackProfile::quick(), AttackProfile::heavy()],
        }
    }
}

impl CombatTuning {
    pub fn attack(&self, slot: AttackSlot) -> &AttackProfile {
        &self.attacks[slot.index()]
    }
}

/// Stage geometry
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageBounds {
    pub left: f32,
    pub right: f32,
    /// Feet line: landing when y ≥ ground_y
    pub ground_y: f32,
    /// Spawn x for [P1, P2]
    pub spawn_x: [f32; 2],
}

impl Default for StageBounds {
    fn default() -> Self {
        Self {
            left: 0.0,
            right: 1200.0,
            ground_y: 650.0,
            spawn_x: [240.0, 960.0],
        }
    }
}

impl StageBounds {
    /// Clamp a feet x so that a body of `half_width` stays on stage
    pub fn clamp_x(&self, x: f32, half_width: f32) -> f32 {
        let min = self.left + half_width;
        let max = self.right - half_width;
        if min > max {
            // Stage narrower than body: pin to the center
            return (self.left + self.right) * 0.5;
        }
        x.clamp(min, max)
    }
}

/// Round/match parameters
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub rounds_to_win: u32,
    /// Hard cap so a run of draws still terminates
    pub max_rounds: u32,
    pub round_time_ms: u64,
    pub intro_ms: u64,
    pub round_end_ms: u64,
    pub ai_decision_interval_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds_to_win: 2,
            max_rounds: 5,
            round_time_ms: 99_000,
            intro_ms: 1_500,
            round_end_ms: 2_000,
            ai_decision_interval_ms: 250,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_windows() {
        let tuning = CombatTuning::default();
        assert_eq!(tuning.dash_duration_ms, 100);
        assert_eq!(tuning.double_press_window_ms, 200);
        assert_eq!(tuning.combo_window_ms, 1_000);
        assert_eq!(tuning.attack(AttackSlot::One).damage_scale, 1.0);
        assert!(tuning.attack(AttackSlot::Two).duration_ms > tuning.attack(AttackSlot::One).duration_ms);
    }

    #[test]
    fn test_stage_clamp() {
        let stage = StageBounds::default();
        assert_eq!(stage.clamp_x(-50.0, 62.5), 62.5);
        assert_eq!(stage.clamp_x(5000.0, 62.5), 1137.5);
        assert_eq!(stage.clamp_x(600.0, 62.5), 600.0);

        let tiny = StageBounds { left: 0.0, right: 100.0, ..StageBounds::default() };
        assert_eq!(tiny.clamp_x(10.0, 80.0), 50.0);
    }

    #[test]
    fn test_match_config_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.rounds_to_win, 2);
        assert_eq!(config.round_time_ms, 99_000);
    }
}
