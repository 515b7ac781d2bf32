//! Fighter state machine: movement flags, timed windows, action precedence.
//!
//! # Architecture
//!
//! `Fighter` is one ECS component per participant. Every mutation goes
//! through a method taking the `MatchClock` reading `now` (ms); after each
//! mutation the action is recomputed by a single precedence function:
//!
//! ```text
//! Dead > Stunned > Attacking1/2 > Dashing > Jumping (airborne) > Blocking > Walking > Idle
//! ```
//!
//! Windows (attack, dash, stun) store a start/end time and are closed by
//! `tick` once `now` reaches the end. Nothing blocks or sleeps.
//!
//! Submodules:
//! - `actions`: intent, double-tap dash, attack/dash requests, stun
//! - `motion`: per-tick integration (`tick`, `face_towards`)
//! - `damage`: damage/heal/combo bookkeeping

use bevy::prelude::*;

use crate::animation::AnimationKey;
use crate::combat::events::SoundCue;
use crate::components::{Controller, Direction, FighterId, Health, PlayerSlot};
use crate::config::{AttackProfile, AttackSlot, CombatTuning, FighterAttributes, StageBounds};
use crate::logger;

mod actions;
mod damage;
mod motion;
pub mod systems;

pub use damage::{calculate_net_damage, DamageReport};
pub use systems::{face_opponents, tick_fighters, FighterPlugin};


// ============================================================================
// Action state
// ============================================================================

/// Resolved action (exactly one active)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ActionState {
    Idle,
    Walking,
    Jumping,
    Dashing,
    Attacking1,
    Attacking2,
    Blocking,
    Stunned,
    Dead,
}

impl ActionState {
    pub fn is_attacking(self) -> bool {
        matches!(self, ActionState::Attacking1 | ActionState::Attacking2)
    }

    /// Animation clip for this action
    pub fn animation_key(self) -> AnimationKey {
        match self {
            ActionState::Idle => AnimationKey::Idle,
            ActionState::Walking => AnimationKey::Walk,
            ActionState::Jumping => AnimationKey::Jump,
            ActionState::Dashing => AnimationKey::Dash,
            ActionState::Attacking1 => AnimationKey::Attack1,
            ActionState::Attacking2 => AnimationKey::Attack2,
            ActionState::Blocking => AnimationKey::Block,
            ActionState::Stunned => AnimationKey::Stun,
            ActionState::Dead => AnimationKey::Death,
        }
    }
}

/// Raw intent (что игрок/AI хочет), отдельно от resolved action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub move_left: bool,
    pub move_right: bool,
    /// One-shot: consumed by the next `tick`
    pub jump: bool,
    pub block: bool,
}

impl Intent {
    /// Horizontal direction, None если ни одного или оба сразу
    pub fn horizontal(&self) -> Option<Direction> {
        match (self.move_left, self.move_right) {
            (true, false) => Some(Direction::Left),
            (false, true) => Some(Direction::Right),
            _ => None,
        }
    }
}

// ============================================================================
// Timed windows
// ============================================================================

/// Open attack window. Hit targets tracked per activation (prevents double hits).
#[derive(Debug, Clone, PartialEq)]
pub struct AttackWindow {
    pub slot: AttackSlot,
    pub started_at: u64,
    pub hit_targets: Vec<FighterId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashWindow {
    pub direction: Direction,
    pub started_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DirectionalPress {
    direction: Direction,
    at: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ComboCounter {
    count: u32,
    last_hit_at: Option<u64>,
}

// ============================================================================
// Fighter
// ============================================================================

/// One participant: identity, transform, attributes, state.
#[derive(Component, Debug, Clone)]
pub struct Fighter {
    pub id: FighterId,
    pub name: String,
    pub slot: PlayerSlot,
    pub controller: Controller,
    pub facing: Direction,
    /// Feet point, screen coords (y grows downward)
    pub position: Vec2,
    pub velocity_y: f32,
    pub on_ground: bool,
    pub health: Health,
    pub attributes: FighterAttributes,

    tuning: CombatTuning,
    spawn_point: Vec2,
    action: ActionState,
    intent: Intent,
    attack: Option<AttackWindow>,
    dash: Option<DashWindow>,
    stun_until: Option<u64>,
    last_press: Option<DirectionalPress>,
    combo: ComboCounter,
    /// Signed horizontal displacement applied on the next tick
    pending_knockback: f32,
    cues: Vec<SoundCue>,
}

impl Fighter {
    /// Fresh fighter at its slot's spawn point, full health, Idle.
    ///
    /// Attributes must already be validated (`FighterRoster::attributes_for`).
    pub fn new(
        id: FighterId,
        name: impl Into<String>,
        slot: PlayerSlot,
        controller: Controller,
        attributes: FighterAttributes,
        tuning: CombatTuning,
        stage: &StageBounds,
    ) -> Self {
        let spawn_point = Vec2::new(stage.spawn_x[slot.index()], stage.ground_y);
        Self {
            id,
            name: name.into(),
            slot,
            controller,
            facing: Self::default_facing(slot),
            position: spawn_point,
            velocity_y: 0.0,
            on_ground: true,
            health: Health::new(attributes.max_health),
            attributes,
            tuning,
            spawn_point,
            action: ActionState::Idle,
            intent: Intent::default(),
            attack: None,
            dash: None,
            stun_until: None,
            last_press: None,
            combo: ComboCounter::default(),
            pending_knockback: 0.0,
            cues: Vec::new(),
        }
    }

    fn default_facing(slot: PlayerSlot) -> Direction {
        match slot {
            PlayerSlot::P1 => Direction::Right,
            PlayerSlot::P2 => Direction::Left,
        }
    }

    pub fn action(&self) -> ActionState {
        self.action
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn is_dead(&self) -> bool {
        !self.health.is_alive()
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    /// Open attack window (if any)
    pub fn active_attack(&self) -> Option<&AttackWindow> {
        self.attack.as_ref()
    }

    /// Profile of the open attack window
    pub fn active_attack_profile(&self) -> Option<&AttackProfile> {
        self.attack.as_ref().map(|a| self.tuning.attack(a.slot))
    }

    pub fn active_dash(&self) -> Option<DashWindow> {
        self.dash
    }

    pub fn combo_count(&self) -> u32 {
        self.combo.count
    }

    pub fn pending_knockback(&self) -> f32 {
        self.pending_knockback
    }

    /// Movement/jump input allowed (not dead/stunned/attacking/dashing)
    pub fn can_act(&self) -> bool {
        self.health.is_alive() && self.stun_until.is_none() && self.attack.is_none() && self.dash.is_none()
    }

    /// Sound cues queued since the last drain
    pub fn cues(&self) -> &[SoundCue] {
        &self.cues
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    pub(crate) fn push_cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    /// Precedence function (единственный источник истины для action)
    fn resolve_action(&self) -> ActionState {
        if !self.health.is_alive() {
            ActionState::Dead
        } else if self.stun_until.is_some() {
            ActionState::Stunned
        } else if let Some(attack) = &self.attack {
            match attack.slot {
                AttackSlot::One => ActionState::Attacking1,
                AttackSlot::Two => ActionState::Attacking2,
            }
        } else if self.dash.is_some() {
            ActionState::Dashing
        } else if !self.on_ground {
            ActionState::Jumping
        } else if self.intent.block {
            ActionState::Blocking
        } else if self.intent.horizontal().is_some() {
            ActionState::Walking
        } else {
            ActionState::Idle
        }
    }

    fn refresh_action(&mut self) {
        let next = self.resolve_action();
        if next != self.action {
            logger::log(&format!("{} ({:?}): {:?} → {:?}", self.name, self.slot, self.action, next));
            self.action = next;
        }
    }

    /// New round: full health, spawn point, Idle, all windows and combo cleared
    pub fn reset_for_round(&mut self) {
        self.health.restore();
        self.position = self.spawn_point;
        self.velocity_y = 0.0;
        self.on_ground = true;
        self.facing = Self::default_facing(self.slot);
        self.intent = Intent::default();
        self.attack = None;
        self.dash = None;
        self.stun_until = None;
        self.last_press = None;
        self.combo = ComboCounter::default();
        self.pending_knockback = 0.0;
        self.cues.clear();
        self.action = ActionState::Idle;
    }
}
