//! Per-tick integration.
//!
//! Порядок внутри `tick`:
//! 1. закрыть истёкшие окна (stun, attack, dash) и combo
//! 2. jump (consumes one-shot intent)
//! 3. горизонталь: dash ИЛИ walking, плюс queued knockback, clamp к сцене
//! 4. гравитация и приземление
//! 5. пересчёт action
//!
//! Motion integrated per fixed tick (60 Hz): speeds в px/tick.

use super::Fighter;
use crate::combat::events::SoundCue;
use crate::components::Direction;
use crate::config::StageBounds;

impl Fighter {
    pub fn tick(&mut self, now: u64, stage: &StageBounds) {
        self.close_elapsed_windows(now);

        let alive = self.health.is_alive();

        // Jump intent одноразовый: сгорает даже если прыгнуть нельзя
        let wants_jump = std::mem::take(&mut self.intent.jump);
        if wants_jump && self.on_ground && self.can_act() {
            self.velocity_y = -self.attributes.jump_power;
            self.on_ground = false;
            self.push_cue(SoundCue::Jump);
        }

        let mut dx = 0.0;
        if let Some(dash) = self.dash {
            dx += dash.direction.sign() * self.attributes.dash_power;
        } else if self.can_act() && !(self.on_ground && self.intent.block) {
            if let Some(direction) = self.intent.horizontal() {
                dx += direction.sign() * self.attributes.speed;
            }
        }
        if alive {
            dx += std::mem::take(&mut self.pending_knockback);
        } else {
            self.pending_knockback = 0.0;
        }

        let half_width = self.tuning.body_width * 0.5;
        self.position.x = stage.clamp_x(self.position.x + dx, half_width);

        if !self.on_ground {
            self.velocity_y += self.tuning.gravity;
            self.position.y += self.velocity_y;
            if self.position.y >= stage.ground_y {
                self.position.y = stage.ground_y;
                self.velocity_y = 0.0;
                self.on_ground = true;
            }
        }

        self.refresh_action();
    }

    /// Window ends once `now >= start + duration`
    fn close_elapsed_windows(&mut self, now: u64) {
        if self.stun_until.is_some_and(|until| now >= until) {
            self.stun_until = None;
        }

        let attack_end = self
            .attack
            .as_ref()
            .map(|a| a.started_at.saturating_add(self.tuning.attack(a.slot).duration_ms));
        if attack_end.is_some_and(|end| now >= end) {
            self.attack = None;
        }

        let dash_end = self
            .dash
            .map(|d| d.started_at.saturating_add(self.tuning.dash_duration_ms));
        if dash_end.is_some_and(|end| now >= end) {
            self.dash = None;
        }

        self.lapse_combo(now);
    }

    /// Turn towards `x` (opponent). Locked while attacking/dashing/stunned/dead.
    pub fn face_towards(&mut self, x: f32) {
        if !self.can_act() {
            return;
        }
        if x > self.position.x {
            self.facing = Direction::Right;
        } else if x < self.position.x {
            self.facing = Direction::Left;
        }
    }
}
