//! Intent, double-tap dash, attack/dash requests, stun.
//!
//! Запросы возвращают `bool`: отказ (атака во время атаки, dash в stun)
//! штатная ситуация, не ошибка. Повторный запрос во время активной атаки
//! просто игнорируется (без буферизации).

use super::{AttackWindow, DashWindow, DirectionalPress, Fighter, Intent};
use crate::combat::events::SoundCue;
use crate::components::{Direction, FighterId};
use crate::config::AttackSlot;
use crate::logger;

impl Fighter {
    /// Записать raw intent. Эффект только на следующем `tick`.
    pub fn set_intent(&mut self, move_left: bool, move_right: bool, jump: bool, block: bool) {
        if self.is_dead() {
            return;
        }
        self.intent = Intent {
            move_left,
            move_right,
            jump: self.intent.jump || jump,
            block,
        };
    }

    /// Directional press/release from the input layer.
    ///
    /// A press of the same direction within `double_press_window_ms` of the
    /// previous one requests a dash. Returns true when a dash started.
    pub fn press_direction(&mut self, direction: Direction, pressed: bool, now: u64) -> bool {
        if self.is_dead() {
            return false;
        }

        match direction {
            Direction::Left => self.intent.move_left = pressed,
            Direction::Right => self.intent.move_right = pressed,
        }
        if !pressed {
            return false;
        }

        let window = self.tuning.double_press_window_ms;
        let double_tap = matches!(
            self.last_press,
            Some(prev) if prev.direction == direction && now.saturating_sub(prev.at) <= window
        );

        if double_tap {
            // Accumulator сбрасывается: третье нажатие не даёт второй dash
            self.last_press = None;
            return self.request_dash(direction, now);
        }

        self.last_press = Some(DirectionalPress { direction, at: now });
        false
    }

    /// Release every held direction/block and drop a pending jump
    pub fn clear_intent(&mut self) {
        self.intent = Intent::default();
        self.last_press = None;
        self.refresh_action();
    }

    pub fn press_jump(&mut self) {
        if !self.is_dead() {
            self.intent.jump = true;
        }
    }

    pub fn set_block(&mut self, held: bool) {
        if !self.is_dead() {
            self.intent.block = held;
        }
    }

    /// Open an attack window for `slot`.
    ///
    /// Refused while attacking, dashing, stunned or dead (timers untouched).
    pub fn request_attack(&mut self, slot: AttackSlot, now: u64) -> bool {
        if self.is_dead() || self.stun_until.is_some() || self.attack.is_some() || self.dash.is_some() {
            return false;
        }

        self.attack = Some(AttackWindow {
            slot,
            started_at: now,
            hit_targets: Vec::new(),
        });
        self.push_cue(match slot {
            AttackSlot::One => SoundCue::Attack1,
            AttackSlot::Two => SoundCue::Attack2,
        });
        self.refresh_action();

        logger::log(&format!("{}: attack {:?} opened at {}ms", self.name, slot, now));
        true
    }

    /// Open a dash window. Ordinary horizontal movement is ignored until it closes.
    ///
    /// Refused while dashing, stunned or dead. An open attack window keeps
    /// running and still wins the action precedence.
    pub fn request_dash(&mut self, direction: Direction, now: u64) -> bool {
        if self.is_dead() || self.stun_until.is_some() || self.dash.is_some() {
            return false;
        }

        self.dash = Some(DashWindow {
            direction,
            started_at: now,
        });
        self.last_press = None;
        self.push_cue(SoundCue::Dash);
        self.refresh_action();
        true
    }

    /// Force Stunned for `duration_ms`. Abandons the attack and dash windows.
    pub fn apply_stun(&mut self, duration_ms: u64, now: u64) -> bool {
        if self.is_dead() {
            return false;
        }

        if let Some(attack) = self.attack.take() {
            logger::log(&format!("{}: attack {:?} cancelled by stun", self.name, attack.slot));
        }
        self.dash = None;
        self.stun_until = Some(now.saturating_add(duration_ms));
        self.refresh_action();
        true
    }

    /// Attack window still open and `target` not yet hit by this activation
    pub fn can_hit(&self, target: FighterId) -> bool {
        self.attack
            .as_ref()
            .is_some_and(|attack| !attack.hit_targets.contains(&target))
    }

    /// Mark `target` as hit by the current activation. False if already hit / no attack.
    pub fn register_hit(&mut self, target: FighterId) -> bool {
        match self.attack.as_mut() {
            Some(attack) if !attack.hit_targets.contains(&target) => {
                attack.hit_targets.push(target);
                true
            }
            _ => false,
        }
    }
}
