//! Damage, heal, combo bookkeeping.

use super::{ActionState, ComboCounter, Fighter};
use crate::combat::events::SoundCue;
use crate::components::Direction;
use crate::logger;

/// Outcome of one `apply_damage` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    /// Health actually requested off (≥ 1)
    pub net: u32,
    pub blocked: bool,
    /// Impulse after 1/weight scaling
    pub knockback: Option<f32>,
    /// True only on the call that took health to 0
    pub defeated: bool,
}

/// Net damage formula.
///
/// Blocking halves raw damage (floor, min 1), then defense is subtracted
/// (net min 1).
pub fn calculate_net_damage(raw: u32, defense: u32, blocking: bool) -> u32 {
    let incoming = if blocking { (raw / 2).max(1) } else { raw };
    incoming.saturating_sub(defense).max(1)
}

impl Fighter {
    /// Apply incoming damage. None for an already-dead fighter.
    pub fn apply_damage(&mut self, raw: u32, knockback: Option<f32>) -> Option<DamageReport> {
        if self.is_dead() {
            return None;
        }

        let blocked = self.action == ActionState::Blocking;
        let net = calculate_net_damage(raw, self.attributes.defense, blocked);
        self.health.take_damage(net);

        let knockback = knockback
            .filter(|k| *k != 0.0)
            .map(|k| k / self.attributes.weight);

        let defeated = self.is_dead();
        if defeated {
            self.on_defeated();
        }

        logger::log(&format!(
            "{}: took {} (raw {}, blocked {}), HP {}/{}",
            self.name, net, raw, blocked, self.health.current, self.health.max
        ));

        Some(DamageReport {
            net,
            blocked,
            knockback,
            defeated,
        })
    }

    /// Queue a signed push for the next `tick`
    pub fn queue_knockback(&mut self, impulse: f32, direction: Direction) {
        if self.is_dead() {
            return;
        }
        self.pending_knockback += direction.sign() * impulse;
    }

    /// Restore health up to max. No-op when dead. Returns amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_dead() {
            return 0;
        }
        let before = self.health.current;
        self.health.heal(amount);
        self.health.current - before
    }

    /// Combo count a hit landed at `now` would reach
    pub fn next_combo_count(&self, now: u64) -> u32 {
        let window = self.tuning.combo_window_ms;
        let chained = self.combo.count > 0
            && self
                .combo
                .last_hit_at
                .is_some_and(|at| now.saturating_sub(at) <= window);

        if chained {
            self.combo.count + 1
        } else {
            1
        }
    }

    /// Landed (unblocked) hit: increment within the combo window, else restart at 1
    pub fn record_landed_hit(&mut self, now: u64) -> u32 {
        self.combo.count = self.next_combo_count(now);
        self.combo.last_hit_at = Some(now);
        self.combo.count
    }

    pub(super) fn lapse_combo(&mut self, now: u64) {
        let window = self.tuning.combo_window_ms;
        if self
            .combo
            .last_hit_at
            .is_some_and(|at| now.saturating_sub(at) > window)
        {
            self.combo = ComboCounter::default();
        }
    }

    fn on_defeated(&mut self) {
        self.attack = None;
        self.dash = None;
        self.stun_until = None;
        self.intent = Default::default();
        self.pending_knockback = 0.0;
        self.push_cue(SoundCue::Death);
        self.refresh_action();
        logger::log_info(&format!("{} ({:?}) defeated", self.name, self.slot));
    }
}
