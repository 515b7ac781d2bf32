//! Combat resolver: attack-rect vs body-rect overlap → damage / block / defeat.
//!
//! Both directions are decided from one snapshot taken before any damage is
//! applied, then applied P1 first. A trade (both attack rects overlapping the
//! other's body on the same tick) therefore lands both hits even when the
//! first one is lethal.
//!
//! Raw damage = attack damage × profile scale × combo scale, where the combo
//! scale uses the count the strike would reach (first hit unscaled).

use crate::components::{Direction, FighterId};
use crate::config::{AttackProfile, AttackSlot};
use crate::fighter::Fighter;
use crate::logger;

use super::events::{CombatEvent, SoundCue};
use super::hitbox::{overlaps, Hitboxes};

/// Hit decided from the snapshot, applied later
#[derive(Debug, Clone, Copy)]
struct Strike {
    attacker: FighterId,
    slot: AttackSlot,
    profile: AttackProfile,
    attack_damage: u32,
    /// Combo multiplier for the count this strike reaches
    combo_scale: f32,
    /// Knockback direction (attacker's facing)
    facing: Direction,
}

impl Strike {
    fn raw_damage(&self) -> u32 {
        (self.attack_damage as f32 * self.profile.damage_scale * self.combo_scale)
            .floor()
            .max(0.0) as u32
    }
}

/// 1.0 for the first hit, +`step` for every chained one
pub fn combo_damage_scale(combo: u32, step: f32) -> f32 {
    1.0 + combo.saturating_sub(1) as f32 * step
}

/// Strike of `attacker` on `defender`, if its open window overlaps and hasn't landed yet
fn detect_strike(
    attacker: &Fighter,
    attacker_boxes: &Hitboxes,
    defender: &Fighter,
    defender_boxes: &Hitboxes,
    now: u64,
) -> Option<Strike> {
    let window = attacker.active_attack()?;
    if !attacker.can_hit(defender.id) || !overlaps(attacker_boxes.attack, defender_boxes.body) {
        return None;
    }
    let tuning = attacker.tuning();
    Some(Strike {
        attacker: attacker.id,
        slot: window.slot,
        profile: *tuning.attack(window.slot),
        attack_damage: attacker.attributes.attack_damage,
        combo_scale: combo_damage_scale(attacker.next_combo_count(now), tuning.combo_damage_step),
        facing: attacker.facing,
    })
}

/// Resolve one tick of combat between two fighters (`p1` applied first).
pub fn resolve(p1: &mut Fighter, p2: &mut Fighter, now: u64) -> Vec<CombatEvent> {
    let boxes1 = Hitboxes::of(p1);
    let boxes2 = Hitboxes::of(p2);

    let strike_on_p2 = detect_strike(p1, &boxes1, p2, &boxes2, now);
    let strike_on_p1 = detect_strike(p2, &boxes2, p1, &boxes1, now);

    // Регистрируем до урона: смерть закрывает окно атаки
    if strike_on_p2.is_some() {
        p1.register_hit(p2.id);
    }
    if strike_on_p1.is_some() {
        p2.register_hit(p1.id);
    }

    let mut events = Vec::new();
    if let Some(strike) = strike_on_p2 {
        apply_strike(strike, p1, p2, now, &mut events);
    }
    if let Some(strike) = strike_on_p1 {
        apply_strike(strike, p2, p1, now, &mut events);
    }
    events
}

fn apply_strike(strike: Strike, attacker: &mut Fighter, defender: &mut Fighter, now: u64, events: &mut Vec<CombatEvent>) {
    let raw = strike.raw_damage();
    let Some(report) = defender.apply_damage(raw, Some(strike.profile.knockback)) else {
        return;
    };

    if report.blocked {
        defender.push_cue(SoundCue::Block);
        events.push(CombatEvent::Blocked {
            attacker: strike.attacker,
            defender: defender.id,
            slot: strike.slot,
            damage: report.net,
        });
    } else {
        let combo = attacker.record_landed_hit(now);
        if let Some(impulse) = report.knockback {
            defender.queue_knockback(impulse, strike.facing);
        }
        if strike.profile.hitstun_ms > 0 {
            defender.apply_stun(strike.profile.hitstun_ms, now);
        }
        defender.push_cue(SoundCue::Hit);
        events.push(CombatEvent::Hit {
            attacker: strike.attacker,
            defender: defender.id,
            slot: strike.slot,
            damage: report.net,
            combo,
            knockback: report.knockback,
        });

        if combo > 1 {
            logger::log(&format!("{}: {} hit combo", attacker.name, combo));
        }
    }

    if report.defeated {
        events.push(CombatEvent::Defeated {
            fighter: defender.id,
            by: Some(strike.attacker),
        });
    }
}
