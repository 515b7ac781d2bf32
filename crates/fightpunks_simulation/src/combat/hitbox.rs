//! Hitbox geometry (2D AABB, screen coordinates)
//!
//! Архитектура:
//! - Body rect: ширина по центру x, высота вверх от feet line (y растёт вниз)
//! - Attack rect существует только пока открыт attack window, иначе пустой
//! - Пересчитывается каждый тик из transform + AttackProfile, не хранится
//! - Пустой rect (zero area) ни с чем не пересекается

use bevy::prelude::*;

use crate::config::{AttackProfile, CombatTuning};
use crate::fighter::Fighter;

/// Прямоугольники бойца на текущий тик
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hitboxes {
    pub body: Rect,
    pub attack: Rect,
}

impl Default for Hitboxes {
    fn default() -> Self {
        Self {
            body: Rect::EMPTY,
            attack: Rect::EMPTY,
        }
    }
}

impl Hitboxes {
    pub fn of(fighter: &Fighter) -> Self {
        Self {
            body: body_rect(fighter.position, fighter.tuning()),
            attack: attack_rect(fighter),
        }
    }

    pub fn attack_active(&self) -> bool {
        !is_empty(self.attack)
    }
}

/// Body rectangle: feet point at bottom center
pub fn body_rect(position: Vec2, tuning: &CombatTuning) -> Rect {
    let half_width = tuning.body_width * 0.5;
    Rect::new(
        position.x - half_width,
        position.y - tuning.body_height,
        position.x + half_width,
        position.y,
    )
}

/// Attack rectangle of a given profile, mirrored by `facing_sign`
pub fn profile_rect(position: Vec2, facing_sign: f32, profile: &AttackProfile, attack_range: f32) -> Rect {
    let center = Vec2::new(
        position.x + facing_sign * profile.offset_x,
        position.y - profile.offset_y,
    );
    let size = Vec2::new(profile.width, profile.height) * attack_range;
    if size.x <= 0.0 || size.y <= 0.0 {
        return Rect::EMPTY;
    }
    Rect::from_center_size(center, size)
}

/// Active attack rectangle, empty when no attack window is open
pub fn attack_rect(fighter: &Fighter) -> Rect {
    match fighter.active_attack_profile() {
        Some(profile) => profile_rect(
            fighter.position,
            fighter.facing.sign(),
            profile,
            fighter.attributes.attack_range,
        ),
        None => Rect::EMPTY,
    }
}

pub fn is_empty(rect: Rect) -> bool {
    rect.is_empty()
}

/// Strict overlap: touching edges and empty rects don't count
pub fn overlaps(a: Rect, b: Rect) -> bool {
    if is_empty(a) || is_empty(b) {
        return false;
    }
    !a.intersect(b).is_empty()
}

/// System: пересчёт hitbox'ов после fighter tick
pub fn update_hitboxes(mut fighters: Query<(&Fighter, &mut Hitboxes)>) {
    for (fighter, mut hitboxes) in fighters.iter_mut() {
        *hitboxes = Hitboxes::of(fighter);
    }
}
