//! Animation state: per-fighter action → frame cursor.
//!
//! Ядро не держит картинки. Frame source (ассеты, рендер) отвечает только на
//! вопрос "сколько кадров у клипа (fighter, action)"; мы возвращаем `FrameRef`
//! (индекс кадра или placeholder). Gameplay timing от анимации не зависит:
//! окно атаки закрывается по часам, а не по последнему кадру.

use std::collections::{BTreeMap, BTreeSet};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::fighter::Fighter;
use crate::logger;


// ============================================================================
// Keys / frame refs
// ============================================================================

/// Animation clip key (closed set)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKey {
    Idle,
    Walk,
    Jump,
    Dash,
    Attack1,
    Attack2,
    Block,
    Stun,
    Death,
}

impl AnimationKey {
    /// Playback rate, frames per second
    pub fn fps(self) -> f32 {
        match self {
            AnimationKey::Idle => 8.0,
            AnimationKey::Walk => 12.0,
            AnimationKey::Jump => 10.0,
            AnimationKey::Dash => 20.0,
            AnimationKey::Attack1 => 16.0,
            AnimationKey::Attack2 => 12.0,
            AnimationKey::Block => 8.0,
            AnimationKey::Stun => 10.0,
            AnimationKey::Death => 8.0,
        }
    }

    /// Death и Jump держат последний кадр
    pub fn loops(self) -> bool {
        !matches!(self, AnimationKey::Death | AnimationKey::Jump)
    }
}

/// Что рендеру показать
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRef {
    Frame { key: AnimationKey, index: usize },
    /// Ни клипа, ни idle fallback
    Placeholder,
}

// ============================================================================
// Frame source (external collaborator)
// ============================================================================

/// Asset-side answer to "how many frames does (fighter, key) have". 0 = missing.
pub trait FrameSource: Send + Sync {
    fn frame_count(&self, fighter: &str, key: AnimationKey) -> usize;
}

/// In-memory frame counts keyed by fighter name (JSON-loadable).
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameCountTable {
    pub clips: BTreeMap<String, BTreeMap<AnimationKey, usize>>,
}

impl FrameCountTable {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, fighter: impl Into<String>, key: AnimationKey, frames: usize) {
        self.clips.entry(fighter.into()).or_default().insert(key, frames);
    }

    /// Frame counts of the bundled sprite sheets
    pub fn builtin() -> Self {
        let mut table = Self::default();
        let sheets: [(&str, [usize; 9]); 2] = [
            // idle walk jump dash atk1 atk2 block stun death
            ("Kevin", [8, 8, 6, 4, 6, 8, 4, 4, 7]),
            ("Fire Girl", [8, 10, 6, 4, 7, 9, 4, 4, 8]),
        ];
        let keys = [
            AnimationKey::Idle,
            AnimationKey::Walk,
            AnimationKey::Jump,
            AnimationKey::Dash,
            AnimationKey::Attack1,
            AnimationKey::Attack2,
            AnimationKey::Block,
            AnimationKey::Stun,
            AnimationKey::Death,
        ];
        for (fighter, counts) in sheets {
            for (key, frames) in keys.iter().zip(counts) {
                table.insert(fighter, *key, frames);
            }
        }
        // Training dummy: only an idle sheet
        table.insert("Dummy", AnimationKey::Idle, 1);
        table
    }
}

impl FrameSource for FrameCountTable {
    fn frame_count(&self, fighter: &str, key: AnimationKey) -> usize {
        self.clips
            .get(fighter)
            .and_then(|clips| clips.get(&key))
            .copied()
            .unwrap_or(0)
    }
}

/// Clip that will actually be shown: requested key, else idle, else nothing
fn resolve_clip(source: &dyn FrameSource, fighter: &str, key: AnimationKey) -> Option<(AnimationKey, usize)> {
    let frames = source.frame_count(fighter, key);
    if frames > 0 {
        return Some((key, frames));
    }
    let idle = source.frame_count(fighter, AnimationKey::Idle);
    (idle > 0).then_some((AnimationKey::Idle, idle))
}

// ============================================================================
// Player component
// ============================================================================

/// Frame cursor of one fighter
#[derive(Component, Debug, Clone, PartialEq)]
pub struct AnimationPlayer {
    key: AnimationKey,
    /// Fractional frame position
    cursor: f32,
    looping: bool,
    finished: bool,
    /// Clips already reported as missing
    warned_missing: BTreeSet<AnimationKey>,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self {
            key: AnimationKey::Idle,
            cursor: 0.0,
            looping: true,
            finished: false,
            warned_missing: BTreeSet::new(),
        }
    }
}

impl AnimationPlayer {
    pub fn key(&self) -> AnimationKey {
        self.key
    }

    pub fn frame_index(&self) -> usize {
        self.cursor as usize
    }

    /// True the first time `key` is reported missing for this player
    fn note_missing(&mut self, key: AnimationKey) -> bool {
        self.warned_missing.insert(key)
    }

    /// Switch clip. Cursor resets only on a key change or when `reset` is forced.
    pub fn set_action(&mut self, key: AnimationKey, reset: bool, looping: bool) {
        if key == self.key && !reset {
            return;
        }
        self.key = key;
        self.looping = looping;
        self.cursor = 0.0;
        self.finished = false;
    }

    /// cursor += fps × dt; wrap when looping, else clamp to last frame and finish
    pub fn advance(&mut self, dt_secs: f32, frame_count: usize) {
        if frame_count == 0 || self.finished {
            return;
        }

        let frames = frame_count as f32;
        self.cursor += self.key.fps() * dt_secs;
        if self.cursor >= frames {
            if self.looping {
                self.cursor %= frames;
            } else {
                self.cursor = frames - 1.0;
                self.finished = true;
            }
        }
    }

    /// Only non-looping clips at their last frame
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_frame(&self, source: &dyn FrameSource, fighter: &str) -> FrameRef {
        match resolve_clip(source, fighter, self.key) {
            Some((key, frames)) => FrameRef::Frame {
                key,
                index: self.frame_index().min(frames - 1),
            },
            None => FrameRef::Placeholder,
        }
    }
}

// ============================================================================
// Systems / plugin
// ============================================================================

/// System: action → clip, then advance by the fixed delta
pub fn sync_animations(
    mut fighters: Query<(&Fighter, &mut AnimationPlayer)>,
    frames: Res<FrameCountTable>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    for (fighter, mut player) in fighters.iter_mut() {
        let key = fighter.action().animation_key();
        player.set_action(key, false, key.loops());

        let clip = resolve_clip(&*frames, &fighter.name, key);
        if clip.map(|(k, _)| k) != Some(key) && player.note_missing(key) {
            logger::log_warning(&format!(
                "Animation: '{}' has no {:?} frames, falling back",
                fighter.name, key
            ));
        }

        player.advance(dt, clip.map(|(_, n)| n).unwrap_or(0));
    }
}

/// Animation plugin: frame table + sync system
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<FrameCountTable>() {
            app.insert_resource(FrameCountTable::builtin());
        }
        app.add_systems(
            FixedUpdate,
            sync_animations.in_set(crate::SimulationSet::Animation),
        );
    }
}
