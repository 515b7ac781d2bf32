//! Общие компоненты для симуляции
//!
//! Организация по доменам:
//! - actor: identity и health бойца (FighterId, PlayerSlot, Controller, Direction, Health)
//!
//! Сам `Fighter` живёт в `crate::fighter`, анимация в `crate::animation`.

pub mod actor;

// Re-exports для удобного импорта
pub use actor::*;
