//! Errors for the few fallible operations of the simulation.
//!
//! Gameplay refusals (attack while attacking, dash while stunned) are NOT
//! errors: they return `bool`. The only unrecoverable condition is failing to
//! build a fighter's attribute set, which surfaces once at spawn time.

use thiserror::Error;

/// Roster (fighter attribute table) loading errors.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to parse fighter roster JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fighter roster is empty")]
    Empty,
}

/// Fighter construction errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpawnError {
    #[error("unknown fighter '{0}'")]
    UnknownFighter(String),

    #[error("fighter '{name}': invalid attribute `{attribute}` = {value}")]
    InvalidAttribute {
        name: String,
        attribute: &'static str,
        value: f64,
    },

    #[error("slot {0:?} is already occupied")]
    SlotOccupied(crate::components::PlayerSlot),
}
