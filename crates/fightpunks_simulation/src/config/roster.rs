//! Fighter attribute tables keyed by fighter name.
//!
//! JSON format: `{ "<name>": { "max_health": 100, "attack_damage": 15, ... } }`.
//! Every attribute is optional: a missing one resolves to the documented
//! default below and logs a warning. Values that make a fighter impossible to
//! build (zero health, non-positive weight, negative or non-finite numbers)
//! are rejected once, at spawn time.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RosterError, SpawnError};
use crate::logger;

/// Resolved, validated attribute set of one fighter. Immutable per match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FighterAttributes {
    pub max_health: u32,
    pub attack_damage: u32,
    pub defense: u32,
    /// Knockback divisor (heavier = pushed less)
    pub weight: f32,
    /// Walk speed, px/tick
    pub speed: f32,
    /// Initial upward velocity of a jump, px/tick
    pub jump_power: f32,
    /// Dash displacement, px/tick while the dash window is open
    pub dash_power: f32,
    /// Multiplier on attack hitbox width/height
    pub attack_range: f32,
}

impl FighterAttributes {
    pub const DEFAULT_MAX_HEALTH: u32 = 100;
    pub const DEFAULT_ATTACK_DAMAGE: u32 = 10;
    pub const DEFAULT_DEFENSE: u32 = 5;
    pub const DEFAULT_WEIGHT: f32 = 1.0;
    pub const DEFAULT_SPEED: f32 = 5.0;
    pub const DEFAULT_JUMP_POWER: f32 = 15.0;
    pub const DEFAULT_DASH_POWER: f32 = 12.0;
    pub const DEFAULT_ATTACK_RANGE: f32 = 1.0;

    /// Checks the attributes can drive a fighter.
    pub fn validate(&self, name: &str) -> Result<(), SpawnError> {
        let invalid = |attribute: &'static str, value: f64| SpawnError::InvalidAttribute {
            name: name.to_string(),
            attribute,
            value,
        };

        if self.max_health == 0 {
            return Err(invalid("max_health", 0.0));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(invalid("weight", self.weight as f64));
        }

        let non_negative = [
            ("speed", self.speed),
            ("jump_power", self.jump_power),
            ("dash_power", self.dash_power),
            ("attack_range", self.attack_range),
        ];
        for (attribute, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(attribute, value as f64));
            }
        }

        Ok(())
    }
}

impl Default for FighterAttributes {
    fn default() -> Self {
        Self {
            max_health: Self::DEFAULT_MAX_HEALTH,
            attack_damage: Self::DEFAULT_ATTACK_DAMAGE,
            defense: Self::DEFAULT_DEFENSE,
            weight: Self::DEFAULT_WEIGHT,
            speed: Self::DEFAULT_SPEED,
            jump_power: Self::DEFAULT_JUMP_POWER,
            dash_power: Self::DEFAULT_DASH_POWER,
            attack_range: Self::DEFAULT_ATTACK_RANGE,
        }
    }
}

/// Attribute table as it appears in config (every field optional)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeTable {
    pub max_health: Option<u32>,
    pub attack_damage: Option<u32>,
    pub defense: Option<u32>,
    pub weight: Option<f32>,
    pub speed: Option<f32>,
    pub jump_power: Option<f32>,
    pub dash_power: Option<f32>,
    pub attack_range: Option<f32>,
}

impl AttributeTable {
    /// Table with every field set to the documented default
    pub fn default_filled() -> Self {
        Self::from(FighterAttributes::default())
    }

    /// Fill missing attributes with defaults (logged), then validate.
    pub fn resolve(&self, name: &str) -> Result<FighterAttributes, SpawnError> {
        let defaults = FighterAttributes::default();
        let mut missing: Vec<&'static str> = Vec::new();

        fn pick<T: Copy>(value: Option<T>, default: T, key: &'static str, missing: &mut Vec<&'static str>) -> T {
            value.unwrap_or_else(|| {
                missing.push(key);
                default
            })
        }

        let attributes = FighterAttributes {
            max_health: pick(self.max_health, defaults.max_health, "max_health", &mut missing),
            attack_damage: pick(self.attack_damage, defaults.attack_damage, "attack_damage", &mut missing),
            defense: pick(self.defense, defaults.defense, "defense", &mut missing),
            weight: pick(self.weight, defaults.weight, "weight", &mut missing),
            speed: pick(self.speed, defaults.speed, "speed", &mut missing),
            jump_power: pick(self.jump_power, defaults.jump_power, "jump_power", &mut missing),
            dash_power: pick(self.dash_power, defaults.dash_power, "dash_power", &mut missing),
            attack_range: pick(self.attack_range, defaults.attack_range, "attack_range", &mut missing),
        };

        if !missing.is_empty() {
            logger::log_warning(&format!(
                "Roster: fighter '{}' missing attributes {:?}, using defaults",
                name, missing
            ));
        }

        attributes.validate(name)?;
        Ok(attributes)
    }
}

/// Stats/config collaborator: attribute tables keyed by fighter name
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FighterRoster {
    pub fighters: BTreeMap<String, AttributeTable>,
}

impl FighterRoster {
    pub fn from_json_str(json: &str) -> Result<Self, RosterError> {
        let roster: FighterRoster = serde_json::from_str(json)?;
        if roster.fighters.is_empty() {
            return Err(RosterError::Empty);
        }
        Ok(roster)
    }

    /// Built-in roster (Kevin, Fire Girl, training Dummy)
    pub fn builtin() -> Self {
        let mut fighters = BTreeMap::new();
        fighters.insert(
            "Kevin".to_string(),
            AttributeTable {
                max_health: Some(100),
                attack_damage: Some(12),
                defense: Some(6),
                weight: Some(1.2),
                speed: Some(5.0),
                jump_power: Some(15.0),
                dash_power: Some(12.0),
                attack_range: Some(1.0),
            },
        );
        fighters.insert(
            "Fire Girl".to_string(),
            AttributeTable {
                max_health: Some(90),
                attack_damage: Some(15),
                defense: Some(4),
                weight: Some(0.9),
                speed: Some(6.0),
                jump_power: Some(16.0),
                dash_power: Some(14.0),
                attack_range: Some(1.15),
            },
        );
        fighters.insert("Dummy".to_string(), AttributeTable::default_filled());
        Self { fighters }
    }

    pub fn insert(&mut self, name: impl Into<String>, table: AttributeTable) {
        self.fighters.insert(name.into(), table);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fighters.keys().map(String::as_str)
    }

    /// Resolve a fighter's attribute set. The only fallible step of fighter creation.
    pub fn attributes_for(&self, name: &str) -> Result<FighterAttributes, SpawnError> {
        let table = self
            .fighters
            .get(name)
            .ok_or_else(|| SpawnError::UnknownFighter(name.to_string()))?;
        table.resolve(name)
    }
}

impl From<FighterAttributes> for AttributeTable {
    fn from(d: FighterAttributes) -> Self {
        Self {
            max_health: Some(d.max_health),
            attack_damage: Some(d.attack_damage),
            defense: Some(d.defense),
            weight: Some(d.weight),
            speed: Some(d.speed),
            jump_power: Some(d.jump_power),
            dash_power: Some(d.dash_power),
            attack_range: Some(d.attack_range),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attributes_fall_back_to_defaults() {
        let roster = FighterRoster::from_json_str(r#"{ "Kevin": { "attack_damage": 15 } }"#).unwrap();
        let attributes = roster.attributes_for("Kevin").unwrap();

        assert_eq!(attributes.attack_damage, 15);
        assert_eq!(attributes.max_health, FighterAttributes::DEFAULT_MAX_HEALTH);
        assert_eq!(attributes.defense, FighterAttributes::DEFAULT_DEFENSE);
        assert_eq!(attributes.weight, FighterAttributes::DEFAULT_WEIGHT);
    }

    #[test]
    fn test_unknown_fighter_is_spawn_error() {
        let roster = FighterRoster::builtin();
        let err = roster.attributes_for("Nobody").unwrap_err();
        assert_eq!(err, SpawnError::UnknownFighter("Nobody".to_string()));
    }

    #[test]
    fn test_invalid_attributes_rejected() {
        let roster = FighterRoster::from_json_str(
            r#"{ "Ghost": { "max_health": 0 }, "Feather": { "weight": 0.0 }, "Slug": { "speed": -1.0 } }"#,
        )
        .unwrap();

        assert!(matches!(
            roster.attributes_for("Ghost"),
            Err(SpawnError::InvalidAttribute { attribute: "max_health", .. })
        ));
        assert!(matches!(
            roster.attributes_for("Feather"),
            Err(SpawnError::InvalidAttribute { attribute: "weight", .. })
        ));
        assert!(matches!(
            roster.attributes_for("Slug"),
            Err(SpawnError::InvalidAttribute { attribute: "speed", .. })
        ));
    }

    #[test]
    fn test_malformed_or_empty_roster() {
        assert!(matches!(FighterRoster::from_json_str("{ not json"), Err(RosterError::Parse(_))));
        assert!(matches!(FighterRoster::from_json_str("{}"), Err(RosterError::Empty)));
    }

    #[test]
    fn test_builtin_roster_resolves() {
        let roster = FighterRoster::builtin();
        for name in roster.names() {
            assert!(roster.attributes_for(name).is_ok(), "{} should resolve", name);
        }
        assert_eq!(roster.attributes_for("Dummy").unwrap(), FighterAttributes::default());
    }
}
