//! Session statistics, built only from emitted events.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::CombatEvent;
use crate::components::{FighterId, PlayerSlot};
use crate::fighter::Fighter;
use crate::rounds::RoundEvent;
use crate::SimulationSet;

/// In-memory counters for the running session
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub matches_played: u32,
    /// Match wins per slot [P1, P2]
    pub match_wins: [u32; 2],
    pub match_draws: u32,
    pub rounds_played: u32,
    pub longest_combo: u32,
    /// Net damage dealt per slot (blocked chip damage included)
    pub damage_dealt: [u64; 2],
}

impl MatchStats {
    pub fn record_damage(&mut self, attacker: PlayerSlot, damage: u32) {
        self.damage_dealt[attacker.index()] += u64::from(damage);
    }

    pub fn record_combo(&mut self, combo: u32) {
        self.longest_combo = self.longest_combo.max(combo);
    }

    pub fn record_round(&mut self) {
        self.rounds_played += 1;
    }

    pub fn record_match(&mut self, winner: Option<PlayerSlot>) {
        self.matches_played += 1;
        match winner {
            Some(slot) => self.match_wins[slot.index()] += 1,
            None => self.match_draws += 1,
        }
    }

    pub fn total_damage(&self) -> u64 {
        self.damage_dealt.iter().sum()
    }
}

/// System: CombatEvent / RoundEvent → MatchStats
pub fn update_match_stats(
    mut stats: ResMut<MatchStats>,
    mut combat_events: EventReader<CombatEvent>,
    mut round_events: EventReader<RoundEvent>,
    fighters: Query<&Fighter>,
) {
    let slot_of = |id: FighterId| fighters.iter().find(|f| f.id == id).map(|f| f.slot);

    for event in combat_events.read() {
        match event {
            CombatEvent::Hit { attacker, damage, combo, .. } => {
                if let Some(slot) = slot_of(*attacker) {
                    stats.record_damage(slot, *damage);
                }
                stats.record_combo(*combo);
            }
            CombatEvent::Blocked { attacker, damage, .. } => {
                if let Some(slot) = slot_of(*attacker) {
                    stats.record_damage(slot, *damage);
                }
            }
            CombatEvent::Defeated { .. } => {}
        }
    }

    for event in round_events.read() {
        match event {
            RoundEvent::RoundEnded { .. } => stats.record_round(),
            RoundEvent::MatchEnded { winner, .. } => stats.record_match(*winner),
            _ => {}
        }
    }
}

pub struct StatsPlugin;

impl Plugin for StatsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MatchStats>().add_systems(
            FixedUpdate,
            update_match_stats
                .after(crate::rounds::round_flow)
                .in_set(SimulationSet::Rounds),
        );
    }
}
