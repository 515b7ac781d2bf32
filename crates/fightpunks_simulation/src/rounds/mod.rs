//! Round flow: Intro → Active → RoundEnd → (Intro | MatchEnd).
//!
//! Переходы считаются чистой функцией `RoundState::advance` по показаниям
//! `MatchClock` и снимку здоровья бойцов; ECS система `round_flow` только
//! собирает снимок, сбрасывает бойцов на новом раунде и пишет `RoundEvent`.

use bevy::prelude::*;

use crate::components::PlayerSlot;
use crate::config::MatchConfig;
use crate::fighter::Fighter;
use crate::logger;
use crate::{MatchClock, SimulationSet};

#[cfg(test)]
mod rounds_tests;

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum RoundEndReason {
    Knockout,
    DoubleKnockout,
    Timeout,
}

/// Итог раунда. `winner == None` = draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct RoundOutcome {
    pub winner: Option<PlayerSlot>,
    pub reason: RoundEndReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum RoundPhase {
    /// Countdown до начала раунда
    Intro { until: u64 },
    Active,
    RoundEnd { until: u64, outcome: RoundOutcome },
    MatchEnd { winner: Option<PlayerSlot> },
}

/// Health snapshot of one side, taken each tick for the round checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideStatus {
    pub health: u32,
    pub alive: bool,
}

impl SideStatus {
    pub fn of(fighter: &Fighter) -> Self {
        Self {
            health: fighter.health.current,
            alive: !fighter.is_dead(),
        }
    }
}

/// События round flow (HUD, stats, audio)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum RoundEvent {
    RoundStarted { round: u32 },
    RoundEnded { round: u32, outcome: RoundOutcome },
    /// Бойцы сброшены, начинается intro следующего раунда
    NextRound { round: u32 },
    MatchEnded { winner: Option<PlayerSlot>, wins: [u32; 2] },
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RoundState {
    pub phase: RoundPhase,
    /// 1-based
    pub round: u32,
    /// Round wins per slot [P1, P2]
    pub wins: [u32; 2],
    pub started_at: u64,
    pub elapsed_ms: u64,
    pub time_limit_ms: u64,
    paused: bool,
}

impl RoundState {
    /// Round 1 intro, starting at `now`
    pub fn new(config: &MatchConfig, now: u64) -> Self {
        Self {
            phase: RoundPhase::Intro {
                until: now.saturating_add(config.intro_ms),
            },
            round: 1,
            wins: [0, 0],
            started_at: now,
            elapsed_ms: 0,
            time_limit_ms: config.round_time_ms,
            paused: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    pub fn is_match_over(&self) -> bool {
        matches!(self.phase, RoundPhase::MatchEnd { .. })
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze clock and every fighter system
    pub fn pause(&mut self) {
        if !self.paused && !self.is_match_over() {
            self.paused = true;
            logger::log_info("Match paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            logger::log_info("Match resumed");
        }
    }

    pub fn remaining_ms(&self) -> u64 {
        self.time_limit_ms.saturating_sub(self.elapsed_ms)
    }

    /// Advance the phase machine. Returns the events of this step.
    pub fn advance(&mut self, now: u64, sides: [SideStatus; 2], config: &MatchConfig) -> Vec<RoundEvent> {
        let mut events = Vec::new();

        match self.phase {
            RoundPhase::Intro { until } => {
                if now >= until {
                    self.phase = RoundPhase::Active;
                    self.started_at = now;
                    self.elapsed_ms = 0;
                    events.push(RoundEvent::RoundStarted { round: self.round });
                }
            }
            RoundPhase::Active => {
                self.elapsed_ms = now.saturating_sub(self.started_at);
                if let Some(outcome) = self.check_round_over(sides) {
                    if let Some(winner) = outcome.winner {
                        self.wins[winner.index()] += 1;
                    }
                    self.phase = RoundPhase::RoundEnd {
                        until: now.saturating_add(config.round_end_ms),
                        outcome,
                    };
                    logger::log_info(&format!(
                        "Round {} over: {:?} ({:?}), wins {:?}",
                        self.round, outcome.winner, outcome.reason, self.wins
                    ));
                    events.push(RoundEvent::RoundEnded {
                        round: self.round,
                        outcome,
                    });
                }
            }
            RoundPhase::RoundEnd { until, .. } => {
                if now >= until {
                    if self.match_decided(config) {
                        let winner = self.match_winner();
                        self.phase = RoundPhase::MatchEnd { winner };
                        logger::log_info(&format!("Match over: winner {:?}, wins {:?}", winner, self.wins));
                        events.push(RoundEvent::MatchEnded {
                            winner,
                            wins: self.wins,
                        });
                    } else {
                        self.round += 1;
                        self.elapsed_ms = 0;
                        self.phase = RoundPhase::Intro {
                            until: now.saturating_add(config.intro_ms),
                        };
                        events.push(RoundEvent::NextRound { round: self.round });
                    }
                }
            }
            RoundPhase::MatchEnd { .. } => {}
        }

        events
    }

    /// KO beats timeout; double KO is a draw; timeout compares health
    fn check_round_over(&self, [p1, p2]: [SideStatus; 2]) -> Option<RoundOutcome> {
        let outcome = |winner, reason| Some(RoundOutcome { winner, reason });

        match (p1.alive, p2.alive) {
            (false, false) => outcome(None, RoundEndReason::DoubleKnockout),
            (true, false) => outcome(Some(PlayerSlot::P1), RoundEndReason::Knockout),
            (false, true) => outcome(Some(PlayerSlot::P2), RoundEndReason::Knockout),
            (true, true) if self.elapsed_ms >= self.time_limit_ms => {
                let winner = match p1.health.cmp(&p2.health) {
                    std::cmp::Ordering::Greater => Some(PlayerSlot::P1),
                    std::cmp::Ordering::Less => Some(PlayerSlot::P2),
                    std::cmp::Ordering::Equal => None,
                };
                outcome(winner, RoundEndReason::Timeout)
            }
            _ => None,
        }
    }

    fn match_decided(&self, config: &MatchConfig) -> bool {
        self.wins.iter().any(|w| *w >= config.rounds_to_win) || self.round >= config.max_rounds
    }

    fn match_winner(&self) -> Option<PlayerSlot> {
        match self.wins[0].cmp(&self.wins[1]) {
            std::cmp::Ordering::Greater => Some(PlayerSlot::P1),
            std::cmp::Ordering::Less => Some(PlayerSlot::P2),
            std::cmp::Ordering::Equal => None,
        }
    }
}

// ============================================================================
// Run conditions
// ============================================================================

/// Input и combat работают только в Active фазе
pub fn round_active(state: Option<Res<RoundState>>) -> bool {
    state.is_some_and(|s| s.is_active() && !s.is_paused())
}

/// Весь FixedUpdate pipeline стоит на паузе
pub fn simulation_running(state: Option<Res<RoundState>>) -> bool {
    state.is_none_or(|s| !s.is_paused())
}

// ============================================================================
// Systems
// ============================================================================

/// System: phase machine, intent сброс на конец раунда, сброс бойцов на новый раунд
pub fn round_flow(
    mut state: ResMut<RoundState>,
    mut fighters: Query<&mut Fighter>,
    clock: Res<MatchClock>,
    config: Res<MatchConfig>,
    mut round_events: EventWriter<RoundEvent>,
) {
    let mut sides = [SideStatus { health: 0, alive: false }; 2];
    let mut seen = [false; 2];
    for fighter in fighters.iter() {
        sides[fighter.slot.index()] = SideStatus::of(fighter);
        seen[fighter.slot.index()] = true;
    }
    if !seen.iter().all(|s| *s) {
        // Матч без двух бойцов не начинается
        return;
    }

    for event in state.advance(clock.now(), sides, &config) {
        match event {
            // Input в RoundEnd не доходит: отпустить клавиши некому
            RoundEvent::RoundEnded { .. } => {
                for mut fighter in fighters.iter_mut() {
                    fighter.clear_intent();
                }
            }
            RoundEvent::NextRound { round } => {
                for mut fighter in fighters.iter_mut() {
                    fighter.reset_for_round();
                }
                logger::log_info(&format!("Round {} intro", round));
            }
            _ => {}
        }
        round_events.write(event);
    }
}

/// Round Plugin
pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MatchConfig>().add_event::<RoundEvent>();

        if !app.world().contains_resource::<RoundState>() {
            let config = app.world().resource::<MatchConfig>().clone();
            app.insert_resource(RoundState::new(&config, 0));
        }

        app.add_systems(FixedUpdate, round_flow.in_set(SimulationSet::Rounds));
    }
}
