//! Run state and core simulation types
//!
//! Everything a run needs lives in [`RunState`]; [`super::tick`] is the only
//! thing that mutates it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::DeathCause;
use super::homes::{BonusFly, HomeSlots};
use super::lane::{Lane, build_lanes};
use crate::consts::*;
use crate::level_time_limit;

/// Phases the run can be in that a pause can return to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resume {
    Running,
    Respawning,
}

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start; nothing advances
    Idle,
    /// Active gameplay
    Running,
    /// Simulation frozen
    Paused { resume: Resume },
    /// Short non-interactive delay after a death with lives left
    Respawning,
    /// Lives exhausted; needs an explicit start
    GameOver,
}

impl GamePhase {
    /// Whether entities and the fly move this tick
    pub fn world_moves(self) -> bool {
        matches!(self, GamePhase::Running | GamePhase::Respawning)
    }

    /// Whether the simulation clock advances (scheduled events can fire)
    pub fn clock_runs(self) -> bool {
        matches!(
            self,
            GamePhase::Running | GamePhase::Respawning | GamePhase::GameOver
        )
    }
}

/// Deferred work fired by the tick loop once the clock reaches `fire_at`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScheduledKind {
    /// Put a fresh actor on the start row and resume play
    Respawn,
    /// Tell the shell the run is over (final score dialog)
    GameOverNotice,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scheduled {
    pub kind: ScheduledKind,
    /// Simulation clock time (seconds)
    pub fire_at: f64,
}

/// Outbound notifications for the shell (audio, HUD, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Accepted movement step
    Moved,
    /// A run or level (re)started
    LevelStarted { level: u32 },
    Died { cause: DeathCause },
    SlotClaimed { slot: usize },
    BonusCollected { slot: usize },
    LevelCleared { level: u32 },
    /// A run ended with a better score than the stored best; persist it
    NewHighScore { score: u64 },
    /// Fired shortly after game over
    GameOverNotice { score: u64, high_score: u64 },
}

/// The player-controlled actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub col: i32,
    pub row: i32,
    pub alive: bool,
    /// Fractional drift accumulated while riding a carrier (tiles, signed)
    pub carry: f32,
}

impl Actor {
    /// Fresh actor on the start tile
    pub fn spawn() -> Self {
        Self {
            col: START_COL,
            row: START_ROW,
            alive: true,
            carry: 0.0,
        }
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::spawn()
    }
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct RunState {
    /// Seed the run RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub level: u32,
    pub lives: u8,
    pub score: u64,
    /// Best score known to the shell; raised when a run ends above it
    pub high_score: u64,
    /// Seconds left for the current life
    pub time_left: f32,
    /// Timer ceiling for the current level
    pub max_time: f32,
    /// Simulation clock in seconds; frozen while idle or paused
    pub clock: f64,
    /// At most one deferred event is ever pending
    pub pending: Option<Scheduled>,
    pub actor: Actor,
    pub lanes: Vec<Lane>,
    pub homes: HomeSlots,
    pub fly: Option<BonusFly>,
    /// Events produced since the shell last drained them
    events: Vec<GameEvent>,
}

impl RunState {
    /// Create an idle run showing level 1
    pub fn new(seed: u64, high_score: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            level: 1,
            lives: START_LIVES,
            score: 0,
            high_score,
            time_left: level_time_limit(1),
            max_time: level_time_limit(1),
            clock: 0.0,
            pending: None,
            actor: Actor::spawn(),
            lanes: Vec::new(),
            homes: HomeSlots::new(),
            fly: None,
            events: Vec::new(),
        };
        state.reset_level();
        state
    }

    /// Rebuild lanes, homes, actor, timer and fly for the current level
    pub fn reset_level(&mut self) {
        self.lanes = build_lanes(self.level, &mut self.rng);
        self.homes.clear();
        self.actor = Actor::spawn();
        self.max_time = level_time_limit(self.level);
        self.time_left = self.max_time;
        self.fly = None;
    }

    /// Put the next deferred event on the schedule, replacing any other
    pub(crate) fn schedule(&mut self, kind: ScheduledKind, delay: f64) {
        if let Some(prev) = self.pending {
            log::warn!("Replacing pending {:?} with {:?}", prev.kind, kind);
        }
        self.pending = Some(Scheduled {
            kind,
            fire_at: self.clock + delay,
        });
    }

    /// Take the pending event if its time has come
    pub(crate) fn take_due(&mut self) -> Option<ScheduledKind> {
        match self.pending {
            Some(s) if self.clock >= s.fire_at => {
                self.pending = None;
                Some(s.kind)
            }
            _ => None,
        }
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand over queued events (audio cues, HUD, persistence)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued but not yet drained
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_is_idle_on_level_one() {
        let state = RunState::new(1, 120);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 120);
        assert_eq!(state.time_left, 45.0);
        assert_eq!(state.lanes.len(), 11);
        assert_eq!(state.actor, Actor::spawn());
        assert_eq!(state.actor.col, 7);
        assert_eq!(state.actor.row, 14);
        assert!(state.pending.is_none());
    }

    #[test]
    fn test_schedule_and_take_due() {
        let mut state = RunState::new(1, 0);
        state.clock = 2.0;
        state.schedule(ScheduledKind::Respawn, 0.3);
        assert_eq!(state.take_due(), None);
        state.clock = 2.29;
        assert_eq!(state.take_due(), None);
        state.clock = 2.3;
        assert_eq!(state.take_due(), Some(ScheduledKind::Respawn));
        assert!(state.pending.is_none());
        assert_eq!(state.take_due(), None);
    }

    #[test]
    fn test_reset_level_uses_level_timer() {
        let mut state = RunState::new(3, 0);
        state.level = 4;
        state.homes.land(1);
        state.actor.row = 3;
        state.reset_level();
        assert_eq!(state.max_time, 36.0);
        assert_eq!(state.time_left, 36.0);
        assert_eq!(state.homes.claimed_count(), 0);
        assert_eq!(state.actor, Actor::spawn());
    }

    #[test]
    fn test_drain_events() {
        let mut state = RunState::new(1, 0);
        state.emit(GameEvent::Moved);
        state.emit(GameEvent::SlotClaimed { slot: 2 });
        assert_eq!(state.pending_events().len(), 2);
        let events = state.drain_events();
        assert_eq!(events.len(), 2);
        assert!(state.drain_events().is_empty());
    }
}
