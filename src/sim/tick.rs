//! Per-frame simulation tick
//!
//! The run state machine: applies input intents, fires scheduled events,
//! moves the world, resolves collisions and runs the timer.

use super::collision::{DeathCause, resolve_actor};
use super::grid::{Direction, RowBand, slot_for_column};
use super::homes::{Landing, update_fly};
use super::state::{Actor, GameEvent, GamePhase, Resume, RunState, ScheduledKind};
use crate::consts::*;

/// Input intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// One movement step (arrow key / swipe)
    pub movement: Option<Direction>,
    /// Start or restart the run
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the run by one frame of `dt` seconds (clamped to `MAX_FRAME_DT`)
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };

    if input.start {
        start_run(state);
    }

    if input.pause {
        toggle_pause(state);
    }

    if let Some(dir) = input.movement {
        move_actor(state, dir);
    }

    if !state.phase.clock_runs() {
        return;
    }

    state.clock += dt as f64;
    fire_due_events(state);

    if state.phase.world_moves() {
        for lane in &mut state.lanes {
            lane.advance(dt);
        }
        // Zero-length frames advance nothing, including the spawn roll
        if dt > 0.0 {
            update_fly(&mut state.fly, &state.homes, dt, &mut state.rng);
        }
    }

    if state.phase == GamePhase::Running {
        if let Some(cause) = resolve_actor(&state.lanes, &mut state.actor, dt) {
            kill_actor(state, cause);
        }
    }

    if state.phase == GamePhase::Running {
        state.time_left -= dt;
        if state.time_left <= 0.0 {
            kill_actor(state, DeathCause::TimeUp);
            state.time_left = state.max_time;
        }
    }
}

/// Start a run. With no lives left this is a fresh run; otherwise the
/// current level is rebuilt keeping score and lives.
pub fn start_run(state: &mut RunState) {
    if state.lives == 0 {
        state.level = 1;
        state.score = 0;
        state.lives = START_LIVES;
    }
    state.reset_level();
    state.pending = None;
    state.phase = GamePhase::Running;
    log::info!(
        "Run started: level {}, lives {}, score {}",
        state.level,
        state.lives,
        state.score
    );
    state.emit(GameEvent::LevelStarted { level: state.level });
}

/// Pause from Running/Respawning, resume to whichever it came from
pub fn toggle_pause(state: &mut RunState) {
    state.phase = match state.phase {
        GamePhase::Running => GamePhase::Paused {
            resume: Resume::Running,
        },
        GamePhase::Respawning => GamePhase::Paused {
            resume: Resume::Respawning,
        },
        GamePhase::Paused { resume } => match resume {
            Resume::Running => GamePhase::Running,
            Resume::Respawning => GamePhase::Respawning,
        },
        other => other,
    };
}

/// Apply one movement step. Ignored unless Running.
pub fn move_actor(state: &mut RunState, dir: Direction) {
    if state.phase != GamePhase::Running || !state.actor.alive {
        return;
    }

    let (dc, dr) = dir.delta();
    let col = (state.actor.col + dc).clamp(0, COLS - 1);
    let row = (state.actor.row + dr).clamp(HOME_ROW, START_ROW);
    if (col, row) == (state.actor.col, state.actor.row) {
        return;
    }

    state.actor.col = col;
    state.actor.row = row;
    state.emit(GameEvent::Moved);

    if RowBand::of(row) == RowBand::Home {
        land_home(state);
    }
}

/// Resolve the actor reaching the home row
fn land_home(state: &mut RunState) {
    let slot = slot_for_column(state.actor.col);
    match state.homes.land(slot) {
        Landing::Occupied { .. } => kill_actor(state, DeathCause::HomeOccupied),
        Landing::Claimed { slot } => {
            state.score += SLOT_POINTS;
            state.time_left = (state.time_left + SLOT_TIME_BONUS).min(state.max_time);
            state.emit(GameEvent::SlotClaimed { slot });

            if state.fly.as_ref().is_some_and(|f| f.slot == slot) {
                state.score += BONUS_POINTS;
                state.fly = None;
                state.emit(GameEvent::BonusCollected { slot });
            }

            state.actor = Actor::spawn();

            if state.homes.all_claimed() {
                advance_level(state);
            }
        }
    }
}

/// All homes filled: next level with a fresh board
fn advance_level(state: &mut RunState) {
    let cleared = state.level;
    state.level += 1;
    state.score += LEVEL_CLEAR_POINTS;
    state.reset_level();
    log::info!(
        "Level {} cleared, starting level {} (score {})",
        cleared,
        state.level,
        state.score
    );
    state.emit(GameEvent::LevelCleared { level: cleared });
    state.emit(GameEvent::LevelStarted { level: state.level });
}

/// The single death transition. Only a live actor in a running game can die.
pub fn kill_actor(state: &mut RunState, cause: DeathCause) {
    if state.phase != GamePhase::Running || !state.actor.alive {
        return;
    }

    state.actor.alive = false;
    state.lives = state.lives.saturating_sub(1);
    log::debug!(
        "Died ({:?}) at col {} row {}, {} lives left",
        cause,
        state.actor.col,
        state.actor.row,
        state.lives
    );
    state.emit(GameEvent::Died { cause });

    if state.lives > 0 {
        state.phase = GamePhase::Respawning;
        state.schedule(ScheduledKind::Respawn, RESPAWN_DELAY);
    } else {
        state.phase = GamePhase::GameOver;
        if state.score > state.high_score {
            state.high_score = state.score;
            state.emit(GameEvent::NewHighScore { score: state.score });
        }
        log::info!(
            "Game over at level {}: score {} (best {})",
            state.level,
            state.score,
            state.high_score
        );
        state.schedule(ScheduledKind::GameOverNotice, GAME_OVER_NOTICE_DELAY);
    }
}

fn fire_due_events(state: &mut RunState) {
    while let Some(kind) = state.take_due() {
        match kind {
            ScheduledKind::Respawn => {
                if state.phase == GamePhase::Respawning {
                    state.actor = Actor::spawn();
                    state.phase = GamePhase::Running;
                }
            }
            ScheduledKind::GameOverNotice => {
                let (score, high_score) = (state.score, state.high_score);
                state.emit(GameEvent::GameOverNotice { score, high_score });
            }
        }
    }
}
