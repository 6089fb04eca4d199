//! Demo-mode player
//!
//! Looks at the board at the current instant and picks one movement step:
//! hop forward when the tile ahead will hold, dodge sideways when the current
//! tile is about to be lost, otherwise wait.

use super::collision::{Support, river_support};
use super::grid::{Direction, RowBand, column_in_bounds, slot_for_column};
use super::lane::{EntityKind, Lane, lane_at, turtle_surfaced};
use super::state::{GamePhase, RunState};
use super::tick::TickInput;
use crate::consts::*;

/// Seconds between autopilot moves
pub const STEP_INTERVAL: f32 = 0.15;

/// How far ahead (seconds) a tile must stay safe
const HORIZON: f32 = 0.45;

/// Whether traffic will cross `col` within the horizon
fn road_clear(lane: &Lane, col: i32, horizon: f32) -> bool {
    lane.entities.iter().all(|e| {
        let later = e.x + e.speed * horizon;
        let left = e.x.min(later).floor() as i32;
        let right = e.x.max(later).floor() as i32 + e.size - 1;
        !(left..=right).contains(&col)
    })
}

/// Whether a carrier under `col` will still be there (and surfaced) after the horizon
fn river_holds(lane: &Lane, col: i32, horizon: f32) -> bool {
    if !matches!(river_support(lane, col), Support::Carrier { .. }) {
        return false;
    }
    // Riding drifts us toward the edge; refuse tiles that sweep us off
    let drift = (lane.speed * horizon).round() as i32;
    if !column_in_bounds(col + drift) {
        return false;
    }
    lane.entities.iter().any(|e| {
        e.covers(col)
            && match e.kind {
                EntityKind::Turtle { phase } => {
                    e.is_visible() && turtle_surfaced(phase + horizon * TURTLE_PHASE_RATE)
                }
                _ => true,
            }
    })
}

/// Whether standing on (col, row) survives the horizon
pub fn tile_safe(state: &RunState, col: i32, row: i32) -> bool {
    if !column_in_bounds(col) {
        return false;
    }
    match RowBand::of(row) {
        RowBand::Home => !state.homes.is_claimed(slot_for_column(col)),
        RowBand::River => lane_at(&state.lanes, row).is_some_and(|l| river_holds(l, col, HORIZON)),
        RowBand::Road => lane_at(&state.lanes, row).is_some_and(|l| road_clear(l, col, HORIZON)),
        RowBand::Safe | RowBand::Start => true,
        RowBand::Verge => false,
    }
}

/// Pick a movement for the current board, if any
pub fn choose(state: &RunState) -> Option<Direction> {
    if state.phase != GamePhase::Running || !state.actor.alive {
        return None;
    }

    let (col, row) = (state.actor.col, state.actor.row);
    let safe = |dir: Direction| {
        let (dc, dr) = dir.delta();
        tile_safe(state, col + dc, row + dr)
    };

    if row > HOME_ROW && safe(Direction::Up) {
        return Some(Direction::Up);
    }

    // Next to a filled home: slide toward the nearest free slot
    if row - 1 == HOME_ROW {
        if let Some(dir) = toward_free_slot(state, col).filter(|d| safe(*d)) {
            return Some(dir);
        }
    }

    if tile_safe(state, col, row) {
        return None;
    }

    [Direction::Left, Direction::Right, Direction::Down]
        .into_iter()
        .find(|dir| safe(*dir))
}

fn toward_free_slot(state: &RunState, col: i32) -> Option<Direction> {
    let target = (0..COLS)
        .filter(|c| !state.homes.is_claimed(slot_for_column(*c)))
        .min_by_key(|c| (c - col).abs())?;
    match target.cmp(&col) {
        std::cmp::Ordering::Less => Some(Direction::Left),
        std::cmp::Ordering::Greater => Some(Direction::Right),
        std::cmp::Ordering::Equal => None,
    }
}

/// Paced autopilot that produces full tick inputs, starting runs as needed
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    cooldown: f32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&mut self, state: &RunState, dt: f32) -> TickInput {
        if matches!(state.phase, GamePhase::Idle) {
            return TickInput {
                start: true,
                ..Default::default()
            };
        }

        self.cooldown -= dt;
        if self.cooldown > 0.0 {
            return TickInput::default();
        }

        match choose(state) {
            Some(dir) => {
                self.cooldown = STEP_INTERVAL;
                TickInput {
                    movement: Some(dir),
                    ..Default::default()
                }
            }
            None => TickInput::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ScheduledKind;
    use crate::sim::tick::tick;

    fn running(seed: u64) -> RunState {
        let mut state = RunState::new(seed, 0);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            0.0,
        );
        state
    }

    #[test]
    fn test_waits_when_not_running() {
        let state = RunState::new(1, 0);
        assert_eq!(choose(&state), None);
    }

    #[test]
    fn test_steps_up_from_start_when_road_clear() {
        let mut state = running(2);
        for lane in &mut state.lanes {
            lane.entities.clear();
        }
        assert_eq!(choose(&state), Some(Direction::Up));
    }

    #[test]
    fn test_refuses_occupied_home() {
        let mut state = running(3);
        state.homes.land(2);
        assert!(!tile_safe(&state, 7, HOME_ROW));
        assert!(tile_safe(&state, 0, HOME_ROW));
        // Columns 5 and 9 are equally close; the lower one wins
        assert_eq!(toward_free_slot(&state, 7), Some(Direction::Left));
        assert_eq!(toward_free_slot(&state, 8), Some(Direction::Right));
    }

    #[test]
    fn test_road_clear_looks_ahead() {
        let state = running(4);
        let mut lane = lane_at(&state.lanes, ROAD_FIRST_ROW).unwrap().clone();
        lane.entities.truncate(1);
        lane.entities[0].x = 3.0;
        lane.entities[0].speed = 2.0;
        // Now at 3, in 0.45s at 3.9: sweeps tile 3 only
        assert!(!road_clear(&lane, 3, HORIZON));
        assert!(road_clear(&lane, 4, HORIZON));
        lane.entities[0].speed = 4.0;
        // Reaches 4.8 within the horizon
        assert!(!road_clear(&lane, 4, HORIZON));
    }

    #[test]
    fn test_demo_run_keeps_invariants() {
        let mut state = RunState::new(77, 0);
        let mut pilot = Autopilot::new();
        let dt = 1.0 / 60.0;
        let mut prev_score = 0;

        // Five simulated minutes
        for _ in 0..(60 * 300) {
            let input = pilot.input(&state, dt);
            tick(&mut state, &input, dt);
            state.drain_events();

            // A single run: the loop stops at game over, so nothing resets the score
            assert!(state.score >= prev_score);
            prev_score = state.score;
            assert!(state.lives <= START_LIVES);
            assert!(state.time_left <= state.max_time);
            if state.phase == GamePhase::Respawning {
                assert_eq!(state.pending.map(|s| s.kind), Some(ScheduledKind::Respawn));
            }
            if state.phase == GamePhase::Running {
                assert!(state.actor.alive);
                assert!(column_in_bounds(state.actor.col));
                assert!((HOME_ROW..=START_ROW).contains(&state.actor.row));
            }
            for lane in &state.lanes {
                for e in &lane.entities {
                    assert!(e.x >= -WRAP_MARGIN && e.x <= COLS as f32 + WRAP_MARGIN);
                }
            }
            if state.is_over() {
                break;
            }
        }

        assert!(state.clock > 0.0);
    }
}
