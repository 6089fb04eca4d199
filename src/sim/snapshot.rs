//! Read-only views handed to the renderer and HUD
//!
//! Built fresh each frame from [`RunState`]; serializes to JSON for the
//! page-side drawing code.

use glam::Vec2;
use serde::Serialize;

use super::lane::{EntityKind, LaneKind};
use super::state::{GamePhase, RunState};
use crate::consts::*;

/// Vertical draw position of the fly inside the home row (tiles)
const FLY_DRAW_Y: f32 = HOME_ROW as f32 - 0.05;

#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub x: f32,
    pub size: i32,
    pub kind: EntityKind,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaneView {
    pub row: i32,
    pub kind: LaneKind,
    pub speed: f32,
    pub entities: Vec<EntityView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActorView {
    pub col: i32,
    pub row: i32,
    pub alive: bool,
    /// Tile position including the sub-tile drift while riding
    pub pos: Vec2,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlyView {
    pub slot: usize,
    pub target: usize,
    pub progress: f32,
    pub pos: Vec2,
}

/// Numbers for the heads-up display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub lives: u8,
    pub level: u32,
    pub score: u64,
    pub high_score: u64,
    pub time_left: f32,
    /// time_left / level maximum, 0-1 (progress bar width)
    pub time_fraction: f32,
    /// Timer is low enough to flash
    pub time_warning: bool,
}

impl Hud {
    pub fn capture(state: &RunState) -> Self {
        let time_left = state.time_left.max(0.0);
        let time_fraction = if state.max_time > 0.0 {
            (time_left / state.max_time).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            lives: state.lives,
            level: state.level,
            score: state.score,
            high_score: state.high_score,
            time_left,
            time_fraction,
            time_warning: time_left <= TIME_WARNING,
        }
    }

    /// Whole seconds shown on the timer badge
    pub fn time_label(&self) -> String {
        format!("{}", self.time_left.ceil() as u32)
    }

    /// Zero-padded score line, e.g. `Score 0050 · Hi 0120`
    pub fn score_line(&self) -> String {
        format!("Score {:04} · Hi {:04}", self.score, self.high_score)
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub lanes: Vec<LaneView>,
    pub actor: ActorView,
    pub claimed: Vec<usize>,
    pub fly: Option<FlyView>,
    pub hud: Hud,
}

impl Snapshot {
    pub fn capture(state: &RunState) -> Self {
        let lanes = state
            .lanes
            .iter()
            .map(|lane| LaneView {
                row: lane.row,
                kind: lane.kind,
                speed: lane.speed,
                entities: lane
                    .entities
                    .iter()
                    .map(|e| EntityView {
                        x: e.x,
                        size: e.size,
                        kind: e.kind,
                        visible: e.is_visible(),
                    })
                    .collect(),
            })
            .collect();

        let actor = &state.actor;
        let fly = state.fly.as_ref().map(|f| FlyView {
            slot: f.slot,
            target: f.target,
            progress: f.progress,
            pos: Vec2::new(f.x(), FLY_DRAW_Y),
        });

        Self {
            phase: state.phase,
            lanes,
            actor: ActorView {
                col: actor.col,
                row: actor.row,
                alive: actor.alive,
                pos: Vec2::new(actor.col as f32 + actor.carry, actor.row as f32),
            },
            claimed: state.homes.claimed(),
            fly,
            hud: Hud::capture(state),
        }
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}
