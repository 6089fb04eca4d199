//! Grid geometry: row bands, movement directions, home slot lookup
//!
//! Every branch on "what kind of row is this" goes through [`RowBand::of`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What a grid row is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowBand {
    /// Landing row with the home slots
    Home,
    /// Water; the actor needs a carrier to survive
    River,
    /// Median strip between river and road
    Safe,
    /// Traffic lanes
    Road,
    /// Where the actor (re)spawns
    Start,
    /// Top and bottom border rows the actor never reaches
    Verge,
}

impl RowBand {
    pub fn of(row: i32) -> Self {
        match row {
            HOME_ROW => RowBand::Home,
            RIVER_FIRST_ROW..=RIVER_LAST_ROW => RowBand::River,
            SAFE_ROW => RowBand::Safe,
            ROAD_FIRST_ROW..=ROAD_LAST_ROW => RowBand::Road,
            START_ROW => RowBand::Start,
            _ => RowBand::Verge,
        }
    }

    /// Rows that hold a lane of moving entities
    pub fn has_lane(self) -> bool {
        matches!(self, RowBand::River | RowBand::Road)
    }
}

/// Discrete movement intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (dcol, drow) for one step
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Home slot under a column on the home row
#[inline]
pub fn slot_for_column(col: i32) -> usize {
    let col = col.clamp(0, COLS - 1);
    ((col as f32 / SLOT_WIDTH).floor() as usize).min(HOME_SLOTS - 1)
}

/// Horizontal center of a home slot, in tiles
#[inline]
pub fn slot_center(slot: usize) -> f32 {
    slot as f32 * SLOT_WIDTH + SLOT_WIDTH / 2.0
}

/// Whether a column lies on the playfield
#[inline]
pub fn column_in_bounds(col: i32) -> bool {
    (0..COLS).contains(&col)
}
