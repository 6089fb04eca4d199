//! Lane collision rules
//!
//! Road rows kill on contact. River rows kill unless a visible carrier is
//! under the actor, in which case the actor drifts with the lane. Drift is
//! accumulated as a fractional carry and applied one whole tile at a time.

use serde::{Deserialize, Serialize};

use super::grid::{RowBand, column_in_bounds};
use super::lane::{Lane, lane_at};
use super::state::Actor;

/// Why the actor died. Every hazard funnels into the same death transition;
/// the cause only flavours logs, HUD and audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Hit by traffic
    Vehicle,
    /// Stepped into open water
    Drowned,
    /// The turtle underfoot dived
    Submerged,
    /// Carried off the edge of the playfield
    SweptAway,
    /// Landed on a home slot that was already filled
    HomeOccupied,
    /// Timer ran out
    TimeUp,
}

/// What is under the actor on a river row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Support {
    /// A visible log or surfaced turtle; carries at this signed speed
    Carrier { speed: f32 },
    /// Only submerged turtles cover the column
    Submerged,
    /// Nothing at all
    Water,
}

/// Whether any road entity's tile span covers the column
pub fn road_hit(lane: &Lane, col: i32) -> bool {
    lane.entities.iter().any(|e| e.covers(col))
}

/// Classify what holds the actor up on a river lane
pub fn river_support(lane: &Lane, col: i32) -> Support {
    let mut submerged = false;
    for entity in lane.entities.iter().filter(|e| e.covers(col)) {
        if entity.is_visible() {
            return Support::Carrier { speed: lane.speed };
        }
        submerged = true;
    }
    if submerged {
        Support::Submerged
    } else {
        Support::Water
    }
}

/// Accumulate drift and shift the actor a whole tile whenever it builds up.
/// Returns `Some(SweptAway)` if a shift leaves the playfield.
pub fn apply_carry(actor: &mut Actor, speed: f32, dt: f32) -> Option<DeathCause> {
    actor.carry += speed * dt;
    while actor.carry.abs() >= 1.0 {
        let step = actor.carry.signum();
        actor.col += step as i32;
        actor.carry -= step;
        if !column_in_bounds(actor.col) {
            return Some(DeathCause::SweptAway);
        }
    }
    None
}

/// Run the collision rules for the actor's current row against the
/// already-advanced lanes. Returns the cause if the actor must die.
pub fn resolve_actor(lanes: &[Lane], actor: &mut Actor, dt: f32) -> Option<DeathCause> {
    if !actor.alive {
        return None;
    }

    let band = RowBand::of(actor.row);
    let lane = if band.has_lane() {
        lane_at(lanes, actor.row)
    } else {
        None
    };

    match (band, lane) {
        (RowBand::Road, Some(lane)) => {
            actor.carry = 0.0;
            road_hit(lane, actor.col).then_some(DeathCause::Vehicle)
        }
        (RowBand::River, Some(lane)) => match river_support(lane, actor.col) {
            Support::Carrier { speed } => apply_carry(actor, speed, dt),
            Support::Submerged => Some(DeathCause::Submerged),
            Support::Water => Some(DeathCause::Drowned),
        },
        _ => {
            actor.carry = 0.0;
            None
        }
    }
}
