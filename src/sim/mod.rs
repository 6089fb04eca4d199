//! Simulation module
//!
//! All gameplay logic lives here. No rendering, audio or platform
//! dependencies:
//! - One `tick` per frame, dt clamped
//! - Seeded RNG only
//! - Stable lane and entity order

pub mod autopilot;
pub mod collision;
pub mod grid;
pub mod homes;
pub mod lane;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::DeathCause;
pub use grid::{Direction, RowBand};
pub use homes::{BonusFly, HomeSlots};
pub use lane::{Entity, EntityKind, Lane, LaneKind, build_lanes};
pub use snapshot::{Hud, Snapshot};
pub use state::{Actor, GameEvent, GamePhase, RunState};
pub use tick::{TickInput, tick};
