//! Lanes and their moving occupants
//!
//! A level is 5 river lanes (rows 2-6) and 6 road lanes (rows 8-13). Lane
//! membership is fixed for the level; entities only move and wrap.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::consts::*;

/// What kind of entities a lane carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneKind {
    RiverLog,
    RiverTurtle,
    Road,
}

/// Entity variant; only turtles carry a submerge phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Log,
    Turtle { phase: f32 },
    Vehicle,
}

/// A lane occupant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Left edge in tiles (sub-tile precision)
    pub x: f32,
    pub row: i32,
    /// Contiguous tile span
    pub size: i32,
    /// Tiles per second, signed
    pub speed: f32,
    pub kind: EntityKind,
}

impl Entity {
    /// Move by speed * dt, wrap past the margins, advance the turtle phase
    pub fn advance(&mut self, dt: f32) {
        self.x += self.speed * dt;
        if self.x < -WRAP_MARGIN {
            self.x = COLS as f32 + WRAP_MARGIN;
        } else if self.x > COLS as f32 + WRAP_MARGIN {
            self.x = -WRAP_MARGIN;
        }

        if let EntityKind::Turtle { phase } = &mut self.kind {
            *phase = (*phase + dt * TURTLE_PHASE_RATE).rem_euclid(TAU);
        }
    }

    /// Logs and vehicles are always visible; turtles dive for part of each cycle
    pub fn is_visible(&self) -> bool {
        match self.kind {
            EntityKind::Turtle { phase } => turtle_surfaced(phase),
            EntityKind::Log | EntityKind::Vehicle => true,
        }
    }

    /// Whether the floored tile span `floor(x) .. floor(x) + size` covers a column
    pub fn covers(&self, col: i32) -> bool {
        let left = self.x.floor() as i32;
        (left..left + self.size).contains(&col)
    }
}

/// Turtle visibility for a given phase angle
#[inline]
pub fn turtle_surfaced(phase: f32) -> bool {
    phase.sin() > TURTLE_SURFACE_THRESHOLD
}

/// One row of moving entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lane {
    pub row: i32,
    pub kind: LaneKind,
    /// Signed speed shared by every entity (sign = direction)
    pub speed: f32,
    /// Entity span in tiles
    pub size: i32,
    pub entities: Vec<Entity>,
}

impl Lane {
    /// Spawn `density` evenly spaced entities across the columns
    fn spawn(
        row: i32,
        kind: LaneKind,
        speed: f32,
        size: i32,
        density: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let spacing = COLS as f32 / density as f32;
        let entities = (0..density)
            .map(|i| Entity {
                x: i as f32 * spacing,
                row,
                size,
                speed,
                kind: match kind {
                    LaneKind::RiverLog => EntityKind::Log,
                    LaneKind::RiverTurtle => EntityKind::Turtle {
                        phase: rng.random_range(0.0..TAU),
                    },
                    LaneKind::Road => EntityKind::Vehicle,
                },
            })
            .collect();

        Self {
            row,
            kind,
            speed,
            size,
            entities,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        for entity in &mut self.entities {
            entity.advance(dt);
        }
    }
}

/// Signed speed for river lane `i` (0-based from the top) on `level`
pub fn river_speed(level: u32, i: usize) -> f32 {
    let dir = if i % 2 == 0 { 1.0 } else { -1.0 };
    dir * (0.6 + 0.1 * level.max(1) as f32 + 0.05 * i as f32)
}

/// Signed speed for road lane `i` (0-based from the top) on `level`
pub fn road_speed(level: u32, i: usize) -> f32 {
    let dir = if i % 2 == 0 { -1.0 } else { 1.0 };
    dir * (0.9 + 0.12 * level.max(1) as f32 + 0.07 * i as f32)
}

/// Build every lane for a level, river rows first, then road rows
pub fn build_lanes(level: u32, rng: &mut impl Rng) -> Vec<Lane> {
    let mut lanes = Vec::with_capacity(11);

    for (i, row) in (RIVER_FIRST_ROW..=RIVER_LAST_ROW).enumerate() {
        let (kind, size) = if i % 2 == 0 {
            (LaneKind::RiverTurtle, TURTLE_SIZE)
        } else {
            (LaneKind::RiverLog, LOG_SIZE)
        };
        lanes.push(Lane::spawn(
            row,
            kind,
            river_speed(level, i),
            size,
            RIVER_DENSITY,
            rng,
        ));
    }

    for (i, row) in (ROAD_FIRST_ROW..=ROAD_LAST_ROW).enumerate() {
        lanes.push(Lane::spawn(
            row,
            LaneKind::Road,
            road_speed(level, i),
            VEHICLE_SIZE,
            ROAD_DENSITY,
            rng,
        ));
    }

    log::debug!(
        "Level {}: river speeds {:?}, road speeds {:?}",
        level,
        lanes
            .iter()
            .filter(|l| l.kind != LaneKind::Road)
            .map(|l| l.speed)
            .collect::<Vec<_>>(),
        lanes
            .iter()
            .filter(|l| l.kind == LaneKind::Road)
            .map(|l| l.speed)
            .collect::<Vec<_>>()
    );

    lanes
}

/// Lane occupying a row, if any
pub fn lane_at(lanes: &[Lane], row: i32) -> Option<&Lane> {
    lanes.iter().find(|l| l.row == row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn lanes_for(level: u32) -> Vec<Lane> {
        let mut rng = Pcg32::seed_from_u64(7);
        build_lanes(level, &mut rng)
    }

    #[test]
    fn test_build_lanes_layout() {
        let lanes = lanes_for(1);
        assert_eq!(lanes.len(), 11);

        let rows: Vec<i32> = lanes.iter().map(|l| l.row).collect();
        assert_eq!(rows, vec![2, 3, 4, 5, 6, 8, 9, 10, 11, 12, 13]);

        let kinds: Vec<LaneKind> = lanes[..5].iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LaneKind::RiverTurtle,
                LaneKind::RiverLog,
                LaneKind::RiverTurtle,
                LaneKind::RiverLog,
                LaneKind::RiverTurtle,
            ]
        );

        for lane in &lanes[..5] {
            assert_eq!(lane.entities.len(), RIVER_DENSITY);
            let expected = if lane.kind == LaneKind::RiverLog { 2 } else { 3 };
            assert_eq!(lane.size, expected);
        }
        for lane in &lanes[5..] {
            assert_eq!(lane.kind, LaneKind::Road);
            assert_eq!(lane.entities.len(), ROAD_DENSITY);
            assert_eq!(lane.size, 1);
        }
    }

    #[test]
    fn test_lane_speeds_level_one() {
        let lanes = lanes_for(1);
        // River: 0.6 + 0.1 + 0.05i, alternating +, -
        assert!((lanes[0].speed - 0.7).abs() < 1e-5);
        assert!((lanes[1].speed + 0.75).abs() < 1e-5);
        assert!((lanes[4].speed - 0.9).abs() < 1e-5);
        // Road: 0.9 + 0.12 + 0.07i, alternating -, +
        assert!((lanes[5].speed + 1.02).abs() < 1e-5);
        assert!((lanes[6].speed - 1.09).abs() < 1e-5);
    }

    #[test]
    fn test_even_spacing() {
        let lanes = lanes_for(3);
        let road = &lanes[5];
        for (i, e) in road.entities.iter().enumerate() {
            assert!((e.x - i as f32 * (14.0 / 6.0)).abs() < 1e-5);
            assert_eq!(e.speed, road.speed);
            assert_eq!(e.kind, EntityKind::Vehicle);
        }
    }

    #[test]
    fn test_turtle_phases_in_range() {
        let lanes = lanes_for(2);
        for lane in lanes.iter().filter(|l| l.kind == LaneKind::RiverTurtle) {
            for e in &lane.entities {
                let EntityKind::Turtle { phase } = e.kind else {
                    panic!("turtle lane holds a non-turtle");
                };
                assert!((0.0..TAU).contains(&phase));
            }
        }
    }

    #[test]
    fn test_speeds_increase_with_level() {
        for level in 1..20 {
            let a = lanes_for(level);
            let b = lanes_for(level + 1);
            for (la, lb) in a.iter().zip(&b) {
                assert!(lb.speed.abs() > la.speed.abs());
                assert_eq!(la.speed.signum(), lb.speed.signum());
            }
        }
    }

    #[test]
    fn test_wrap_both_directions() {
        let mut right = Entity {
            x: COLS as f32 + WRAP_MARGIN - 0.01,
            row: 8,
            size: 1,
            speed: 1.0,
            kind: EntityKind::Vehicle,
        };
        right.advance(0.04);
        assert_eq!(right.x, -WRAP_MARGIN);

        let mut left = Entity {
            x: -WRAP_MARGIN + 0.01,
            row: 9,
            size: 1,
            speed: -1.0,
            kind: EntityKind::Vehicle,
        };
        left.advance(0.04);
        assert_eq!(left.x, COLS as f32 + WRAP_MARGIN);
    }

    #[test]
    fn test_covers_uses_floored_span() {
        let log = Entity {
            x: 3.7,
            row: 3,
            size: 2,
            speed: -0.75,
            kind: EntityKind::Log,
        };
        assert!(!log.covers(2));
        assert!(log.covers(3));
        assert!(log.covers(4));
        assert!(!log.covers(5));

        let negative = Entity { x: -0.5, ..log };
        assert!(negative.covers(-1));
        assert!(negative.covers(0));
        assert!(!negative.covers(1));
    }

    #[test]
    fn test_turtle_cycle() {
        // Period is 2π / 2.0 seconds
        let period = TAU / TURTLE_PHASE_RATE;
        let mut turtle = Entity {
            x: 0.0,
            row: 2,
            size: 3,
            speed: 0.0,
            kind: EntityKind::Turtle { phase: 0.0 },
        };

        let steps = 10_000;
        let dt = period / steps as f32;
        let mut submerged = 0;
        for _ in 0..steps {
            turtle.advance(dt);
            if !turtle.is_visible() {
                submerged += 1;
            }
        }
        // asin(0.7) ≈ 0.7754; submerged arc = π - 2·0.7754 ≈ 1.590 rad ≈ 25.3%
        let fraction = submerged as f32 / steps as f32;
        let expected = (std::f32::consts::PI - 2.0 * 0.7_f32.asin()) / TAU;
        assert!((fraction - expected).abs() < 0.01, "fraction {fraction}");

        let EntityKind::Turtle { phase } = turtle.kind else {
            unreachable!()
        };
        assert!(phase < 0.01 || phase > TAU - 0.01, "phase {phase}");
    }

    proptest! {
        #[test]
        fn prop_positions_stay_within_wrap_margin(
            level in 1u32..30,
            seed in any::<u64>(),
            dts in proptest::collection::vec(0.0f32..=MAX_FRAME_DT, 1..400),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut lanes = build_lanes(level, &mut rng);
            for dt in dts {
                for lane in &mut lanes {
                    lane.advance(dt);
                    for e in &lane.entities {
                        prop_assert!(e.x >= -WRAP_MARGIN);
                        prop_assert!(e.x <= COLS as f32 + WRAP_MARGIN);
                    }
                }
            }
        }
    }
}
