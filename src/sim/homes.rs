//! Home slots and the bonus fly that hops between the empty ones

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::grid::slot_center;
use crate::consts::*;

/// Claimed flags for the five home slots of the current level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSlots {
    claimed: [bool; HOME_SLOTS],
}

/// Result of landing on a home slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// Slot was free and is now claimed
    Claimed { slot: usize },
    /// Slot was already filled this level
    Occupied { slot: usize },
}

impl HomeSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a slot. A slot is only ever claimed once per level.
    pub fn land(&mut self, slot: usize) -> Landing {
        if self.claimed[slot] {
            Landing::Occupied { slot }
        } else {
            self.claimed[slot] = true;
            Landing::Claimed { slot }
        }
    }

    pub fn is_claimed(&self, slot: usize) -> bool {
        self.claimed[slot]
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.iter().filter(|c| **c).count()
    }

    pub fn all_claimed(&self) -> bool {
        self.claimed.iter().all(|c| *c)
    }

    /// Indices of claimed slots in ascending order
    pub fn claimed(&self) -> Vec<usize> {
        (0..HOME_SLOTS).filter(|&s| self.claimed[s]).collect()
    }

    /// Indices of free slots in ascending order
    pub fn free(&self) -> Vec<usize> {
        (0..HOME_SLOTS).filter(|&s| !self.claimed[s]).collect()
    }

    pub fn clear(&mut self) {
        self.claimed = [false; HOME_SLOTS];
    }
}

/// Bonus fly travelling between free home slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusFly {
    /// Slot it departed from (the slot it counts as occupying)
    pub slot: usize,
    /// Slot it is heading to
    pub target: usize,
    /// Travel progress from `slot` to `target`, 0-1
    pub progress: f32,
    /// Progress per second
    pub speed: f32,
}

impl BonusFly {
    /// Spawn on a random free slot, heading to a different free slot when there is one
    pub fn spawn(homes: &HomeSlots, rng: &mut impl Rng) -> Option<Self> {
        let free = homes.free();
        let slot = *free.choose(rng)?;
        let target = pick_other(&free, slot, rng).unwrap_or(slot);
        Some(Self {
            slot,
            target,
            progress: 0.0,
            speed: FLY_SPEED,
        })
    }

    /// Horizontal position in tiles, interpolated between slot centers
    pub fn x(&self) -> f32 {
        let from = slot_center(self.slot);
        let to = slot_center(self.target);
        from + (to - from) * self.progress
    }

    /// Advance travel; retargets away from claimed slots. With no other
    /// free slot left the fly idles where it is.
    pub fn advance(&mut self, homes: &HomeSlots, dt: f32, rng: &mut impl Rng) {
        if homes.is_claimed(self.target) {
            let free = homes.free();
            self.target = pick_other(&free, self.slot, rng).unwrap_or(self.slot);
        }

        self.progress += dt * self.speed;
        if self.progress >= 1.0 {
            self.slot = self.target;
            self.progress = 0.0;
            let free = homes.free();
            self.target = pick_other(&free, self.slot, rng).unwrap_or(self.slot);
        }
    }
}

/// Random free slot other than `current`
fn pick_other(free: &[usize], current: usize, rng: &mut impl Rng) -> Option<usize> {
    let choices: Vec<usize> = free.iter().copied().filter(|&s| s != current).collect();
    choices.choose(rng).copied()
}

/// Per-tick fly process: maybe spawn, move, and drop it once every slot is filled
pub fn update_fly(fly: &mut Option<BonusFly>, homes: &HomeSlots, dt: f32, rng: &mut impl Rng) {
    if homes.all_claimed() {
        *fly = None;
        return;
    }

    match fly {
        Some(f) => f.advance(homes, dt, rng),
        None => {
            if rng.random_bool(FLY_SPAWN_CHANCE) {
                *fly = BonusFly::spawn(homes, rng);
                if let Some(f) = fly {
                    log::debug!("Fly appeared at slot {} heading to {}", f.slot, f.target);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_land_claims_once() {
        let mut homes = HomeSlots::new();
        assert_eq!(homes.land(2), Landing::Claimed { slot: 2 });
        assert_eq!(homes.land(2), Landing::Occupied { slot: 2 });
        assert!(homes.is_claimed(2));
        assert_eq!(homes.claimed(), vec![2]);
        assert_eq!(homes.free(), vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_all_claimed() {
        let mut homes = HomeSlots::new();
        for slot in 0..HOME_SLOTS {
            assert!(!homes.all_claimed());
            homes.land(slot);
        }
        assert!(homes.all_claimed());
        assert_eq!(homes.claimed_count(), 5);
        homes.clear();
        assert_eq!(homes.claimed_count(), 0);
    }

    #[test]
    fn test_fly_spawns_on_free_slots() {
        let mut homes = HomeSlots::new();
        homes.land(0);
        homes.land(1);
        homes.land(3);
        let mut rng = rng();
        for _ in 0..50 {
            let fly = BonusFly::spawn(&homes, &mut rng).unwrap();
            assert!(fly.slot == 2 || fly.slot == 4);
            assert!(fly.target == 2 || fly.target == 4);
            assert_ne!(fly.slot, fly.target);
        }
    }

    #[test]
    fn test_fly_single_free_slot_idles() {
        let mut homes = HomeSlots::new();
        for slot in [0, 1, 2, 4] {
            homes.land(slot);
        }
        let fly = BonusFly::spawn(&homes, &mut rng()).unwrap();
        assert_eq!(fly.slot, 3);
        assert_eq!(fly.target, 3);
    }

    #[test]
    fn test_fly_retargets_when_target_claimed() {
        let mut homes = HomeSlots::new();
        let mut rng = rng();
        let mut fly = BonusFly {
            slot: 3,
            target: 0,
            progress: 0.4,
            speed: FLY_SPEED,
        };
        homes.land(0);
        fly.advance(&homes, 0.016, &mut rng);
        assert_ne!(fly.target, 0);
        assert_ne!(fly.target, 3);
        assert!(!homes.is_claimed(fly.target));
    }

    #[test]
    fn test_fly_idles_when_its_slot_is_the_last_free_one() {
        let mut homes = HomeSlots::new();
        for slot in [0, 1, 2, 4] {
            homes.land(slot);
        }
        let mut rng = rng();
        let mut fly = Some(BonusFly {
            slot: 3,
            target: 0,
            progress: 0.4,
            speed: FLY_SPEED,
        });
        for _ in 0..200 {
            update_fly(&mut fly, &homes, MAX_FRAME_DT, &mut rng);
            let f = fly.as_ref().unwrap();
            assert_eq!(f.slot, 3);
            assert_eq!(f.target, 3);
            assert!(!homes.is_claimed(f.slot));
        }
    }

    #[test]
    fn test_fly_removed_when_homes_full() {
        let mut homes = HomeSlots::new();
        let mut rng = rng();
        let mut fly = Some(BonusFly {
            slot: 3,
            target: 0,
            progress: 0.4,
            speed: FLY_SPEED,
        });
        for slot in 0..HOME_SLOTS {
            homes.land(slot);
        }
        update_fly(&mut fly, &homes, 0.016, &mut rng);
        assert!(fly.is_none());
    }

    #[test]
    fn test_fly_arrives_and_picks_new_target() {
        let homes = HomeSlots::new();
        let mut rng = rng();
        let mut fly = BonusFly {
            slot: 1,
            target: 4,
            progress: 0.99,
            speed: FLY_SPEED,
        };
        fly.advance(&homes, 0.04, &mut rng);
        assert_eq!(fly.slot, 4);
        assert_eq!(fly.progress, 0.0);
        assert_ne!(fly.target, 4);
    }

    #[test]
    fn test_fly_x_interpolates() {
        let fly = BonusFly {
            slot: 0,
            target: 2,
            progress: 0.5,
            speed: FLY_SPEED,
        };
        assert!((fly.x() - (1.4 + 7.0) / 2.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_fly_target_never_claimed_after_advance(
            seed in any::<u64>(),
            claims in proptest::collection::vec(0usize..HOME_SLOTS, 0..4),
            steps in 1usize..300,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut homes = HomeSlots::new();
            let mut fly = BonusFly::spawn(&homes, &mut rng);
            for slot in claims {
                homes.land(slot);
            }
            for _ in 0..steps {
                update_fly(&mut fly, &homes, MAX_FRAME_DT, &mut rng);
            }
            if let Some(fly) = fly {
                // With at least two free slots the target is always free
                prop_assert!(!homes.is_claimed(fly.target));
                prop_assert!((0.0..1.0).contains(&fly.progress));
            }
        }
    }
}
