//! Best score persistence
//!
//! A single integer in LocalStorage. Read once at startup, written when a run
//! ends with a new best.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Best score across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "river_hop.hiscore";

    pub fn new(score: u64) -> Self {
        Self { score }
    }

    /// Parse the stored value. Anything unreadable counts as no score yet.
    pub fn parse(raw: &str) -> Self {
        let score = raw.trim().parse::<u64>().unwrap_or_else(|_| {
            log::warn!("Ignoring unreadable high score {:?}", raw);
            0
        });
        Self { score }
    }

    /// Apply a drained game event; returns true if the stored value should be written
    pub fn observe(&mut self, event: &GameEvent) -> bool {
        match *event {
            GameEvent::NewHighScore { score } if score > self.score => {
                self.score = score;
                true
            }
            _ => false,
        }
    }

    /// Load the high score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                let hs = Self::parse(&raw);
                log::info!("Loaded high score {}", hs.score);
                return hs;
            }
        }

        log::info!("No high score found, starting fresh");
        Self::default()
    }

    /// Save the high score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        match storage {
            Some(storage) => {
                if storage
                    .set_item(Self::STORAGE_KEY, &self.score.to_string())
                    .is_err()
                {
                    log::warn!("Failed to write high score");
                } else {
                    log::info!("High score saved ({})", self.score);
                }
            }
            None => log::warn!("LocalStorage unavailable, high score not saved"),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DeathCause;

    #[test]
    fn test_parse() {
        assert_eq!(HighScore::parse("420").score, 420);
        assert_eq!(HighScore::parse(" 75\n").score, 75);
        assert_eq!(HighScore::parse("").score, 0);
        assert_eq!(HighScore::parse("lots").score, 0);
        assert_eq!(HighScore::parse("-5").score, 0);
    }

    #[test]
    fn test_observe_only_new_records() {
        let mut hs = HighScore::new(300);
        assert!(!hs.observe(&GameEvent::Moved));
        assert!(!hs.observe(&GameEvent::Died {
            cause: DeathCause::Vehicle
        }));
        assert!(!hs.observe(&GameEvent::NewHighScore { score: 200 }));
        assert_eq!(hs.score, 300);
        assert!(hs.observe(&GameEvent::NewHighScore { score: 450 }));
        assert_eq!(hs.score, 450);
    }
}
