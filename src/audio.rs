//! Audio cues
//!
//! Procedurally generated beeps via the Web Audio API - no external files.
//! The simulation never waits on audio; the shell maps drained events to
//! cues and fires them.

use crate::sim::{DeathCause, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// One hop
    Move,
    /// Run or level start
    LevelStart,
    /// Any death
    Death,
    /// Home slot filled
    SlotClaim,
    /// Fly eaten
    Bonus,
    /// Final score notice
    GameOver,
    /// New best score
    HighScore,
}

impl SoundEffect {
    /// Cue for a drained game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Moved => Some(SoundEffect::Move),
            GameEvent::LevelStarted { .. } => Some(SoundEffect::LevelStart),
            GameEvent::Died { .. } => Some(SoundEffect::Death),
            GameEvent::SlotClaimed { .. } => Some(SoundEffect::SlotClaim),
            GameEvent::BonusCollected { .. } => Some(SoundEffect::Bonus),
            GameEvent::NewHighScore { .. } => Some(SoundEffect::HighScore),
            GameEvent::GameOverNotice { .. } => Some(SoundEffect::GameOver),
            // Level clear is immediately followed by LevelStarted
            GameEvent::LevelCleared { .. } => None,
        }
    }

    /// (frequency Hz, duration s, relative gain) of the basic beep
    pub fn tone(self) -> (f32, f32, f32) {
        match self {
            SoundEffect::Move => (880.0, 0.05, 0.6),
            SoundEffect::LevelStart => (660.0, 0.08, 0.8),
            SoundEffect::Death => (180.0, 0.2, 1.0),
            SoundEffect::SlotClaim => (990.0, 0.1, 0.8),
            SoundEffect::Bonus => (1320.0, 0.12, 0.8),
            SoundEffect::GameOver => (120.0, 0.4, 1.0),
            SoundEffect::HighScore => (1560.0, 0.25, 0.8),
        }
    }
}

/// Short label for a death cause (HUD toast)
pub fn death_label(cause: DeathCause) -> &'static str {
    match cause {
        DeathCause::Vehicle => "Splat!",
        DeathCause::Drowned => "Splash!",
        DeathCause::Submerged => "The turtles dived!",
        DeathCause::SweptAway => "Swept away!",
        DeathCause::HomeOccupied => "Home taken!",
        DeathCause::TimeUp => "Time's up!",
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        /// Resume audio context (required after user gesture on iOS)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Effective volume (0.0 - 1.0), already combining master/sfx/mute
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let (freq, dur, gain) = effect.tone();
            match effect {
                SoundEffect::Death | SoundEffect::GameOver => {
                    self.sweep(ctx, freq, freq * 0.5, dur, gain, OscillatorType::Square)
                }
                SoundEffect::HighScore => {
                    self.beep(ctx, freq, dur * 0.5, gain, 0.0);
                    self.beep(ctx, freq * 1.25, dur * 0.5, gain, dur * 0.5);
                }
                _ => self.beep(ctx, freq, dur, gain, 0.0),
            }
        }

        /// Create an oscillator wired through a gain node
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Plain sine beep, optionally delayed
        fn beep(&self, ctx: &AudioContext, freq: f32, dur: f32, gain_scale: f32, delay: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time() + delay as f64;
            let vol = self.volume * gain_scale * 0.1;

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + dur as f64)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + dur as f64).ok();
        }

        /// Falling tone
        fn sweep(
            &self,
            ctx: &AudioContext,
            from: f32,
            to: f32,
            dur: f32,
            gain_scale: f32,
            osc_type: OscillatorType,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            let vol = self.volume * gain_scale * 0.08;

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + dur as f64)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + dur as f64)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + dur as f64).ok();
        }
    }
}
