//! Platform abstraction layer
//!
//! Browser-independent pieces of the shell:
//! - Key and swipe decoding into tick intents
//! - Per-frame hop queue

pub mod input;

pub use input::{KeyAction, MoveQueue, button_direction, key_action, swipe_direction};
