//! Input decoding
//!
//! Turns raw key names and touch gestures into simulation intents. The
//! browser shell feeds DOM events through here.

use std::collections::VecDeque;

use crate::sim::{Direction, TickInput};

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    /// Space/Enter: start when no run is active, otherwise pause toggle
    StartOrPause,
    Pause,
}

/// Map a `KeyboardEvent.key` value to an action
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key.to_ascii_lowercase().as_str() {
        "arrowup" | "w" => Some(KeyAction::Move(Direction::Up)),
        "arrowdown" | "s" => Some(KeyAction::Move(Direction::Down)),
        "arrowleft" | "a" => Some(KeyAction::Move(Direction::Left)),
        "arrowright" | "d" => Some(KeyAction::Move(Direction::Right)),
        " " | "enter" => Some(KeyAction::StartOrPause),
        "escape" | "p" => Some(KeyAction::Pause),
        _ => None,
    }
}

/// Direction of a swipe, or None if it is shorter than `threshold` pixels.
/// Screen y grows downward.
pub fn swipe_direction(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax.max(ay) <= threshold {
        return None;
    }
    Some(if ax > ay {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    })
}

/// Named on-screen direction button (`data-dir` attribute)
pub fn button_direction(name: &str) -> Option<Direction> {
    match name {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}

/// Hops requested since the last frame, in arrival order
#[derive(Debug, Clone, Default)]
pub struct MoveQueue {
    pending: VecDeque<Direction>,
}

impl MoveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dir: Direction) {
        self.pending.push_back(dir);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Split one frame into tick inputs. The first carries the frame's
    /// start/pause intents and the first hop; each further hop gets its own
    /// input, meant to run as a zero-length tick.
    pub fn drain_into(&mut self, mut frame: TickInput) -> Vec<TickInput> {
        frame.movement = self.pending.pop_front();
        let mut inputs = vec![frame];
        inputs.extend(self.pending.drain(..).map(|dir| TickInput {
            movement: Some(dir),
            ..Default::default()
        }));
        inputs
    }
}
