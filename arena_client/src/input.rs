//! Input handling.
//!
//! Keyboard sampling lives with the windowing collaborator; this module only
//! maps key names to directions and directions to a velocity.

use arena_shared::math::Vec2;

/// A movement direction bound to one or more keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Maps a key name (case-insensitive) to a direction.
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key.to_ascii_lowercase().as_str() {
        "a" | "arrowleft" => Some(Direction::Left),
        "d" | "arrowright" => Some(Direction::Right),
        "w" | "arrowup" => Some(Direction::Up),
        "s" | "arrowdown" => Some(Direction::Down),
        _ => None,
    }
}

/// Held directions at a moment in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputState {
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    /// Marks the key as held. Returns false for unbound keys.
    pub fn press(&mut self, key: &str) -> bool {
        direction_for_key(key).map(|d| self.set(d, true)).is_some()
    }

    /// Marks the key as released. Returns false for unbound keys.
    pub fn release(&mut self, key: &str) -> bool {
        direction_for_key(key).map(|d| self.set(d, false)).is_some()
    }

    /// Velocity for the held keys at `speed`; opposite keys cancel out.
    /// Screen space: y grows downward.
    pub fn velocity(self, speed: f32) -> Vec2 {
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -speed,
            (false, true) => speed,
            _ => 0.0,
        };
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_only_moves_left() {
        let input = InputState {
            left: true,
            ..InputState::default()
        };
        assert_eq!(input.velocity(4.0), Vec2::new(-4.0, 0.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let input = InputState {
            left: true,
            right: true,
            down: true,
            ..InputState::default()
        };
        assert_eq!(input.velocity(4.0), Vec2::new(0.0, 4.0));
    }

    #[test]
    fn keys_map_case_insensitively() {
        let mut input = InputState::default();
        assert!(input.press("ArrowUp"));
        assert!(input.press("D"));
        assert!(!input.press("space"));
        assert_eq!(input.velocity(2.0), Vec2::new(2.0, -2.0));
        assert!(input.release("arrowup"));
        assert_eq!(input.velocity(2.0), Vec2::new(2.0, 0.0));
    }
}
