//! Keyboard and pointer state

use crate::sim::TickInput;

/// Held keys and the last pointer position, sampled once per frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    fire: bool,
    pointer_x: Option<f32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// DOM `KeyboardEvent.code`; returns whether the key is one we use
    pub fn key_down(&mut self, code: &str) -> bool {
        self.set_key(code, true)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.set_key(code, false)
    }

    fn set_key(&mut self, code: &str, held: bool) -> bool {
        let slot = match code {
            "ArrowLeft" => &mut self.left,
            "ArrowRight" => &mut self.right,
            "ArrowUp" => &mut self.up,
            "ArrowDown" => &mut self.down,
            "Space" => &mut self.fire,
            _ => return false,
        };
        *slot = held;
        true
    }

    /// Pointer moved, `x` already in field coordinates
    pub fn pointer_move(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_x = None;
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
            fire: self.fire,
            pointer_x: self.pointer_x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_fold_into_input() {
        let mut input = InputState::new();
        assert!(input.key_down("ArrowLeft"));
        assert!(input.key_down("Space"));
        assert!(!input.key_down("KeyQ"));
        let tick = input.tick_input();
        assert!(tick.left && tick.fire);
        assert!(!tick.right);

        input.key_up("ArrowLeft");
        assert!(!input.tick_input().left);
    }

    #[test]
    fn test_pointer_tracks_until_leave() {
        let mut input = InputState::new();
        input.pointer_move(123.0);
        assert_eq!(input.tick_input().pointer_x, Some(123.0));
        input.pointer_leave();
        assert_eq!(input.tick_input().pointer_x, None);
    }

    #[test]
    fn test_clear_releases_keys() {
        let mut input = InputState::new();
        input.key_down("ArrowUp");
        input.clear();
        assert!(!input.tick_input().up);
    }
}
