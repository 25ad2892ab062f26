//! Mouse drag tracking for picking
//!
//! Tracks where the left button went down so a press can be classified as a
//! click or a box drag.

use crate::foundation::math::Vec2;

/// Mouse state for picking operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MouseState {
    /// Current position in pixels
    pub position: Vec2,
    /// Position the button went down at, while held
    pub drag_start: Option<Vec2>,
    /// Whether the button is currently held
    pub button_down: bool,
    /// Whether the button went down this frame
    pub pressed: bool,
    /// Whether the button went up this frame
    pub released: bool,
}

impl MouseState {
    /// Create a new mouse state
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's position and button state
    pub fn update(&mut self, position: Vec2, button_down: bool) {
        self.position = position;
        self.pressed = button_down && !self.button_down;
        self.released = !button_down && self.button_down;

        if self.pressed {
            self.drag_start = Some(position);
        } else if !button_down {
            self.drag_start = None;
        }
        self.button_down = button_down;
    }

    /// Drag rectangle (min, max) while the button is held
    pub fn get_drag_box(&self) -> Option<(Vec2, Vec2)> {
        let start = self.drag_start?;
        if !self.button_down {
            return None;
        }

        Some((start.inf(&self.position), start.sup(&self.position)))
    }

    /// Diagonal length of the drag rectangle
    pub fn drag_distance(&self) -> f32 {
        self.get_drag_box()
            .map_or(0.0, |(min, max)| (max - min).magnitude())
    }

    /// Whether the drag exceeds `threshold` pixels
    pub fn is_dragging(&self, threshold: f32) -> bool {
        self.drag_distance() >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_edges() {
        let mut mouse = MouseState::new();
        mouse.update(Vec2::new(10.0, 10.0), true);
        assert!(mouse.pressed);
        assert_eq!(mouse.drag_start, Some(Vec2::new(10.0, 10.0)));

        mouse.update(Vec2::new(12.0, 11.0), true);
        assert!(!mouse.pressed);
        assert!(!mouse.is_dragging(6.0));

        mouse.update(Vec2::new(40.0, 5.0), true);
        assert!(mouse.is_dragging(6.0));
        assert_eq!(mouse.get_drag_box(), Some((Vec2::new(10.0, 5.0), Vec2::new(40.0, 10.0))));

        mouse.update(Vec2::new(40.0, 5.0), false);
        assert!(mouse.released);
        assert!(mouse.get_drag_box().is_none());
    }
}
