//! Input snapshot
//!
//! The host pumps window events; once per frame it hands the editor an
//! [`InputState`] describing the mouse, held keys and what the UI layer has
//! captured.

pub mod picking;

use std::collections::HashSet;

use bitflags::bitflags;

use crate::foundation::math::Vec2;

/// Key codes the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// I key
    I,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// W key
    W,
    /// Space bar
    Space,
    /// Delete
    Delete,
    /// Backspace
    Backspace,
    /// Control (either side)
    Control,
    /// Shift (either side)
    Shift,
    /// Command / super
    Command,
    /// Alt / menu
    Menu,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button
    Left,
    /// Right button
    Right,
    /// Middle button
    Middle,
}

bitflags! {
    /// Input the immediate-mode UI has claimed this frame
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct UiCapture: u32 {
        /// Mouse is over a UI window
        const MOUSE    = 1 << 0;
        /// A text field or widget has keyboard focus
        const KEYBOARD = 1 << 1;
    }
}

/// Per-frame input snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Mouse position in pixels, origin top-left, Y down
    pub mouse_position: Vec2,
    /// Buttons currently held
    pub buttons: HashSet<MouseButton>,
    /// Wheel steps since last frame
    pub wheel_delta: f32,
    /// Keys currently held, modifiers included
    pub keys: HashSet<KeyCode>,
    /// What the UI layer has captured
    pub ui_capture: UiCapture,
    /// Seconds since the previous frame
    pub delta_time: f32,
}

impl InputState {
    /// Empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Whether `button` is held
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Left button held
    pub fn left_down(&self) -> bool {
        self.is_button_down(MouseButton::Left)
    }

    /// Control held
    pub fn ctrl(&self) -> bool {
        self.is_key_down(KeyCode::Control)
    }

    /// Shift held
    pub fn shift(&self) -> bool {
        self.is_key_down(KeyCode::Shift)
    }

    /// Command or menu held; these hand the mouse to the camera
    pub fn camera_modifier(&self) -> bool {
        self.is_key_down(KeyCode::Command) || self.is_key_down(KeyCode::Menu)
    }

    /// Builder: move the mouse
    pub fn with_mouse(mut self, x: f32, y: f32) -> Self {
        self.mouse_position = Vec2::new(x, y);
        self
    }

    /// Builder: hold a button
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.buttons.insert(button);
        self
    }

    /// Builder: hold a key
    pub fn with_key(mut self, key: KeyCode) -> Self {
        self.keys.insert(key);
        self
    }
}
