//! Frame controller scenarios

mod command_integration;
mod frame_integration;

use crate::config::EditorConfig;
use crate::editor::{EditorContext, EditorFrameController};
use crate::input::{InputState, MouseButton};
use crate::render::Viewport;

/// Controller over the default scene with an 800x600 viewport
pub(crate) fn controller() -> EditorFrameController {
    EditorFrameController::new(EditorContext::new(EditorConfig::default(), Viewport::new(800.0, 600.0)))
}

/// Input with the mouse at (`x`, `y`) and the left button optionally held
pub(crate) fn mouse(x: f32, y: f32, held: bool) -> InputState {
    let input = InputState::new().with_mouse(x, y);
    if held { input.with_button(MouseButton::Left) } else { input }
}
