//! Main camera controller
//!
//! Two navigation styles share one orbit representation: a focus point, a
//! distance and yaw/pitch angles describing where the camera sits relative
//! to the focus.
//!
//! - **Modelling**: hold Menu (Alt) or Command and drag with the left button
//!   to orbit, with the right button to dolly; middle button pans; the wheel
//!   zooms.
//! - **Fly**: hold the right button to look around and move with WASD.

use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::foundation::math::{Vec2, Vec3, utils};
use crate::input::{InputState, KeyCode, MouseButton};
use crate::render::camera::Camera;

/// Navigation style of the main camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Orbit around a focus point
    #[default]
    Modelling,
    /// First-person flight
    Fly,
}

const MIN_DISTANCE: f32 = 0.01;
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
const PAN_SCALE: f32 = 0.001;

/// Drives the camera from mouse and keyboard input
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Active navigation style
    pub mode: CameraMode,
    /// Invert vertical mouse motion
    pub invert_y: bool,
    orbit_speed: f32,
    zoom_speed: f32,
    fly_speed: f32,
    focus: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    last_mouse: Option<Vec2>,
}

impl CameraController {
    /// Controller matching the camera's current position and target
    pub fn new(config: &CameraConfig, camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.magnitude().max(MIN_DISTANCE);
        let dir = offset / distance;

        Self {
            mode: config.mode,
            invert_y: config.invert_y,
            orbit_speed: config.orbit_speed,
            zoom_speed: config.zoom_speed,
            fly_speed: config.fly_speed,
            focus: camera.target,
            distance,
            yaw: dir.x.atan2(dir.z),
            pitch: utils::clamp(dir.y, -1.0, 1.0).asin(),
            last_mouse: None,
        }
    }

    /// Point the camera orbits around
    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    /// Distance from the focus point
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Whether the controller currently owns the keyboard
    pub fn is_flying(&self, input: &InputState) -> bool {
        self.mode == CameraMode::Fly && input.is_button_down(MouseButton::Right)
    }

    /// Unit vector from the focus towards the camera
    fn orbit_direction(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
    }

    fn apply(&self, camera: &mut Camera) {
        camera.set_position(self.focus + self.orbit_direction() * self.distance);
        camera.set_target(self.focus);
    }

    /// Centre the camera on `pivot` at `distance`
    pub fn focus_on(&mut self, camera: &mut Camera, pivot: Vec3, distance: f32) {
        self.focus = pivot;
        self.distance = distance.max(MIN_DISTANCE);
        self.apply(camera);
    }

    /// Update the camera for one frame.
    ///
    /// `has_focus` is false while the UI owns the mouse; motion is still
    /// tracked so there is no jump when focus returns.
    pub fn update(&mut self, camera: &mut Camera, input: &InputState, has_focus: bool) {
        let mouse = input.mouse_position;
        let delta = self.last_mouse.map_or(Vec2::zeros(), |last| mouse - last);
        self.last_mouse = Some(mouse);

        if !has_focus {
            return;
        }

        let dy = if self.invert_y { -delta.y } else { delta.y };
        match self.mode {
            CameraMode::Modelling => self.update_modelling(input, delta.x, dy),
            CameraMode::Fly => self.update_fly(input, delta.x, dy),
        }
        self.apply(camera);
    }

    fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.orbit_speed;
        self.pitch = utils::clamp(self.pitch + dy * self.orbit_speed, -PITCH_LIMIT, PITCH_LIMIT);
    }

    fn update_modelling(&mut self, input: &InputState, dx: f32, dy: f32) {
        if input.camera_modifier() {
            if input.left_down() {
                self.rotate(dx, dy);
            } else if input.is_button_down(MouseButton::Right) {
                self.distance = (self.distance * (1.0 + dy * self.zoom_speed * 0.1)).max(MIN_DISTANCE);
            }
        }

        if input.is_button_down(MouseButton::Middle) {
            let dir = self.orbit_direction();
            let right = Vec3::y().cross(&dir).normalize();
            let up = dir.cross(&right);
            let scale = self.distance * PAN_SCALE;
            self.focus += (-right * dx + up * dy) * scale;
        }

        if input.wheel_delta != 0.0 {
            self.distance = (self.distance * (1.0 - input.wheel_delta * self.zoom_speed)).max(MIN_DISTANCE);
        }
    }

    fn update_fly(&mut self, input: &InputState, dx: f32, dy: f32) {
        if !input.is_button_down(MouseButton::Right) {
            return;
        }

        // Look around the eye, not the focus
        let eye = self.focus + self.orbit_direction() * self.distance;
        self.rotate(-dx, -dy);
        let forward = -self.orbit_direction();
        let right = forward.cross(&Vec3::y()).normalize();

        let mut travel = Vec3::zeros();
        if input.is_key_down(KeyCode::W) {
            travel += forward;
        }
        if input.is_key_down(KeyCode::S) {
            travel -= forward;
        }
        if input.is_key_down(KeyCode::D) {
            travel += right;
        }
        if input.is_key_down(KeyCode::A) {
            travel -= right;
        }

        let eye = eye + travel * self.fly_speed * input.delta_time;
        self.focus = eye + forward * self.distance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup(mode: CameraMode) -> (CameraController, Camera) {
        let camera = Camera::default();
        let config = CameraConfig {
            mode,
            ..CameraConfig::default()
        };
        (CameraController::new(&config, &camera), camera)
    }

    #[test]
    fn test_starts_from_camera_pose() {
        let (controller, camera) = setup(CameraMode::Modelling);
        assert_relative_eq!(controller.distance(), 10.0, epsilon = 1e-5);
        assert_relative_eq!(controller.focus(), camera.target);
    }

    #[test]
    fn test_wheel_zooms_towards_focus() {
        let (mut controller, mut camera) = setup(CameraMode::Modelling);
        let mut input = InputState::new();
        input.wheel_delta = 1.0;

        controller.update(&mut camera, &input, true);
        assert_relative_eq!(camera.position, Vec3::new(0.0, 0.0, 9.0), epsilon = 1e-4);
    }

    #[test]
    fn test_menu_drag_orbits() {
        let (mut controller, mut camera) = setup(CameraMode::Modelling);
        let base = InputState::new().with_key(KeyCode::Menu).with_button(MouseButton::Left);

        controller.update(&mut camera, &base.clone().with_mouse(100.0, 100.0), true);
        controller.update(&mut camera, &base.with_mouse(200.0, 100.0), true);

        assert!(camera.position.x < 0.0);
        assert_relative_eq!((camera.position - camera.target).magnitude(), 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_drag_without_modifier_leaves_camera() {
        let (mut controller, mut camera) = setup(CameraMode::Modelling);
        let base = InputState::new().with_button(MouseButton::Left);

        controller.update(&mut camera, &base.clone().with_mouse(100.0, 100.0), true);
        controller.update(&mut camera, &base.with_mouse(300.0, 100.0), true);

        assert_relative_eq!(camera.position, Vec3::new(0.0, 0.0, 10.0), epsilon = 1e-4);
    }

    #[test]
    fn test_fly_moves_forward() {
        let (mut controller, mut camera) = setup(CameraMode::Fly);
        let mut input = InputState::new().with_button(MouseButton::Right).with_key(KeyCode::W);
        input.delta_time = 0.5;

        assert!(controller.is_flying(&input));
        controller.update(&mut camera, &input, true);
        assert_relative_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0), epsilon = 1e-4);
        assert_relative_eq!(camera.target, Vec3::new(0.0, 0.0, -5.0), epsilon = 1e-4);
    }

    #[test]
    fn test_focus_on_pivot() {
        let (mut controller, mut camera) = setup(CameraMode::Modelling);
        controller.focus_on(&mut camera, Vec3::new(1.0, 2.0, 3.0), 4.0);

        assert_relative_eq!(camera.target, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!((camera.position - camera.target).magnitude(), 4.0, epsilon = 1e-4);
    }
}
