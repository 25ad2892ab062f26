//! Picking system for mouse-based entity selection
//!
//! Two paths turn the mouse into a selection:
//!
//! - **Single click**: the renderer writes each entity's index into a
//!   `picking` colour target. A click schedules an asynchronous read-back of
//!   that target; the completion decodes the index under the cursor into a
//!   shared [`PickingReadback`] and the next update applies it.
//! - **Box drag**: a drag larger than the click threshold builds a six-plane
//!   frustum from the drag rectangle; on release every geometry entity whose
//!   world bounding sphere touches the frustum is selected.
//!
//! # State machine
//!
//! ```text
//! Ready -> SinglePending -> Ready
//! Ready -> BoxPending -> BoxComplete -> Ready
//! ```
//!
//! A new read-back is never issued while one is pending.

use std::sync::Arc;

use crate::config::PickingConfig;
use crate::ecs::entity::Entity;
use crate::ecs::flags::EntityFlags;
use crate::ecs::selection::{SelectionMode, SelectionSet};
use crate::ecs::store::{ComponentStore, slot_id};
use crate::foundation::hash::NameHash;
use crate::foundation::math::{Vec2, Vec3};
use crate::input::picking::MouseState;
use crate::input::{InputState, UiCapture};
use crate::render::camera::{Camera, Viewport};
use crate::render::device::{ReadbackParams, RenderDevice};
use crate::render::readback::{NO_ENTITY, PickingReadback, decode_entity_index};
use crate::scene::Frustum;

/// Picking session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickingState {
    /// Idle
    #[default]
    Ready,
    /// Waiting for a single-pixel read-back
    SinglePending,
    /// Dragging a selection box
    BoxPending,
    /// Box selection applied this frame
    BoxComplete,
}

/// High-level picking system that turns mouse input into selection changes
///
/// # Usage
/// ```no_run
/// # use scene_editor::prelude::*;
/// # fn frame(store: &mut ComponentStore, selection: &mut SelectionSet, camera: &Camera,
/// #          viewport: &Viewport, input: &InputState, device: &mut dyn RenderDevice) {
/// let mut picking = PickingSystem::new(&PickingConfig::default());
///
/// // Once per frame:
/// picking.resolve(store, selection);
/// picking.update(store, selection, camera, viewport, input, device);
/// # }
/// ```
#[derive(Debug)]
pub struct PickingSystem {
    state: PickingState,
    mouse: MouseState,
    readback: Arc<PickingReadback>,
    pending_mode: SelectionMode,
    frustum: Option<Frustum>,
    picked_this_press: bool,
    drag_threshold: f32,
    element_size: u32,
    target: NameHash,
}

impl PickingSystem {
    /// Create a picking system
    pub fn new(config: &PickingConfig) -> Self {
        Self {
            state: PickingState::Ready,
            mouse: MouseState::new(),
            readback: Arc::new(PickingReadback::new()),
            pending_mode: SelectionMode::Replace,
            frustum: None,
            picked_this_press: false,
            drag_threshold: config.drag_threshold,
            element_size: config.element_size,
            target: NameHash::new(&config.target_name),
        }
    }

    /// Current state
    pub fn state(&self) -> PickingState {
        self.state
    }

    /// Shared read-back slot completions are written into
    pub fn readback(&self) -> Arc<PickingReadback> {
        Arc::clone(&self.readback)
    }

    /// Drag rectangle while box selecting, for overlay drawing
    pub fn selection_box(&self) -> Option<(Vec2, Vec2)> {
        if self.state == PickingState::BoxPending {
            self.mouse.get_drag_box()
        } else {
            None
        }
    }

    /// Apply a completed single-pixel pick.
    ///
    /// Returns `true` if a result was consumed this call.
    pub fn resolve(&mut self, store: &mut ComponentStore, selection: &mut SelectionSet) -> bool {
        if self.state != PickingState::SinglePending {
            return false;
        }
        let Some(index) = self.readback.take() else {
            return false;
        };

        self.state = PickingState::Ready;
        log::trace!("Pick resolved to {}", index);

        let entity = Entity::new(index);
        if index == NO_ENTITY || !store.is_live(entity) {
            if self.pending_mode == SelectionMode::Replace {
                selection.clear(store);
            }
            return true;
        }

        selection.apply(store, entity, self.pending_mode);
        true
    }

    /// Track the mouse without picking, abandoning any box drag.
    ///
    /// An outstanding single-pixel read-back stays pending.
    pub fn suppress(&mut self, input: &InputState) {
        self.mouse.update(input.mouse_position, input.left_down());
        if matches!(self.state, PickingState::BoxPending | PickingState::BoxComplete) {
            self.state = PickingState::Ready;
        }
        self.frustum = None;
        self.picked_this_press = self.mouse.button_down;
    }

    /// Run one frame of picking
    ///
    /// # Arguments
    /// * `store` - Scene store the picked indices refer to
    /// * `selection` - Selection set to modify
    /// * `camera` - Camera the picking target was rendered with
    /// * `viewport` - Viewport dimensions in pixels
    /// * `input` - This frame's input snapshot
    /// * `device` - Renderer used to schedule read-backs
    pub fn update(
        &mut self,
        store: &mut ComponentStore,
        selection: &mut SelectionSet,
        camera: &Camera,
        viewport: &Viewport,
        input: &InputState,
        device: &mut dyn RenderDevice,
    ) {
        self.mouse.update(input.mouse_position, input.left_down());

        if self.state == PickingState::BoxComplete {
            self.state = PickingState::Ready;
        }
        // A release while a read-back is in flight still ends the press
        if self.mouse.pressed || !self.mouse.button_down {
            self.picked_this_press = false;
        }
        if self.state == PickingState::SinglePending {
            return;
        }

        if !self.mouse.button_down {
            if self.state == PickingState::BoxPending {
                let add = input.ctrl() || input.shift();
                self.select_in_frustum(store, selection, add);
                self.state = PickingState::BoxComplete;
            }
            self.frustum = None;
            return;
        }

        if input.ui_capture.contains(UiCapture::MOUSE) {
            return;
        }

        if !self.mouse.is_dragging(self.drag_threshold) {
            if !self.picked_this_press {
                self.picked_this_press = true;
                self.pending_mode = SelectionMode::from_modifiers(input.ctrl(), input.shift());
                self.issue_single_pick(device);
            }
            return;
        }

        let Some((min, max)) = self.mouse.get_drag_box() else {
            return;
        };

        // Degenerate rectangles never box-select
        if min.x == max.x || min.y == max.y {
            return;
        }

        if let Some(frustum) = Self::drag_frustum(camera, viewport, min, max) {
            self.frustum = Some(frustum);
            self.state = PickingState::BoxPending;
        }
    }

    fn issue_single_pick(&mut self, device: &mut dyn RenderDevice) {
        let Some(target) = device.render_target(self.target) else {
            log::warn!("Picking target {} is not available", self.target);
            return;
        };

        let row_pitch = target.width * self.element_size;
        let position = self.mouse.position;
        let x = to_pixel(position.x, target.width);
        let y = to_pixel(position.y, target.height);

        let session = self.readback.begin();
        let readback = Arc::clone(&self.readback);
        device.read_back(
            ReadbackParams {
                target: self.target,
                row_pitch,
                block_size: self.element_size,
                data_size: target.height * row_pitch,
            },
            Box::new(move |data, pitch, block_size| {
                let index = decode_entity_index(data, x, y, pitch, block_size).unwrap_or(NO_ENTITY);
                readback.complete(session, index);
            }),
        );

        self.state = PickingState::SinglePending;
        log::trace!("Single pick requested at ({}, {}) session {}", x, y, session);
    }

    /// Frustum through the screen rectangle `min`..`max`
    pub fn drag_frustum(camera: &Camera, viewport: &Viewport, min: Vec2, max: Vec2) -> Option<Frustum> {
        let corners = [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(min.x, max.y),
            Vec2::new(max.x, max.y),
        ];

        let mut near = [Vec3::zeros(); 4];
        let mut far = [Vec3::zeros(); 4];
        for (i, corner) in corners.iter().enumerate() {
            near[i] = camera.unproject(&Vec3::new(corner.x, corner.y, 0.0), viewport)?;
            far[i] = camera.unproject(&Vec3::new(corner.x, corner.y, 1.0), viewport)?;
        }

        Some(Frustum::from_corners(&near, &far))
    }

    fn select_in_frustum(&mut self, store: &mut ComponentStore, selection: &mut SelectionSet, add: bool) {
        let Some(frustum) = self.frustum.take() else {
            return;
        };

        let required = EntityFlags::ALLOCATED | EntityFlags::GEOMETRY;
        let hits: Vec<Entity> = (0..store.num_nodes())
            .filter(|&i| store.entities[i].contains(required))
            .filter(|&i| {
                let bv = &store.bounding_volumes[i];
                frustum.intersects_sphere(&bv.center(), bv.radius)
            })
            .map(|i| Entity::new(slot_id(i)))
            .collect();

        if !add {
            selection.clear(store);
        }
        for &entity in &hits {
            selection.add(store, entity);
        }

        log::debug!("Box selection hit {} entities", hits.len());
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_pixel(coord: f32, extent: u32) -> u32 {
    let max = extent.saturating_sub(1);
    (coord.max(0.0).floor() as u32).min(max)
}
