//! Headless editor session
//!
//! Builds a small scene and drives the editor through a scripted sequence of
//! frames: click selection, a gizmo drag, duplicate, parent, box selection
//! and delete. A CPU picking target stands in for the renderer and the
//! physics world is empty.
//!
//! Usage: `editor_demo [config.toml|config.ron]`

mod picking_target;

use scene_editor::ecs::SceneTreeNode;
use scene_editor::foundation::logging;
use scene_editor::prelude::*;
use scene_editor::render::Primitive;
use thiserror::Error;

use picking_target::SoftwarePickingTarget;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),
}

struct Session {
    editor: EditorFrameController,
    device: SoftwarePickingTarget,
    physics: NullPhysicsWorld,
}

impl Session {
    /// Render the picking pass, run one editor frame, then let read-backs land
    fn frame(&mut self, input: &InputState) -> FrameReport {
        let ctx = self.editor.context();
        self.device.rasterize(&ctx.store, &ctx.camera, &ctx.viewport);

        let report = self.editor.update(input, &mut self.device, &mut self.physics);
        let completed = self.device.flush();

        if !report.commands.is_empty() || report.picked || completed > 0 {
            log::info!(
                "frame {}: commands {:?} picked {} read-backs {} selection {:?}",
                report.frame,
                report.commands,
                report.picked,
                completed,
                self.editor.context().selection.as_slice()
            );
        }
        report
    }

    fn screen(&self, world: Vec3) -> Vec2 {
        let ctx = self.editor.context();
        ctx.camera.project(&world, &ctx.viewport).xy()
    }

    fn click(&mut self, at: Vec2, modifiers: &[KeyCode]) {
        let mut press = InputState::new().with_mouse(at.x, at.y).with_button(MouseButton::Left);
        for &key in modifiers {
            press = press.with_key(key);
        }
        self.frame(&press);
        self.frame(&InputState::new().with_mouse(at.x, at.y));
    }

    fn tap(&mut self, keys: &[KeyCode]) {
        let held = keys.iter().fold(InputState::new(), |input, &key| input.with_key(key));
        self.frame(&held);
        self.frame(&InputState::new());
    }

    fn drag(&mut self, from: Vec2, to: Vec2) {
        self.frame(&InputState::new().with_mouse(from.x, from.y));
        self.frame(&InputState::new().with_mouse(from.x, from.y).with_button(MouseButton::Left));
        let mid = (from + to) * 0.5;
        self.frame(&InputState::new().with_mouse(mid.x, mid.y).with_button(MouseButton::Left));
        self.frame(&InputState::new().with_mouse(to.x, to.y).with_button(MouseButton::Left));
        self.frame(&InputState::new().with_mouse(to.x, to.y));
    }
}

fn build_scene(context: &mut EditorContext, resources: &ResourceMap) -> Result<[Entity; 3], EditorError> {
    let layout = [
        (Primitive::Cube, Vec3::new(-3.0, 0.0, 0.0)),
        (Primitive::Sphere, Vec3::new(3.0, 0.0, 0.0)),
        (Primitive::Cone, Vec3::new(0.0, 3.0, 0.0)),
    ];

    let mut entities = [Entity::new(0); 3];
    for (slot, (primitive, position)) in entities.iter_mut().zip(layout) {
        let entity = context.add_primitive(resources, primitive)?;
        context.store.set_transform(entity, Transform::from_translation(position));
        *slot = entity;
    }

    context.selection.clear(&mut context.store);
    context.store.update_world_transforms();
    Ok(entities)
}

fn log_tree(node: &SceneTreeNode, depth: usize) {
    log::info!("{:indent$}{} {}", "", node.entity, node.name, indent = depth * 2);
    for child in &node.children {
        log_tree(child, depth + 1);
    }
}

fn run() -> Result<(), DemoError> {
    #[allow(clippy::cast_precision_loss)]
    let viewport = Viewport::new(WIDTH as f32, HEIGHT as f32);
    let mut context = match std::env::args().nth(1) {
        Some(path) => EditorContext::from_config_file(&path, viewport)?,
        None => EditorContext::new(EditorConfig::default(), viewport),
    };

    let resources = ResourceMap::with_primitives();
    let [cube, sphere, cone] = build_scene(&mut context, &resources)?;
    let target_name = context.config().picking.target_name.clone();

    let mut session = Session {
        editor: EditorFrameController::new(context),
        device: SoftwarePickingTarget::new(&target_name, WIDTH, HEIGHT),
        physics: NullPhysicsWorld::default(),
    };
    session.frame(&InputState::new());

    log::info!("Click the cube");
    session.click(session.screen(Vec3::new(-3.0, 0.0, 0.0)), &[]);

    log::info!("Drag it along X with the translate gizmo");
    session.tap(&[KeyCode::W]);
    session.frame(&InputState::new());
    let handles = *session.editor.context().gizmo.handles();
    let grip = session.screen(handles.pivot + Vec3::x() * handles.size * 0.5);
    let release = session.screen(handles.pivot + Vec3::x() * (handles.size * 0.5 + 1.5));
    session.drag(grip, release);
    log::info!("Cube now at {:?}", session.editor.context().store.transforms[cube.index()].translation);

    log::info!("Duplicate it");
    session.frame(&InputState::new().with_key(KeyCode::Control).with_key(KeyCode::D));
    session.frame(&InputState::new());

    log::info!("Shift-click the sphere and parent the pair");
    session.tap(&[KeyCode::Q]);
    session.click(session.screen(Vec3::new(3.0, 0.0, 0.0)), &[KeyCode::Shift]);
    session.tap(&[KeyCode::P]);

    log::info!("Box select around the cone");
    let cone_at = session.screen(Vec3::new(0.0, 3.0, 0.0));
    session.drag(cone_at - Vec2::new(80.0, 80.0), cone_at + Vec2::new(80.0, 80.0));
    let selected = session.editor.context().selection.contains(cone);
    log::info!("Cone selected: {}", selected);

    log::info!("Delete the selection");
    session.tap(&[KeyCode::Delete]);

    let ctx = session.editor.context_mut();
    log::info!(
        "{} live entities, sphere still live: {}",
        ctx.store.live_count(),
        ctx.store.is_live(sphere)
    );
    for root in &ctx.scene_tree().roots {
        log_tree(root, 0);
    }
    Ok(())
}

fn main() {
    logging::init();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
