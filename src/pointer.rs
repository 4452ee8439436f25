//! Pointer ingestion.
//!
//! Mouse and touch input are folded into one ordered stream of
//! [`PointerPhase`] messages in world coordinates, so the gesture tracker
//! sees a single uniform pointer surface instead of per-device callbacks.
//! Headless hosts (and tests) can write phases directly.
use bevy::{
    prelude::*,
    window::{CursorLeft, PrimaryWindow},
};

/// Identity of the device driving a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// One step of a pointer gesture, in world coordinates.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub enum PointerPhase {
    Down { pointer: PointerId, position: Vec2 },
    Move { pointer: PointerId, position: Vec2 },
    Up { pointer: PointerId, position: Vec2 },
    Cancel { pointer: PointerId },
}

impl PointerPhase {
    pub fn pointer(&self) -> PointerId {
        match *self {
            PointerPhase::Down { pointer, .. }
            | PointerPhase::Move { pointer, .. }
            | PointerPhase::Up { pointer, .. }
            | PointerPhase::Cancel { pointer } => pointer,
        }
    }
}

/// Last known world-space cursor position and mouse button state.
#[derive(Resource, Default)]
pub struct TrayPointer {
    /// World-space position under the cursor, if it has ever been inside
    /// the window.
    pub position: Option<Vec2>,
    pressed: bool,
}

/// One frame of raw left-button state, after window-space conversion.
pub(crate) struct MouseFrame {
    pub(crate) just_pressed: bool,
    pub(crate) just_released: bool,
    pub(crate) left_window: bool,
    pub(crate) position: Option<Vec2>,
}

/// Folds one frame of mouse state into pointer phases.
///
/// Press and release are evaluated independently, so a click that starts
/// and ends within a single frame still yields its Down and Up pair.
/// Losing the cursor aborts the gesture and takes precedence over a
/// release in the same frame.
pub(crate) fn fold_mouse(
    frame: &MouseFrame,
    pressed: &mut bool,
    phases: &mut Vec<PointerPhase>,
) {
    if frame.just_pressed {
        if let Some(position) = frame.position {
            *pressed = true;
            phases.push(PointerPhase::Down {
                pointer: PointerId::Mouse,
                position,
            });
        }
    }
    if !*pressed {
        return;
    }
    if frame.left_window {
        *pressed = false;
        phases.push(PointerPhase::Cancel {
            pointer: PointerId::Mouse,
        });
    } else if frame.just_released {
        *pressed = false;
        if let Some(position) = frame.position {
            phases.push(PointerPhase::Up {
                pointer: PointerId::Mouse,
                position,
            });
        }
    } else if !frame.just_pressed {
        // re-emitted every frame while held: geometry can move under a
        // stationary cursor during the slide, so resolution must rerun
        if let Some(position) = frame.position {
            phases.push(PointerPhase::Move {
                pointer: PointerId::Mouse,
                position,
            });
        }
    }
}

/// Folds window, mouse, and touch input into [`PointerPhase`] messages.
///
/// Requires a primary window and exactly one 2D camera; without them the
/// system is skipped and no phases are produced.
pub(crate) fn ingest_pointer_phases(
    window: Single<&Window, With<PrimaryWindow>>,
    camera: Single<(&Camera, &GlobalTransform), With<Camera2d>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut cursor_left: MessageReader<CursorLeft>,
    mut pointer: ResMut<TrayPointer>,
    mut phases: MessageWriter<PointerPhase>,
) {
    let (camera, camera_transform) = *camera;
    let to_world = |screen: Vec2| {
        camera
            .viewport_to_world_2d(camera_transform, screen)
            .ok()
    };

    if let Some(world) = window.cursor_position().and_then(to_world) {
        pointer.position = Some(world);
    }

    let frame = MouseFrame {
        just_pressed: mouse.just_pressed(MouseButton::Left),
        just_released: mouse.just_released(MouseButton::Left),
        left_window: cursor_left.read().count() > 0,
        position: pointer.position,
    };
    let mut mouse_phases = Vec::new();
    let mut pressed = pointer.pressed;
    fold_mouse(&frame, &mut pressed, &mut mouse_phases);
    pointer.pressed = pressed;
    phases.write_batch(mouse_phases);

    for touch in touches.iter_just_pressed() {
        if let Some(position) = to_world(touch.position()) {
            phases.write(PointerPhase::Down {
                pointer: PointerId::Touch(touch.id()),
                position,
            });
        }
    }
    for touch in touches.iter() {
        if touches.just_pressed(touch.id()) {
            continue;
        }
        if let Some(position) = to_world(touch.position()) {
            phases.write(PointerPhase::Move {
                pointer: PointerId::Touch(touch.id()),
                position,
            });
        }
    }
    for touch in touches.iter_just_released() {
        if let Some(position) = to_world(touch.position()) {
            phases.write(PointerPhase::Up {
                pointer: PointerId::Touch(touch.id()),
                position,
            });
        }
    }
    for touch in touches.iter_just_canceled() {
        phases.write(PointerPhase::Cancel {
            pointer: PointerId::Touch(touch.id()),
        });
    }
}
