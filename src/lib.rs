//! Sliding tray widget: a horizontal row of selectable icons driven by a
//! single press-drag-release gesture.
//!
//! Spawn a [`Tray`] with a [`TrayConfig`], populate it through
//! [`TrayCommand::set_items`], and open it with [`TrayCommand::open`].
//! While the tray is open, the pointer hovers items (growing and lifting
//! them), and releasing over an item emits a [`TraySelection`] and slides
//! the tray closed.
//!
//! ```no_run
//! use bevy::prelude::*;
//! use slide_tray::{Tray, TrayCommand, TrayConfig, TrayItemSpec, TrayPlugin};
//!
//! fn setup(mut commands: Commands, mut requests: MessageWriter<TrayCommand>) {
//!     let tray = commands
//!         .spawn((Tray::new(TrayConfig::default()), Transform::from_xyz(-200.0, 0.0, 0.0)))
//!         .id();
//!     requests.write(TrayCommand::set_items(
//!         tray,
//!         vec![TrayItemSpec::new("copy"), TrayItemSpec::new("paste")],
//!     ));
//! }
//!
//! App::new()
//!     .add_plugins((DefaultPlugins, TrayPlugin))
//!     .add_systems(Startup, setup)
//!     .run();
//! ```

pub mod config;
pub mod gesture;
pub mod geometry;
pub mod hover;
pub mod pointer;
pub mod tray;

use bevy::prelude::*;

pub use config::{SlideDirection, TrayConfig};
pub use gesture::GestureState;
pub use hover::{HoverSlot, ItemHover, ItemVisual};
pub use pointer::{PointerId, PointerPhase, TrayPointer};
pub use tray::{
    Tray, TrayCommand, TrayItem, TrayItemId, TrayItemSpec, TrayOpenState, TraySelection,
};

/// Fixed per-frame pipeline: raw input becomes pointer phases, phases
/// drive the gesture, the gesture retargets hover animations, and tray
/// commands are applied last so a commit closes the tray the same frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraySystem {
    Ingest,
    Gesture,
    Hover,
    Slide,
}

pub struct TrayPlugin;

impl Plugin for TrayPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PointerPhase>()
            .add_message::<TrayCommand>()
            .add_message::<TraySelection>()
            .init_resource::<TrayPointer>()
            .configure_sets(
                Update,
                (
                    TraySystem::Ingest,
                    TraySystem::Gesture,
                    TraySystem::Hover,
                    TraySystem::Slide,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    pointer::ingest_pointer_phases.in_set(TraySystem::Ingest),
                    gesture::track_gestures.in_set(TraySystem::Gesture),
                    (hover::animate_hover, hover::apply_item_visuals)
                        .chain()
                        .in_set(TraySystem::Hover),
                    (tray::process_tray_commands, tray::animate_tray_slide)
                        .chain()
                        .in_set(TraySystem::Slide),
                ),
            );
    }
}
