//! Per-item hover animation.
//!
//! Each item carries a normalized hover progress in `[0, 1]`. A
//! [`HoverTransition`] drives that progress toward 0 or 1 over a fixed
//! duration, and [`ItemVisual`] derives scale, elevation, corner radius,
//! and lift from the progress each frame. Visuals are always recomputed
//! from the item's captured baseline, so repeated hover cycles cannot
//! accumulate drift.
use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};

use crate::{
    config::TrayConfig,
    tray::{Tray, TrayItem},
};

/// Baseline transform of an item, captured the moment the component is
/// inserted. All hover visuals are applied relative to this snapshot.
#[derive(Component, Clone, Default)]
#[component(on_insert = ItemBaseline::on_insert)]
#[require(Transform)]
pub struct ItemBaseline(pub Transform);

impl ItemBaseline {
    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let transform = match world.get::<Transform>(entity) {
            Some(transform) => *transform,
            None => return,
        };
        if let Some(mut baseline) = world.get_mut::<ItemBaseline>(entity) {
            baseline.0 = transform;
        }
    }
}

/// Normalized hover progress: 0 at rest, 1 fully hovered.
#[derive(Component, Clone, Copy, Default, Debug)]
pub struct ItemHover {
    pub progress: f32,
}

/// In-flight progress animation toward 0 or 1.
///
/// Starts from wherever the progress currently is and always runs the
/// full configured duration, matching the feel of a hover that reverses
/// mid-flight without snapping.
#[derive(Component, Clone, Debug)]
pub struct HoverTransition {
    from: f32,
    to: f32,
    timer: Timer,
}

impl HoverTransition {
    pub fn toward(from: f32, to: f32, duration: std::time::Duration) -> Self {
        Self {
            from,
            to,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    fn sample(&self) -> f32 {
        self.from + (self.to - self.from) * self.timer.fraction()
    }
}

/// Derived presentation values for one item at a given hover progress.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct ItemVisual {
    pub scale: f32,
    pub corner_radius: f32,
    pub elevation: f32,
    pub lift: f32,
}

impl ItemVisual {
    pub fn resting(config: &TrayConfig) -> Self {
        Self {
            scale: 1.0,
            corner_radius: config.resting_corner_radius,
            elevation: config.baseline_elevation,
            lift: 0.0,
        }
    }

    /// Visuals at `progress`. At exactly zero the item shows its resting
    /// corner radius, which is generally larger than the animated range.
    pub fn at(config: &TrayConfig, progress: f32) -> Self {
        if progress <= 0.0 {
            return Self::resting(config);
        }
        let scale = 1.0 + (config.scale_factor - 1.0) * progress;
        let lift = if config.lift {
            (1.0 - scale) * config.item_size.y / 4.0
        } else {
            0.0
        };
        Self {
            scale,
            corner_radius: config.max_corner_radius * progress,
            elevation: config.baseline_elevation + config.elevation_gain * progress,
            lift,
        }
    }
}

/// Which item (by index) the current gesture is hovering, if any.
#[derive(Component, Clone, Copy, Default, Debug)]
pub struct HoverSlot {
    pub index: Option<usize>,
}

/// Retargets hover animations so at most one item ever animates forward.
///
/// The newly hovered item starts a transition toward 1 from its current
/// progress. Every other item is snapped straight to its baseline; when
/// the hover ends with no successor, the previous owner instead animates
/// back toward 0.
pub(crate) fn set_hovered<'a>(
    commands: &mut Commands,
    slot: &mut HoverSlot,
    duration: std::time::Duration,
    target: Option<usize>,
    items: impl IntoIterator<Item = (Entity, usize, Mut<'a, ItemHover>)>,
) {
    if slot.index == target {
        return;
    }
    for (entity, index, mut hover) in items {
        if target == Some(index) {
            commands
                .entity(entity)
                .insert(HoverTransition::toward(hover.progress, 1.0, duration));
        } else if target.is_none() && slot.index == Some(index) {
            commands
                .entity(entity)
                .insert(HoverTransition::toward(hover.progress, 0.0, duration));
        } else {
            // snap, never reverse-animate: only one item may be in motion
            if hover.progress != 0.0 {
                hover.progress = 0.0;
            }
            commands.entity(entity).remove::<HoverTransition>();
        }
    }
    slot.index = target;
}

/// Ticks hover transitions and snaps progress exactly onto the target
/// when the timer finishes.
pub(crate) fn animate_hover(
    time: Res<Time<Real>>,
    mut commands: Commands,
    mut items: Query<(Entity, &mut ItemHover, &mut HoverTransition)>,
) {
    for (entity, mut hover, mut transition) in items.iter_mut() {
        transition.timer.tick(time.delta());
        if transition.timer.finished() {
            hover.progress = transition.to;
            commands.entity(entity).remove::<HoverTransition>();
        } else {
            hover.progress = transition.sample();
        }
    }
}

/// Writes each item's derived visuals back onto its transform, relative
/// to the captured baseline.
pub(crate) fn apply_item_visuals(
    trays: Query<&Tray>,
    mut items: Query<
        (
            &ChildOf,
            &ItemBaseline,
            &ItemHover,
            &mut ItemVisual,
            &mut Transform,
        ),
        With<TrayItem>,
    >,
) {
    for (parent, baseline, hover, mut visual, mut transform) in items.iter_mut() {
        let Ok(tray) = trays.get(parent.parent()) else {
            continue;
        };
        let next = ItemVisual::at(&tray.config, hover.progress);
        if *visual != next {
            *visual = next;
        }
        transform.scale = baseline.0.scale * next.scale;
        transform.translation = baseline.0.translation
            + Vec3::new(
                0.0,
                next.lift,
                next.elevation - tray.config.baseline_elevation,
            );
    }
}
