//! Gesture tracking.
//!
//! A single pointer owns the tray for the lifetime of its press. Every
//! phase re-resolves the hovered item against live item geometry, so a
//! stationary finger still tracks a tray that is sliding underneath it.
//! Releasing over an item commits a [`TraySelection`] and closes the
//! tray; releasing elsewhere, or a cancel, just settles the hover.
use bevy::prelude::*;
use log::debug;

use crate::{
    geometry,
    hover::{self, HoverSlot, ItemHover},
    pointer::{PointerId, PointerPhase},
    tray::{Tray, TrayCommand, TrayItem, TrayOpenState, TraySelection},
};

/// Per-tray press state. Holds the identity of the pointer that started
/// the gesture so later phases from other pointers are ignored.
#[derive(Component, Clone, Copy, Default, Debug)]
pub struct GestureState {
    pointer: Option<PointerId>,
}

impl GestureState {
    pub fn is_tracking(&self) -> bool {
        self.pointer.is_some()
    }

    pub(crate) fn reset(&mut self) {
        self.pointer = None;
    }
}

pub(crate) fn track_gestures(
    mut commands: Commands,
    mut phases: MessageReader<PointerPhase>,
    mut trays: Query<(Entity, &Tray, &mut GestureState, &mut HoverSlot)>,
    mut items: Query<(Entity, &ChildOf, &TrayItem, &mut ItemHover, &GlobalTransform)>,
    mut selections: MessageWriter<TraySelection>,
    mut requests: MessageWriter<TrayCommand>,
) {
    let phases: Vec<PointerPhase> = phases.read().copied().collect();
    if phases.is_empty() {
        return;
    }

    for (tray_entity, tray, mut state, mut slot) in trays.iter_mut() {
        if tray.state() == TrayOpenState::Closed {
            continue;
        }
        for &phase in &phases {
            match phase {
                PointerPhase::Down { pointer, position } => {
                    if state.pointer.is_some() {
                        // first pointer keeps the gesture
                        continue;
                    }
                    state.pointer = Some(pointer);
                    let hovered = resolve(tray, tray_entity, position, &items);
                    debug!("gesture down on {tray_entity:?}, hovering {hovered:?}");
                    retarget(&mut commands, &mut slot, tray, tray_entity, hovered, &mut items);
                }
                PointerPhase::Move { pointer, position } => {
                    if state.pointer != Some(pointer) {
                        continue;
                    }
                    let hovered = resolve(tray, tray_entity, position, &items);
                    retarget(&mut commands, &mut slot, tray, tray_entity, hovered, &mut items);
                }
                PointerPhase::Up { pointer, position } => {
                    if state.pointer != Some(pointer) {
                        continue;
                    }
                    state.pointer = None;
                    let hovered = resolve(tray, tray_entity, position, &items);
                    retarget(&mut commands, &mut slot, tray, tray_entity, None, &mut items);
                    if let Some(index) = hovered {
                        if let Some((_, _, item, _, _)) = items
                            .iter()
                            .find(|(_, parent, item, _, _)| {
                                parent.parent() == tray_entity && item.index == index
                            })
                        {
                            debug!("gesture commit: {} on {tray_entity:?}", item.id);
                            selections.write(TraySelection {
                                tray: tray_entity,
                                index,
                                id: item.id.clone(),
                            });
                            requests.write(TrayCommand::close(tray_entity));
                        }
                    } else {
                        debug!("gesture released off-item on {tray_entity:?}");
                    }
                }
                PointerPhase::Cancel { pointer } => {
                    if state.pointer != Some(pointer) {
                        continue;
                    }
                    state.pointer = None;
                    debug!("gesture canceled on {tray_entity:?}");
                    retarget(&mut commands, &mut slot, tray, tray_entity, None, &mut items);
                }
            }
        }
    }
}

/// Hit-tests a world point against this tray's items in display order.
fn resolve(
    tray: &Tray,
    tray_entity: Entity,
    position: Vec2,
    items: &Query<(Entity, &ChildOf, &TrayItem, &mut ItemHover, &GlobalTransform)>,
) -> Option<usize> {
    let mut row: Vec<(usize, GlobalTransform)> = items
        .iter()
        .filter(|(_, parent, ..)| parent.parent() == tray_entity)
        .map(|(_, _, item, _, transform)| (item.index, *transform))
        .collect();
    row.sort_by_key(|(index, _)| *index);
    geometry::resolve_item(
        position,
        tray.config.item_size,
        row.iter().map(|(index, transform)| (*index, transform)),
    )
}

fn retarget(
    commands: &mut Commands,
    slot: &mut HoverSlot,
    tray: &Tray,
    tray_entity: Entity,
    target: Option<usize>,
    items: &mut Query<(Entity, &ChildOf, &TrayItem, &mut ItemHover, &GlobalTransform)>,
) {
    hover::set_hovered(
        commands,
        slot,
        tray.config.hover_duration,
        target,
        items
            .iter_mut()
            .filter(|(_, parent, ..)| parent.parent() == tray_entity)
            .map(|(entity, _, item, hover, _)| (entity, item.index, hover)),
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        config::TrayConfig,
        hover::HoverTransition,
        tray::{TrayAction, TrayItemSpec},
    };

    #[derive(Resource, Default)]
    struct Collected(Vec<TraySelection>);

    fn collect_selections(
        mut selections: MessageReader<TraySelection>,
        mut collected: ResMut<Collected>,
    ) {
        collected.0.extend(selections.read().cloned());
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((TransformPlugin, crate::TrayPlugin));
        app.init_resource::<Time<Real>>();
        app.init_resource::<Collected>();
        // runs after the tracker so commits land in the same frame's read
        app.add_systems(
            Update,
            collect_selections.after(crate::TraySystem::Gesture),
        );
        app
    }

    fn advance(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<Time<Real>>()
            .advance_by(Duration::from_millis(millis));
        app.update();
    }

    fn phase(app: &mut App, phase: PointerPhase) {
        // zero the delta so this frame only routes the phase without
        // ticking any timers
        app.world_mut()
            .resource_mut::<Time<Real>>()
            .advance_by(Duration::ZERO);
        app.world_mut().write_message(phase);
        app.update();
    }

    /// Spawns an open three-item tray rooted at the origin. Items sit at
    /// x centers 32, 112, and 192, so their rest rects are [0, 64),
    /// [80, 144), and [160, 224).
    fn open_tray(app: &mut App) -> (Entity, Vec<Entity>) {
        let tray = app
            .world_mut()
            .spawn((Tray::new(TrayConfig::default()), Transform::IDENTITY))
            .id();
        app.world_mut().write_message(TrayCommand::set_items(
            tray,
            vec![
                TrayItemSpec::new("A"),
                TrayItemSpec::new("B"),
                TrayItemSpec::new("C"),
            ],
        ));
        app.update();
        app.world_mut().write_message(TrayCommand::open(tray));
        app.update();
        // run the open slide to completion so the row is at rest
        advance(app, 250);
        app.update();

        let mut items: Vec<(usize, Entity)> = app
            .world_mut()
            .query::<(Entity, &TrayItem)>()
            .iter(app.world())
            .map(|(entity, item)| (item.index, entity))
            .collect();
        items.sort_by_key(|(index, _)| *index);
        (tray, items.into_iter().map(|(_, entity)| entity).collect())
    }

    fn progress(app: &App, item: Entity) -> f32 {
        app.world().get::<ItemHover>(item).unwrap().progress
    }

    #[test]
    fn press_drag_release_commits_the_item_under_the_release() {
        let mut app = test_app();
        let (tray, items) = open_tray(&mut app);
        let mouse = PointerId::Mouse;

        phase(&mut app, PointerPhase::Down { pointer: mouse, position: Vec2::new(90.0, 10.0) });
        advance(&mut app, 200);
        assert_eq!(progress(&app, items[1]), 1.0);

        phase(&mut app, PointerPhase::Move { pointer: mouse, position: Vec2::new(10.0, 10.0) });
        // handover: the old hover snaps to rest before the new one grows
        assert_eq!(progress(&app, items[1]), 0.0);
        advance(&mut app, 200);
        assert_eq!(progress(&app, items[0]), 1.0);

        phase(&mut app, PointerPhase::Up { pointer: mouse, position: Vec2::new(10.0, 10.0) });
        let collected = &app.world().resource::<Collected>().0;
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].index, 0);
        assert_eq!(collected[0].id.as_str(), "A");
        assert_eq!(
            app.world().get::<Tray>(tray).unwrap().state(),
            TrayOpenState::Closing
        );

        advance(&mut app, 350);
        assert_eq!(
            app.world().get::<Tray>(tray).unwrap().state(),
            TrayOpenState::Closed
        );
    }

    #[test]
    fn at_most_one_item_animates_at_a_time() {
        let mut app = test_app();
        let (_, items) = open_tray(&mut app);
        let mouse = PointerId::Mouse;

        phase(&mut app, PointerPhase::Down { pointer: mouse, position: Vec2::new(90.0, 10.0) });
        advance(&mut app, 100);
        assert!(progress(&app, items[1]) > 0.0);

        phase(&mut app, PointerPhase::Move { pointer: mouse, position: Vec2::new(190.0, 10.0) });
        advance(&mut app, 50);
        let animating = items
            .iter()
            .filter(|&&item| progress(&app, item) > 0.0)
            .count();
        assert_eq!(animating, 1);
        assert!(progress(&app, items[2]) > 0.0);
        assert_eq!(progress(&app, items[1]), 0.0);
    }

    #[test]
    fn release_off_every_item_commits_nothing_and_keeps_the_tray_open() {
        let mut app = test_app();
        let (tray, items) = open_tray(&mut app);
        let mouse = PointerId::Mouse;

        phase(&mut app, PointerPhase::Down { pointer: mouse, position: Vec2::new(90.0, 10.0) });
        advance(&mut app, 200);
        // x = 300 clears even the grown hit rect of the hovered item
        phase(&mut app, PointerPhase::Up { pointer: mouse, position: Vec2::new(300.0, 10.0) });

        assert!(app.world().resource::<Collected>().0.is_empty());
        assert_eq!(
            app.world().get::<Tray>(tray).unwrap().state(),
            TrayOpenState::Open
        );
        advance(&mut app, 200);
        assert_eq!(progress(&app, items[1]), 0.0);
    }

    #[test]
    fn cancel_settles_the_hover_without_committing() {
        let mut app = test_app();
        let (tray, items) = open_tray(&mut app);
        let mouse = PointerId::Mouse;

        phase(&mut app, PointerPhase::Down { pointer: mouse, position: Vec2::new(90.0, 10.0) });
        advance(&mut app, 100);
        phase(&mut app, PointerPhase::Cancel { pointer: mouse });

        assert!(
            !app.world().get::<GestureState>(tray).unwrap().is_tracking()
        );
        advance(&mut app, 200);
        assert_eq!(progress(&app, items[1]), 0.0);
        assert!(app.world().resource::<Collected>().0.is_empty());
        assert_eq!(
            app.world().get::<Tray>(tray).unwrap().state(),
            TrayOpenState::Open
        );
    }

    #[test]
    fn a_second_pointer_cannot_steal_the_gesture() {
        let mut app = test_app();
        let (_, items) = open_tray(&mut app);
        let first = PointerId::Touch(1);
        let second = PointerId::Touch(2);

        phase(&mut app, PointerPhase::Down { pointer: first, position: Vec2::new(90.0, 10.0) });
        phase(&mut app, PointerPhase::Down { pointer: second, position: Vec2::new(190.0, 10.0) });
        phase(&mut app, PointerPhase::Move { pointer: second, position: Vec2::new(10.0, 10.0) });
        advance(&mut app, 200);

        assert_eq!(progress(&app, items[1]), 1.0);
        assert_eq!(progress(&app, items[0]), 0.0);
        assert_eq!(progress(&app, items[2]), 0.0);

        phase(&mut app, PointerPhase::Up { pointer: second, position: Vec2::new(10.0, 10.0) });
        assert!(app.world().resource::<Collected>().0.is_empty());

        phase(&mut app, PointerPhase::Up { pointer: first, position: Vec2::new(90.0, 10.0) });
        let collected = &app.world().resource::<Collected>().0;
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].id.as_str(), "B");
    }

    #[test]
    fn release_supersedes_an_unfinished_forward_transition() {
        let mut app = test_app();
        let (_, items) = open_tray(&mut app);
        let mouse = PointerId::Mouse;

        phase(&mut app, PointerPhase::Down { pointer: mouse, position: Vec2::new(90.0, 10.0) });
        advance(&mut app, 80);
        let midway = progress(&app, items[1]);
        assert!(midway > 0.0 && midway < 1.0);

        phase(&mut app, PointerPhase::Up { pointer: mouse, position: Vec2::new(90.0, 10.0) });
        let transition = app.world().get::<HoverTransition>(items[1]).unwrap();
        assert_eq!(transition.target(), 0.0);
        advance(&mut app, 250);
        assert_eq!(progress(&app, items[1]), 0.0);

        assert_eq!(app.world().resource::<Collected>().0.len(), 1);
    }

    #[test]
    fn a_closed_tray_ignores_pointer_phases() {
        let mut app = test_app();
        let tray = app
            .world_mut()
            .spawn((Tray::new(TrayConfig::default()), Transform::IDENTITY))
            .id();
        app.world_mut().write_message(TrayCommand::set_items(
            tray,
            vec![TrayItemSpec::new("A")],
        ));
        app.update();

        phase(
            &mut app,
            PointerPhase::Down { pointer: PointerId::Mouse, position: Vec2::new(32.0, 0.0) },
        );
        assert!(!app.world().get::<GestureState>(tray).unwrap().is_tracking());
    }

    #[test]
    fn actions_round_trip_through_command_constructors() {
        let tray = Entity::PLACEHOLDER;
        assert!(matches!(TrayCommand::toggle(tray).action, TrayAction::Toggle));
    }
}
