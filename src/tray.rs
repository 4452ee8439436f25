//! Tray lifecycle and slide choreography.
//!
//! A [`Tray`] entity owns a horizontal row of [`TrayItem`] children laid
//! out from its anchor transform. [`TrayCommand`] messages open, close,
//! toggle, or repopulate a tray; opening slides the row in from offscreen
//! and closing slides it back out, hiding it only once the slide lands.
use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    config::TrayConfig,
    gesture::GestureState,
    hover::{HoverSlot, ItemBaseline, ItemHover, ItemVisual},
};

/// Stable identifier an item carries into its selection report.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrayItemId(pub String);

impl TrayItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrayItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl std::fmt::Display for TrayItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Declarative description of one item, used when populating a tray.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayItemSpec {
    pub id: TrayItemId,
    pub label: Option<String>,
}

impl TrayItemSpec {
    pub fn new(id: impl Into<TrayItemId>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    pub fn with_label(id: impl Into<TrayItemId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
        }
    }
}

impl From<&str> for TrayItemSpec {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Where the tray is in its open/close lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrayOpenState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Resting transform of the tray root, captured on insert. The open
/// slide always lands back on this anchor.
#[derive(Component, Clone, Default)]
#[component(on_insert = TrayAnchor::on_insert)]
#[require(Transform)]
pub struct TrayAnchor(pub Transform);

impl TrayAnchor {
    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let transform = match world.get::<Transform>(entity) {
            Some(transform) => *transform,
            None => return,
        };
        if let Some(mut anchor) = world.get_mut::<TrayAnchor>(entity) {
            anchor.0 = transform;
        }
    }
}

/// Root component of a selectable icon row.
///
/// Spawns hidden; send [`TrayCommand::open`] to reveal it.
#[derive(Component, Clone)]
#[component(on_insert = Tray::on_insert)]
#[require(Transform, Visibility, GestureState, HoverSlot, TrayAnchor)]
pub struct Tray {
    pub config: TrayConfig,
    state: TrayOpenState,
    // authoritative row size, recorded when SetItems is processed; the
    // child list lags a frame behind spawn commands and may hold
    // decorations that are not items
    item_count: usize,
}

impl Tray {
    pub fn new(config: TrayConfig) -> Self {
        Self {
            config,
            state: TrayOpenState::Closed,
            item_count: 0,
        }
    }

    pub fn state(&self) -> TrayOpenState {
        self.state
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    fn row_width(&self) -> f32 {
        self.config.row_width(self.item_count)
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        if let Some(mut visibility) = world.get_mut::<Visibility>(entity) {
            *visibility = Visibility::Hidden;
        }
    }
}

/// One selectable icon in the row.
#[derive(Component, Clone, Debug)]
#[require(ItemHover, ItemBaseline, Transform, Visibility)]
pub struct TrayItem {
    pub index: usize,
    pub id: TrayItemId,
    pub label: Option<String>,
}

impl TrayItem {
    pub fn new(index: usize, id: impl Into<TrayItemId>) -> Self {
        Self {
            index,
            id: id.into(),
            label: None,
        }
    }
}

/// Marker for the text entity under a labeled item.
#[derive(Component, Clone, Copy, Default)]
pub struct TrayItemLabel;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrayAction {
    Open,
    Close,
    Toggle,
    SetItems(Vec<TrayItemSpec>),
}

/// Request to change a tray's lifecycle or contents.
#[derive(Message, Clone, Debug)]
pub struct TrayCommand {
    pub tray: Entity,
    pub action: TrayAction,
}

impl TrayCommand {
    pub fn open(tray: Entity) -> Self {
        Self { tray, action: TrayAction::Open }
    }

    pub fn close(tray: Entity) -> Self {
        Self { tray, action: TrayAction::Close }
    }

    pub fn toggle(tray: Entity) -> Self {
        Self { tray, action: TrayAction::Toggle }
    }

    pub fn set_items(tray: Entity, items: Vec<TrayItemSpec>) -> Self {
        Self { tray, action: TrayAction::SetItems(items) }
    }
}

/// Report that a gesture ended on an item.
#[derive(Message, Clone, Debug)]
pub struct TraySelection {
    pub tray: Entity,
    pub index: usize,
    pub id: TrayItemId,
}

/// In-flight open or close slide of the tray root.
#[derive(Component, Clone, Debug)]
pub(crate) struct TraySlide {
    pub(crate) from: Vec3,
    pub(crate) to: Vec3,
    pub(crate) timer: Timer,
}

impl TraySlide {
    fn toward(from: Vec3, to: Vec3, duration: std::time::Duration) -> Self {
        Self {
            from,
            to,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }
}

pub(crate) fn process_tray_commands(
    mut commands: Commands,
    mut requests: MessageReader<TrayCommand>,
    mut trays: Query<(
        &mut Tray,
        &TrayAnchor,
        &mut Transform,
        &mut Visibility,
        &mut GestureState,
        &mut HoverSlot,
    )>,
    items: Query<(Entity, &ChildOf), With<TrayItem>>,
) {
    for request in requests.read() {
        let Ok((mut tray, anchor, mut transform, mut visibility, mut gesture, mut slot)) =
            trays.get_mut(request.tray)
        else {
            warn!("tray command for non-tray entity {:?}", request.tray);
            continue;
        };
        match &request.action {
            TrayAction::Open => {
                open_tray(&mut commands, request.tray, &mut tray, anchor, &mut transform, &mut visibility)
            }
            TrayAction::Close => close_tray(&mut commands, request.tray, &mut tray, anchor, &transform),
            TrayAction::Toggle => match tray.state {
                TrayOpenState::Closed => {
                    open_tray(&mut commands, request.tray, &mut tray, anchor, &mut transform, &mut visibility)
                }
                TrayOpenState::Open => {
                    close_tray(&mut commands, request.tray, &mut tray, anchor, &transform)
                }
                // mid-slide requests are dropped rather than reversed
                TrayOpenState::Opening | TrayOpenState::Closing => {}
            },
            TrayAction::SetItems(specs) => {
                slot.index = None;
                gesture.reset();
                tray.item_count = specs.len();
                for (item, parent) in items.iter() {
                    if parent.parent() == request.tray {
                        commands.entity(item).despawn();
                    }
                }
                spawn_items(&mut commands, request.tray, &tray.config, specs);
            }
        }
    }
}

fn open_tray(
    commands: &mut Commands,
    entity: Entity,
    tray: &mut Tray,
    anchor: &TrayAnchor,
    transform: &mut Transform,
    visibility: &mut Visibility,
) {
    if tray.state != TrayOpenState::Closed {
        return;
    }
    let offset = tray
        .config
        .slide_direction
        .offscreen_offset(tray.row_width());
    transform.translation = anchor.0.translation + offset;
    *visibility = Visibility::Visible;
    tray.state = TrayOpenState::Opening;
    commands.entity(entity).insert(TraySlide::toward(
        transform.translation,
        anchor.0.translation,
        tray.config.open_duration,
    ));
}

fn close_tray(
    commands: &mut Commands,
    entity: Entity,
    tray: &mut Tray,
    anchor: &TrayAnchor,
    transform: &Transform,
) {
    if tray.state != TrayOpenState::Open {
        return;
    }
    let offset = tray
        .config
        .slide_direction
        .offscreen_offset(tray.row_width());
    tray.state = TrayOpenState::Closing;
    commands.entity(entity).insert(TraySlide::toward(
        transform.translation,
        anchor.0.translation + offset,
        tray.config.close_duration,
    ));
}

fn spawn_items(commands: &mut Commands, tray: Entity, config: &TrayConfig, specs: &[TrayItemSpec]) {
    for (index, spec) in specs.iter().enumerate() {
        let position = config
            .item_offset(index)
            .extend(config.baseline_elevation);
        commands.entity(tray).with_children(|parent| {
            let mut item = parent.spawn((
                Name::new(format!("tray_item_{}", spec.id)),
                TrayItem {
                    index,
                    id: spec.id.clone(),
                    label: spec.label.clone(),
                },
                Transform::from_translation(position),
                ItemVisual::resting(config),
            ));
            if let Some(label) = &spec.label {
                item.with_children(|item| {
                    item.spawn((
                        TrayItemLabel,
                        Text2d::new(label.clone()),
                        Transform::from_xyz(0.0, -config.item_size.y * 0.75, 0.0),
                    ));
                });
            }
        });
    }
}

/// Advances the open/close slide and finalizes state when it lands.
pub(crate) fn animate_tray_slide(
    time: Res<Time<Real>>,
    mut commands: Commands,
    mut trays: Query<(Entity, &mut Tray, &mut Transform, &mut Visibility, &mut TraySlide)>,
) {
    for (entity, mut tray, mut transform, mut visibility, mut slide) in trays.iter_mut() {
        slide.timer.tick(time.delta());
        if slide.timer.finished() {
            transform.translation = slide.to;
            match tray.state {
                TrayOpenState::Opening => tray.state = TrayOpenState::Open,
                TrayOpenState::Closing => {
                    tray.state = TrayOpenState::Closed;
                    *visibility = Visibility::Hidden;
                }
                _ => {}
            }
            commands.entity(entity).remove::<TraySlide>();
        } else {
            transform.translation = slide.from.lerp(slide.to, slide.timer.fraction());
        }
    }
}
