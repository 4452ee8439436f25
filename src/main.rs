use bevy::prelude::*;

use slide_tray::{Tray, TrayCommand, TrayConfig, TrayItem, TrayItemSpec, TrayPlugin, TraySelection};

const ITEM_COLORS: [Color; 5] = [
    Color::srgb(0.85, 0.35, 0.35),
    Color::srgb(0.90, 0.70, 0.30),
    Color::srgb(0.40, 0.75, 0.45),
    Color::srgb(0.35, 0.55, 0.85),
    Color::srgb(0.65, 0.45, 0.80),
];

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, TrayPlugin))
        .add_systems(Startup, setup)
        .add_systems(Update, (toggle_on_space, decorate_items, report_selections))
        .run();
}

fn setup(mut commands: Commands, mut requests: MessageWriter<TrayCommand>) {
    commands.spawn(Camera2d);

    let tray = commands
        .spawn((
            Name::new("demo_tray"),
            Tray::new(TrayConfig::default()),
            Transform::from_xyz(-200.0, 0.0, 0.0),
        ))
        .id();
    requests.write(TrayCommand::set_items(
        tray,
        vec![
            TrayItemSpec::with_label("copy", "Copy"),
            TrayItemSpec::with_label("cut", "Cut"),
            TrayItemSpec::with_label("paste", "Paste"),
            TrayItemSpec::with_label("share", "Share"),
            TrayItemSpec::with_label("delete", "Delete"),
        ],
    ));
}

fn toggle_on_space(
    keys: Res<ButtonInput<KeyCode>>,
    trays: Query<Entity, With<Tray>>,
    mut requests: MessageWriter<TrayCommand>,
) {
    if keys.just_pressed(KeyCode::Space) {
        for tray in trays.iter() {
            requests.write(TrayCommand::toggle(tray));
        }
    }
}

// placeholder colored squares stand in for real icon art
fn decorate_items(
    mut commands: Commands,
    items: Query<(Entity, &TrayItem), Added<TrayItem>>,
    trays: Query<&Tray>,
    parents: Query<&ChildOf>,
) {
    for (entity, item) in items.iter() {
        let size = parents
            .get(entity)
            .ok()
            .and_then(|parent| trays.get(parent.parent()).ok())
            .map(|tray| tray.config.item_size)
            .unwrap_or(Vec2::splat(64.0));
        let color = ITEM_COLORS[item.index % ITEM_COLORS.len()];
        commands
            .entity(entity)
            .insert(Sprite::from_color(color, size));
    }
}

fn report_selections(mut selections: MessageReader<TraySelection>) {
    for selection in selections.read() {
        info!("selected {} (item {})", selection.id, selection.index);
    }
}
