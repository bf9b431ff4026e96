use crate::core::render::scene::hover::HoveredTile;
use crate::core::system_sets::StartupSysSet;
use crate::prelude::*;
use bevy::prelude::*;

pub struct OverlaysPlugin {
    pub registered_by: &'static str,
}
impl_tracked_plugin!(OverlaysPlugin);

impl Plugin for OverlaysPlugin {
    fn build(&self, app: &mut App) {
        log_plugin_build(self);
        app.add_systems(Startup, setup_overlay_hover_text.in_set(StartupSysSet::SetupOverlays))
            .add_systems(Update, update_hover_text.run_if(in_state(AppState::InGame)));
    }
}

/// Marker so we can update the text.
#[derive(Component)]
pub struct OverlayHoverText;

pub fn setup_overlay_hover_text(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font: Handle<Font> = asset_server.load("fonts/FiraMono-Medium.ttf");

    let root_id = commands
        .spawn(Node { position_type: PositionType::Absolute, left: Val::Px(20.0), top: Val::Px(20.0), ..default() })
        .id();

    let bg_id = commands
        .spawn((Node { padding: UiRect::all(Val::Px(7.0)), ..default() }, BackgroundColor(Color::BLACK.with_alpha(0.65))))
        .with_children(|builder| {
            builder.spawn((
                Text::new("Hovered tile: none"),
                TextFont { font, font_size: 15.0, ..default() },
                TextColor(Color::WHITE),
                OverlayHoverText,
            ));
        })
        .id();

    commands.entity(root_id).add_child(bg_id);
}

pub fn update_hover_text(hovered: Res<HoveredTile>, mut text_query: Query<&mut Text, With<OverlayHoverText>>) {
    let Ok(mut text) = text_query.single_mut() else { return };
    *text = match (hovered.descriptor, hovered.height) {
        (Some(desc), Some(height)) => Text::new(format!(
            "Hovered tile: chunk ({}, {}) tile ({}, {}) height {:.1}",
            desc.chunk_r, desc.chunk_c, desc.tile_r, desc.tile_c, height
        )),
        _ => Text::new("Hovered tile: none"),
    };
}
