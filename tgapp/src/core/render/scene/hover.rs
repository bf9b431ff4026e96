//! Cursor-to-tile hover tracking.
//!
//! Grounded on `tgcore::raycast`'s cursor unprojection and
//! `tgcore::math::Plane` for the ground intersection. There are no pickable
//! game entities in this demo (`tgcore::raycast::HoverState` tracks hits
//! against entity-uid-tagged OBBs), so this tracks the hovered tile
//! descriptor directly instead of reusing that resource.

use crate::core::maps::MapRes;
use crate::prelude::*;
use crate::util_lib::coords::bevy_mat4_to_core;
use bevy::prelude::*;
use bevy::window::Window;
use tgcore::map::TileDescriptor;
use tgcore::math::{Plane, Vec2 as CoreVec2, Vec3 as CoreVec3};
use tgcore::raycast::unproject_near_plane;

#[derive(Resource, Default)]
pub struct HoveredTile {
    pub descriptor: Option<TileDescriptor>,
    pub height: Option<f32>,
}

pub struct HoverPlugin {
    pub registered_by: &'static str,
}
impl_tracked_plugin!(HoverPlugin);

impl Plugin for HoverPlugin {
    fn build(&self, app: &mut App) {
        log_plugin_build(self);
        app.init_resource::<HoveredTile>()
            .add_systems(Update, sys_update_hover.run_if(in_state(AppState::InGame)));
    }
}

fn sys_update_hover(
    windows: Query<&Window>,
    camera_q: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    map: Res<MapRes>,
    mut hovered: ResMut<HoveredTile>,
) {
    let Ok(window) = windows.single() else { return };
    let Some(cursor) = window.cursor_position() else {
        hovered.descriptor = None;
        hovered.height = None;
        return;
    };
    let Ok((camera_transform, camera)) = camera_q.single() else { return };

    let ndc_x = (cursor.x / window.width()) * 2.0 - 1.0;
    let ndc_y = 1.0 - (cursor.y / window.height()) * 2.0;

    let clip_from_view = camera.clip_from_view();
    let view_from_world = camera_transform.compute_matrix().inverse();
    let view_proj = bevy_mat4_to_core(clip_from_view * view_from_world);

    let camera_pos = CoreVec3::new(
        camera_transform.translation().x,
        camera_transform.translation().y,
        camera_transform.translation().z,
    );
    let near_point = unproject_near_plane(CoreVec2::new(ndc_x, ndc_y), view_proj);
    let direction = (near_point - camera_pos).normalize_or_zero();

    let ground = Plane::new(CoreVec3::new(0.0, map.0.origin.y, 0.0), CoreVec3::Y);
    let Some(t) = ground.ray_intersect(camera_pos, direction) else {
        hovered.descriptor = None;
        hovered.height = None;
        return;
    };

    let hit = camera_pos + direction * t;
    let hit_xz = CoreVec2::new(hit.x, hit.z);
    match map.0.desc_for_point(hit_xz) {
        Ok(desc) => {
            hovered.descriptor = Some(desc);
            hovered.height = map.0.height_at_point(hit_xz).ok();
        }
        Err(_) => {
            hovered.descriptor = None;
            hovered.height = None;
        }
    }
}
