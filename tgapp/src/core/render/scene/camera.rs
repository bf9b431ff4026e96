use crate::core::maps::MapRes;
use crate::core::system_sets::StartupSysSet;
use crate::prelude::*;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::window::Window;

pub const TILE_PIXEL_SIZE: f32 = 44.0;

/* PUBLIC CONSTANTS: ZOOM */
pub const DEFAULT_ZOOM: f32 = 1.0;
pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 6.0;
/// Applied to scroll-wheel input (in lines) to arrive at a zoom delta.
const ZOOM_STEP: f32 = 0.1;

/* RENDERING MAGIC CONSTANTS */
/// Magic number found through trial and error with the aim of rendering tiles of same width and height.
const ORTHO_WIDTH_SCALE_FACTOR: f32 = 1.79;

/// Factor to correct the rendered tile size to our desired size.
/// Due to the orthographic projection, pixel size is not 1:1 but it will be distorted.
pub const TILE_SIZE_FACTOR: f32 = {
    const MEASURED_TILE_PIXEL_SIZE: f32 = 62.0;
    MEASURED_TILE_PIXEL_SIZE / TILE_PIXEL_SIZE
};

const ORTHO_SIZE_FACTOR: f32 = TILE_PIXEL_SIZE / TILE_SIZE_FACTOR;

#[derive(Resource, Clone, Copy, Debug)]
pub struct RenderZoom(pub f32);

impl Default for RenderZoom {
    fn default() -> Self {
        RenderZoom(DEFAULT_ZOOM)
    }
}
impl RenderZoom {
    pub fn write_val(&mut self, val: f32) {
        self.0 = val.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct MainCamera;

/// Height above the map's ground plane the camera sits at, at a fixed
/// oblique angle looking down at the centre of the loaded map.
const CAMERA_OFFSET: Vec3 = Vec3::new(40.0, 60.0, 40.0);

pub struct CameraPlugin {
    pub registered_by: &'static str,
}
impl_tracked_plugin!(CameraPlugin);

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        log_plugin_build(self);
        app.insert_resource(RenderZoom::default())
            .add_systems(Startup, sys_setup_cam.in_set(StartupSysSet::SpawnCamera))
            .add_systems(
                Update,
                (sys_update_camera_zoom, sys_update_camera_projection_to_view).chain(),
            );
    }
}

fn map_focus_point(map: &tgcore::map::Map) -> Vec3 {
    let res = &map.resolution;
    let cx = map.origin.x - res.total_field_w() * 0.5;
    let cz = map.origin.z + res.total_field_h() * 0.5;
    Vec3::new(cx, map.origin.y, cz)
}

fn sys_setup_cam(mut commands: Commands, windows: Query<&Window>, render_zoom: Res<RenderZoom>, map: Res<MapRes>) {
    let main_window = windows.single().unwrap();
    let window_width = main_window.resolution.width();
    let window_height = main_window.resolution.height() / ORTHO_WIDTH_SCALE_FACTOR;
    let zoom = render_zoom.0;

    // Compute the orthographic width/height (world units) so that visible tiles fill the window at tile size/zoom.
    let ortho_width = window_width / ORTHO_SIZE_FACTOR;
    let ortho_height = window_height / ORTHO_SIZE_FACTOR;

    let focus = map_focus_point(&map.0);

    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Projection::Orthographic(OrthographicProjection {
            scale: zoom,
            scaling_mode: ScalingMode::Fixed { width: ortho_width, height: ortho_height },
            near: -10000.0,
            far: 10000.0,
            ..OrthographicProjection::default_3d()
        }),
        Transform::from_translation(focus + CAMERA_OFFSET).looking_at(focus, Vec3::Y),
        GlobalTransform::default(),
    ));

    logger::one(None, LogSev::Debug, LogAbout::Camera, "Spawned scene camera.");
}

fn sys_update_camera_zoom(mut wheel_events: EventReader<MouseWheel>, mut render_zoom: ResMut<RenderZoom>) {
    for ev in wheel_events.read() {
        render_zoom.write_val(render_zoom.0 - ev.y * ZOOM_STEP);
    }
}

fn sys_update_camera_projection_to_view(
    mut camera_q: Query<&mut Projection, With<MainCamera>>,
    windows: Query<&Window>,
    render_zoom: Res<RenderZoom>,
) {
    let Ok(main_window) = windows.single() else { return };
    let window_width = main_window.resolution.width();
    let window_height = main_window.resolution.height() / ORTHO_WIDTH_SCALE_FACTOR;
    let zoom = render_zoom.0;

    let ortho_width = window_width / ORTHO_SIZE_FACTOR;
    let ortho_height = window_height / ORTHO_SIZE_FACTOR;

    let Ok(mut proj) = camera_q.single_mut() else { return };
    if let Projection::Orthographic(ref mut ortho) = *proj {
        ortho.scaling_mode = ScalingMode::Fixed { width: ortho_width, height: ortho_height };
        ortho.scale = zoom;
    }
}
