pub mod camera;
pub mod hover;
pub mod world;

use crate::prelude::*;
use bevy::prelude::*;

/// Wires up the map camera, the hovered-tile tracker, and the land chunk
/// meshes. The demo map is small enough to spawn its whole chunk set once at
/// startup rather than streaming chunks in and out as the camera moves.
pub struct ScenePlugin {
    pub registered_by: &'static str,
}
impl_tracked_plugin!(ScenePlugin);

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        log_plugin_build(self);

        app.add_plugins((
            world::WorldPlugin { registered_by: "ScenePlugin" },
            camera::CameraPlugin { registered_by: "ScenePlugin" },
            hover::HoverPlugin { registered_by: "ScenePlugin" },
        ));
    }
}
