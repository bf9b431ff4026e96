pub mod land;

use crate::prelude::*;
use bevy::prelude::*;

pub struct WorldPlugin {
    pub registered_by: &'static str,
}
impl_tracked_plugin!(WorldPlugin);
impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        log_plugin_build(self);
        app.add_plugins(land::DrawLandChunkMeshPlugin { registered_by: "WorldPlugin" });
    }
}
