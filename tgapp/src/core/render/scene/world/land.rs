pub mod draw_chunk_mesh;

use crate::core::system_sets::StartupSysSet;
use crate::prelude::*;
use bevy::prelude::*;

/// Tag component: marks entities which are land chunk meshes, allows queries for those entities.
#[derive(Component)]
pub struct LCMesh {
    pub chunk_r: u32,
    pub chunk_c: u32,
}

/// Spawns one mesh entity per chunk of the loaded map.
pub struct DrawLandChunkMeshPlugin {
    pub registered_by: &'static str,
}
impl_tracked_plugin!(DrawLandChunkMeshPlugin);

impl Plugin for DrawLandChunkMeshPlugin {
    fn build(&self, app: &mut App) {
        log_plugin_build(self);
        app.add_systems(
            Startup,
            draw_chunk_mesh::sys_spawn_land_chunks.in_set(StartupSysSet::SpawnLandChunks),
        );
    }
}
