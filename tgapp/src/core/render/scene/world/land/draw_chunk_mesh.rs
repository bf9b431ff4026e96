//! Builds one renderable mesh per map chunk directly from `tgcore::map`
//! geometry: one unshared quad (two triangles) per tile, positioned from
//! `Map::tile_bounds`/`Tile::corner_heights` and triangulated across
//! whichever diagonal `Tile::uses_ne_sw_diagonal` selects. Vertices are
//! colored by height band rather than textured (texturing is out of scope
//! here; there is no asset-backed material to sample).
//!
//! Grounded on the teacher's `draw_chunk_mesh.rs` for the Bevy 0.16 mesh
//! construction call sequence (`Mesh::new`, `insert_attribute`,
//! `insert_indices`, `Mesh3d`/`MeshMaterial3d`) and its per-tile-quad,
//! two-triangles-per-quad winding.

use crate::core::maps::MapRes;
use crate::prelude::*;
use bevy::prelude::*;
use bevy::render::{
    mesh::{Indices, PrimitiveTopology},
    render_asset::RenderAssetUsages,
};
use tgcore::map::{Map, TileDescriptor};

use super::LCMesh;

pub fn sys_spawn_land_chunks(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    map: Res<MapRes>,
) {
    let resolution = map.0.resolution;
    for chunk_r in 0..resolution.chunk_h {
        for chunk_c in 0..resolution.chunk_w {
            let mesh = build_chunk_mesh(&map.0, chunk_r, chunk_c);
            let material = StandardMaterial { perceptual_roughness: 1.0, metallic: 0.0, ..default() };
            commands.spawn((
                LCMesh { chunk_r, chunk_c },
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(materials.add(material)),
                Transform::IDENTITY,
                GlobalTransform::default(),
            ));
            logger::one(
                None,
                LogSev::Debug,
                LogAbout::RenderWorldLand,
                &format!("Spawned chunk mesh at: chunk_r={chunk_r} chunk_c={chunk_c}"),
            );
        }
    }
}

fn build_chunk_mesh(map: &Map, chunk_r: u32, chunk_c: u32) -> Mesh {
    let resolution = map.resolution;
    let tile_count = (resolution.tile_w * resolution.tile_h) as usize;

    let mut positions = Vec::with_capacity(tile_count * 4);
    let mut normals = Vec::with_capacity(tile_count * 4);
    let mut colors = Vec::with_capacity(tile_count * 4);
    let mut indices = Vec::with_capacity(tile_count * 6);

    for tile_r in 0..resolution.tile_h {
        for tile_c in 0..resolution.tile_w {
            let desc = TileDescriptor::new(chunk_r, chunk_c, tile_r, tile_c);
            let tile = map.tile(desc).expect("descriptor within chunk bounds");
            let bounds = map.tile_bounds(desc);
            let corners = tile.corner_heights();

            // World corners: X increases leftward, Z increases away; NW is
            // the max-X/min-Z corner (see `Map::tile_bounds`).
            let nw = Vec3::new(bounds.max.x, map.origin.y + corners.nw, bounds.min.y);
            let ne = Vec3::new(bounds.min.x, map.origin.y + corners.ne, bounds.min.y);
            let sw = Vec3::new(bounds.max.x, map.origin.y + corners.sw, bounds.max.y);
            let se = Vec3::new(bounds.min.x, map.origin.y + corners.se, bounds.max.y);

            let base = positions.len() as u32;
            positions.extend([nw, ne, sw, se]);

            let normal = quad_normal(nw, ne, sw);
            normals.extend([normal; 4]);

            let color = height_band_color(tile.base_height).to_linear().to_f32_array();
            colors.extend([color; 4]);

            if tile.uses_ne_sw_diagonal() {
                indices.extend([base, base + 1, base + 2, base + 1, base + 3, base + 2]);
            } else {
                indices.extend([base, base + 1, base + 3, base, base + 3, base + 2]);
            }
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Flat per-tile normal from the (NW, NE, SW) triangle; good enough for a
/// heightfield built from unshared per-tile vertices (no shared-vertex
/// smoothing across tile boundaries to get right).
fn quad_normal(nw: Vec3, ne: Vec3, sw: Vec3) -> Vec3 {
    (ne - nw).cross(sw - nw).normalize_or(Vec3::Y)
}

fn height_band_color(base_height: i32) -> Color {
    let t = (base_height as f32 / tgcore::constants::MAX_HEIGHT_LEVEL as f32).clamp(0.0, 1.0);
    Color::srgb(0.25 + 0.2 * t, 0.45 + 0.35 * t, 0.2 + 0.1 * (1.0 - t))
}
