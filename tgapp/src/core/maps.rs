//! The loaded map resource.
//!
//! Grounded on the teacher's `core/maps.rs` `MapPlane` resource pattern, now
//! wrapping `tgcore::map::Map` directly instead of a bare id/width/height
//! triple. There is no PFMAP asset shipped with this demo (authoring one by
//! hand without being able to parse-test it would be error-prone); instead
//! this builds a small terraced heightfield straight through the
//! `tgcore::map`/`tgcore::tile` construction API, which exercises the same
//! `Map`/`Chunk`/`Tile` surface a loaded PFMAP document would populate.

use crate::core::system_sets::StartupSysSet;
use crate::prelude::*;
use crate::settings::Settings;
use bevy::prelude::*;
use tgcore::map::{Map, MapResolution, Material, TileDescriptor};
use tgcore::math::Vec3 as CoreVec3;
use tgcore::tile::{Tile, TileType};

/// `num_materials` ceiling passed to `tgcore::pfmap::parse_pfmap`; PFMAP's
/// 3-decimal-digit material index columns (SPEC_FULL.md §6) cap this at 1000
/// regardless, this is just a saner default for a hand-authored demo map.
const MAX_PFMAP_MATERIALS: u32 = 256;

#[derive(Resource)]
pub struct MapRes(pub Map);

pub struct MapsPlugin {
    pub registered_by: &'static str,
}
impl_tracked_plugin!(MapsPlugin);

impl Plugin for MapsPlugin {
    fn build(&self, app: &mut App) {
        log_plugin_build(self);
        app.add_systems(Startup, sys_load_map.in_set(StartupSysSet::LoadMap));
    }
}

const DEMO_CHUNK_W: u32 = 2;
const DEMO_CHUNK_H: u32 = 2;
/// Rows per flat terrace band; the last row of each band is a `RampNS`
/// transition up into the next band.
const BAND_HEIGHT_ROWS: u32 = 12;

fn sys_load_map(mut commands: Commands, settings: Res<Settings>) {
    let map = load_configured_map(&settings.map.pfmap_path);
    logger::one(
        None,
        LogSev::Info,
        LogAbout::Map,
        &format!(
            "Loaded map: {}x{} chunks, {}x{} tiles per chunk.",
            map.resolution.chunk_w, map.resolution.chunk_h, map.resolution.tile_w, map.resolution.tile_h,
        ),
    );
    commands.insert_resource(MapRes(map));
}

/// Loads the PFMAP document named by `settings.map.pfmap_path`, or the
/// procedurally generated demo terrain when the path is empty. A failed
/// read or parse falls back to the demo terrain too (SPEC_FULL.md §7: "a
/// failed map load leaves the current map loaded"; here, where there is no
/// current map yet, that floor is the demo terrain rather than an empty one).
fn load_configured_map(pfmap_path: &str) -> Map {
    if pfmap_path.is_empty() {
        return build_demo_map();
    }

    let load_result = std::fs::read_to_string(pfmap_path)
        .map_err(|e| e.to_string())
        .and_then(|text| tgcore::pfmap::parse_pfmap(&text, CoreVec3::ZERO, MAX_PFMAP_MATERIALS).map_err(|e| e.to_string()));

    match load_result {
        Ok((map, _materials)) => map,
        Err(reason) => {
            logger::one(
                None,
                LogSev::Error,
                LogAbout::Map,
                &format!("Failed to load PFMAP '{pfmap_path}': {reason}. Falling back to the demo terrain."),
            );
            build_demo_map()
        }
    }
}

fn build_demo_map() -> Map {
    let resolution = MapResolution {
        chunk_w: DEMO_CHUNK_W,
        chunk_h: DEMO_CHUNK_H,
        tile_w: tgcore::constants::TILES_PER_CHUNK_WIDTH as u32,
        tile_h: tgcore::constants::TILES_PER_CHUNK_HEIGHT as u32,
    };
    let mut map = Map::new(resolution, CoreVec3::ZERO);
    map.materials = vec![
        Material { texture_name: "grass".into() },
        Material { texture_name: "rock".into() },
    ];

    let tile_h = resolution.tile_h;
    let tile_w = resolution.tile_w;
    let max_band = tgcore::constants::MAX_HEIGHT_LEVEL as u32 - 1;

    for chunk_r in 0..resolution.chunk_h {
        for chunk_c in 0..resolution.chunk_w {
            for tile_r in 0..tile_h {
                let global_row = chunk_r * tile_h + tile_r;
                let band = (global_row / BAND_HEIGHT_ROWS).min(max_band);
                let is_transition = global_row % BAND_HEIGHT_ROWS == BAND_HEIGHT_ROWS - 1 && band < max_band;

                for tile_c in 0..tile_w {
                    let global_col = chunk_c * tile_w + tile_c;
                    let mat: u16 = if band % 2 == 0 { 0 } else { 1 };

                    let mut tile = Tile::new(
                        if is_transition { TileType::RampNS } else { TileType::Flat },
                        band as i32,
                        mat,
                        mat,
                    );
                    if is_transition {
                        tile.ramp_height = 1;
                    } else if global_row % 7 == 3 && global_col % 11 == 5 {
                        // A handful of decorative bumps scattered across open ground.
                        tile.tile_type = TileType::CornerConvexNE;
                        tile.ramp_height = 1;
                    }

                    let d = TileDescriptor::new(chunk_r, chunk_c, tile_r, tile_c);
                    *map.tile_mut(d).expect("generated descriptor is always in-bounds") = tile;
                }
            }
        }
    }

    map
}
