//! Crate-wide constants inherited from the source engine (SPEC_FULL.md §6).

pub const X_COORDS_PER_TILE: f32 = 8.0;
pub const Y_COORDS_PER_TILE: f32 = 4.0;
pub const Z_COORDS_PER_TILE: f32 = 8.0;

pub const TILES_PER_CHUNK_WIDTH: usize = 32;
pub const TILES_PER_CHUNK_HEIGHT: usize = 32;

pub const MAX_HEIGHT_LEVEL: i32 = 9;

pub const DEFAULT_NEAR_PLANE: f32 = 5.0;
pub const DEFAULT_FOV_RADIANS: f32 = std::f32::consts::FRAC_PI_4;

pub const MINIMAP_DEFAULT_VRES_WIDTH: u32 = 1920;
pub const MINIMAP_DEFAULT_VRES_HEIGHT: u32 = 1080;
pub const MINIMAP_DEFAULT_SIDE_LENGTH: f32 = 256.0;
pub const MINIMAP_BORDER_WIDTH: f32 = 3.0;

/// Shared "near enough to zero" tolerance, and the supercover start-point
/// nudge magnitude (SPEC_FULL.md §9, Open Questions — decided).
pub const EPSILON: f32 = 1.0 / 1024.0;
