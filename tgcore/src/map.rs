//! The chunked map container (SPEC_FULL.md §3, §4.2).
//!
//! Grounded on `original_source/src/map/public/map.h` and `map/tile.c`'s
//! bounds/descriptor math; container shape patterned after the teacher's
//! `uocf/src/geo/map.rs` (`MapPlane` + block cache, `BTreeMap`-keyed
//! lookups), generalized from UO's fixed block grid to an arbitrary chunked
//! tile-grid resolution.

use crate::collision::Rect2D;
use crate::constants::{X_COORDS_PER_TILE, Z_COORDS_PER_TILE};
use crate::errors::{CoreError, CoreResult};
use crate::math::{Vec2, Vec3};
use crate::tile::Tile;
use smallvec::SmallVec;

/// A four-tuple uniquely identifying a tile within a map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileDescriptor {
    pub chunk_r: u32,
    pub chunk_c: u32,
    pub tile_r: u32,
    pub tile_c: u32,
}

impl TileDescriptor {
    pub fn new(chunk_r: u32, chunk_c: u32, tile_r: u32, tile_c: u32) -> Self {
        Self { chunk_r, chunk_c, tile_r, tile_c }
    }
}

/// An opaque identifier for a chunk's render-side resource. Owned by the
/// chunk on the logic side; only the render thread may mutate what it
/// refers to (SPEC_FULL.md §5).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u32);

/// Map resolution: chunk grid size, tiles-per-chunk, and the derived
/// world-space size of one chunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapResolution {
    pub chunk_w: u32,
    pub chunk_h: u32,
    pub tile_w: u32,
    pub tile_h: u32,
}

impl MapResolution {
    pub fn field_w(&self) -> f32 {
        self.tile_w as f32 * X_COORDS_PER_TILE
    }

    pub fn field_h(&self) -> f32 {
        self.tile_h as f32 * Z_COORDS_PER_TILE
    }

    pub fn tile_x_dim(&self) -> f32 {
        self.field_w() / self.tile_w as f32
    }

    pub fn tile_z_dim(&self) -> f32 {
        self.field_h() / self.tile_h as f32
    }

    pub fn total_field_w(&self) -> f32 {
        self.field_w() * self.chunk_w as f32
    }

    pub fn total_field_h(&self) -> f32 {
        self.field_h() * self.chunk_h as f32
    }
}

#[derive(Clone, Debug)]
pub struct Chunk {
    pub tiles: Vec<Tile>,
    pub render_handle: Option<RenderHandle>,
}

impl Chunk {
    pub fn new(tile_w: u32, tile_h: u32) -> Self {
        Self { tiles: vec![Tile::default(); (tile_w * tile_h) as usize], render_handle: None }
    }

    pub fn tile(&self, tile_w: u32, tile_r: u32, tile_c: u32) -> &Tile {
        &self.tiles[(tile_r * tile_w + tile_c) as usize]
    }

    pub fn tile_mut(&mut self, tile_w: u32, tile_r: u32, tile_c: u32) -> &mut Tile {
        &mut self.tiles[(tile_r * tile_w + tile_c) as usize]
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    pub texture_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinimapResizeMask {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Debug)]
pub struct MinimapDesc {
    pub vres_width: u32,
    pub vres_height: u32,
    pub center_screen: Vec2,
    pub side_length: f32,
    pub resize_mask: MinimapResizeMask,
}

/// An opaque handle to the navigation subsystem (SPEC_FULL.md §4.8); the
/// spatial core never looks inside it.
pub struct NavHandle(pub Box<dyn crate::nav::NavigationEngine>);

pub struct Map {
    pub resolution: MapResolution,
    /// World-space position of the map's top-left corner.
    pub origin: Vec3,
    pub chunks: Vec<Chunk>,
    pub materials: Vec<Material>,
    pub minimap: MinimapDesc,
    pub nav: Option<NavHandle>,
}

impl Map {
    pub fn new(resolution: MapResolution, origin: Vec3) -> Self {
        let num_chunks = (resolution.chunk_w * resolution.chunk_h) as usize;
        let chunks = (0..num_chunks).map(|_| Chunk::new(resolution.tile_w, resolution.tile_h)).collect();
        Self {
            resolution,
            origin,
            chunks,
            materials: Vec::new(),
            minimap: MinimapDesc {
                vres_width: crate::constants::MINIMAP_DEFAULT_VRES_WIDTH,
                vres_height: crate::constants::MINIMAP_DEFAULT_VRES_HEIGHT,
                center_screen: Vec2::ZERO,
                side_length: crate::constants::MINIMAP_DEFAULT_SIDE_LENGTH,
                resize_mask: MinimapResizeMask { top: false, bottom: false, left: false, right: false },
            },
            nav: None,
        }
    }

    fn chunk_index(&self, chunk_r: u32, chunk_c: u32) -> Option<usize> {
        if chunk_r >= self.resolution.chunk_h || chunk_c >= self.resolution.chunk_w {
            return None;
        }
        Some((chunk_r * self.resolution.chunk_w + chunk_c) as usize)
    }

    pub fn chunk(&self, chunk_r: u32, chunk_c: u32) -> Option<&Chunk> {
        self.chunk_index(chunk_r, chunk_c).map(|i| &self.chunks[i])
    }

    pub fn chunk_mut(&mut self, chunk_r: u32, chunk_c: u32) -> Option<&mut Chunk> {
        let idx = self.chunk_index(chunk_r, chunk_c)?;
        Some(&mut self.chunks[idx])
    }

    pub fn tile(&self, d: TileDescriptor) -> Option<&Tile> {
        let chunk = self.chunk(d.chunk_r, d.chunk_c)?;
        if d.tile_r >= self.resolution.tile_h || d.tile_c >= self.resolution.tile_w {
            return None;
        }
        Some(chunk.tile(self.resolution.tile_w, d.tile_r, d.tile_c))
    }

    pub fn tile_mut(&mut self, d: TileDescriptor) -> Option<&mut Tile> {
        let tile_w = self.resolution.tile_w;
        let tile_h = self.resolution.tile_h;
        let chunk = self.chunk_mut(d.chunk_r, d.chunk_c)?;
        if d.tile_r >= tile_h || d.tile_c >= tile_w {
            return None;
        }
        Some(chunk.tile_mut(tile_w, d.tile_r, d.tile_c))
    }

    /// World-space XZ bounds of a tile (SPEC_FULL.md §4.2). `min`/`max` are
    /// `(x, z)` pairs; X decreases with increasing column due to the
    /// leftward-X convention.
    pub fn tile_bounds(&self, d: TileDescriptor) -> Rect2D {
        let res = &self.resolution;
        let tile_x_dim = res.tile_x_dim();
        let tile_z_dim = res.tile_z_dim();

        let x_hi = self.origin.x - (d.chunk_c as f32 * res.field_w() + d.tile_c as f32 * tile_x_dim);
        let x_lo = x_hi - tile_x_dim;

        let z_lo = self.origin.z + d.chunk_r as f32 * res.field_h() + d.tile_r as f32 * tile_z_dim;
        let z_hi = z_lo + tile_z_dim;

        Rect2D::new(Vec2::new(x_lo, z_lo), Vec2::new(x_hi, z_hi))
    }

    pub fn tile_center(&self, d: TileDescriptor) -> Vec2 {
        let b = self.tile_bounds(d);
        (b.min + b.max) * 0.5
    }

    /// World-space AABB of a chunk (used for frustum culling, §4.7).
    pub fn chunk_bounds(&self, chunk_r: u32, chunk_c: u32) -> crate::collision::Aabb {
        let res = &self.resolution;
        let x_hi = self.origin.x - chunk_c as f32 * res.field_w();
        let x_lo = x_hi - res.field_w();
        let z_lo = self.origin.z + chunk_r as f32 * res.field_h();
        let z_hi = z_lo + res.field_h();
        // Height extent is conservative: from the lowest possible base to
        // the highest possible level, scaled.
        let y_lo = -(crate::constants::MAX_HEIGHT_LEVEL as f32) * crate::constants::Y_COORDS_PER_TILE;
        let y_hi = (crate::constants::MAX_HEIGHT_LEVEL as f32 + 1.0) * crate::constants::Y_COORDS_PER_TILE;
        crate::collision::Aabb::new(Vec3::new(x_lo, y_lo, z_lo), Vec3::new(x_hi, y_hi, z_hi))
    }

    /// Resolve the descriptor that contains world point `p` (its X/Z only).
    pub fn desc_for_point(&self, p: Vec2) -> CoreResult<TileDescriptor> {
        let res = &self.resolution;
        let dx = self.origin.x - p.x;
        let dz = p.y - self.origin.z;

        if dx < 0.0 || dx > res.total_field_w() || dz < 0.0 || dz > res.total_field_h() {
            return Err(CoreError::OutOfMap);
        }

        let chunk_w_world = res.field_w();
        let chunk_h_world = res.field_h();
        let chunk_c = ((dx / chunk_w_world) as u32).min(res.chunk_w - 1);
        let chunk_r = ((dz / chunk_h_world) as u32).min(res.chunk_h - 1);

        let local_x = dx - chunk_c as f32 * chunk_w_world;
        let local_z = dz - chunk_r as f32 * chunk_h_world;

        let tile_c = ((local_x / res.tile_x_dim()) as u32).min(res.tile_w - 1);
        let tile_r = ((local_z / res.tile_z_dim()) as u32).min(res.tile_h - 1);

        Ok(TileDescriptor { chunk_r, chunk_c, tile_r, tile_c })
    }

    /// Height at a world-space point, per SPEC_FULL.md §4.2.
    pub fn height_at_point(&self, p: Vec2) -> CoreResult<f32> {
        let d = self.desc_for_point(p)?;
        let bounds = self.tile_bounds(d);
        let tile = self.tile(d).ok_or(CoreError::OutOfMap)?;

        // u increases toward +X, but bounds.min.x < bounds.max.x while X
        // increases leftward, so u=0 is at bounds.max.x (the "west" edge).
        let u = ((bounds.max.x - p.x) / (bounds.max.x - bounds.min.x)).clamp(0.0, 1.0);
        let v = ((p.y - bounds.min.y) / (bounds.max.y - bounds.min.y)).clamp(0.0, 1.0);

        Ok(self.origin.y + tile.height_at(u, v))
    }

    /// Absolute `(row, col)` position of a descriptor, the canonical sort
    /// order (SPEC_FULL.md §3).
    pub fn absolute_row_col(&self, d: TileDescriptor) -> (i64, i64) {
        let row = d.chunk_r as i64 * self.resolution.tile_h as i64 + d.tile_r as i64;
        let col = d.chunk_c as i64 * self.resolution.tile_w as i64 + d.tile_c as i64;
        (row, col)
    }

    fn desc_from_absolute(&self, row: i64, col: i64) -> Option<TileDescriptor> {
        if row < 0 || col < 0 {
            return None;
        }
        let tile_h = self.resolution.tile_h as i64;
        let tile_w = self.resolution.tile_w as i64;
        let (chunk_r, tile_r) = (row / tile_h, row % tile_h);
        let (chunk_c, tile_c) = (col / tile_w, col % tile_w);
        if chunk_r >= self.resolution.chunk_h as i64 || chunk_c >= self.resolution.chunk_w as i64 {
            return None;
        }
        Some(TileDescriptor {
            chunk_r: chunk_r as u32,
            chunk_c: chunk_c as u32,
            tile_r: tile_r as u32,
            tile_c: tile_c as u32,
        })
    }

    /// Step a descriptor by `(Δcol, Δrow)`, converting to/from absolute
    /// row/col form (SPEC_FULL.md §4.2). Fails if out of map bounds.
    pub fn relative_desc(&self, d: TileDescriptor, delta_col: i64, delta_row: i64) -> CoreResult<TileDescriptor> {
        let (row, col) = self.absolute_row_col(d);
        self.desc_from_absolute(row + delta_row, col + delta_col).ok_or(CoreError::OutOfMap)
    }

    /// Signed row/col delta between two descriptors; `distance(a, b) ==
    /// -distance(b, a)` by construction.
    pub fn distance(&self, a: TileDescriptor, b: TileDescriptor) -> (i64, i64) {
        let (ar, ac) = self.absolute_row_col(a);
        let (br, bc) = self.absolute_row_col(b);
        (br - ar, bc - ac)
    }

    /// The up-to-eight neighbouring descriptors of `d`, in `(Δcol, Δrow)`
    /// order N, S, E, W, NE, NW, SE, SW; missing neighbours (map edge) are
    /// `None`.
    pub fn neighbors(&self, d: TileDescriptor) -> SmallVec<[Option<TileDescriptor>; 8]> {
        const DELTAS: [(i64, i64); 8] =
            [(0, -1), (0, 1), (1, 0), (-1, 0), (1, -1), (-1, -1), (1, 1), (-1, 1)];
        DELTAS.iter().map(|&(dc, dr)| self.relative_desc(d, dc, dr).ok()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_map() -> Map {
        Map::new(MapResolution { chunk_w: 1, chunk_h: 1, tile_w: 32, tile_h: 32 }, Vec3::ZERO)
    }

    #[test]
    fn tile_bounds_contains_center_with_expected_extent() {
        let m = test_map();
        let d = TileDescriptor::new(0, 0, 5, 5);
        let b = m.tile_bounds(d);
        let center = (b.min + b.max) * 0.5;
        assert!(crate::collision::point_inside_rect_2d(center, &b));
        assert!((b.max.x - b.min.x - m.resolution.tile_x_dim()).abs() < 1e-5);
        assert!((b.max.y - b.min.y - m.resolution.tile_z_dim()).abs() < 1e-5);
    }

    #[test]
    fn desc_for_point_round_trips_through_tile_center() {
        let m = test_map();
        let d = TileDescriptor::new(0, 0, 10, 7);
        let center = m.tile_center(d);
        let back = m.desc_for_point(center).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn desc_for_point_out_of_map_fails() {
        let m = test_map();
        assert_eq!(m.desc_for_point(Vec2::new(10_000.0, 10_000.0)), Err(CoreError::OutOfMap));
    }

    #[test]
    fn distance_is_antisymmetric() {
        let m = test_map();
        let a = TileDescriptor::new(0, 0, 2, 3);
        let b = TileDescriptor::new(0, 0, 9, 1);
        let (dr, dc) = m.distance(a, b);
        let (dr2, dc2) = m.distance(b, a);
        assert_eq!((dr, dc), (-dr2, -dc2));
    }

    #[test]
    fn relative_desc_out_of_map_fails_at_edge() {
        let m = test_map();
        let d = TileDescriptor::new(0, 0, 0, 0);
        assert!(m.relative_desc(d, -1, 0).is_err());
        assert!(m.relative_desc(d, 0, -1).is_err());
    }

    #[test]
    fn straight_down_ray_boundary_scenario() {
        // Map 1x1 chunks, all-flat, base_height 0: height at any point is 0.
        let m = test_map();
        let h = m.height_at_point(Vec2::new(-10.0, 10.0)).unwrap();
        assert_eq!(h, 0.0);
    }
}
