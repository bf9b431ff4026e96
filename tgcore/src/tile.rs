//! Per-tile geometric model (SPEC_FULL.md §3, §4.1).
//!
//! Grounded on `original_source/src/map/public/tile.h` and `map/tile.c`;
//! struct shape patterned after the teacher's `tiledata.rs` (`derive-new` +
//! a handful of plain accessors rather than a bitflag-per-bool scheme, since
//! this domain's per-tile state is small and fully enumerated).

use crate::constants::{MAX_HEIGHT_LEVEL, Y_COORDS_PER_TILE};
use crate::math::{bilinear_interp, signed_area_2d, Plane, Vec2, Vec3};
use derive_new::new;
use getset::{CopyGetters, Setters};
use strum_macros::{Display, EnumIter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TileType {
    Flat,
    RampSN,
    RampNS,
    RampEW,
    RampWE,
    CornerConvexSW,
    CornerConvexSE,
    CornerConvexNW,
    CornerConvexNE,
    CornerConcaveSW,
    CornerConcaveSE,
    CornerConcaveNW,
    CornerConcaveNE,
}

impl TileType {
    pub fn is_ramp(self) -> bool {
        matches!(self, TileType::RampSN | TileType::RampNS | TileType::RampEW | TileType::RampWE)
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            TileType::CornerConvexSW
                | TileType::CornerConvexSE
                | TileType::CornerConvexNW
                | TileType::CornerConvexNE
                | TileType::CornerConcaveSW
                | TileType::CornerConcaveSE
                | TileType::CornerConcaveNW
                | TileType::CornerConcaveNE
        )
    }

    /// The four "raised" flags in `(NW, NE, SW, SE)` order, per the
    /// type-specific table in SPEC_FULL.md §3.
    fn raised_corners(self) -> [bool; 4] {
        use TileType::*;
        match self {
            Flat => [false, false, false, false],
            RampSN => [true, true, false, false],
            RampNS => [false, false, true, true],
            RampEW => [true, false, true, false],
            RampWE => [false, true, false, true],
            // CORNER_CONVEX_<X>: the three corners other than <X> are raised.
            CornerConvexSW => [true, true, false, true],
            CornerConvexSE => [true, true, true, false],
            CornerConvexNW => [false, true, true, true],
            CornerConvexNE => [true, false, true, true],
            // CORNER_CONCAVE_<X>: only the corner opposite <X> is raised.
            // Opposite pairs: NW<->SE, NE<->SW.
            CornerConcaveSW => [false, true, false, false],
            CornerConcaveSE => [true, false, false, false],
            CornerConcaveNW => [false, false, false, true],
            CornerConcaveNE => [false, false, true, false],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    None,
    Blur,
}

/// Corner heights, in `(NW, NE, SW, SE)` order, already scaled by
/// `Y_COORDS_PER_TILE`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerHeights {
    pub nw: f32,
    pub ne: f32,
    pub sw: f32,
    pub se: f32,
}

#[derive(Clone, Debug, PartialEq, new, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct Tile {
    pub tile_type: TileType,
    /// `0 <= base_height <= MAX_HEIGHT_LEVEL`; negative values denote water
    /// in the source convention, clamping is the caller's responsibility
    /// since this rewrite keeps the field a plain `i32`.
    pub base_height: i32,
    /// Valid only when `tile_type != Flat`.
    #[new(default)]
    pub ramp_height: i32,
    pub top_mat_idx: u16,
    pub sides_mat_idx: u16,
    #[new(value = "true")]
    pub pathable: bool,
    #[new(default)]
    pub blend_mode: BlendMode,
    #[new(default)]
    pub blend_normals: bool,
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::None
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::new(TileType::Flat, 0, 0, 0)
    }
}

impl Tile {
    /// Corner heights derived from `tile_type`/`base_height`/`ramp_height`.
    pub fn corner_heights(&self) -> CornerHeights {
        let base = self.base_height as f32 * Y_COORDS_PER_TILE;
        let raised_value = base + self.ramp_height as f32 * Y_COORDS_PER_TILE;
        let [nw, ne, sw, se] = self.tile_type.raised_corners();
        CornerHeights {
            nw: if nw { raised_value } else { base },
            ne: if ne { raised_value } else { base },
            sw: if sw { raised_value } else { base },
            se: if se { raised_value } else { base },
        }
    }

    /// Whether the NE-SW diagonal (rather than NW-SE) splits this corner
    /// tile's top face into two triangles. Meaningless for non-corner types.
    pub fn uses_ne_sw_diagonal(&self) -> bool {
        matches!(
            self.tile_type,
            TileType::CornerConvexNE
                | TileType::CornerConcaveNE
                | TileType::CornerConvexSW
                | TileType::CornerConcaveSW
        )
    }

    /// Point-on-tile height sampling (SPEC_FULL.md §4.1). `(u, v) ∈ [0,1]²`
    /// with `u` toward +X, `v` toward +Z, in the tile's local top plane.
    pub fn height_at(&self, u: f32, v: f32) -> f32 {
        let corners = self.corner_heights();

        if matches!(self.tile_type, TileType::Flat) {
            return self.base_height as f32 * Y_COORDS_PER_TILE;
        }

        if self.tile_type.is_ramp() {
            return bilinear_interp(corners.nw, corners.ne, corners.sw, corners.se, u, v);
        }

        // Corner tile: split into two triangles and intersect a straight-down
        // ray against the chosen triangle's plane.
        let nw = Vec3::new(0.0, corners.nw, 0.0);
        let ne = Vec3::new(1.0, corners.ne, 0.0);
        let sw = Vec3::new(0.0, corners.sw, 1.0);
        let se = Vec3::new(1.0, corners.se, 1.0);

        let (tri_a, tri_b) = if self.uses_ne_sw_diagonal() {
            // Diagonal through NE-SW: triangles (NW,NE,SW) and (NE,SE,SW).
            ([nw, ne, sw], [ne, se, sw])
        } else {
            // Diagonal through NW-SE: triangles (NW,NE,SE) and (NW,SE,SW).
            ([nw, ne, se], [nw, se, sw])
        };

        let p = Vec2::new(u, v);
        let in_tri_a = point_inside_triangle_xz(p, tri_a);
        let chosen = if in_tri_a { tri_a } else { tri_b };

        let plane = Plane::from_triangle(chosen[0], chosen[1], chosen[2]);
        let origin = Vec3::new(u, (MAX_HEIGHT_LEVEL as f32 + 1.0) * Y_COORDS_PER_TILE + 10.0, v);
        plane
            .ray_intersect(origin, Vec3::NEG_Y)
            .map(|t| origin.y - t)
            .unwrap_or(self.base_height as f32 * Y_COORDS_PER_TILE)
    }
}

fn point_inside_triangle_xz(p: Vec2, tri: [Vec3; 3]) -> bool {
    let a = Vec2::new(tri[0].x, tri[0].z);
    let b = Vec2::new(tri[1].x, tri[1].z);
    let c = Vec2::new(tri[2].x, tri[2].z);
    let area = signed_area_2d(a, b, c);
    if area.abs() < f32::EPSILON {
        return false;
    }
    let u = signed_area_2d(p, b, c) / area;
    let v = signed_area_2d(a, p, c) / area;
    let w = 1.0 - u - v;
    u >= -1e-4 && v >= -1e-4 && w >= -1e-4
}

/// The four side faces of a tile, used by `face_visible`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    North,
    South,
    East,
    West,
}

/// Face visibility (SPEC_FULL.md §4.1): visible iff either of the face's two
/// corner heights strictly exceeds the corresponding corner height of the
/// neighbour across that face. `neighbor` is `None` at a chunk/map edge,
/// which is always visible.
pub fn face_visible(this: &CornerHeights, face: Face, neighbor: Option<&CornerHeights>) -> bool {
    let Some(neighbor) = neighbor else {
        return true;
    };
    // The neighbour's corners that touch this face are its corners on the
    // opposite side (e.g. this tile's North face touches the neighbour's
    // South-side corners, which for that neighbour are its NW/NE).
    let (my_a, my_b, their_a, their_b) = match face {
        Face::North => (this.nw, this.ne, neighbor.sw, neighbor.se),
        Face::South => (this.sw, this.se, neighbor.nw, neighbor.ne),
        Face::East => (this.ne, this.se, neighbor.nw, neighbor.sw),
        Face::West => (this.nw, this.sw, neighbor.ne, neighbor.se),
    };
    my_a > their_a || my_b > their_b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_tile_all_corners_at_base() {
        let t = Tile::new(TileType::Flat, 3, 0, 0);
        let c = t.corner_heights();
        let expected = 3.0 * Y_COORDS_PER_TILE;
        assert_eq!(c.nw, expected);
        assert_eq!(c.ne, expected);
        assert_eq!(c.sw, expected);
        assert_eq!(c.se, expected);
    }

    #[test]
    fn ramp_sn_raises_north_corners() {
        let mut t = Tile::new(TileType::RampSN, 0, 0, 0);
        t.ramp_height = 2;
        let c = t.corner_heights();
        assert_eq!(c.ne, 2.0 * Y_COORDS_PER_TILE);
        assert_eq!(c.nw, 2.0 * Y_COORDS_PER_TILE);
        assert_eq!(c.sw, 0.0);
        assert_eq!(c.se, 0.0);
    }

    #[test]
    fn ramp_sn_height_boundary_scenario() {
        // SPEC_FULL.md §8 boundary scenario: RAMP_SN, base=0, ramp=2.
        let mut t = Tile::new(TileType::RampSN, 0, 0, 0);
        t.ramp_height = 2;
        assert_eq!(t.height_at(0.5, 0.0), 8.0);
        assert_eq!(t.height_at(0.5, 1.0), 0.0);
    }

    #[test]
    fn flat_ray_straight_down_boundary_scenario() {
        let t = Tile::new(TileType::Flat, 0, 0, 0);
        assert_eq!(t.height_at(0.5, 0.5), 0.0);
    }

    #[test]
    fn corner_convex_valley_is_low() {
        let t = Tile::new(TileType::CornerConvexSW, 0, 0, 0);
        let c = t.corner_heights();
        assert_eq!(c.sw, 0.0);
        assert!(c.nw > 0.0 || t.ramp_height == 0);
    }

    #[test]
    fn face_visible_across_equal_height_neighbors_is_false() {
        let flat = CornerHeights { nw: 0.0, ne: 0.0, sw: 0.0, se: 0.0 };
        assert!(!face_visible(&flat, Face::North, Some(&flat)));
    }

    #[test]
    fn face_visible_at_map_edge_is_true() {
        let flat = CornerHeights { nw: 0.0, ne: 0.0, sw: 0.0, se: 0.0 };
        assert!(face_visible(&flat, Face::North, None));
    }
}
