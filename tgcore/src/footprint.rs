//! Tile-footprint extraction (SPEC_FULL.md §4.5).
//!
//! Grounded on `original_source/src/map/tile.c`'s `M_Tile_AllUnderObj`,
//! `M_Tile_AllUnderCircle` and the contour painter (the source's own
//! misspelling, `Countour`, is not carried over — see DESIGN.md).

use crate::collision::{circle_rect_intersection_2d, point_inside_rotated_rect_2d, rect_rect_intersection_2d, Obb, Rect2D};
use crate::map::{Map, TileDescriptor};
use crate::math::Vec2;
use crate::supercover::supercover;
use smallvec::SmallVec;
use std::collections::HashSet;

/// All tiles under the bottom face of an OBB. May contain duplicates; the
/// caller deduplicates if required (SPEC_FULL.md §4.5).
pub fn all_tiles_under_obb(map: &Map, obb: &Obb) -> SmallVec<[TileDescriptor; 32]> {
    let mut out: SmallVec<[TileDescriptor; 32]> = SmallVec::new();
    let bottom = obb.bottom_face();
    let corners_2d: [Vec2; 4] =
        [xz(bottom[0]), xz(bottom[1]), xz(bottom[2]), xz(bottom[3])];

    let mut min_row = i64::MAX;
    let mut max_row = i64::MIN;
    let mut min_col = i64::MAX;
    let mut max_col = i64::MIN;

    for i in 0..4 {
        let a = corners_2d[i];
        let b = corners_2d[(i + 1) % 4];
        for d in supercover(map, a, b) {
            out.push(d);
            let (row, col) = map.absolute_row_col(d);
            min_row = min_row.min(row);
            max_row = max_row.max(row);
            min_col = min_col.min(col);
            max_col = max_col.max(col);
        }
    }

    if min_row > max_row {
        return out;
    }

    for row in min_row..=max_row {
        for col in min_col..=max_col {
            if let Some(d) = abs_to_desc(map, row, col) {
                let center = map.tile_center(d);
                if point_inside_rotated_rect_2d(center, &corners_2d) {
                    out.push(d);
                }
            }
        }
    }

    out
}

fn xz(v: glam::Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

fn abs_to_desc(map: &Map, row: i64, col: i64) -> Option<TileDescriptor> {
    if row < 0 || col < 0 {
        return None;
    }
    let tile_h = map.resolution.tile_h as i64;
    let tile_w = map.resolution.tile_w as i64;
    let chunk_r = row / tile_h;
    let chunk_c = col / tile_w;
    if chunk_r >= map.resolution.chunk_h as i64 || chunk_c >= map.resolution.chunk_w as i64 {
        return None;
    }
    Some(TileDescriptor {
        chunk_r: chunk_r as u32,
        chunk_c: chunk_c as u32,
        tile_r: (row % tile_h) as u32,
        tile_c: (col % tile_w) as u32,
    })
}

/// All tiles whose AABB intersects a circle, walking a square region around
/// the centre tile (SPEC_FULL.md §4.5).
pub fn all_tiles_under_circle(map: &Map, center: Vec2, radius: f32) -> SmallVec<[TileDescriptor; 32]> {
    let mut out = SmallVec::new();
    let Ok(center_desc) = map.desc_for_point(center) else {
        return out;
    };
    let (center_row, center_col) = map.absolute_row_col(center_desc);

    let max_tile_dim = map.resolution.tile_x_dim().max(map.resolution.tile_z_dim());
    let ntiles = (radius / max_tile_dim).ceil() as i64;

    for dr in -ntiles..=ntiles {
        for dc in -ntiles..=ntiles {
            if let Some(d) = abs_to_desc(map, center_row + dr, center_col + dc) {
                let bounds = map.tile_bounds(d);
                if circle_rect_intersection_2d(center, radius, &bounds) {
                    out.push(d);
                }
            }
        }
    }
    out
}

/// All tiles whose AABB intersects an axis-aligned rectangle.
pub fn all_tiles_under_rect(map: &Map, rect: &Rect2D) -> SmallVec<[TileDescriptor; 32]> {
    let mut out = SmallVec::new();
    let Ok(min_desc) = map.desc_for_point(Vec2::new(rect.max.x, rect.min.y)) else {
        return all_tiles_under_rect_scan(map, rect);
    };
    let Ok(max_desc) = map.desc_for_point(Vec2::new(rect.min.x, rect.max.y)) else {
        return all_tiles_under_rect_scan(map, rect);
    };
    let (r0, c0) = map.absolute_row_col(min_desc);
    let (r1, c1) = map.absolute_row_col(max_desc);
    for row in r0.min(r1)..=r0.max(r1) {
        for col in c0.min(c1)..=c0.max(c1) {
            if let Some(d) = abs_to_desc(map, row, col) {
                let bounds = map.tile_bounds(d);
                if rect_rect_intersection_2d(rect, &bounds) {
                    out.push(d);
                }
            }
        }
    }
    out
}

/// Fallback full-map scan used only when the query rectangle's corners fall
/// outside the map (partial overlap at the border).
fn all_tiles_under_rect_scan(map: &Map, rect: &Rect2D) -> SmallVec<[TileDescriptor; 32]> {
    let mut out = SmallVec::new();
    for chunk_r in 0..map.resolution.chunk_h {
        for chunk_c in 0..map.resolution.chunk_w {
            for tile_r in 0..map.resolution.tile_h {
                for tile_c in 0..map.resolution.tile_w {
                    let d = TileDescriptor::new(chunk_r, chunk_c, tile_r, tile_c);
                    let bounds = map.tile_bounds(d);
                    if rect_rect_intersection_2d(rect, &bounds) {
                        out.push(d);
                    }
                }
            }
        }
    }
    out
}

/// The contour of a tile set: tiles not in the set but with at least one of
/// their eight neighbours in it (SPEC_FULL.md §4.5).
pub fn contour(map: &Map, tiles: &[TileDescriptor]) -> SmallVec<[TileDescriptor; 32]> {
    let mut out = SmallVec::new();
    if tiles.is_empty() {
        return out;
    }

    let set: HashSet<(i64, i64)> = tiles.iter().map(|&d| map.absolute_row_col(d)).collect();

    let mut min_row = i64::MAX;
    let mut max_row = i64::MIN;
    let mut min_col = i64::MAX;
    let mut max_col = i64::MIN;
    for &(r, c) in &set {
        min_row = min_row.min(r);
        max_row = max_row.max(r);
        min_col = min_col.min(c);
        max_col = max_col.max(c);
    }

    const OFFSETS: [(i64, i64); 8] =
        [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

    for row in (min_row - 1)..=(max_row + 1) {
        for col in (min_col - 1)..=(max_col + 1) {
            if set.contains(&(row, col)) {
                continue;
            }
            let has_marked_neighbor = OFFSETS.iter().any(|&(dr, dc)| set.contains(&(row + dr, col + dc)));
            if has_marked_neighbor {
                if let Some(d) = abs_to_desc(map, row, col) {
                    out.push(d);
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapResolution;
    use glam::Vec3;

    fn test_map() -> Map {
        Map::new(MapResolution { chunk_w: 2, chunk_h: 2, tile_w: 32, tile_h: 32 }, Vec3::ZERO)
    }

    #[test]
    fn contour_of_3x3_square_is_16_tile_ring() {
        let m = test_map();
        let mut square = Vec::new();
        for r in 10..13 {
            for c in 10..13 {
                square.push(TileDescriptor::new(0, 0, r, c));
            }
        }
        let ring = contour(&m, &square);
        assert_eq!(ring.len(), 16);
    }

    #[test]
    fn circle_footprint_includes_center_tile() {
        let m = test_map();
        let center_desc = TileDescriptor::new(0, 0, 16, 16);
        let center = m.tile_center(center_desc);
        let tiles = all_tiles_under_circle(&m, center, 20.0);
        assert!(tiles.iter().any(|&d| d == center_desc));
    }

    #[test]
    fn rect_footprint_matches_rect_rect_overlap() {
        let m = test_map();
        let rect = Rect2D::new(Vec2::new(-40.0, 0.0), Vec2::new(0.0, 40.0));
        let tiles = all_tiles_under_rect(&m, &rect);
        assert!(!tiles.is_empty());
        for d in &tiles {
            assert!(rect_rect_intersection_2d(&rect, &m.tile_bounds(*d)));
        }
    }
}
