//! Minimap bake/update contract (SPEC_FULL.md §4.7, §6).
//!
//! Grounded on `original_source/src/map/minimap.c`: the diamond-rotated
//! screen quad (`rotate_rect_ccw`, 45° CCW), virtual-resolution-aware bounds
//! fixup (`m_curr_bounds`), and the mouse-to-world unprojection
//! (`m_minimap_mouse_coords_to_world`). The actual GPU bake/blit stays a
//! render-thread concern (§1); this module only computes the geometry and
//! emits the `RenderCommand`s from `render_cmd.rs`.

use crate::collision::Rect2D;
use crate::constants::{MINIMAP_BORDER_WIDTH, TILES_PER_CHUNK_HEIGHT, TILES_PER_CHUNK_WIDTH, X_COORDS_PER_TILE, Z_COORDS_PER_TILE};
use crate::map::{Map, MinimapResizeMask};
use crate::math::Vec2;

pub const DEFAULT_BORDER_COLOUR: [f32; 4] = [65.0 / 255.0, 65.0 / 255.0, 65.0 / 255.0, 1.0];

/// Four corners of a (possibly rotated) screen-space quad, in `a, b, c, d`
/// winding order matching the source's diamond layout (top, right, bottom,
/// left after a 45° CCW rotation about the center).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenQuad {
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
    pub d: Vec2,
}

fn rotate_about_point_ccw(src: Vec2, point: Vec2, radians: f32) -> Vec2 {
    let p = src - point;
    let rotated = Vec2::new(radians.cos() * p.x + radians.sin() * p.y, -radians.sin() * p.x + radians.cos() * p.y);
    rotated + point
}

fn rotate_rect_ccw(center: Vec2, width: f32, height: f32, radians: f32) -> ScreenQuad {
    let left = center.x - width / 2.0;
    let right = center.x + width / 2.0;
    let top = center.y - height / 2.0;
    let bot = center.y + height / 2.0;

    let tl = Vec2::new(left, top);
    let tr = Vec2::new(right, top);
    let br = Vec2::new(right, bot);
    let bl = Vec2::new(left, bot);

    ScreenQuad {
        a: rotate_about_point_ccw(tl, center, radians),
        b: rotate_about_point_ccw(tr, center, radians),
        c: rotate_about_point_ccw(br, center, radians),
        d: rotate_about_point_ccw(bl, center, radians),
    }
}

/// Fix up the minimap's screen bounds for the current virtual/screen
/// resolution mismatch via the resize mask, then rotate the resulting
/// square 45° CCW to get the on-screen diamond (`m_curr_bounds`).
pub fn current_bounds(map: &Map, screen_vres: (u32, u32)) -> ScreenQuad {
    let rect = bounds_for_aspect_ratio(
        map.minimap.center_screen,
        map.minimap.side_length,
        map.minimap.side_length,
        (map.minimap.vres_width, map.minimap.vres_height),
        screen_vres,
        map.minimap.resize_mask,
    );
    rotate_rect_ccw(Vec2::new(rect.min.x + (rect.max.x - rect.min.x) / 2.0, rect.min.y + (rect.max.y - rect.min.y) / 2.0), rect.max.x - rect.min.x, rect.max.y - rect.min.y, std::f32::consts::FRAC_PI_4)
}

/// Scale a rectangle authored against `authored_vres` to the current
/// `screen_vres`, anchoring whichever edges the resize mask requests stay
/// fixed (SPEC_FULL.md §4.7's "virtual-resolution-aware UI placement"; the
/// source's `UI_BoundsForAspectRatio`).
fn bounds_for_aspect_ratio(
    center: Vec2,
    width: f32,
    height: f32,
    authored_vres: (u32, u32),
    screen_vres: (u32, u32),
    mask: MinimapResizeMask,
) -> Rect2D {
    let scale_x = screen_vres.0 as f32 / authored_vres.0 as f32;
    let scale_y = screen_vres.1 as f32 / authored_vres.1 as f32;

    let sx = if mask.left || mask.right { scale_x } else { 1.0 };
    let sy = if mask.top || mask.bottom { scale_y } else { 1.0 };

    let w = width * sx;
    let h = height * sy;
    let cx = if mask.left { center.x * scale_x } else if mask.right { screen_vres.0 as f32 - (authored_vres.0 as f32 - center.x) * scale_x } else { center.x };
    let cy = if mask.top { center.y * scale_y } else if mask.bottom { screen_vres.1 as f32 - (authored_vres.1 as f32 - center.y) * scale_y } else { center.y };

    Rect2D::new(Vec2::new(cx - w / 2.0, cy - h / 2.0), Vec2::new(cx + w / 2.0, cy + h / 2.0))
}

/// Unproject a screen-space point inside the minimap diamond to a world-space
/// XZ position (`m_minimap_mouse_coords_to_world`).
pub fn mouse_coords_to_world(map: &Map, screen_vres: (u32, u32), virt_screen_coords: Vec2) -> Vec2 {
    let bounds = current_bounds(map, screen_vres);

    let ap = virt_screen_coords - bounds.a;
    let ab = bounds.b - bounds.a;
    let ad = bounds.d - bounds.a;

    let mut x_frac = ap.dot(ab) / ab.dot(ab);
    let mut z_frac = ap.dot(ad) / ad.dot(ad);

    x_frac = x_frac.clamp(0.0, 1.0) - 0.5;
    z_frac = z_frac.clamp(0.0, 1.0) - 0.5;

    let map_ws_width = map.resolution.chunk_w as f32 * TILES_PER_CHUNK_WIDTH as f32 * X_COORDS_PER_TILE;
    let map_ws_height = map.resolution.chunk_h as f32 * TILES_PER_CHUNK_HEIGHT as f32 * Z_COORDS_PER_TILE;
    let map_ws_len = map_ws_width.max(map_ws_height);

    let center = Vec2::new(
        map.origin.x + map.resolution.total_field_w() / 2.0,
        map.origin.z + map.resolution.total_field_h() / 2.0,
    );

    Vec2::new(center.x - x_frac * map_ws_len, center.y + z_frac * map_ws_len)
}

/// Whether a screen point falls within the minimap's rotated diamond
/// (`M_MouseOverMinimap`), tested as two axis-aligned halves of the rotated
/// square after mapping the point back into the square's local frame.
pub fn point_over_minimap(map: &Map, screen_vres: (u32, u32), screen_point: Vec2) -> bool {
    let bounds = current_bounds(map, screen_vres);
    let ap = screen_point - bounds.a;
    let ab = bounds.b - bounds.a;
    let ad = bounds.d - bounds.a;
    let x_frac = ap.dot(ab) / ab.dot(ab);
    let z_frac = ap.dot(ad) / ad.dot(ad);
    (0.0..=1.0).contains(&x_frac) && (0.0..=1.0).contains(&z_frac)
}

/// Mark a single chunk's baked texel region dirty for the next
/// `MinimapUpdateChunk` command (`M_UpdateMinimapChunk`); the caller enqueues
/// the actual render command once it has the chunk's render handle.
pub fn update_chunk_request(map: &Map, chunk_r: u32, chunk_c: u32) -> Option<(u32, u32)> {
    map.chunk(chunk_r, chunk_c).map(|_| (chunk_r, chunk_c))
}

pub fn border_colour() -> [f32; 4] {
    DEFAULT_BORDER_COLOUR
}

pub fn border_width() -> f32 {
    MINIMAP_BORDER_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapResolution;
    use glam::Vec3;

    fn test_map() -> Map {
        Map::new(MapResolution { chunk_w: 4, chunk_h: 4, tile_w: 32, tile_h: 32 }, Vec3::ZERO)
    }

    #[test]
    fn rotate_rect_ccw_preserves_center() {
        let center = Vec2::new(100.0, 100.0);
        let quad = rotate_rect_ccw(center, 50.0, 50.0, std::f32::consts::FRAC_PI_4);
        let computed_center = (quad.a + quad.c) * 0.5;
        assert!((computed_center - center).length() < 1e-3);
    }

    #[test]
    fn center_of_minimap_unprojects_to_map_center() {
        let mut map = test_map();
        map.minimap.center_screen = Vec2::new(500.0, 500.0);
        let screen_vres = (map.minimap.vres_width, map.minimap.vres_height);
        let world = mouse_coords_to_world(&map, screen_vres, map.minimap.center_screen);
        let expected_center =
            Vec2::new(map.resolution.total_field_w() / 2.0, map.resolution.total_field_h() / 2.0);
        assert!((world - expected_center).length() < 1.0);
    }

    #[test]
    fn point_far_outside_diamond_is_not_over_minimap() {
        let map = test_map();
        let screen_vres = (map.minimap.vres_width, map.minimap.vres_height);
        assert!(!point_over_minimap(&map, screen_vres, Vec2::new(-10_000.0, -10_000.0)));
    }

    #[test]
    fn update_chunk_request_fails_out_of_range() {
        let map = test_map();
        assert!(update_chunk_request(&map, 99, 99).is_none());
    }
}
