//! Collision/intersection primitives (SPEC_FULL.md §4.3).
//!
//! Every routine here is pure and side-effect-free. Misses are signalled with
//! `None`/`false`, never with an error — per the propagation policy in §7.
//! Grounded on `original_source/src/phys/collision.c` and `pf_math.h`.

use crate::constants::EPSILON;
use crate::math::{signed_area_2d, Plane, Vec2, Vec3};

// ---------------------------------------------------------------------
// Volumes
// ---------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            x_min: min.x,
            x_max: max.x,
            y_min: min.y,
            y_max: max.y,
            z_min: min.z,
            z_max: max.z,
        }
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x_min, self.y_min, self.z_min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x_max, self.y_max, self.z_max)
    }

    pub fn center(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min(), self.max());
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }
}

/// Oriented bounding box: centre, three orthonormal axes, three half-lengths,
/// and the eight pre-computed corners (SPEC_FULL.md §3).
#[derive(Clone, Debug, PartialEq)]
pub struct Obb {
    pub center: Vec3,
    pub axes: [Vec3; 3],
    pub half_lengths: [f32; 3],
    pub corners: [Vec3; 8],
}

impl Obb {
    pub fn new(center: Vec3, axes: [Vec3; 3], half_lengths: [f32; 3]) -> Self {
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
            let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
            *corner = center
                + axes[0] * (sx * half_lengths[0])
                + axes[1] * (sy * half_lengths[1])
                + axes[2] * (sz * half_lengths[2]);
        }
        Self { center, axes, half_lengths, corners }
    }

    /// The four corners of the box's bottom face (axis index 1 = "up"),
    /// in winding order, used by footprint extraction (§4.5).
    pub fn bottom_face(&self) -> [Vec3; 4] {
        [self.corners[0], self.corners[1], self.corners[5], self.corners[4]]
    }
}

/// A view frustum: six inward-facing planes plus the eight corner points
/// (the exact SAT test needs the corners; the fast test only the planes).
#[derive(Clone, Debug, PartialEq)]
pub struct Frustum {
    /// Order: near, far, top, bot, left, right.
    pub planes: [Plane; 6],
    pub corners: [Vec3; 8],
}

impl Frustum {
    /// Build a symmetric perspective frustum from camera parameters.
    /// Grounded on `original_source/src/phys/collision.c::C_MakeFrustum`.
    pub fn from_camera(pos: Vec3, up: Vec3, forward: Vec3, aspect: f32, fov_y: f32, near: f32, far: f32) -> Self {
        let forward = forward.normalize();
        let up = up.normalize();
        let right = up.cross(forward).normalize();
        let up = forward.cross(right).normalize();

        let near_height = 2.0 * (fov_y * 0.5).tan() * near;
        let near_width = near_height * aspect;
        let far_height = 2.0 * (fov_y * 0.5).tan() * far;
        let far_width = far_height * aspect;

        let near_center = pos + forward * near;
        let far_center = pos + forward * far;

        let ntl = near_center + up * (near_height * 0.5) - right * (near_width * 0.5);
        let ntr = near_center + up * (near_height * 0.5) + right * (near_width * 0.5);
        let nbl = near_center - up * (near_height * 0.5) - right * (near_width * 0.5);
        let nbr = near_center - up * (near_height * 0.5) + right * (near_width * 0.5);

        let ftl = far_center + up * (far_height * 0.5) - right * (far_width * 0.5);
        let ftr = far_center + up * (far_height * 0.5) + right * (far_width * 0.5);
        let fbl = far_center - up * (far_height * 0.5) - right * (far_width * 0.5);
        let fbr = far_center - up * (far_height * 0.5) + right * (far_width * 0.5);

        let near_plane = Plane::new(near_center, forward);
        let far_plane = Plane::new(far_center, -forward);
        let top_plane = Plane::new(ntl, (ftl - ntl).cross(ntr - ntl).normalize());
        let bot_plane = Plane::new(nbl, (nbr - nbl).cross(fbl - nbl).normalize());
        let left_plane = Plane::new(ntl, (nbl - ntl).cross(ftl - ntl).normalize());
        let right_plane = Plane::new(ntr, (ftr - ntr).cross(nbr - ntr).normalize());

        Self {
            planes: [near_plane, far_plane, top_plane, bot_plane, left_plane, right_plane],
            corners: [ntl, ntr, nbl, nbr, ftl, ftr, fbl, fbr],
        }
    }

    /// Build an arbitrary (not necessarily symmetric) frustum from its eight
    /// corners directly: four near-plane corners and the four corresponding
    /// far-plane corners, both in `(top-left, top-right, bottom-left,
    /// bottom-right)` order. Used for box/drag selection, where the near/far
    /// quads come from unprojecting the screen-space selection rectangle
    /// rather than from a symmetric camera FOV.
    pub fn from_box_corners(near: [Vec3; 4], far: [Vec3; 4]) -> Self {
        let [ntl, ntr, nbl, nbr] = near;
        let [ftl, ftr, fbl, fbr] = far;

        let near_center = (ntl + ntr + nbl + nbr) * 0.25;
        let far_center = (ftl + ftr + fbl + fbr) * 0.25;
        let forward = (far_center - near_center).normalize();

        let near_plane = Plane::new(near_center, forward);
        let far_plane = Plane::new(far_center, -forward);
        let top_plane = Plane::new(ntl, (ftl - ntl).cross(ntr - ntl).normalize());
        let bot_plane = Plane::new(nbl, (nbr - nbl).cross(fbl - nbl).normalize());
        let left_plane = Plane::new(ntl, (nbl - ntl).cross(ftl - ntl).normalize());
        let right_plane = Plane::new(ntr, (ftr - ntr).cross(nbr - ntr).normalize());

        Self {
            planes: [near_plane, far_plane, top_plane, bot_plane, left_plane, right_plane],
            corners: [ntl, ntr, nbl, nbr, ftl, ftr, fbl, fbr],
        }
    }

    /// Fast frustum–AABB test: corner-counting against the six planes.
    pub fn intersects_aabb_fast(&self, aabb: &Aabb) -> bool {
        let corners = aabb.corners();
        for plane in &self.planes {
            if corners.iter().all(|&c| plane.signed_distance(c) < 0.0) {
                return false;
            }
        }
        true
    }

    /// Exact frustum–AABB test via the Separating Axis Theorem.
    pub fn intersects_aabb_exact(&self, aabb: &Aabb) -> bool {
        let aabb_corners = aabb.corners();
        let aabb_axes = [Vec3::X, Vec3::Y, Vec3::Z];
        separating_axis_test(&aabb_corners, &aabb_axes, &self.corners, &self.planes)
    }

    /// Exact frustum–OBB test via SAT.
    pub fn intersects_obb_exact(&self, obb: &Obb) -> bool {
        let axes = [obb.axes[0], obb.axes[1], obb.axes[2]];
        separating_axis_test(&obb.corners, &axes, &self.corners, &self.planes)
    }
}

fn arr_min(vals: &[f32]) -> f32 {
    vals.iter().copied().fold(f32::INFINITY, f32::min)
}

fn arr_max(vals: &[f32]) -> f32 {
    vals.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

fn ranges_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min <= b_max && b_min <= a_max
}

fn separating_axis_exists(box_corners: &[Vec3; 8], frustum_corners: &[Vec3; 8], axis: Vec3) -> bool {
    if axis.length_squared() < EPSILON * EPSILON {
        return false;
    }
    let box_proj: Vec<f32> = box_corners.iter().map(|c| c.dot(axis)).collect();
    let frustum_proj: Vec<f32> = frustum_corners.iter().map(|c| c.dot(axis)).collect();
    !ranges_overlap(arr_min(&box_proj), arr_max(&box_proj), arr_min(&frustum_proj), arr_max(&frustum_proj))
}

/// Shared SAT core for frustum–AABB / frustum–OBB exact tests: the three
/// box axes, the six frustum face normals, and all 18 edge cross-products.
fn separating_axis_test(
    box_corners: &[Vec3; 8],
    box_axes: &[Vec3; 3],
    frustum_corners: &[Vec3; 8],
    frustum_planes: &[Plane; 6],
) -> bool {
    for &axis in box_axes {
        if separating_axis_exists(box_corners, frustum_corners, axis) {
            return false;
        }
    }
    for plane in frustum_planes {
        if separating_axis_exists(box_corners, frustum_corners, plane.normal) {
            return false;
        }
    }
    // Frustum edges: the 6 connecting near/far corners plus the 4 edges of
    // each cap would over-count; the source reduces this to near-to-far
    // "side" edges crossed with each box axis (3 x 6 = 18 axes).
    let frustum_edges = [
        frustum_corners[4] - frustum_corners[0], // ntl->ftl
        frustum_corners[5] - frustum_corners[1], // ntr->ftr
        frustum_corners[6] - frustum_corners[2], // nbl->fbl
        frustum_corners[7] - frustum_corners[3], // nbr->fbr
        frustum_corners[1] - frustum_corners[0], // ntl->ntr
        frustum_corners[3] - frustum_corners[2], // nbl->nbr
    ];
    for &box_axis in box_axes {
        for &f_edge in &frustum_edges {
            let axis = box_axis.cross(f_edge);
            if separating_axis_exists(box_corners, frustum_corners, axis) {
                return false;
            }
        }
    }
    true
}

// ---------------------------------------------------------------------
// Ray tests
// ---------------------------------------------------------------------

/// Ray–AABB: six slab-plane t-values. Returns entry `t`, or `None` on miss.
pub fn ray_intersects_aabb(origin: Vec3, dir: Vec3, aabb: &Aabb) -> Option<f32> {
    let min = aabb.min();
    let max = aabb.max();
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        let (o, d, lo, hi) = match axis {
            0 => (origin.x, dir.x, min.x, max.x),
            1 => (origin.y, dir.y, min.y, max.y),
            _ => (origin.z, dir.z, min.z, max.z),
        };
        if d.abs() < EPSILON {
            if o < lo || o > hi {
                return None;
            }
        } else {
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            let (t1, t2) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            tmin = tmin.max(t1);
            tmax = tmax.min(t2);
        }
    }

    if tmax < 0.0 || tmin > tmax {
        None
    } else {
        Some(tmin)
    }
}

/// Ray–OBB via per-axis slab projection.
pub fn ray_intersects_obb(origin: Vec3, dir: Vec3, obb: &Obb) -> Option<f32> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;
    let delta = obb.center - origin;

    for i in 0..3 {
        let axis = obb.axes[i];
        let half = obb.half_lengths[i];
        let e = axis.dot(delta);
        let f = axis.dot(dir);

        if f.abs() > EPSILON {
            let mut t1 = (e + half) / f;
            let mut t2 = (e - half) / f;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            tmin = tmin.max(t1);
            tmax = tmax.min(t2);
            if tmin > tmax {
                return None;
            }
        } else if -e - half > 0.0 || -e + half < 0.0 {
            return None;
        }
    }

    if tmax < 0.0 {
        None
    } else {
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// Ray–triangle via the standard geometric (Möller-independent) method:
/// plane normal by edge cross product, then three edge-cross inside tests.
pub fn ray_intersects_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let normal = edge1.cross(edge2);
    let denom = normal.dot(dir);
    if denom.abs() < EPSILON {
        return None;
    }

    let t = normal.dot(a - origin) / denom;
    if t < 0.0 {
        return None;
    }

    let p = origin + dir * t;

    let edge0 = b - a;
    let vp0 = p - a;
    if normal.dot(edge0.cross(vp0)) < 0.0 {
        return None;
    }

    let edge1b = c - b;
    let vp1 = p - b;
    if normal.dot(edge1b.cross(vp1)) < 0.0 {
        return None;
    }

    let edge2b = a - c;
    let vp2 = p - c;
    if normal.dot(edge2b.cross(vp2)) < 0.0 {
        return None;
    }

    Some(t)
}

/// Ray–tri-mesh: loop triangles (flat vertex buffer, 3 verts per triangle),
/// keep the minimum positive `t`. The source has a loop-index bug in some
/// translation units (`n += 3` instead of `i += 3`); this is the corrected
/// form (SPEC_FULL.md §9).
pub fn ray_intersects_trimesh(origin: Vec3, dir: Vec3, verts: &[Vec3]) -> Option<f32> {
    let mut closest: Option<f32> = None;
    let mut i = 0;
    while i + 2 < verts.len() {
        if let Some(t) = ray_intersects_triangle(origin, dir, verts[i], verts[i + 1], verts[i + 2]) {
            closest = Some(closest.map_or(t, |c: f32| c.min(t)));
        }
        i += 3;
    }
    closest
}

pub fn ray_intersects_plane(origin: Vec3, dir: Vec3, plane: &Plane) -> Option<f32> {
    plane.ray_intersect(origin, dir)
}

pub fn point_inside_obb(p: Vec3, obb: &Obb) -> bool {
    let delta = p - obb.center;
    for i in 0..3 {
        let proj = obb.axes[i].dot(delta);
        if proj.abs() > obb.half_lengths[i] {
            return false;
        }
    }
    true
}

/// Line segment–OBB: short segments fall back to point-in-OBB on either
/// endpoint; otherwise a ray–OBB test with `t` clamped to the segment length.
pub fn line_seg_intersects_obb(a: Vec3, b: Vec3, obb: &Obb) -> bool {
    let seg = b - a;
    let len = seg.length();
    if len < EPSILON {
        return point_inside_obb(a, obb) || point_inside_obb(b, obb);
    }
    let dir = seg / len;
    match ray_intersects_obb(a, dir, obb) {
        Some(t) => (0.0..=len).contains(&t),
        None => false,
    }
}

// ---------------------------------------------------------------------
// 2D primitives (XZ plane)
// ---------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect2D {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect2D {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

/// Point-in-axis-aligned-rect, 2D.
pub fn point_inside_rect_2d(p: Vec2, rect: &Rect2D) -> bool {
    p.x >= rect.min.x && p.x <= rect.max.x && p.y >= rect.min.y && p.y <= rect.max.y
}

/// Point-in-rotated-rect via AB/AD dot-product range test. `corners` are the
/// four corners of the (possibly rotated) rectangle in winding order.
pub fn point_inside_rotated_rect_2d(p: Vec2, corners: &[Vec2; 4]) -> bool {
    let a = corners[0];
    let b = corners[1];
    let d = corners[3];
    let ab = b - a;
    let ad = d - a;
    let ap = p - a;

    let ab_ap = ap.dot(ab);
    let ad_ap = ap.dot(ad);

    ab_ap >= 0.0 && ab_ap <= ab.dot(ab) && ad_ap >= 0.0 && ad_ap <= ad.dot(ad)
}

/// Barycentric point-in-triangle test, inclusive of edges.
pub fn point_inside_triangle_2d(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let area = signed_area_2d(a, b, c);
    if area.abs() < EPSILON {
        return false;
    }
    let u = signed_area_2d(p, b, c) / area;
    let v = signed_area_2d(a, p, c) / area;
    let w = 1.0 - u - v;
    u >= 0.0 && v >= 0.0 && w >= 0.0
}

pub fn point_inside_circle_2d(p: Vec2, center: Vec2, radius: f32) -> bool {
    (p - center).length_squared() <= radius * radius
}

/// Segment–segment intersection, parametric form, bounded `0 <= s,t <= 1`.
pub fn line_line_intersection_2d(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<Vec2> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() < EPSILON {
        return None;
    }
    let diff = p3 - p1;
    let s = (diff.x * d2.y - diff.y * d2.x) / denom;
    let t = (diff.x * d1.y - diff.y * d1.x) / denom;
    if (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t) {
        Some(p1 + d1 * s)
    } else {
        None
    }
}

/// Infinite-line intersection (no segment bounds), used as the building
/// block for ray–ray intersection.
pub fn infinite_line_intersection_2d(p1: Vec2, d1: Vec2, p2: Vec2, d2: Vec2) -> Option<Vec2> {
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() < EPSILON {
        return None;
    }
    let diff = p2 - p1;
    let t = (diff.x * d2.y - diff.y * d2.x) / denom;
    Some(p1 + d1 * t)
}

/// Ray–ray intersection (2D): an infinite-line intersection, then bounds
/// checked on both rays via the sign of `(point - origin) . dir` per axis.
pub fn ray_ray_intersection_2d(o1: Vec2, d1: Vec2, o2: Vec2, d2: Vec2) -> Option<Vec2> {
    let p = infinite_line_intersection_2d(o1, d1, o2, d2)?;
    let on_ray = |origin: Vec2, dir: Vec2| -> bool {
        let delta = p - origin;
        (dir.x.abs() < EPSILON || delta.x * dir.x.signum() >= -EPSILON)
            && (dir.y.abs() < EPSILON || delta.y * dir.y.signum() >= -EPSILON)
            && delta.dot(dir) >= -EPSILON
    };
    if on_ray(o1, d1) && on_ray(o2, d2) {
        Some(p)
    } else {
        None
    }
}

/// Segment against an axis-aligned box's four edges; up to two hits.
pub fn line_box_intersection_2d(a: Vec2, b: Vec2, rect: &Rect2D) -> smallvec::SmallVec<[Vec2; 2]> {
    let mut hits = smallvec::SmallVec::new();
    let corners = [
        Vec2::new(rect.min.x, rect.min.y),
        Vec2::new(rect.max.x, rect.min.y),
        Vec2::new(rect.max.x, rect.max.y),
        Vec2::new(rect.min.x, rect.max.y),
    ];
    for i in 0..4 {
        let c0 = corners[i];
        let c1 = corners[(i + 1) % 4];
        if let Some(p) = line_line_intersection_2d(a, b, c0, c1) {
            hits.push(p);
        }
    }
    hits
}

/// Whether the segment's start point lies inside the box at all (used by
/// supercover to decide whether to nudge in from an intersection point).
pub fn box_point_intersection_2d(p: Vec2, rect: &Rect2D) -> bool {
    point_inside_rect_2d(p, rect)
}

/// Shortest distance from `p` to segment `(a, b)`, parametric projection
/// with `t` clamped to `[0, 1]`.
pub fn point_segment_shortest_dist_2d(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq < EPSILON { 0.0 } else { ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0) };
    let closest = a + ab * t;
    (p - closest).length()
}

/// Line (infinite, through `a` with direction `dir`) against circle; returns
/// the minimum positive root of the quadratic.
pub fn line_circle_intersection_2d(a: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let d = dir;
    let f = a - center;
    let a_coef = d.dot(d);
    let b_coef = 2.0 * f.dot(d);
    let c_coef = f.dot(f) - radius * radius;
    let disc = b_coef * b_coef - 4.0 * a_coef * c_coef;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t1 = (-b_coef - sqrt_disc) / (2.0 * a_coef);
    let t2 = (-b_coef + sqrt_disc) / (2.0 * a_coef);
    let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
    if lo >= 0.0 {
        Some(lo)
    } else if hi >= 0.0 {
        Some(hi)
    } else {
        None
    }
}

/// Circle–rect intersection: corner-in-rect (circle engulfs a corner),
/// centre-in-rect, or any edge–circle intersection.
pub fn circle_rect_intersection_2d(center: Vec2, radius: f32, rect: &Rect2D) -> bool {
    if point_inside_rect_2d(center, rect) {
        return true;
    }
    let corners = [
        Vec2::new(rect.min.x, rect.min.y),
        Vec2::new(rect.max.x, rect.min.y),
        Vec2::new(rect.max.x, rect.max.y),
        Vec2::new(rect.min.x, rect.max.y),
    ];
    if corners.iter().any(|&c| point_inside_circle_2d(c, center, radius)) {
        return true;
    }
    for i in 0..4 {
        let c0 = corners[i];
        let c1 = corners[(i + 1) % 4];
        let dist = point_segment_shortest_dist_2d(center, c0, c1);
        if dist <= radius {
            return true;
        }
    }
    false
}

pub fn rect_rect_intersection_2d(a: &Rect2D, b: &Rect2D) -> bool {
    ranges_overlap(a.min.x, a.max.x, b.min.x, b.max.x) && ranges_overlap(a.min.y, a.max.y, b.min.y, b.max.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_aabb_face() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let t = ray_intersects_aabb(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, &aabb).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_aabb() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(ray_intersects_aabb(Vec3::new(5.0, 5.0, 5.0), Vec3::NEG_Y, &aabb).is_none());
    }

    #[test]
    fn ray_hits_obb_axis_aligned() {
        let obb = Obb::new(Vec3::ZERO, [Vec3::X, Vec3::Y, Vec3::Z], [1.0, 1.0, 1.0]);
        let t = ray_intersects_obb(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, &obb).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn point_in_obb_basic() {
        let obb = Obb::new(Vec3::ZERO, [Vec3::X, Vec3::Y, Vec3::Z], [1.0, 1.0, 1.0]);
        assert!(point_inside_obb(Vec3::new(0.5, 0.5, 0.5), &obb));
        assert!(!point_inside_obb(Vec3::new(2.0, 0.0, 0.0), &obb));
    }

    #[test]
    fn ray_triangle_hits_center() {
        let a = Vec3::new(-1.0, 0.0, -1.0);
        let b = Vec3::new(1.0, 0.0, -1.0);
        let c = Vec3::new(0.0, 0.0, 1.0);
        let t = ray_intersects_triangle(Vec3::new(0.0, 5.0, -0.3), Vec3::NEG_Y, a, b, c).unwrap();
        assert!((t - 5.0).abs() < 1e-4);
    }

    #[test]
    fn rect_rect_overlap() {
        let a = Rect2D::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let b = Rect2D::new(Vec2::new(1.0, 1.0), Vec2::new(3.0, 3.0));
        let c = Rect2D::new(Vec2::new(5.0, 5.0), Vec2::new(6.0, 6.0));
        assert!(rect_rect_intersection_2d(&a, &b));
        assert!(!rect_rect_intersection_2d(&a, &c));
    }

    #[test]
    fn frustum_exact_sat_detects_single_chunk() {
        let f = Frustum::from_camera(
            Vec3::new(0.0, 10.0, -20.0),
            Vec3::Y,
            Vec3::new(0.0, -0.3, 1.0),
            1.0,
            std::f32::consts::FRAC_PI_4,
            1.0,
            100.0,
        );
        let inside = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let far_away = Aabb::new(Vec3::new(1000.0, -1.0, 1000.0), Vec3::new(1001.0, 1.0, 1001.0));
        assert!(f.intersects_aabb_exact(&inside));
        assert!(!f.intersects_aabb_exact(&far_away));
    }

    #[test]
    fn circle_rect_edge_case() {
        let rect = Rect2D::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(circle_rect_intersection_2d(Vec2::new(-1.0, 5.0), 2.0, &rect));
        assert!(!circle_rect_intersection_2d(Vec2::new(-10.0, 5.0), 2.0, &rect));
    }
}
