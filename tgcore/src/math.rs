//! Vector/matrix math. This crate leans on `glam` for every fixed-size
//! vector/matrix/quaternion operation (perspective, orthographic, look-at,
//! inverse) rather than hand-rolling them, the way the teacher crate already
//! does for its own coordinate math. What follows are the handful of
//! domain-specific helpers glam does not provide directly.

pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

/// Bilinear interpolation of four corner scalars at `(u, v) ∈ [0,1]²`.
///
/// Corner order is (NW, NE, SW, SE), matching the tile-corner convention used
/// throughout `tile.rs`: `u` increases toward +X, `v` increases toward +Z.
#[inline]
pub fn bilinear_interp(nw: f32, ne: f32, sw: f32, se: f32, u: f32, v: f32) -> f32 {
    let top = nw + (ne - nw) * u;
    let bot = sw + (se - sw) * u;
    top + (bot - top) * v
}

/// Signed area of the triangle `(a, b, c)` in the XZ plane, used as the
/// barycentric sign test for point-in-triangle / which-half-of-a-quad tests.
#[inline]
pub fn signed_area_2d(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// A plane described by a point on it and a unit normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal: normal.normalize() }
    }

    pub fn from_triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalize();
        Self { point: a, normal }
    }

    /// Signed distance from `p` to the plane; positive on the side the
    /// normal points toward.
    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p - self.point)
    }

    /// Ray–plane intersection distance `t`, or `None` if the ray is parallel
    /// to the plane or the intersection lies behind the origin.
    pub fn ray_intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let denom = dir.dot(self.normal);
        if denom.abs() < crate::constants::EPSILON {
            return None;
        }
        let t = (self.point - origin).dot(self.normal) / denom;
        if t < 0.0 {
            None
        } else {
            Some(t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bilinear_corners_reproduce_exactly() {
        assert_eq!(bilinear_interp(1.0, 2.0, 3.0, 4.0, 0.0, 0.0), 1.0);
        assert_eq!(bilinear_interp(1.0, 2.0, 3.0, 4.0, 1.0, 0.0), 2.0);
        assert_eq!(bilinear_interp(1.0, 2.0, 3.0, 4.0, 0.0, 1.0), 3.0);
        assert_eq!(bilinear_interp(1.0, 2.0, 3.0, 4.0, 1.0, 1.0), 4.0);
    }

    #[test]
    fn bilinear_midpoint_is_average() {
        let mid = bilinear_interp(0.0, 8.0, 0.0, 0.0, 0.5, 0.0);
        assert_eq!(mid, 4.0);
    }

    #[test]
    fn plane_ray_intersect_straight_down() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, 0.0), Vec3::Y);
        let t = plane.ray_intersect(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y).unwrap();
        assert_eq!(t, 10.0);
    }
}
