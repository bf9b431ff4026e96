//! ClearPath intra-tick collision avoidance (SPEC_FULL.md §4.9).
//!
//! Grounded on `original_source/src/game/clearpath.c` (HRVO/VO construction,
//! the "permissible collision region" ray union, and the remove-furthest
//! retry loop). Debug-rendering (`on_render_3d`) is out of scope here; it
//! belongs to the render command surface, not this geometric core.

use crate::collision::{infinite_line_intersection_2d, ray_ray_intersection_2d};
use crate::constants::EPSILON;
use crate::math::Vec2;
use smallvec::SmallVec;

/// A neighbour's position, velocity and collision radius, as seen by the
/// entity computing its next velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClearpathEntity {
    pub xz_pos: Vec2,
    pub xz_vel: Vec2,
    pub radius: f32,
}

/// Extra clearance added on top of the two entities' radii when building a
/// velocity obstacle, matching the source's `CLEARPATH_BUFFER_RADIUS`.
pub const BUFFER_RADIUS: f32 = 0.0;

/// A ray in velocity space: `point + t * dir`, `t >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Ray2D {
    point: Vec2,
    dir: Vec2,
}

fn vo_edges(ent: ClearpathEntity, neighb: ClearpathEntity) -> (Vec2, Vec2) {
    let ent_to_nb = (neighb.xz_pos - ent.xz_pos).normalize_or_zero();
    let right = Vec2::new(-ent_to_nb.y, ent_to_nb.x) * (neighb.radius + ent.radius + BUFFER_RADIUS);

    let right_tangent = neighb.xz_pos + right;
    let left_tangent = neighb.xz_pos - right;

    let xz_right = (right_tangent - ent.xz_pos).normalize_or_zero();
    let xz_left = (left_tangent - ent.xz_pos).normalize_or_zero();
    (xz_right, xz_left)
}

struct ObstacleRays {
    apex: Vec2,
    left: Vec2,
    right: Vec2,
}

/// Ordinary velocity obstacle for a static neighbour: apex at the entity's
/// position offset by the neighbour's velocity.
fn obstacle_vo(ent: ClearpathEntity, neighb: ClearpathEntity) -> ObstacleRays {
    let (right, left) = vo_edges(ent, neighb);
    ObstacleRays { apex: ent.xz_pos + neighb.xz_vel, left, right }
}

/// Hybrid Reciprocal Velocity Obstacle for a dynamic neighbour: the apex of
/// the reciprocal VO is shifted toward whichever side of the RVO centreline
/// the entity's current velocity lies on (SPEC_FULL.md §4.9 step 1).
fn obstacle_hrvo(ent: ClearpathEntity, neighb: ClearpathEntity) -> ObstacleRays {
    let (right, left) = vo_edges(ent, neighb);
    let rvo_apex = ent.xz_pos + (ent.xz_vel + neighb.xz_vel) * 0.5;
    let vo_apex = ent.xz_pos + neighb.xz_vel;

    let centerline = left + right;
    let det = centerline.x * ent.xz_vel.y - centerline.y * ent.xz_vel.x;

    let apex = if det > EPSILON {
        // Entity velocity is left of the RVO centreline.
        infinite_line_intersection_2d(rvo_apex, left, vo_apex, right).unwrap_or(rvo_apex)
    } else if det < -EPSILON {
        // Entity velocity is right of the RVO centreline.
        infinite_line_intersection_2d(rvo_apex, right, vo_apex, left).unwrap_or(rvo_apex)
    } else {
        rvo_apex
    };

    ObstacleRays { apex, left, right }
}

fn rays_from_obstacles(obstacles: &[ObstacleRays]) -> SmallVec<[Ray2D; 32]> {
    let mut out = SmallVec::new();
    for o in obstacles {
        out.push(Ray2D { point: o.apex, dir: o.left });
        out.push(Ray2D { point: o.apex, dir: o.right });
    }
    out
}

/// Point-in-PCR test (SPEC_FULL.md §4.9): a point is inside the union of
/// obstacles iff it is strictly right of some obstacle's left ray and
/// strictly left of that same obstacle's right ray. Points exactly on a
/// boundary are considered "not inside".
fn inside_pcr(rays: &[Ray2D], test: Vec2) -> bool {
    debug_assert!(rays.len() % 2 == 0);
    for pair in rays.chunks_exact(2) {
        let [left, right] = [pair[0], pair[1]];

        let to_test = (test - left.point).normalize_or_zero();
        let left_det = to_test.y * left.dir.x - to_test.x * left.dir.y;
        if left_det < EPSILON {
            continue; // left of (= outside) the left ray
        }

        let to_test = (test - right.point).normalize_or_zero();
        let right_det = to_test.y * right.dir.x - to_test.x * right.dir.y;
        if right_det > -EPSILON {
            continue; // right of (= outside) the right ray
        }

        return true;
    }
    false
}

fn vo_xpoints(rays: &[Ray2D]) -> Vec<Vec2> {
    let mut out = Vec::new();
    for i in 0..rays.len() {
        for j in 0..rays.len() {
            if i == j {
                continue;
            }
            let Some(p) = ray_ray_intersection_2d(rays[i].point, rays[i].dir, rays[j].point, rays[j].dir) else {
                continue;
            };
            if !inside_pcr(rays, p) {
                out.push(p);
            }
        }
    }
    out
}

fn vdes_proj_points(rays: &[Ray2D], des_v: Vec2) -> Vec<Vec2> {
    let mut out = Vec::new();
    for ray in rays {
        let len = ray.dir.dot(des_v);
        let proj = ray.point + ray.dir * len;
        if !inside_pcr(rays, proj) {
            out.push(proj);
        }
    }
    out
}

fn closest_to_desired(candidates: &[Vec2], des_v: Vec2, ent_pos: Vec2) -> Option<Vec2> {
    candidates
        .iter()
        .map(|&world_pt| world_pt - ent_pos)
        .min_by(|a, b| (des_v - *a).length_squared().total_cmp(&(des_v - *b).length_squared()))
}

/// One attempt at `G_ClearPath_NewVelocity` with a fixed neighbour set:
/// `Some(v)` if a permissible velocity was found, `None` if the candidate
/// boundary-point set came out empty (caller should drop the farthest
/// neighbour and retry).
fn try_new_velocity(
    ent_pos: Vec2,
    des_v: Vec2,
    dyn_neighbs: &[ClearpathEntity],
    stat_neighbs: &[ClearpathEntity],
) -> Option<Vec2> {
    let ent = ClearpathEntity { xz_pos: ent_pos, xz_vel: des_v, radius: 0.0 };

    let mut obstacles: Vec<ObstacleRays> = Vec::with_capacity(dyn_neighbs.len() + stat_neighbs.len());
    for &nb in dyn_neighbs {
        obstacles.push(obstacle_hrvo(ent, nb));
    }
    for &nb in stat_neighbs {
        obstacles.push(obstacle_vo(ent, nb));
    }

    if obstacles.is_empty() {
        return Some(des_v);
    }

    let rays = rays_from_obstacles(&obstacles);
    let des_v_ws = ent_pos + des_v;

    if !inside_pcr(&rays, des_v_ws) {
        return Some(des_v);
    }

    let mut candidates = vo_xpoints(&rays);
    candidates.extend(vdes_proj_points(&rays, des_v));

    if candidates.is_empty() {
        return None;
    }

    closest_to_desired(&candidates, des_v, ent_pos)
}

/// Compute the entity's new local-space velocity for this tick, avoiding
/// imminent collisions with dynamic (HRVO) and static (VO) neighbours
/// (SPEC_FULL.md §4.9). Drops the farthest remaining neighbour and retries
/// when the candidate set is empty; gives up with zero velocity once no
/// neighbours remain.
pub fn new_velocity(
    ent_pos: Vec2,
    desired_velocity: Vec2,
    mut dyn_neighbs: SmallVec<[ClearpathEntity; 16]>,
    mut stat_neighbs: SmallVec<[ClearpathEntity; 16]>,
) -> Vec2 {
    loop {
        if let Some(v) = try_new_velocity(ent_pos, desired_velocity, &dyn_neighbs, &stat_neighbs) {
            return v;
        }

        let farthest = dyn_neighbs
            .iter()
            .copied()
            .chain(stat_neighbs.iter().copied())
            .map(|nb| (nb.xz_pos - ent_pos).length_squared())
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1));

        let Some((idx, _)) = farthest else {
            return Vec2::ZERO;
        };

        if idx < dyn_neighbs.len() {
            dyn_neighbs.remove(idx);
        } else {
            stat_neighbs.remove(idx - dyn_neighbs.len());
        }

        if dyn_neighbs.is_empty() && stat_neighbs.is_empty() {
            return Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_neighbours_returns_desired_velocity() {
        let v = new_velocity(Vec2::ZERO, Vec2::new(1.0, 0.0), SmallVec::new(), SmallVec::new());
        assert_eq!(v, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn desired_velocity_outside_pcr_is_accepted_unchanged() {
        // A static neighbour far off to the side shouldn't constrain motion
        // straight ahead.
        let stat: SmallVec<[ClearpathEntity; 16]> =
            SmallVec::from_slice(&[ClearpathEntity { xz_pos: Vec2::new(0.0, 100.0), xz_vel: Vec2::ZERO, radius: 0.5 }]);
        let v = new_velocity(Vec2::ZERO, Vec2::new(1.0, 0.0), SmallVec::new(), stat);
        assert_eq!(v, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn head_on_static_neighbour_deflects_velocity() {
        let stat: SmallVec<[ClearpathEntity; 16]> =
            SmallVec::from_slice(&[ClearpathEntity { xz_pos: Vec2::new(1.0, 0.0), xz_vel: Vec2::ZERO, radius: 0.6 }]);
        let v = new_velocity(Vec2::ZERO, Vec2::new(1.0, 0.0), SmallVec::new(), stat);
        // The desired velocity runs straight into the neighbour's VO, so the
        // entity must be deflected away from the straight-ahead direction.
        assert!(v != Vec2::new(1.0, 0.0));
    }

    #[test]
    fn inside_pcr_detects_point_between_left_and_right_rays() {
        let rays = [
            Ray2D { point: Vec2::ZERO, dir: Vec2::new(-1.0, 1.0).normalize() },
            Ray2D { point: Vec2::ZERO, dir: Vec2::new(1.0, 1.0).normalize() },
        ];
        assert!(inside_pcr(&rays, Vec2::new(0.0, 1.0)));
        assert!(!inside_pcr(&rays, Vec2::new(0.0, -1.0)));
    }
}
