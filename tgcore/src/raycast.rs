//! Cursor unprojection and hover recomputation (SPEC_FULL.md §4.6, first half).
//!
//! Grounded on `original_source/src/map/raycast.c`'s cursor-to-world ray and
//! nearest-hit selection; state-machine shape patterned after the teacher's
//! `core/player.rs` input-state handling.

use crate::collision::{ray_intersects_obb, Obb};
use crate::math::{Mat4, Vec2, Vec3};

/// The subset of camera state needed to unproject a cursor position.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub view_proj: Mat4,
}

/// An entity the hover/selection machinery can hit-test against.
#[derive(Clone, Copy, Debug)]
pub struct VisibleEntity {
    pub uid: u64,
    pub obb: Obb,
}

/// Unproject a cursor position in normalized device coordinates (`[-1, 1]`
/// on both axes) through the inverse view-projection matrix, landing on the
/// camera's near plane.
pub fn unproject_near_plane(cursor_ndc: Vec2, view_proj: Mat4) -> Vec3 {
    let inv = view_proj.inverse();
    let clip = crate::math::Vec4::new(cursor_ndc.x, cursor_ndc.y, -1.0, 1.0);
    let world = inv * clip;
    Vec3::new(world.x, world.y, world.z) / world.w
}

/// Cast a ray from the camera through a cursor position and return the uid
/// of the closest entity hit, along with its `t`.
pub fn cursor_ray_pick(cursor_ndc: Vec2, camera: &Camera, visible: &[VisibleEntity]) -> Option<(u64, f32)> {
    let near_point = unproject_near_plane(cursor_ndc, camera.view_proj);
    let dir = (near_point - camera.position).normalize();

    let mut best: Option<(u64, f32)> = None;
    for entity in visible {
        if let Some(t) = ray_intersects_obb(camera.position, dir, &entity.obb) {
            if t > 0.0 && best.map_or(true, |(_, best_t)| t < best_t) {
                best = Some((entity.uid, t));
            }
        }
    }
    best
}

/// Tracks the currently-hovered entity and enforces "recompute at most once
/// per frame" even across multiple consumer reads in the same frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct HoverState {
    hovered_uid: Option<u64>,
    dirty: bool,
    computed_this_frame: bool,
}

impl HoverState {
    pub fn new() -> Self {
        Self { hovered_uid: None, dirty: false, computed_this_frame: false }
    }

    /// Called on a mouse-move event.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Called on the frame-start event (`UPDATE_START`, §4.10).
    pub fn on_frame_start(&mut self) {
        self.computed_this_frame = false;
    }

    /// Returns the hovered entity, recomputing from `cursor_ndc`/`camera`/
    /// `visible` only if dirty and not already recomputed this frame.
    pub fn hovered(&mut self, cursor_ndc: Vec2, camera: &Camera, visible: &[VisibleEntity]) -> Option<u64> {
        if self.dirty && !self.computed_this_frame {
            self.hovered_uid = cursor_ray_pick(cursor_ndc, camera, visible).map(|(uid, _)| uid);
            self.dirty = false;
            self.computed_this_frame = true;
        }
        self.hovered_uid
    }

    pub fn hovered_uid(&self) -> Option<u64> {
        self.hovered_uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Obb;

    fn camera_looking_down_neg_z(distance: f32) -> Camera {
        let position = Vec3::new(0.0, 0.0, distance);
        let view = Mat4::look_at_rh(position, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 1.0, 0.1, 1000.0);
        Camera { position, view_proj: proj * view }
    }

    fn unit_obb_at(center: Vec3) -> Obb {
        Obb::new(center, [Vec3::X, Vec3::Y, Vec3::Z], [0.5, 0.5, 0.5])
    }

    #[test]
    fn cursor_centered_picks_entity_on_axis() {
        let camera = camera_looking_down_neg_z(10.0);
        let entity = VisibleEntity { uid: 42, obb: unit_obb_at(Vec3::ZERO) };
        let hit = cursor_ray_pick(Vec2::ZERO, &camera, &[entity]);
        assert_eq!(hit.map(|(uid, _)| uid), Some(42));
    }

    #[test]
    fn cursor_off_to_the_side_misses() {
        let camera = camera_looking_down_neg_z(10.0);
        let entity = VisibleEntity { uid: 42, obb: unit_obb_at(Vec3::ZERO) };
        let hit = cursor_ray_pick(Vec2::new(0.95, 0.95), &camera, &[entity]);
        assert!(hit.is_none());
    }

    #[test]
    fn hover_recomputes_only_once_per_frame() {
        let camera = camera_looking_down_neg_z(10.0);
        let entity = VisibleEntity { uid: 7, obb: unit_obb_at(Vec3::ZERO) };
        let mut hover = HoverState::new();

        hover.mark_dirty();
        assert_eq!(hover.hovered(Vec2::ZERO, &camera, &[entity]), Some(7));

        // Entity removed mid-frame; a second read without a new mouse-move
        // event must not recompute.
        assert_eq!(hover.hovered(Vec2::ZERO, &camera, &[]), Some(7));

        hover.on_frame_start();
        assert_eq!(hover.hovered(Vec2::ZERO, &camera, &[]), Some(7));

        hover.mark_dirty();
        assert_eq!(hover.hovered(Vec2::ZERO, &camera, &[]), None);
    }
}
