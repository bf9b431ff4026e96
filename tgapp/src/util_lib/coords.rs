//! Conversions across the `tgcore`/Bevy `glam` boundary.
//!
//! `tgcore` pins its own `glam` version (`tgcore::math`) independently of
//! whichever one Bevy bundles, so values never implicitly convert between
//! the two even when both happen to resolve to the same upstream release.
//! Grounded on the teacher's `util_lib/uo_coords.rs` (same role: a small set
//! of `To*` traits bridging one coordinate world to another), generalized
//! from UO-map coordinates to plain vector/matrix conversion.

pub trait ToBevyVec3 {
    fn to_bevy_vec3(&self) -> bevy::prelude::Vec3;
}

impl ToBevyVec3 for tgcore::math::Vec3 {
    fn to_bevy_vec3(&self) -> bevy::prelude::Vec3 {
        bevy::prelude::Vec3::new(self.x, self.y, self.z)
    }
}

pub trait ToBevyVec2 {
    fn to_bevy_vec2(&self) -> bevy::prelude::Vec2;
}

impl ToBevyVec2 for tgcore::math::Vec2 {
    fn to_bevy_vec2(&self) -> bevy::prelude::Vec2 {
        bevy::prelude::Vec2::new(self.x, self.y)
    }
}

pub trait ToCoreVec3 {
    fn to_core_vec3(&self) -> tgcore::math::Vec3;
}

impl ToCoreVec3 for bevy::prelude::Vec3 {
    fn to_core_vec3(&self) -> tgcore::math::Vec3 {
        tgcore::math::Vec3::new(self.x, self.y, self.z)
    }
}

pub trait ToCoreVec2 {
    fn to_core_vec2(&self) -> tgcore::math::Vec2;
}

impl ToCoreVec2 for bevy::prelude::Vec2 {
    fn to_core_vec2(&self) -> tgcore::math::Vec2 {
        tgcore::math::Vec2::new(self.x, self.y)
    }
}

/// Bevy's view/projection matrices into `tgcore::math::Mat4`, via the raw
/// column array rather than a field-by-field copy (`Mat4` has no public
/// field accessors on either side).
pub fn bevy_mat4_to_core(m: bevy::prelude::Mat4) -> tgcore::math::Mat4 {
    tgcore::math::Mat4::from_cols_array(&m.to_cols_array())
}
