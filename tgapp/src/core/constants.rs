use bevy::prelude::Vec3;

//------------------------------------
// World light
//------------------------------------

/// Used by shaders to calculate lighting.
pub const BAKED_GLOBAL_LIGHT: Vec3 = Vec3::new(-1.0, 2.5, -1.0);
