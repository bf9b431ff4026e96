//! Navigation façade (SPEC_FULL.md §4.8): a typed wrapper over an opaque
//! navigation engine.
//!
//! Grounded on `original_source/src/map/public/map.h`'s `M_Nav_*` family
//! (`M_NavRequestPath`, `M_NavDesiredPointSeekVelocity`, `M_NavHasDestLOS`,
//! `M_NavPositionPathable`, `M_NavBlockersIncref`/`Decref`,
//! `M_NavCutoutStaticObject`, `M_NavUpdatePortals`, `M_NavUpdateIslandsField`).
//! The engine's internals (flow fields, A*) are out of scope (§1); this
//! module only specifies the boundary the spatial core calls across.

use crate::collision::Obb;
use crate::errors::{CoreError, CoreResult};
use crate::math::Vec2;

/// Opaque identifier for a cached path/flow-field destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DestId(pub u32);

/// Navigation layer: distinct pathing planes (e.g. ground vs. air) can carry
/// independent cost fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NavLayer(pub u32);

bitflags::bitflags! {
    /// Flags qualifying a blocker region (SPEC_FULL.md §4.8).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BlockerFlags: u32 {
        const STATIC  = 0b001;
        const DYNAMIC = 0b010;
    }
}

/// The opaque navigation engine contract: flow-field generation, reachability
/// and cost-field queries. Implementations live outside this crate (§1); this
/// trait is the entire boundary the spatial core is allowed to depend on.
pub trait NavigationEngine: Send + Sync {
    fn request_path(&mut self, layer: NavLayer, src: Vec2, dest: Vec2) -> Option<DestId>;
    fn desired_point_seek_velocity(&self, dest: DestId, pos: Vec2, dest_xz: Vec2) -> Vec2;
    fn has_dest_los(&self, dest: DestId, pos: Vec2) -> bool;
    fn position_pathable(&self, layer: NavLayer, pos: Vec2) -> bool;
    fn position_blocked(&self, layer: NavLayer, pos: Vec2) -> bool;
    fn closest_reachable_dest(&self, layer: NavLayer, src: Vec2, dest: Vec2) -> Vec2;
    fn closest_reachable_adjacent_pos(&self, layer: NavLayer, src: Vec2, dest: Vec2) -> Vec2;
    fn closest_pathable(&self, layer: NavLayer, pos: Vec2) -> Vec2;
    fn locations_reachable(&self, layer: NavLayer, a: Vec2, b: Vec2) -> bool;
    fn blockers_incref(&mut self, layer: NavLayer, centre: Vec2, radius: f32, faction: u32, flags: BlockerFlags);
    fn blockers_decref(&mut self, layer: NavLayer, centre: Vec2, radius: f32, faction: u32, flags: BlockerFlags);
    fn blockers_incref_obb(&mut self, layer: NavLayer, faction: u32, flags: BlockerFlags, obb: &Obb);
    fn blockers_decref_obb(&mut self, layer: NavLayer, faction: u32, flags: BlockerFlags, obb: &Obb);
    fn cutout_static_object(&mut self, obb: &Obb);
    fn update_portals(&mut self);
    fn update_islands_field(&mut self);
}

/// Typed wrapper that converts world-space coordinates to navigation-space
/// coordinates via the map origin (SPEC_FULL.md §4.8) and otherwise just
/// forwards to the opaque engine. Surfaces `NavUnavailable` (programmer
/// error, §7) rather than panicking when called before the handle exists.
pub struct NavFacade<'a> {
    engine: Option<&'a mut dyn NavigationEngine>,
    /// World-space XZ of the map's top-left corner; subtracted from queries
    /// so the engine always sees navigation-space coordinates starting at
    /// the origin.
    map_origin: Vec2,
}

impl<'a> NavFacade<'a> {
    pub fn new(engine: Option<&'a mut dyn NavigationEngine>, map_origin: Vec2) -> Self {
        Self { engine, map_origin }
    }

    fn to_nav_space(&self, world_xz: Vec2) -> Vec2 {
        world_xz - self.map_origin
    }

    fn engine(&self) -> CoreResult<&dyn NavigationEngine> {
        self.engine.as_deref().ok_or(CoreError::NavUnavailable)
    }

    fn engine_mut(&mut self) -> CoreResult<&mut dyn NavigationEngine> {
        self.engine.as_deref_mut().ok_or(CoreError::NavUnavailable)
    }

    pub fn request_path(&mut self, src_xz: Vec2, dest_xz: Vec2, layer: NavLayer) -> CoreResult<Option<DestId>> {
        let src = self.to_nav_space(src_xz);
        let dest = self.to_nav_space(dest_xz);
        Ok(self.engine_mut()?.request_path(layer, src, dest))
    }

    pub fn desired_point_seek_velocity(&self, dest_id: DestId, pos_xz: Vec2, dest_xz: Vec2) -> CoreResult<Vec2> {
        let pos = self.to_nav_space(pos_xz);
        let dest = self.to_nav_space(dest_xz);
        Ok(self.engine()?.desired_point_seek_velocity(dest_id, pos, dest))
    }

    pub fn has_dest_los(&self, dest_id: DestId, pos_xz: Vec2) -> CoreResult<bool> {
        let pos = self.to_nav_space(pos_xz);
        Ok(self.engine()?.has_dest_los(dest_id, pos))
    }

    pub fn position_pathable(&self, layer: NavLayer, pos_xz: Vec2) -> CoreResult<bool> {
        let pos = self.to_nav_space(pos_xz);
        Ok(self.engine()?.position_pathable(layer, pos))
    }

    pub fn position_blocked(&self, layer: NavLayer, pos_xz: Vec2) -> CoreResult<bool> {
        let pos = self.to_nav_space(pos_xz);
        Ok(self.engine()?.position_blocked(layer, pos))
    }

    pub fn closest_reachable_dest(&self, layer: NavLayer, src_xz: Vec2, dest_xz: Vec2) -> CoreResult<Vec2> {
        let src = self.to_nav_space(src_xz);
        let dest = self.to_nav_space(dest_xz);
        Ok(self.engine()?.closest_reachable_dest(layer, src, dest) + self.map_origin)
    }

    pub fn closest_reachable_adjacent_pos(&self, layer: NavLayer, src_xz: Vec2, dest_xz: Vec2) -> CoreResult<Vec2> {
        let src = self.to_nav_space(src_xz);
        let dest = self.to_nav_space(dest_xz);
        Ok(self.engine()?.closest_reachable_adjacent_pos(layer, src, dest) + self.map_origin)
    }

    pub fn closest_pathable(&self, layer: NavLayer, pos_xz: Vec2) -> CoreResult<Vec2> {
        let pos = self.to_nav_space(pos_xz);
        Ok(self.engine()?.closest_pathable(layer, pos) + self.map_origin)
    }

    pub fn locations_reachable(&self, layer: NavLayer, a_xz: Vec2, b_xz: Vec2) -> CoreResult<bool> {
        let a = self.to_nav_space(a_xz);
        let b = self.to_nav_space(b_xz);
        Ok(self.engine()?.locations_reachable(layer, a, b))
    }

    pub fn blockers_incref(&mut self, layer: NavLayer, centre_xz: Vec2, radius: f32, faction: u32, flags: BlockerFlags) -> CoreResult<()> {
        let centre = self.to_nav_space(centre_xz);
        self.engine_mut()?.blockers_incref(layer, centre, radius, faction, flags);
        Ok(())
    }

    pub fn blockers_decref(&mut self, layer: NavLayer, centre_xz: Vec2, radius: f32, faction: u32, flags: BlockerFlags) -> CoreResult<()> {
        let centre = self.to_nav_space(centre_xz);
        self.engine_mut()?.blockers_decref(layer, centre, radius, faction, flags);
        Ok(())
    }

    pub fn blockers_incref_obb(&mut self, layer: NavLayer, faction: u32, flags: BlockerFlags, obb: &Obb) -> CoreResult<()> {
        self.engine_mut()?.blockers_incref_obb(layer, faction, flags, obb);
        Ok(())
    }

    pub fn blockers_decref_obb(&mut self, layer: NavLayer, faction: u32, flags: BlockerFlags, obb: &Obb) -> CoreResult<()> {
        self.engine_mut()?.blockers_decref_obb(layer, faction, flags, obb);
        Ok(())
    }

    pub fn cutout_static_object(&mut self, obb: &Obb) -> CoreResult<()> {
        self.engine_mut()?.cutout_static_object(obb);
        Ok(())
    }

    pub fn update_portals(&mut self) -> CoreResult<()> {
        self.engine_mut()?.update_portals();
        Ok(())
    }

    pub fn update_islands_field(&mut self) -> CoreResult<()> {
        self.engine_mut()?.update_islands_field();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeEngine {
        next_dest: u32,
        pathable: bool,
    }

    impl NavigationEngine for FakeEngine {
        fn request_path(&mut self, _layer: NavLayer, _src: Vec2, _dest: Vec2) -> Option<DestId> {
            let id = self.next_dest;
            self.next_dest += 1;
            Some(DestId(id))
        }
        fn desired_point_seek_velocity(&self, _dest: DestId, _pos: Vec2, dest_xz: Vec2) -> Vec2 {
            dest_xz.normalize_or_zero()
        }
        fn has_dest_los(&self, _dest: DestId, _pos: Vec2) -> bool {
            true
        }
        fn position_pathable(&self, _layer: NavLayer, _pos: Vec2) -> bool {
            self.pathable
        }
        fn position_blocked(&self, _layer: NavLayer, _pos: Vec2) -> bool {
            !self.pathable
        }
        fn closest_reachable_dest(&self, _layer: NavLayer, _src: Vec2, dest: Vec2) -> Vec2 {
            dest
        }
        fn closest_reachable_adjacent_pos(&self, _layer: NavLayer, _src: Vec2, dest: Vec2) -> Vec2 {
            dest
        }
        fn closest_pathable(&self, _layer: NavLayer, pos: Vec2) -> Vec2 {
            pos
        }
        fn locations_reachable(&self, _layer: NavLayer, _a: Vec2, _b: Vec2) -> bool {
            true
        }
        fn blockers_incref(&mut self, _: NavLayer, _: Vec2, _: f32, _: u32, _: BlockerFlags) {}
        fn blockers_decref(&mut self, _: NavLayer, _: Vec2, _: f32, _: u32, _: BlockerFlags) {}
        fn blockers_incref_obb(&mut self, _: NavLayer, _: u32, _: BlockerFlags, _: &Obb) {}
        fn blockers_decref_obb(&mut self, _: NavLayer, _: u32, _: BlockerFlags, _: &Obb) {}
        fn cutout_static_object(&mut self, _: &Obb) {}
        fn update_portals(&mut self) {}
        fn update_islands_field(&mut self) {}
    }

    #[test]
    fn facade_without_engine_reports_unavailable() {
        let facade = NavFacade::new(None, Vec2::ZERO);
        assert_eq!(facade.position_pathable(NavLayer(0), Vec2::ZERO), Err(CoreError::NavUnavailable));
    }

    #[test]
    fn facade_converts_world_to_nav_space() {
        let mut engine = FakeEngine { pathable: true, ..Default::default() };
        let origin = Vec2::new(100.0, 50.0);
        let mut facade = NavFacade::new(Some(&mut engine), origin);
        let id = facade.request_path(Vec2::new(110.0, 60.0), Vec2::new(120.0, 70.0), NavLayer(0)).unwrap();
        assert_eq!(id, Some(DestId(0)));
        assert!(facade.position_pathable(NavLayer(0), Vec2::new(100.0, 50.0)).unwrap());
    }
}
