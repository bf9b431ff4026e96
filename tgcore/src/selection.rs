//! Click/drag selection state machine and priority filtering
//! (SPEC_FULL.md §4.6, second half).
//!
//! Grounded on `original_source/src/game/selection.c`; the opaque-type
//! contracts of SPEC_FULL.md §6 (`ScriptTypeId`, `EntityFlags`,
//! `GetFactions`, `GetDiplomacyState`) are collected into one
//! `SelectionContext` trait the caller implements over its own entity store.

use crate::collision::Frustum;
use crate::math::Vec2;
use crate::raycast::VisibleEntity;
use smallvec::SmallVec;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityFlags {
    pub building: bool,
    pub selectable: bool,
    pub movable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiplomacyState {
    War,
    Peace,
    Allied,
}

impl DiplomacyState {
    pub fn is_war(self) -> bool {
        matches!(self, DiplomacyState::War)
    }
}

/// The opaque-type contracts this module needs from its embedding engine.
/// `faction_of` returns a faction index; `controllable_mask` has bit `f` set
/// iff the local player controls faction `f`. `uid == 0` is never a valid
/// script type (`ScriptTypeId(uid) -> u64`, `0` meaning unknown).
pub trait SelectionContext {
    fn script_type_id(&self, uid: u64) -> u64;
    fn flags(&self, uid: u64) -> EntityFlags;
    fn faction_of(&self, uid: u64) -> u32;
    fn controllable_mask(&self) -> u32;
    fn diplomacy_state(&self, a: u32, b: u32) -> DiplomacyState;
    fn visible_selectable(&self) -> &[VisibleEntity];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelState {
    Up,
    Down,
    Released,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

/// Drives the selection click/drag state machine and owns the current
/// selection set.
pub struct SelectionMachine {
    state: SelState,
    mouse_down_coord: Option<Vec2>,
    mouse_up_coord: Option<Vec2>,
    num_clicks: u32,
    selected: HashSet<u64>,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self {
            state: SelState::Up,
            mouse_down_coord: None,
            mouse_up_coord: None,
            num_clicks: 0,
            selected: HashSet::new(),
        }
    }

    pub fn selected(&self) -> &HashSet<u64> {
        &self.selected
    }

    pub fn state(&self) -> SelState {
        self.state
    }

    /// Left-mouse-down over the map area. The caller is responsible for the
    /// "not over UI, not over minimap, not in target mode, not at a screen
    /// edge" gating before calling this.
    pub fn on_mouse_down(&mut self, coord: Vec2) {
        if self.state == SelState::Up {
            self.state = SelState::Down;
            self.mouse_down_coord = Some(coord);
        }
    }

    pub fn on_mouse_up(&mut self, coord: Vec2, num_clicks: u32) {
        if self.state == SelState::Down {
            self.state = SelState::Released;
            self.mouse_up_coord = Some(coord);
            self.num_clicks = num_clicks;
        }
    }

    /// Called once per frame. If `Released`, computes the new selection and
    /// returns `true` iff `SelectionChanged` should be emitted (non-empty
    /// resulting set).
    pub fn update(
        &mut self,
        hovered_uid: Option<u64>,
        modifiers: Modifiers,
        frustum_for_box: impl FnOnce(Vec2, Vec2) -> Frustum,
        ctx: &dyn SelectionContext,
    ) -> bool {
        if self.state != SelState::Released {
            return false;
        }
        self.state = SelState::Up;

        let down = self.mouse_down_coord.take().unwrap_or_default();
        let up = self.mouse_up_coord.take().unwrap_or_default();

        if down == up {
            self.apply_click(hovered_uid, self.num_clicks, modifiers, ctx);
        } else {
            let frustum = frustum_for_box(down, up);
            self.apply_box(&frustum, modifiers, ctx);
        }

        self.apply_priority_filter(ctx);

        !self.selected.is_empty()
    }

    fn apply_click(&mut self, hovered_uid: Option<u64>, num_clicks: u32, modifiers: Modifiers, ctx: &dyn SelectionContext) {
        let Some(hovered) = hovered_uid else {
            if !modifiers.shift && !modifiers.ctrl {
                self.selected.clear();
            }
            return;
        };

        let target_type = ctx.script_type_id(hovered);
        let hit_set: SmallVec<[u64; 64]> = if num_clicks > 1 && target_type != 0 {
            ctx.visible_selectable()
                .iter()
                .filter(|e| ctx.script_type_id(e.uid) == target_type)
                .map(|e| e.uid)
                .collect()
        } else {
            SmallVec::from_slice(&[hovered])
        };

        self.apply_modifier_rule(&hit_set, modifiers);
    }

    fn apply_box(&mut self, frustum: &Frustum, modifiers: Modifiers, ctx: &dyn SelectionContext) {
        let hit_set: SmallVec<[u64; 64]> = ctx
            .visible_selectable()
            .iter()
            .filter(|e| frustum.intersects_obb_exact(&e.obb))
            .map(|e| e.uid)
            .collect();
        self.apply_modifier_rule(&hit_set, modifiers);
    }

    fn apply_modifier_rule(&mut self, hits: &[u64], modifiers: Modifiers) {
        if modifiers.shift {
            for &uid in hits {
                self.selected.insert(uid);
            }
        } else if modifiers.ctrl {
            for &uid in hits {
                if !self.selected.remove(&uid) {
                    self.selected.insert(uid);
                }
            }
        } else {
            self.selected.clear();
            for &uid in hits {
                self.selected.insert(uid);
            }
        }
    }

    fn apply_priority_filter(&mut self, ctx: &dyn SelectionContext) {
        if self.selected.is_empty() {
            return;
        }

        let mask = ctx.controllable_mask();
        let controlled: Vec<u64> = self
            .selected
            .iter()
            .copied()
            .filter(|&uid| (mask & (1 << ctx.faction_of(uid))) != 0)
            .collect();

        if !controlled.is_empty() {
            self.selected = controlled.into_iter().collect();
        } else {
            let player_factions: Vec<u32> = (0..32).filter(|f| mask & (1 << f) != 0).collect();
            let allied: Vec<u64> = self
                .selected
                .iter()
                .copied()
                .filter(|&uid| {
                    let f = ctx.faction_of(uid);
                    player_factions.iter().any(|&pf| !ctx.diplomacy_state(pf, f).is_war())
                })
                .collect();
            if !allied.is_empty() {
                self.selected = allied.into_iter().collect();
            }
            // Else: enemy-only selection, keep as-is.
        }

        let has_non_building = self.selected.iter().any(|&uid| !ctx.flags(uid).building);
        if has_non_building {
            self.selected.retain(|&uid| !ctx.flags(uid).building);
        }
    }
}

impl Default for SelectionMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Obb;
    use glam::Vec3;

    struct FakeCtx {
        entities: Vec<VisibleEntity>,
        types: std::collections::HashMap<u64, u64>,
        factions: std::collections::HashMap<u64, u32>,
        buildings: std::collections::HashSet<u64>,
        mask: u32,
    }

    impl SelectionContext for FakeCtx {
        fn script_type_id(&self, uid: u64) -> u64 {
            *self.types.get(&uid).unwrap_or(&0)
        }
        fn flags(&self, uid: u64) -> EntityFlags {
            EntityFlags { building: self.buildings.contains(&uid), selectable: true, movable: true }
        }
        fn faction_of(&self, uid: u64) -> u32 {
            *self.factions.get(&uid).unwrap_or(&0)
        }
        fn controllable_mask(&self) -> u32 {
            self.mask
        }
        fn diplomacy_state(&self, a: u32, b: u32) -> DiplomacyState {
            if a == b {
                DiplomacyState::Allied
            } else {
                DiplomacyState::War
            }
        }
        fn visible_selectable(&self) -> &[VisibleEntity] {
            &self.entities
        }
    }

    fn obb_at(x: f32) -> Obb {
        Obb::new(Vec3::new(x, 0.0, 0.0), [Vec3::X, Vec3::Y, Vec3::Z], [0.5, 0.5, 0.5])
    }

    #[test]
    fn single_click_overwrites_without_modifiers() {
        let ctx = FakeCtx {
            entities: vec![VisibleEntity { uid: 1, obb: obb_at(0.0) }],
            types: Default::default(),
            factions: [(1, 0)].into_iter().collect(),
            buildings: Default::default(),
            mask: 1,
        };
        let mut machine = SelectionMachine::new();
        machine.selected.insert(99);
        machine.on_mouse_down(Vec2::ZERO);
        machine.on_mouse_up(Vec2::ZERO, 1);
        let changed = machine.update(Some(1), Modifiers::default(), |_, _| unreachable!(), &ctx);
        assert!(changed);
        assert_eq!(machine.selected().len(), 1);
        assert!(machine.selected().contains(&1));
    }

    #[test]
    fn shift_click_adds_to_existing_selection() {
        let ctx = FakeCtx {
            entities: vec![VisibleEntity { uid: 2, obb: obb_at(0.0) }],
            types: Default::default(),
            factions: [(1, 0), (2, 0)].into_iter().collect(),
            buildings: Default::default(),
            mask: 1,
        };
        let mut machine = SelectionMachine::new();
        machine.selected.insert(1);
        machine.on_mouse_down(Vec2::ZERO);
        machine.on_mouse_up(Vec2::ZERO, 1);
        machine.update(Some(2), Modifiers { shift: true, ctrl: false }, |_, _| unreachable!(), &ctx);
        assert_eq!(machine.selected().len(), 2);
    }

    #[test]
    fn priority_filter_drops_enemies_when_any_controlled_present() {
        let ctx = FakeCtx {
            entities: vec![],
            types: Default::default(),
            factions: [(1, 0), (2, 1)].into_iter().collect(),
            buildings: Default::default(),
            mask: 0b1, // faction 0 is player-controlled
        };
        let mut machine = SelectionMachine::new();
        machine.selected.insert(1);
        machine.selected.insert(2);
        machine.apply_priority_filter(&ctx);
        assert_eq!(machine.selected().len(), 1);
        assert!(machine.selected().contains(&1));
    }

    #[test]
    fn priority_filter_drops_buildings_when_non_building_present() {
        let ctx = FakeCtx {
            entities: vec![],
            types: Default::default(),
            factions: [(1, 0), (2, 0)].into_iter().collect(),
            buildings: [2].into_iter().collect(),
            mask: 0b1,
        };
        let mut machine = SelectionMachine::new();
        machine.selected.insert(1);
        machine.selected.insert(2);
        machine.apply_priority_filter(&ctx);
        assert_eq!(machine.selected().len(), 1);
        assert!(machine.selected().contains(&1));
    }
}
