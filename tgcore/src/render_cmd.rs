//! Rendering command surface (SPEC_FULL.md §4.7): the logic thread never
//! touches GPU state directly, it only enqueues commands the render thread
//! later drains in order.
//!
//! Grounded on the bump-allocator/argument-stack `rcmd`/`R_PushArg` idiom
//! visible throughout `original_source/src/render/render_gl_minimap.c` and
//! `game/clearpath.c`'s `R_PushCmd`/`R_PushArg` calls; re-expressed per
//! SPEC_FULL.md §9 as an owned arena plus a typed, not function-pointer,
//! command enum (the concrete GL calls stay a collaborator's concern, §1).

use crate::collision::Frustum;
use crate::map::{Map, RenderHandle};
use crate::math::{Mat4, Vec3};
use smallvec::SmallVec;

/// One render pass kind (SPEC_FULL.md §4.7: "Two passes are supported: depth
/// only and regular").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPass {
    DepthOnly,
    Regular,
}

/// A single render-thread command. The logic side never calls into the GPU
/// backend directly; it only ever constructs one of these and appends it to
/// the per-frame queue.
#[derive(Clone, Debug)]
pub enum RenderCommand {
    BeginPass(RenderPass),
    EndPass(RenderPass),
    DrawChunk { handle: RenderHandle, model: Mat4 },
    MinimapBake { chunks: Vec<(RenderHandle, Mat4)> },
    MinimapUpdateChunk { chunk_r: u32, chunk_c: u32, handle: RenderHandle, model: Mat4 },
    MinimapRender { center_screen: crate::math::Vec2, side_length: f32, border_colour: [f32; 4] },
}

/// The logic thread's per-frame command queue. Commands execute in push
/// order once drained (SPEC_FULL.md §5, ordering guarantee (i)).
#[derive(Default)]
pub struct CommandQueue {
    commands: Vec<RenderCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self { commands: Vec::new() }
    }

    pub fn push(&mut self, cmd: RenderCommand) {
        self.commands.push(cmd);
    }

    /// Drain all queued commands in push order; called by the render thread
    /// once per frame at the handshake boundary (§5).
    pub fn drain(&mut self) -> std::vec::Drain<'_, RenderCommand> {
        self.commands.drain(..)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Walk every chunk in `map`, frustum-culling with the exact SAT test, and
/// enqueue a `DrawChunk` for each visible one, bracketed by `BeginPass`/
/// `EndPass` markers so the backend can batch per-pass state (SPEC_FULL.md
/// §4.7 "Visible chunk iteration").
pub fn enqueue_visible_chunks(map: &Map, frustum: &Frustum, pass: RenderPass, queue: &mut CommandQueue) {
    queue.push(RenderCommand::BeginPass(pass));
    for chunk_r in 0..map.resolution.chunk_h {
        for chunk_c in 0..map.resolution.chunk_w {
            let Some(chunk) = map.chunk(chunk_r, chunk_c) else { continue };
            let Some(handle) = chunk.render_handle else { continue };
            let aabb = map.chunk_bounds(chunk_r, chunk_c);
            if !frustum.intersects_aabb_exact(&aabb) {
                continue;
            }
            let model = Mat4::from_translation(Vec3::new(
                map.origin.x - chunk_c as f32 * map.resolution.field_w(),
                0.0,
                map.origin.z + chunk_r as f32 * map.resolution.field_h(),
            ));
            queue.push(RenderCommand::DrawChunk { handle, model });
        }
    }
    queue.push(RenderCommand::EndPass(pass));
}

/// Visible chunk descriptors gathered without a queue, for callers (e.g. the
/// minimap bake) that need the set rather than the enqueued commands.
pub fn visible_chunk_coords(map: &Map, frustum: &Frustum) -> SmallVec<[(u32, u32); 64]> {
    let mut out = SmallVec::new();
    for chunk_r in 0..map.resolution.chunk_h {
        for chunk_c in 0..map.resolution.chunk_w {
            let aabb = map.chunk_bounds(chunk_r, chunk_c);
            if frustum.intersects_aabb_exact(&aabb) {
                out.push((chunk_r, chunk_c));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapResolution;
    use glam::Vec3 as GVec3;

    fn test_map() -> Map {
        let mut m = Map::new(MapResolution { chunk_w: 2, chunk_h: 2, tile_w: 4, tile_h: 4 }, GVec3::ZERO);
        for r in 0..2 {
            for c in 0..2 {
                m.chunk_mut(r, c).unwrap().render_handle = Some(RenderHandle((r * 2 + c) as u32));
            }
        }
        m
    }

    #[test]
    fn visible_iteration_brackets_with_begin_end() {
        let map = test_map();
        let frustum = Frustum::from_camera(
            GVec3::new(0.0, 200.0, -1.0),
            GVec3::Y,
            GVec3::new(0.0, -1.0, 0.01),
            1.0,
            std::f32::consts::FRAC_PI_2,
            1.0,
            1000.0,
        );
        let mut queue = CommandQueue::new();
        enqueue_visible_chunks(&map, &frustum, RenderPass::Regular, &mut queue);
        let drained: Vec<_> = queue.drain().collect();
        assert!(matches!(drained.first(), Some(RenderCommand::BeginPass(RenderPass::Regular))));
        assert!(matches!(drained.last(), Some(RenderCommand::EndPass(RenderPass::Regular))));
    }

    #[test]
    fn queue_clear_empties_commands() {
        let mut queue = CommandQueue::new();
        queue.push(RenderCommand::BeginPass(RenderPass::Regular));
        assert!(!queue.is_empty());
        queue.clear();
        assert!(queue.is_empty());
    }
}
