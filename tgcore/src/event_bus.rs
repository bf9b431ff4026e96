//! Global/per-entity publish-subscribe event bus (SPEC_FULL.md §4.10).
//!
//! Grounded on `original_source/src/event/event.c` and
//! `event/public/event.h`: a `(eventtype, receiver_uid)`-keyed handler table,
//! a deferred-delivery queue drained once per frame between `UPDATE_START`
//! and `UPDATE_END`, and a `receiver_uid = ALL` global channel. Dispatch-table
//! shape (indexed lookup) is grounded on the teacher's `generic_index.rs`.
//! The dynamic-scripting half of the source (`E_Global_ScriptRegister`) is
//! replaced by a typed callback per SPEC_FULL.md §9's "Dynamic scripting
//! bindings" note: handlers are plain closures over a typed payload enum.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::any::Any;
use std::collections::VecDeque;
use std::sync::Arc;

/// Addresses the global channel rather than a specific entity, mirroring the
/// source's `GLOBAL_ID` sentinel (the max `u32`, since entity IDs never reach
/// it).
pub const GLOBAL_RECEIVER: u64 = u64::MAX;

/// Frame-boundary bracketing events (SPEC_FULL.md §4.10); engine-generated,
/// always delivered to the global channel.
pub const EVENT_UPDATE_START: u32 = 0x1_0000;
pub const EVENT_UPDATE_END: u32 = 0x1_0001;

/// Coarse sim state a handler may be gated to fire in (§5, GLOSSARY).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimState {
    Running,
    PausedFull,
    PausedUiRunning,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SimMask: u8 {
        const RUNNING          = 0b001;
        const PAUSED_FULL       = 0b010;
        const PAUSED_UI_RUNNING = 0b100;
    }
}

impl SimMask {
    pub const ALL: SimMask = SimMask::from_bits_truncate(0b111);

    pub fn allows(self, state: SimState) -> bool {
        match state {
            SimState::Running => self.contains(SimMask::RUNNING),
            SimState::PausedFull => self.contains(SimMask::PAUSED_FULL),
            SimState::PausedUiRunning => self.contains(SimMask::PAUSED_UI_RUNNING),
        }
    }
}

/// Where an event originated, mirroring the source's `event_source`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventSource {
    Engine,
    Script,
}

/// A typed payload. The closed variants cover this crate's own subsystems;
/// `Opaque` is the escape hatch for engine/script-supplied payloads this
/// crate does not know about (SPEC_FULL.md §4.10, DESIGN.md open question).
#[derive(Clone)]
pub enum EventPayload {
    None,
    TileChanged { chunk_r: u32, chunk_c: u32 },
    SelectionChanged,
    SessionFailLoad { path: Arc<str> },
    Opaque(Arc<dyn Any + Send + Sync>),
}

struct Event {
    event_type: u32,
    receiver: u64,
    source: EventSource,
    payload: EventPayload,
}

type Handler = Box<dyn FnMut(&EventPayload) + Send>;

struct HandlerDesc {
    id: u64,
    sim_mask: SimMask,
    handler: Handler,
}

/// A process-wide (here: instance-owned — see DESIGN.md "Global mutable
/// state") registry of `(eventtype, receiver) -> handlers` plus the deferred
/// delivery queue. `notify` enqueues; `service_queue` drains once, bracketed
/// by `UPDATE_START`/`UPDATE_END`.
pub struct EventBus {
    handlers: std::collections::HashMap<(u32, u64), SmallVec<[HandlerDesc; 4]>>,
    queue: Mutex<VecDeque<Event>>,
    next_handler_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self { handlers: Default::default(), queue: Mutex::new(VecDeque::new()), next_handler_id: 0 }
    }

    fn key(event_type: u32, receiver: u64) -> (u32, u64) {
        (event_type, receiver)
    }

    /// Register a handler for `(event_type, receiver)`; pass `GLOBAL_RECEIVER`
    /// for the global channel. Returns a handle usable with `unregister`.
    pub fn register(
        &mut self,
        event_type: u32,
        receiver: u64,
        sim_mask: SimMask,
        handler: impl FnMut(&EventPayload) + Send + 'static,
    ) -> HandlerHandle {
        let id = self.next_handler_id;
        self.next_handler_id += 1;
        self.handlers
            .entry(Self::key(event_type, receiver))
            .or_default()
            .push(HandlerDesc { id, sim_mask, handler: Box::new(handler) });
        HandlerHandle { event_type, receiver, id }
    }

    pub fn unregister(&mut self, handle: HandlerHandle) -> bool {
        let Some(vec) = self.handlers.get_mut(&Self::key(handle.event_type, handle.receiver)) else {
            return false;
        };
        let before = vec.len();
        vec.retain(|h| h.id != handle.id);
        vec.len() != before
    }

    /// Enqueue an event addressed to `GLOBAL_RECEIVER` for later delivery.
    pub fn notify(&self, event_type: u32, payload: EventPayload, source: EventSource) {
        self.queue.lock().push_back(Event { event_type, receiver: GLOBAL_RECEIVER, source, payload });
    }

    /// Enqueue an event addressed to a specific entity.
    pub fn notify_entity(&self, event_type: u32, receiver_uid: u64, payload: EventPayload, source: EventSource) {
        self.queue.lock().push_back(Event { event_type, receiver: receiver_uid, source, payload });
    }

    fn dispatch(&mut self, event_type: u32, receiver: u64, payload: &EventPayload, sim_state: SimState) {
        if let Some(vec) = self.handlers.get_mut(&Self::key(event_type, receiver)) {
            for h in vec.iter_mut() {
                if h.sim_mask.allows(sim_state) {
                    (h.handler)(payload);
                }
            }
        }
    }

    /// Drain the queue once: fire `UPDATE_START` to the global channel, pop
    /// and dispatch every queued event to both its specific receiver and the
    /// global channel (matching `E_Global_ServiceQueue`'s two-handler-table
    /// lookup per event), then fire `UPDATE_END`.
    pub fn service_queue(&mut self, sim_state: SimState) {
        self.dispatch(EVENT_UPDATE_START, GLOBAL_RECEIVER, &EventPayload::None, sim_state);

        loop {
            let event = self.queue.lock().pop_front();
            let Some(event) = event else { break };
            let _ = event.source;
            if event.receiver != GLOBAL_RECEIVER {
                self.dispatch(event.event_type, event.receiver, &event.payload, sim_state);
            }
            self.dispatch(event.event_type, GLOBAL_RECEIVER, &event.payload, sim_state);
        }

        self.dispatch(EVENT_UPDATE_END, GLOBAL_RECEIVER, &EventPayload::None, sim_state);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque handle returned by `register`, needed to `unregister` later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlerHandle {
    event_type: u32,
    receiver: u64,
    id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn global_handler_fires_for_any_receiver_event() {
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        bus.register(1, GLOBAL_RECEIVER, SimMask::ALL, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        bus.notify_entity(1, 42, EventPayload::None, EventSource::Engine);
        bus.service_queue(SimState::Running);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn entity_specific_handler_does_not_fire_for_other_entities() {
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        bus.register(1, 7, SimMask::ALL, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        bus.notify_entity(1, 8, EventPayload::None, EventSource::Engine);
        bus.service_queue(SimState::Running);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn sim_mask_gates_delivery() {
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        bus.register(1, GLOBAL_RECEIVER, SimMask::PAUSED_FULL, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        bus.notify(1, EventPayload::None, EventSource::Engine);
        bus.service_queue(SimState::Running);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        bus.notify(1, EventPayload::None, EventSource::Engine);
        bus.service_queue(SimState::PausedFull);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregister_stops_future_delivery() {
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        let handle = bus.register(1, GLOBAL_RECEIVER, SimMask::ALL, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert!(bus.unregister(handle));
        bus.notify(1, EventPayload::None, EventSource::Engine);
        bus.service_queue(SimState::Running);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn update_start_and_end_bracket_the_drain() {
        let mut bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let o1 = order.clone();
        bus.register(EVENT_UPDATE_START, GLOBAL_RECEIVER, SimMask::ALL, move |_| o1.lock().push("start"));
        let o2 = order.clone();
        bus.register(EVENT_UPDATE_END, GLOBAL_RECEIVER, SimMask::ALL, move |_| o2.lock().push("end"));
        let o3 = order.clone();
        bus.register(99, GLOBAL_RECEIVER, SimMask::ALL, move |_| o3.lock().push("mid"));
        bus.notify(99, EventPayload::None, EventSource::Engine);
        bus.service_queue(SimState::Running);
        assert_eq!(*order.lock(), vec!["start", "mid", "end"]);
    }
}
