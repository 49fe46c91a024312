//! Partial framebuffer pool.
//!
//! Up to [`MAX_BUFFERS`] caller-provided band buffers, each in exactly one of
//! three states at any instant:
//!
//! ```text
//!            acquire                 submit
//!   Free ──────────────▶ RenderingInto ──────▶ InFlight
//!    ▲                        │                   │
//!    └────── release ─────────┘                   │
//!    └────────────── on_hardware_complete ────────┘
//! ```
//!
//! States live in [`BufferStates`] (atomics) so the completion path can
//! release a buffer without touching the pool itself. The renderer can only
//! reach pixel memory through [`FrameBufferPool::pixels_mut`], which refuses
//! any buffer that is not `RenderingInto`.

use core::sync::atomic::{AtomicU8, Ordering};

use super::FlushError;

/// Most band buffers a pool holds (double buffering).
pub const MAX_BUFFERS: usize = 2;

/// Ownership state of one band buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BufferState {
    /// Available to the next render pass
    Free = 0,
    /// Owned by the renderer, writable
    RenderingInto = 1,
    /// Owned by the display transport, must not be written
    InFlight = 2,
}

impl BufferState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::RenderingInto,
            2 => Self::InFlight,
            _ => Self::Free,
        }
    }
}

/// Handle to one pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferId(u8);

impl BufferId {
    /// Slot index.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub(crate) fn raw(self) -> u8 {
        self.0
    }

    pub(crate) fn from_raw(raw: u8) -> Option<Self> {
        (usize::from(raw) < MAX_BUFFERS).then_some(Self(raw))
    }
}

/// Lock-free per-slot state table shared between the pool and the
/// completion path.
pub struct BufferStates {
    slots: [AtomicU8; MAX_BUFFERS],
}

impl BufferStates {
    /// All slots `Free`.
    pub const fn new() -> Self {
        Self {
            slots: [AtomicU8::new(0), AtomicU8::new(0)],
        }
    }

    /// Current state of `id`.
    pub fn get(&self, id: BufferId) -> BufferState {
        self.slots
            .get(id.index())
            .map_or(BufferState::Free, |s| BufferState::from_u8(s.load(Ordering::Acquire)))
    }

    /// Atomically move `id` from `from` to `to`; false if it was not in `from`.
    pub(crate) fn transition(&self, id: BufferId, from: BufferState, to: BufferState) -> bool {
        self.slots.get(id.index()).is_some_and(|s| {
            s.compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        })
    }

    /// Unconditionally set `id` to `state`.
    pub(crate) fn force(&self, id: BufferId, state: BufferState) {
        if let Some(s) = self.slots.get(id.index()) {
            s.store(state as u8, Ordering::Release);
        }
    }

    pub(crate) fn reset(&self) {
        for s in &self.slots {
            s.store(BufferState::Free as u8, Ordering::Release);
        }
    }
}

impl Default for BufferStates {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed set of band buffers plus their shared state table.
pub struct FrameBufferPool<'a> {
    buffers: heapless::Vec<&'a mut [u8], MAX_BUFFERS>,
    states: &'a BufferStates,
}

impl<'a> FrameBufferPool<'a> {
    /// Build a pool from one or two equally sized buffers.
    ///
    /// All slots start `Free`.
    pub fn new<I>(buffers: I, states: &'a BufferStates) -> Result<Self, FlushError>
    where
        I: IntoIterator<Item = &'a mut [u8]>,
    {
        let mut pool = heapless::Vec::new();
        for buf in buffers {
            pool.push(buf).map_err(|_| FlushError::BufferCount)?;
        }
        let len = pool.first().map_or(0, |b| b.len());
        if len == 0 || pool.iter().any(|b| b.len() != len) {
            return Err(FlushError::BufferCount);
        }
        states.reset();
        Ok(Self {
            buffers: pool,
            states,
        })
    }

    /// Number of buffers.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Always false; a pool holds at least one buffer.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Bytes per buffer.
    pub fn buffer_len(&self) -> usize {
        self.buffers.first().map_or(0, |b| b.len())
    }

    /// State of `id`.
    pub fn state(&self, id: BufferId) -> BufferState {
        self.states.get(id)
    }

    /// Claim a `Free` buffer for rendering.
    pub fn try_acquire(&self) -> Option<BufferId> {
        self.ids()
            .find(|id| self.states.transition(*id, BufferState::Free, BufferState::RenderingInto))
    }

    /// Give an unsubmitted buffer back.
    pub fn release(&self, id: BufferId) -> bool {
        self.states
            .transition(id, BufferState::RenderingInto, BufferState::Free)
    }

    /// Writable pixels of a buffer the renderer owns.
    pub fn pixels_mut(&mut self, id: BufferId) -> Result<&mut [u8], FlushError> {
        if self.states.get(id) != BufferState::RenderingInto {
            return Err(FlushError::NotRendering);
        }
        self.buffers
            .get_mut(id.index())
            .map(|b| &mut **b)
            .ok_or(FlushError::NotRendering)
    }

    /// Read-only view of any buffer.
    pub fn pixels(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(id.index()).map(|b| &**b)
    }

    /// True when any buffer is `Free`.
    pub fn has_free(&self) -> bool {
        self.ids().any(|id| self.states.get(id) == BufferState::Free)
    }

    /// True when any buffer is `InFlight`.
    pub fn has_in_flight(&self) -> bool {
        self.ids().any(|id| self.states.get(id) == BufferState::InFlight)
    }

    pub(crate) fn mark_in_flight(&self, id: BufferId) -> Result<(), FlushError> {
        if self
            .states
            .transition(id, BufferState::RenderingInto, BufferState::InFlight)
        {
            Ok(())
        } else {
            Err(FlushError::NotRendering)
        }
    }

    fn ids(&self) -> impl Iterator<Item = BufferId> {
        (0..self.buffers.len()).filter_map(|i| u8::try_from(i).ok().and_then(BufferId::from_raw))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn acquire_hands_out_each_buffer_once() {
        let states = BufferStates::new();
        let (mut a, mut b) = ([0u8; 8], [0u8; 8]);
        let pool = FrameBufferPool::new([&mut a[..], &mut b[..]], &states).unwrap();
        let first = pool.try_acquire().unwrap();
        let second = pool.try_acquire().unwrap();
        assert_ne!(first, second);
        assert_eq!(pool.try_acquire(), None);
        assert!(pool.release(first));
        assert_eq!(pool.try_acquire(), Some(first));
    }

    #[test]
    fn in_flight_buffer_is_not_writable() {
        let states = BufferStates::new();
        let mut a = [0u8; 8];
        let mut pool = FrameBufferPool::new([&mut a[..]], &states).unwrap();
        let id = pool.try_acquire().unwrap();
        assert!(pool.pixels_mut(id).is_ok());
        pool.mark_in_flight(id).unwrap();
        assert_eq!(pool.pixels_mut(id).err(), Some(FlushError::NotRendering));
        assert!(!pool.release(id));
        assert_eq!(pool.state(id), BufferState::InFlight);
    }

    #[test]
    fn free_buffer_is_not_writable() {
        let states = BufferStates::new();
        let mut a = [0u8; 8];
        let mut pool = FrameBufferPool::new([&mut a[..]], &states).unwrap();
        let id = BufferId::from_raw(0).unwrap();
        assert_eq!(pool.pixels_mut(id).err(), Some(FlushError::NotRendering));
    }

    #[test]
    fn rejects_bad_buffer_sets() {
        let states = BufferStates::new();
        let empty: [&mut [u8]; 0] = [];
        assert!(FrameBufferPool::new(empty, &states).is_err());
        let (mut a, mut b) = ([0u8; 8], [0u8; 4]);
        assert!(FrameBufferPool::new([&mut a[..], &mut b[..]], &states).is_err());
        let (mut a, mut b, mut c) = ([0u8; 4], [0u8; 4], [0u8; 4]);
        assert!(FrameBufferPool::new([&mut a[..], &mut b[..], &mut c[..]], &states).is_err());
    }
}
