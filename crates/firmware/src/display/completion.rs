//! Hardware-completion handoff.
//!
//! [`FlushCompletion`] is the only object the completion context (DMA/SPI
//! interrupt, or an I/O thread) touches. It is a capacity-1 single-producer
//! single-consumer handoff:
//!
//! - the pipeline (consumer side) stores the in-flight slot before starting
//!   a transfer;
//! - [`on_hardware_complete`](FlushCompletion::on_hardware_complete)
//!   (producer side) swaps the slot out, frees the buffer, bumps counters,
//!   wakes the waiter and forwards the acknowledgment.
//!
//! The completion path never blocks, allocates or logs. It is the only
//! writer of the `InFlight -> Free` transition.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use platform::{CompletionNotify, FlushAck};

use super::pool::{BufferId, BufferState, BufferStates};

const NONE: u8 = 0xFF;

/// Shared completion state for one flush pipeline.
///
/// Usually placed in a `static` so the interrupt handler can reach it:
///
/// ```rust,ignore
/// static FLUSH_DONE: FlushCompletion = FlushCompletion::new();
///
/// #[interrupt]
/// fn DMA1_STREAM0() {
///     FLUSH_DONE.on_hardware_complete();
/// }
/// ```
pub struct FlushCompletion<A = ()> {
    states: BufferStates,
    in_flight: AtomicU8,
    signal: Signal<CriticalSectionRawMutex, ()>,
    completed: AtomicU32,
    spurious: AtomicU32,
    ack: A,
}

impl FlushCompletion<()> {
    /// Completion handle with no transport acknowledgment.
    pub const fn new() -> Self {
        Self::with_ack(())
    }
}

impl Default for FlushCompletion<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> FlushCompletion<A> {
    /// Completion handle that forwards every release to `ack`.
    pub const fn with_ack(ack: A) -> Self {
        Self {
            states: BufferStates::new(),
            in_flight: AtomicU8::new(NONE),
            signal: Signal::new(),
            completed: AtomicU32::new(0),
            spurious: AtomicU32::new(0),
            ack,
        }
    }

    /// Buffer state table shared with the pool.
    pub fn states(&self) -> &BufferStates {
        &self.states
    }

    /// Buffer currently owned by the transport.
    pub fn in_flight(&self) -> Option<BufferId> {
        BufferId::from_raw(self.in_flight.load(Ordering::Acquire))
    }

    /// True while a transfer is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) != NONE
    }

    /// Completions that released a buffer.
    pub fn completed(&self) -> u32 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Completions that arrived with nothing in flight.
    pub fn spurious(&self) -> u32 {
        self.spurious.load(Ordering::Relaxed)
    }

    /// Forward acknowledgment target.
    pub fn ack(&self) -> &A {
        &self.ack
    }

    pub(crate) fn begin(&self, id: BufferId) {
        self.signal.reset();
        self.in_flight.store(id.raw(), Ordering::Release);
    }

    /// Withdraw `id` after the transport refused it. False if the completion
    /// path already took it.
    pub(crate) fn cancel(&self, id: BufferId) -> bool {
        self.in_flight
            .compare_exchange(id.raw(), NONE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Drop any in-flight claim and free every buffer.
    pub(crate) fn reset(&self) {
        self.in_flight.store(NONE, Ordering::Release);
        self.states.reset();
        self.signal.reset();
    }

    pub(crate) async fn wait(&self) {
        self.signal.wait().await;
    }
}

impl<A: FlushAck> FlushCompletion<A> {
    /// Transfer finished on the wire.
    ///
    /// Safe to call from interrupt context: atomics, a critical-section
    /// signal and the acknowledgment callback only.
    pub fn on_hardware_complete(&self) {
        let raw = self.in_flight.swap(NONE, Ordering::AcqRel);
        let Some(id) = BufferId::from_raw(raw) else {
            self.spurious.fetch_add(1, Ordering::Relaxed);
            return;
        };
        self.states.force(id, BufferState::Free);
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.signal.signal(());
        self.ack.flush_ready();
    }
}

impl<A: FlushAck> CompletionNotify for FlushCompletion<A> {
    fn notify_complete(&self) {
        self.on_hardware_complete();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::MockFlushAck;

    #[test]
    fn completion_frees_buffer_and_acks() {
        let done = FlushCompletion::with_ack(MockFlushAck::new());
        let id = BufferId::from_raw(1).unwrap();
        done.states().force(id, BufferState::InFlight);
        done.begin(id);
        assert!(done.is_busy());
        done.on_hardware_complete();
        assert!(!done.is_busy());
        assert_eq!(done.states().get(id), BufferState::Free);
        assert_eq!(done.completed(), 1);
        assert_eq!(done.ack().count(), 1);
    }

    #[test]
    fn spurious_completion_is_counted_not_acked() {
        let done = FlushCompletion::with_ack(MockFlushAck::new());
        done.on_hardware_complete();
        assert_eq!(done.spurious(), 1);
        assert_eq!(done.completed(), 0);
        assert_eq!(done.ack().count(), 0);
    }

    #[test]
    fn cancel_loses_to_completion() {
        let done = FlushCompletion::new();
        let id = BufferId::from_raw(0).unwrap();
        done.begin(id);
        done.on_hardware_complete();
        assert!(!done.cancel(id));
    }
}
