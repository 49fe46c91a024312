//! Flush pipeline: dirty regions in, display transfers out.
//!
//! The renderer acquires a buffer, fills it, and submits it with the region
//! it covers. The pipeline hands the pixels to the transport and returns; the
//! hardware later reports completion through [`FlushCompletion`], which frees
//! the buffer and wakes whichever `acquire`/`submit` is waiting.
//!
//! At most one transfer is outstanding at a time. With two buffers the
//! renderer fills the second band while the first drains; with one buffer
//! every pass waits for the previous transfer.
//!
//! A transfer that does not complete within the configured timeout is a
//! hardware fault. It is raised exactly once per incident (the first waiter
//! receives [`FlushError::HardwareFault`], later calls [`FlushError::Halted`])
//! and is latched until [`FlushPipeline::clear_fault`].

use embassy_time::{with_timeout, Duration, Instant};
use platform::{DisplayTransport, FlushAck};

use super::completion::FlushCompletion;
use super::pool::{BufferId, BufferState, FrameBufferPool};
use super::{DirtyRegion, DisplayHealth, FlushError};

/// Renderer-facing side of the display path.
pub struct FlushPipeline<'a, T, A = ()> {
    pool: FrameBufferPool<'a>,
    transport: T,
    completion: &'a FlushCompletion<A>,
    timeout: Duration,
    health: DisplayHealth,
    in_flight_since: Option<Instant>,
    faults_raised: u32,
    submitted: u32,
    spurious_seen: u32,
}

impl<'a, T, A> FlushPipeline<'a, T, A>
where
    T: DisplayTransport,
    A: FlushAck,
{
    /// Build a pipeline over one or two equally sized band buffers.
    pub fn new<I>(
        buffers: I,
        transport: T,
        completion: &'a FlushCompletion<A>,
        timeout: Duration,
    ) -> Result<Self, FlushError>
    where
        I: IntoIterator<Item = &'a mut [u8]>,
    {
        completion.reset();
        let pool = FrameBufferPool::new(buffers, completion.states())?;
        Ok(Self {
            pool,
            transport,
            completion,
            timeout,
            health: DisplayHealth::Healthy,
            in_flight_since: None,
            faults_raised: 0,
            submitted: 0,
            spurious_seen: completion.spurious(),
        })
    }

    /// Wait for a free buffer and claim it for rendering.
    ///
    /// Returns [`FlushError::Busy`] if the renderer already holds every
    /// buffer (nothing in flight that could free one).
    pub async fn acquire(&mut self) -> Result<BufferId, FlushError> {
        loop {
            self.ensure_healthy()?;
            if let Some(id) = self.pool.try_acquire() {
                return Ok(id);
            }
            if !self.completion.is_busy() {
                return Err(FlushError::Busy);
            }
            self.wait_idle().await?;
        }
    }

    /// Claim a free buffer without waiting.
    pub fn try_acquire(&mut self) -> Result<BufferId, FlushError> {
        self.ensure_healthy()?;
        self.pool.try_acquire().ok_or(FlushError::Busy)
    }

    /// Writable pixels of a buffer the renderer holds.
    pub fn pixels_mut(&mut self, id: BufferId) -> Result<&mut [u8], FlushError> {
        self.pool.pixels_mut(id)
    }

    /// Read-only pixels of any buffer.
    pub fn pixels(&self, id: BufferId) -> Option<&[u8]> {
        self.pool.pixels(id)
    }

    /// Give back a buffer without submitting it.
    pub fn release(&mut self, id: BufferId) {
        self.pool.release(id);
    }

    /// Hand `region` to the transport, waiting first for any transfer still
    /// in flight.
    pub async fn submit(&mut self, region: DirtyRegion) -> Result<(), FlushError> {
        self.ensure_healthy()?;
        self.check_region(&region)?;
        self.wait_idle().await?;
        self.start(region).await
    }

    /// Hand `region` to the transport only if nothing is in flight.
    pub async fn try_submit(&mut self, region: DirtyRegion) -> Result<(), FlushError> {
        self.ensure_healthy()?;
        self.check_region(&region)?;
        if self.completion.is_busy() {
            return Err(FlushError::Busy);
        }
        self.start(region).await
    }

    /// Wait until no transfer is outstanding.
    pub async fn flush(&mut self) -> Result<(), FlushError> {
        self.ensure_healthy()?;
        self.wait_idle().await
    }

    /// Leave the faulted state: drop the wedged transfer and free every
    /// buffer. The caller is responsible for resetting the panel first.
    pub fn clear_fault(&mut self) {
        if self.health.is_faulted() {
            info!("display fault cleared");
        }
        self.completion.reset();
        self.in_flight_since = None;
        self.health = DisplayHealth::Healthy;
    }

    /// Check the outstanding transfer against its deadline without waiting.
    ///
    /// Raises [`FlushError::HardwareFault`] once the deadline has passed,
    /// then [`FlushError::Halted`] until [`Self::clear_fault`], the same as a
    /// blocked [`Self::acquire`] or [`Self::flush`] would.
    pub fn poll_health(&mut self) -> Result<(), FlushError> {
        self.ensure_healthy()?;
        if !self.completion.is_busy() {
            self.in_flight_since = None;
            self.note_spurious();
            return Ok(());
        }
        let since = *self.in_flight_since.get_or_insert_with(Instant::now);
        let overdue = match since.checked_add(self.timeout) {
            Some(deadline) => Instant::now() >= deadline,
            None => true,
        };
        if overdue && self.completion.in_flight().is_some() {
            return Err(self.raise_fault());
        }
        Ok(())
    }

    /// Current health.
    pub fn health(&self) -> DisplayHealth {
        self.health
    }

    /// True once a wedge has been detected and not cleared.
    pub fn is_halted(&self) -> bool {
        self.health.is_faulted()
    }

    /// Hardware faults raised since construction.
    pub fn faults_raised(&self) -> u32 {
        self.faults_raised
    }

    /// Transfers started successfully.
    pub fn submitted(&self) -> u32 {
        self.submitted
    }

    /// State of buffer `id`.
    pub fn buffer_state(&self, id: BufferId) -> BufferState {
        self.pool.state(id)
    }

    /// Bytes per band buffer.
    pub fn buffer_len(&self) -> usize {
        self.pool.buffer_len()
    }

    /// Number of band buffers.
    pub fn buffer_count(&self) -> usize {
        self.pool.len()
    }

    /// Transport, for panel configuration between passes.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn ensure_healthy(&self) -> Result<(), FlushError> {
        if self.health.is_faulted() {
            Err(FlushError::Halted)
        } else {
            Ok(())
        }
    }

    fn check_region(&self, region: &DirtyRegion) -> Result<(), FlushError> {
        if self.pool.state(region.buffer) != BufferState::RenderingInto {
            return Err(FlushError::NotRendering);
        }
        if region.area.byte_len() > self.pool.buffer_len() {
            return Err(FlushError::InvalidRegion);
        }
        Ok(())
    }

    async fn start(&mut self, region: DirtyRegion) -> Result<(), FlushError> {
        let DirtyRegion { area, buffer } = region;
        let len = area.byte_len();
        let pixels = self
            .pool
            .pixels(buffer)
            .and_then(|p| p.get(..len))
            .ok_or(FlushError::InvalidRegion)?;
        self.pool.mark_in_flight(buffer)?;
        // Publish the slot before starting: a fast transport may complete
        // inside start_transfer.
        self.completion.begin(buffer);
        self.in_flight_since = Some(Instant::now());
        match self.transport.start_transfer(area, pixels).await {
            Ok(()) => {
                self.submitted = self.submitted.wrapping_add(1);
                trace!("flush started: buffer {} rows {}..={}", buffer.index(), area.y1, area.y2);
                Ok(())
            }
            Err(err) => {
                if self.completion.cancel(buffer) {
                    self.completion.states().force(buffer, BufferState::Free);
                }
                self.in_flight_since = None;
                warn!("display transfer failed to start: {}", err);
                Err(FlushError::Transport(err))
            }
        }
    }

    /// Block until the outstanding transfer (if any) completes or the
    /// wedge deadline passes.
    async fn wait_idle(&mut self) -> Result<(), FlushError> {
        while self.completion.is_busy() {
            let since = *self.in_flight_since.get_or_insert_with(Instant::now);
            let deadline = since.checked_add(self.timeout).unwrap_or(since);
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .unwrap_or(Duration::from_ticks(0));
            let woke = with_timeout(remaining, self.completion.wait()).await;
            if woke.is_err() && self.completion.is_busy() {
                return Err(self.raise_fault());
            }
        }
        self.in_flight_since = None;
        self.note_spurious();
        Ok(())
    }

    fn raise_fault(&mut self) -> FlushError {
        let Some(buffer) = self.completion.in_flight() else {
            return FlushError::Halted;
        };
        if self.health.on_wedge(buffer) {
            self.faults_raised = self.faults_raised.saturating_add(1);
            error!(
                "display wedged: buffer {} not completed within {} ms",
                buffer.index(),
                self.timeout.as_millis()
            );
            FlushError::HardwareFault
        } else {
            FlushError::Halted
        }
    }

    fn note_spurious(&mut self) {
        let seen = self.completion.spurious();
        if seen != self.spurious_seen {
            warn!(
                "{} spurious display completions",
                seen.wrapping_sub(self.spurious_seen)
            );
            self.spurious_seen = seen;
        }
    }
}
