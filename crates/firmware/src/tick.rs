//! Fixed-period tick source.
//!
//! [`TickScheduler`] sleeps to each deadline and hands out a [`Tick`]. Late
//! wake-ups are not caught up: whole periods missed are reported in
//! [`Tick::skipped`] and dropped, and the next deadline is anchored one
//! period after the actual wake time. [`TickClock`] is the shared monotonic
//! counter other contexts read for timing.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_time::{Duration, Instant, Timer};
use platform::DeckConfig;

/// Monotonic tick counter shared between contexts.
pub struct TickClock {
    ticks: AtomicU32,
}

impl TickClock {
    /// Clock at tick zero.
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
        }
    }

    /// Ticks delivered so far.
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Nominal time covered by the delivered ticks.
    pub fn elapsed_ms(&self, period_ms: u32) -> u64 {
        u64::from(self.ticks()).saturating_mul(u64::from(period_ms))
    }

    fn advance(&self) -> u32 {
        self.ticks.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

/// One delivered tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    /// Sequence number, starting at 1
    pub seq: u32,
    /// Whole periods missed before this tick
    pub skipped: u32,
}

/// Fixed-period tick driver.
pub struct TickScheduler<'c> {
    clock: &'c TickClock,
    period: Duration,
    next: Instant,
    skipped_total: u32,
}

impl<'c> TickScheduler<'c> {
    /// Scheduler whose first deadline is one period from now.
    pub fn new(clock: &'c TickClock, period: Duration) -> Self {
        Self::starting_at(clock, period, Instant::now())
    }

    /// Scheduler using the configured tick period.
    pub fn from_config(clock: &'c TickClock, config: &DeckConfig) -> Self {
        Self::new(clock, Duration::from_millis(u64::from(config.tick_period_ms)))
    }

    /// Scheduler whose first deadline is one period after `start`.
    pub fn starting_at(clock: &'c TickClock, period: Duration, start: Instant) -> Self {
        Self {
            clock,
            period,
            next: start.checked_add(period).unwrap_or(start),
            skipped_total: 0,
        }
    }

    /// Nominal period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Next deadline.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Ticks dropped because of late wake-ups.
    pub fn skipped_total(&self) -> u32 {
        self.skipped_total
    }

    /// Shared clock.
    pub fn clock(&self) -> &'c TickClock {
        self.clock
    }

    /// Sleep until the next deadline and deliver one tick.
    pub async fn next(&mut self) -> Tick {
        Timer::at(self.next).await;
        self.advance(Instant::now())
    }

    /// Deliver the tick for a wake-up at `now` and re-anchor.
    pub fn advance(&mut self, now: Instant) -> Tick {
        let late = now
            .checked_duration_since(self.next)
            .unwrap_or(Duration::from_ticks(0));
        let skipped = late
            .as_ticks()
            .checked_div(self.period.as_ticks())
            .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX));
        if skipped > 0 {
            self.skipped_total = self.skipped_total.saturating_add(skipped);
            debug!("tick late, {} skipped", skipped);
        }
        self.next = now.checked_add(self.period).unwrap_or(now);
        Tick {
            seq: self.clock.advance(),
            skipped,
        }
    }
}
