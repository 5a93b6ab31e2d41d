//! Render progress and cancellation shared with pollers.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Read-mostly progress state for a render in flight.
///
/// Lives behind an `Arc` so a display thread can poll it while rayon
/// workers count rows down. All fields are atomics; the render loop never
/// takes a lock.
#[derive(Debug)]
pub struct RenderProgress {
    epoch: Instant,
    /// Nanoseconds from `epoch` to the start of the current render
    started_at: AtomicU64,
    rows_total: AtomicUsize,
    rows_remaining: AtomicUsize,
    cancelled: AtomicBool,
}

impl RenderProgress {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            started_at: AtomicU64::new(0),
            rows_total: AtomicUsize::new(0),
            rows_remaining: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Reset for a new render of `rows` rows. Clears any earlier cancel.
    pub(crate) fn begin(&self, rows: usize) {
        let nanos = self.epoch.elapsed().as_nanos().min(u64::MAX as u128) as u64;
        self.started_at.store(nanos, Ordering::Relaxed);
        self.rows_total.store(rows, Ordering::Relaxed);
        self.rows_remaining.store(rows, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Release);
    }

    /// Mark one row finished, returning the number still outstanding.
    pub(crate) fn finish_row(&self) -> usize {
        self.rows_remaining.fetch_sub(1, Ordering::AcqRel).saturating_sub(1)
    }

    /// Ask the current render to stop. Rows already started still finish.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn rows_remaining(&self) -> usize {
        self.rows_remaining.load(Ordering::Acquire)
    }

    pub fn rows_total(&self) -> usize {
        self.rows_total.load(Ordering::Relaxed)
    }

    /// When the current (or last) render started.
    pub fn start(&self) -> Instant {
        self.epoch + Duration::from_nanos(self.started_at.load(Ordering::Relaxed))
    }

    /// Time since the current render started.
    pub fn elapsed(&self) -> Duration {
        self.start().elapsed()
    }

    /// Completed share of rows in `[0, 1]`.
    pub fn fraction_done(&self) -> f64 {
        let total = self.rows_total();
        if total == 0 {
            return 0.0;
        }
        (total - self.rows_remaining().min(total)) as f64 / total as f64
    }
}

impl Default for RenderProgress {
    fn default() -> Self {
        Self::new()
    }
}
