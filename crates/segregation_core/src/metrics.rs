//! Run metrics and logging setup.
//!
//! Counters are atomics so a renderer can read them while the simulation
//! owner keeps stepping.

use crate::controller::StepReport;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Log a step summary at info level every this many steps.
const INFO_INTERVAL: u64 = 100;

pub struct Metrics {
    step_count: AtomicU64,
    total_moves: AtomicU64,
    last_unhappy: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step_count: AtomicU64::new(0),
            total_moves: AtomicU64::new(0),
            last_unhappy: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a completed step with its duration.
    pub fn record_step(&self, report: &StepReport, duration: Duration) {
        let step = self.step_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.total_moves
            .fetch_add(report.moved as u64, Ordering::Relaxed);
        self.last_unhappy
            .store(report.unhappy as u64, Ordering::Relaxed);

        tracing::debug!(
            step,
            unhappy = report.unhappy,
            moved = report.moved,
            stuck = report.stuck,
            duration_us = duration.as_micros() as u64,
            "Step complete"
        );
        if step % INFO_INTERVAL == 0 {
            tracing::info!(
                step,
                total_moves = self.total_moves(),
                unhappy = report.unhappy,
                "Simulation progress"
            );
        }
    }

    pub fn reset(&self) {
        self.step_count.store(0, Ordering::Relaxed);
        self.total_moves.store(0, Ordering::Relaxed);
        self.last_unhappy.store(0, Ordering::Relaxed);
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total_moves(&self) -> u64 {
        self.total_moves.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn last_unhappy(&self) -> u64 {
        self.last_unhappy.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}
