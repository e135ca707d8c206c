//! Periodic scheduler for crawl cycles
//!
//! This module handles:
//! - Running a cycle immediately, then once per interval
//! - Never overlapping two cycles
//! - Isolating cycle failures (errors and panics) from the loop
//! - Stopping cleanly between cycles on a shutdown signal

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Runs a cycle function repeatedly at a fixed interval
///
/// The interval is the pause *between* cycles: the next cycle starts
/// `interval` after the previous one finished, so cycles never overlap.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs `cycle_fn` forever
    pub async fn run<F, Fut, T, E>(&self, cycle_fn: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        self.run_until(cycle_fn, std::future::pending()).await;
    }

    /// Runs `cycle_fn` until `shutdown` completes
    ///
    /// The shutdown signal is only observed between cycles; a running cycle
    /// is always allowed to finish. Each cycle runs on its own task so a
    /// panic inside it is contained and logged like an error.
    ///
    /// # Returns
    ///
    /// The number of cycles started
    pub async fn run_until<F, Fut, T, E, S>(&self, mut cycle_fn: F, shutdown: S) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles = 0u64;

        loop {
            cycles += 1;
            tracing::debug!("Starting crawl cycle {}", cycles);

            match tokio::spawn(cycle_fn()).await {
                Ok(Ok(_)) => tracing::debug!("Crawl cycle {} finished", cycles),
                Ok(Err(e)) => tracing::error!("Crawl cycle {} failed: {}", cycles, e),
                Err(e) => tracing::error!("Crawl cycle {} aborted: {}", cycles, e),
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping after {} cycles", cycles);
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        cycles
    }
}
